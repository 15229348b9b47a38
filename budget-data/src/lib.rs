mod builtin;
mod loader;

pub use builtin::{
    DEFAULT_TAX_YEAR, FEDERAL_BRACKETS_2024, STATE_TAX_2024, TAX_YEAR_2024, builtin_tables,
    tax_year_2024,
};
pub use loader::{
    FEDERAL_BRACKETS_FILE, FederalBracketRecord, STATE_TAX_FILE, StandardDeductions,
    StateTaxRecord, TAX_YEAR_FILE, TaxTableLoader, TaxTableLoaderError, TaxYearRecord,
};
