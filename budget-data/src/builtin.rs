//! Tax tables compiled into the binary.

use budget_core::TaxTables;

use crate::loader::{TaxTableLoader, TaxTableLoaderError};

pub const FEDERAL_BRACKETS_2024: &str = include_str!("../data/2024/federal_brackets.csv");
pub const STATE_TAX_2024: &str = include_str!("../data/2024/state_tax.csv");
pub const TAX_YEAR_2024: &str = include_str!("../data/2024/tax_year.toml");

/// Latest tax year with embedded data.
pub const DEFAULT_TAX_YEAR: i32 = 2024;

/// 2024 federal brackets, all 50 states plus DC, and 2024 FICA constants.
pub fn tax_year_2024() -> Result<TaxTables, TaxTableLoaderError> {
    TaxTableLoader::load_from_strs(FEDERAL_BRACKETS_2024, STATE_TAX_2024, TAX_YEAR_2024)
}

/// Embedded tables for `tax_year`, if any.
pub fn builtin_tables(tax_year: i32) -> Option<Result<TaxTables, TaxTableLoaderError>> {
    match tax_year {
        2024 => Some(tax_year_2024()),
        _ => None,
    }
}
