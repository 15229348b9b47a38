mod budget;
mod debt;
mod filing_status;
mod paycheck;
mod tax_bracket;
mod tax_tables;
mod wizard;

pub use budget::{
    BudgetMode, BudgetModeProfile, BudgetRecommendations, CategoryRange, RentRecommendation,
    SavingsTargets, TransportationCaps, UtilitiesEstimate,
};
pub use debt::{Debt, DebtType};
pub use filing_status::FilingStatus;
pub use paycheck::{
    FicaBreakdown, PayFrequency, PaycheckBreakdown, PaycheckInput, PostTaxDeductions,
    PreTaxDeductions,
};
pub use tax_bracket::TaxBracket;
pub use tax_tables::{
    FederalSchedule, FicaConfig, StateTaxConfig, TaxTableError, TaxTables, validate_brackets,
};
pub use wizard::{Benefits, Contribution, Income, Location, WizardData};
