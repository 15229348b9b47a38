pub mod app;
pub mod csv_loader;
pub mod logging;
pub mod report;
pub mod utils;
pub mod wizard_file;

pub use app::PlanRequest;
pub use csv_loader::DebtCsvError;
pub use wizard_file::{FieldIssue, WizardFileError, WizardValidationError};
