//! Wizard answers read from a TOML file, plus the input checks every plan
//! goes through before it reaches the engine.
//!
//! ```toml
//! [location]
//! state = "AZ"
//! city = "Phoenix"
//!
//! [income]
//! annual_gross = 85000
//! pay_frequency = "biweekly"
//!
//! [benefits]
//! filing_status = "single"
//! retirement_401k = { percent = 12 }
//! hsa = { fixed_amount = 100 }
//!
//! [[debts]]
//! id = "visa"
//! type = "credit_card"
//! balance = 3500
//! apr = 24.99
//! minimum_payment = 120
//!
//! [budget]
//! mode = "conservative"
//! rent = 1500
//! ```
//!
//! The `[budget]` table is optional; it picks the budget mode and overrides
//! recommended amounts.

use std::fmt;
use std::path::{Path, PathBuf};

use budget_core::{
    Benefits, BudgetMode, BudgetOverrides, Contribution, Debt, Income, Location, WizardData,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

const MAX_LOCAL_TAX_PERCENT: Decimal = dec!(20);
const SUPPORTED_COUNTRY: &str = "US";

/// Optional `[budget]` table of a wizard file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BudgetSection {
    pub mode: Option<BudgetMode>,
    pub rent: Option<Decimal>,
    pub groceries: Option<Decimal>,
    pub lifestyle: Option<Decimal>,
    pub utilities: Option<Decimal>,
}

impl BudgetSection {
    pub fn overrides(&self) -> BudgetOverrides {
        BudgetOverrides {
            rent: self.rent,
            groceries: self.groceries,
            lifestyle: self.lifestyle,
            utilities: self.utilities,
        }
    }
}

/// Parsed contents of a wizard file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WizardFile {
    pub location: Location,
    pub income: Income,
    #[serde(default)]
    pub benefits: Benefits,
    #[serde(default)]
    pub debts: Vec<Debt>,
    #[serde(default)]
    pub budget: BudgetSection,
}

impl WizardFile {
    pub fn into_parts(self) -> (WizardData, BudgetSection) {
        let wizard = WizardData {
            location: self.location,
            income: self.income,
            benefits: self.benefits,
            debts: self.debts,
        };
        (wizard, self.budget)
    }
}

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every problem found in one pass over the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid wizard input: {}", join_issues(.issues))]
pub struct WizardValidationError {
    pub issues: Vec<FieldIssue>,
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, thiserror::Error)]
pub enum WizardFileError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] WizardValidationError),
}

/// Collects field issues while walking the input.
#[derive(Default)]
struct Checker {
    issues: Vec<FieldIssue>,
}

impl Checker {
    fn push(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.issues.push(FieldIssue {
            field: field.into(),
            message: message.into(),
        });
    }

    fn non_negative(
        &mut self,
        field: impl Into<String>,
        value: Decimal,
    ) {
        if value < Decimal::ZERO {
            self.push(field, format!("must not be negative (got {value})"));
        }
    }

    fn within(
        &mut self,
        field: impl Into<String>,
        value: Decimal,
        max: Decimal,
    ) {
        if value < Decimal::ZERO || value > max {
            self.push(field, format!("must be between 0 and {max} (got {value})"));
        }
    }

    fn percent(
        &mut self,
        field: impl Into<String>,
        value: Decimal,
    ) {
        self.within(field, value, Decimal::ONE_HUNDRED);
    }

    fn contribution(
        &mut self,
        field: &str,
        contribution: Option<Contribution>,
    ) {
        match contribution {
            Some(Contribution::Percent(percent)) => self.percent(field, percent),
            Some(Contribution::FixedAmount(amount)) => self.non_negative(field, amount),
            None => {}
        }
    }

    fn debts(
        &mut self,
        debts: &[Debt],
    ) {
        for (i, debt) in debts.iter().enumerate() {
            let prefix = format!("debts[{i}]");
            if debt.id.trim().is_empty() {
                self.push(format!("{prefix}.id"), "must not be empty");
            }
            self.non_negative(format!("{prefix}.balance"), debt.balance);
            self.percent(format!("{prefix}.apr"), debt.apr);
            self.non_negative(format!("{prefix}.minimum_payment"), debt.minimum_payment);
        }
    }

    fn finish(self) -> Result<(), WizardValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(WizardValidationError {
                issues: self.issues,
            })
        }
    }
}

/// Trims the state code and upper-cases it so table lookups match.
pub fn normalize(wizard: &mut WizardData) {
    wizard.location.state = wizard.location.state.trim().to_ascii_uppercase();
    wizard.location.country = wizard.location.country.trim().to_ascii_uppercase();
}

/// Checks ranges on every wizard field and reports all violations at once.
pub fn validate(wizard: &WizardData) -> Result<(), WizardValidationError> {
    let mut check = Checker::default();

    let location = &wizard.location;
    if location.state.chars().count() != 2 {
        check.push(
            "location.state",
            format!("must be a 2-letter code (got '{}')", location.state),
        );
    }
    if location.country != SUPPORTED_COUNTRY {
        check.push(
            "location.country",
            format!("only {SUPPORTED_COUNTRY} is supported (got '{}')", location.country),
        );
    }
    check.within(
        "location.local_tax_percent",
        location.local_tax_percent,
        MAX_LOCAL_TAX_PERCENT,
    );

    check.non_negative("income.annual_gross", wizard.income.annual_gross);
    check.non_negative("income.annual_bonus", wizard.income.annual_bonus);

    let benefits = &wizard.benefits;
    check.contribution("benefits.retirement_401k", benefits.retirement_401k);
    check.contribution("benefits.hsa", benefits.hsa);
    if let Some(match_percent) = benefits.employer_match_percent {
        check.percent("benefits.employer_match_percent", match_percent);
    }
    check.non_negative("benefits.healthcare_premium", benefits.healthcare_premium);
    check.non_negative("benefits.dental_vision", benefits.dental_vision);
    check.non_negative("benefits.other_pre_tax", benefits.other_pre_tax);
    check.non_negative("benefits.other_post_tax", benefits.other_post_tax);

    check.debts(&wizard.debts);

    check.finish()
}

/// Checks a debt list on its own, as loaded from a debts CSV.
pub fn validate_debts(debts: &[Debt]) -> Result<(), WizardValidationError> {
    let mut check = Checker::default();
    check.debts(debts);
    check.finish()
}

/// Checks that user overrides are not negative.
pub fn validate_overrides(overrides: &BudgetOverrides) -> Result<(), WizardValidationError> {
    let mut check = Checker::default();
    let fields = [
        ("budget.rent", overrides.rent),
        ("budget.groceries", overrides.groceries),
        ("budget.lifestyle", overrides.lifestyle),
        ("budget.utilities", overrides.utilities),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            check.non_negative(field, value);
        }
    }
    check.finish()
}

/// Checks the flags of a one-off loan question: APR in 0..=100 and every
/// named amount non-negative.
pub fn validate_loan(
    apr: Decimal,
    amounts: &[(&str, Decimal)],
) -> Result<(), WizardValidationError> {
    let mut check = Checker::default();
    check.percent("apr", apr);
    for (field, value) in amounts {
        check.non_negative(*field, *value);
    }
    check.finish()
}

/// Checks that an extra monthly payment is not negative.
pub fn validate_extra_payment(extra: Decimal) -> Result<(), WizardValidationError> {
    let mut check = Checker::default();
    check.non_negative("extra", extra);
    check.finish()
}

/// Parses, normalizes and validates wizard TOML.
pub fn load_from_str(input: &str) -> Result<(WizardData, BudgetSection), WizardFileError> {
    let file: WizardFile = toml::from_str(input)?;
    let (mut wizard, budget) = file.into_parts();
    normalize(&mut wizard);
    validate(&wizard)?;
    validate_overrides(&budget.overrides())?;
    Ok((wizard, budget))
}

/// Reads a wizard file from disk and delegates to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<(WizardData, BudgetSection), WizardFileError> {
    let contents = std::fs::read_to_string(path).map_err(|source| WizardFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = load_from_str(&contents)?;
    tracing::debug!(
        path = %path.display(),
        state = %loaded.0.location.state,
        debts = loaded.0.debts.len(),
        "loaded wizard file"
    );
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use budget_core::{DebtType, FilingStatus, PayFrequency};
    use pretty_assertions::assert_eq;

    const MINIMAL: &str = r#"
[location]
state = "tx"

[income]
annual_gross = 60000
pay_frequency = "monthly"
"#;

    fn fields(err: WizardValidationError) -> Vec<String> {
        err.issues.into_iter().map(|i| i.field).collect()
    }

    #[test]
    fn minimal_file_fills_defaults() {
        let (wizard, budget) = load_from_str(MINIMAL).expect("minimal wizard should load");

        assert_eq!(wizard.location.state, "TX");
        assert_eq!(wizard.location.country, "US");
        assert_eq!(wizard.income.annual_gross, dec!(60000));
        assert_eq!(wizard.income.pay_frequency, PayFrequency::Monthly);
        assert_eq!(wizard.benefits, Benefits::default());
        assert!(wizard.debts.is_empty());
        assert_eq!(budget, BudgetSection::default());
    }

    #[test]
    fn full_file_matches_demo() {
        let input = r#"
[location]
state = "AZ"
city = "Phoenix"

[income]
annual_gross = 85000
pay_frequency = "biweekly"
annual_bonus = 5000
bonus_included_in_budget = true

[benefits]
filing_status = "single"
retirement_401k = { percent = 12 }
employer_match_percent = 5
hsa = { fixed_amount = 100 }
healthcare_premium = 85
dental_vision = 25

[[debts]]
id = "demo-credit-card"
type = "credit_card"
balance = 3500
apr = "24.99"
minimum_payment = 120

[[debts]]
id = "demo-student-loan"
type = "student_loan"
balance = 28000
apr = "5.5"
minimum_payment = 320

[budget]
mode = "lifestyle"
rent = 1500
"#;

        let (wizard, budget) = load_from_str(input).expect("full wizard should load");

        assert_eq!(wizard, WizardData::demo());
        assert_eq!(budget.mode, Some(BudgetMode::Lifestyle));
        assert_eq!(
            budget.overrides(),
            BudgetOverrides {
                rent: Some(dec!(1500)),
                ..Default::default()
            }
        );
    }

    #[test]
    fn every_violation_is_reported() {
        let mut wizard = WizardData::demo();
        wizard.location.state = "ARIZONA".to_string();
        wizard.location.country = "CA".to_string();
        wizard.location.local_tax_percent = dec!(25);
        wizard.income.annual_gross = dec!(-1);
        wizard.benefits.retirement_401k = Some(Contribution::Percent(dec!(120)));
        wizard.benefits.hsa = Some(Contribution::FixedAmount(dec!(-5)));
        wizard.debts[1].apr = dec!(101);

        let err = validate(&wizard).unwrap_err();

        assert_eq!(
            fields(err),
            vec![
                "location.state",
                "location.country",
                "location.local_tax_percent",
                "income.annual_gross",
                "benefits.retirement_401k",
                "benefits.hsa",
                "debts[1].apr",
            ]
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        let mut wizard = WizardData::demo();
        wizard.location.local_tax_percent = dec!(20);
        wizard.benefits.retirement_401k = Some(Contribution::Percent(dec!(100)));
        wizard.debts[0].apr = dec!(0);
        wizard.debts[1].apr = dec!(100);

        assert_eq!(validate(&wizard), Ok(()));
    }

    #[test]
    fn debt_list_checks_each_row() {
        let mut debts = WizardData::demo().debts;
        debts[0].id = " ".to_string();
        debts[1].minimum_payment = dec!(-1);

        let err = validate_debts(&debts).unwrap_err();

        assert_eq!(fields(err), vec!["debts[0].id", "debts[1].minimum_payment"]);
    }

    #[test]
    fn negative_override_is_rejected() {
        let overrides = BudgetOverrides {
            groceries: Some(dec!(-10)),
            ..Default::default()
        };

        let err = validate_overrides(&overrides).unwrap_err();

        assert_eq!(fields(err), vec!["budget.groceries"]);
    }

    #[test]
    fn loan_flags_reject_out_of_range_apr_and_negative_amounts() {
        let err = validate_loan(
            dec!(-1200),
            &[("payment", dec!(500)), ("down", dec!(-1))],
        )
        .unwrap_err();

        assert_eq!(fields(err), vec!["apr", "down"]);
        assert_eq!(
            fields(validate_loan(dec!(100.5), &[("principal", dec!(20000))]).unwrap_err()),
            vec!["apr"]
        );
        assert_eq!(
            fields(
                validate_loan(dec!(24), &[("balance", dec!(-3)), ("payment", dec!(-10))])
                    .unwrap_err()
            ),
            vec!["balance", "payment"]
        );
    }

    #[test]
    fn loan_flags_accept_bounds() {
        assert_eq!(validate_loan(dec!(0), &[("payment", dec!(0))]), Ok(()));
        assert_eq!(validate_loan(dec!(100), &[("principal", dec!(25000))]), Ok(()));
    }

    #[test]
    fn negative_extra_payment_is_rejected() {
        assert_eq!(validate_extra_payment(dec!(0)), Ok(()));
        assert_eq!(fields(validate_extra_payment(dec!(-25)).unwrap_err()), vec!["extra"]);
    }

    #[test]
    fn load_reports_validation_errors() {
        let input = MINIMAL.replace("60000", "-60000");

        match load_from_str(&input).unwrap_err() {
            WizardFileError::Invalid(err) => {
                assert_eq!(fields(err.clone()), vec!["income.annual_gross"]);
                assert!(err.to_string().contains("income.annual_gross: must not be negative"));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn unknown_enum_value_is_a_toml_error() {
        let input = MINIMAL.replace("monthly", "weekly");

        assert!(matches!(load_from_str(&input), Err(WizardFileError::Toml(_))));
    }

    #[test]
    fn debts_use_wire_type_names() {
        let input = format!(
            "{MINIMAL}\n[[debts]]\nid = \"car\"\ntype = \"other\"\nbalance = 9000\napr = 6\nminimum_payment = 250\n"
        );

        let (wizard, _) = load_from_str(&input).expect("should load");

        assert_eq!(wizard.debts[0].debt_type, DebtType::Other);
        assert_eq!(wizard.benefits.filing_status, FilingStatus::Single);
    }
}
