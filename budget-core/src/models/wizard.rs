use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::{Debt, DebtType, FilingStatus, PayFrequency};

/// Retirement or HSA contribution, either a share of gross pay or a fixed
/// dollar amount per paycheck. Exactly one representation is ever active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contribution {
    /// Percentage (0-100) of annual gross.
    Percent(Decimal),
    /// Dollars per paycheck.
    FixedAmount(Decimal),
}

impl Contribution {
    /// Resolves the contribution into dollars per paycheck.
    pub fn per_paycheck(
        &self,
        annual_gross: Decimal,
        pay_frequency: PayFrequency,
    ) -> Decimal {
        match *self {
            Self::Percent(percent) => {
                annual_gross * percent / Decimal::ONE_HUNDRED
                    / Decimal::from(pay_frequency.periods_per_year())
            }
            Self::FixedAmount(amount) => amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default = "default_country")]
    pub country: String,
    pub state: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub local_tax_percent: Decimal,
}

fn default_country() -> String {
    "US".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Income {
    pub annual_gross: Decimal,
    #[serde(default)]
    pub pay_frequency: PayFrequency,
    #[serde(default)]
    pub annual_bonus: Decimal,
    #[serde(default)]
    pub bonus_included_in_budget: bool,
}

impl Income {
    /// Salary plus the bonus when the user counts it toward the budget.
    pub fn budgeted_annual_gross(&self) -> Decimal {
        if self.bonus_included_in_budget {
            self.annual_gross + self.annual_bonus
        } else {
            self.annual_gross
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Benefits {
    #[serde(default = "default_filing_status")]
    pub filing_status: FilingStatus,
    #[serde(default)]
    pub retirement_401k: Option<Contribution>,
    /// Shown to the user only; the match never reaches net pay.
    #[serde(default)]
    pub employer_match_percent: Option<Decimal>,
    #[serde(default)]
    pub hsa: Option<Contribution>,
    #[serde(default)]
    pub healthcare_premium: Decimal,
    #[serde(default = "default_true")]
    pub healthcare_pre_tax: bool,
    #[serde(default)]
    pub dental_vision: Decimal,
    #[serde(default)]
    pub other_pre_tax: Decimal,
    #[serde(default)]
    pub other_post_tax: Decimal,
}

fn default_filing_status() -> FilingStatus {
    FilingStatus::Single
}

fn default_true() -> bool {
    true
}

impl Default for Benefits {
    fn default() -> Self {
        Self {
            filing_status: FilingStatus::Single,
            retirement_401k: None,
            employer_match_percent: None,
            hsa: None,
            healthcare_premium: Decimal::ZERO,
            healthcare_pre_tax: true,
            dental_vision: Decimal::ZERO,
            other_pre_tax: Decimal::ZERO,
            other_post_tax: Decimal::ZERO,
        }
    }
}

/// Everything the budget wizard collects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardData {
    pub location: Location,
    pub income: Income,
    #[serde(default)]
    pub benefits: Benefits,
    #[serde(default)]
    pub debts: Vec<Debt>,
}

impl Default for WizardData {
    fn default() -> Self {
        Self {
            location: Location {
                country: default_country(),
                state: "AZ".to_string(),
                city: None,
                local_tax_percent: Decimal::ZERO,
            },
            income: Income {
                annual_gross: Decimal::ZERO,
                pay_frequency: PayFrequency::Biweekly,
                annual_bonus: Decimal::ZERO,
                bonus_included_in_budget: false,
            },
            benefits: Benefits::default(),
            debts: Vec::new(),
        }
    }
}

impl WizardData {
    /// Built-in sample profile: a single filer in Phoenix earning $85k plus
    /// a $5k bonus, with a credit card and a student loan.
    pub fn demo() -> Self {
        Self {
            location: Location {
                country: default_country(),
                state: "AZ".to_string(),
                city: Some("Phoenix".to_string()),
                local_tax_percent: Decimal::ZERO,
            },
            income: Income {
                annual_gross: dec!(85000),
                pay_frequency: PayFrequency::Biweekly,
                annual_bonus: dec!(5000),
                bonus_included_in_budget: true,
            },
            benefits: Benefits {
                filing_status: FilingStatus::Single,
                retirement_401k: Some(Contribution::Percent(dec!(12))),
                employer_match_percent: Some(dec!(5)),
                hsa: Some(Contribution::FixedAmount(dec!(100))),
                healthcare_premium: dec!(85),
                healthcare_pre_tax: true,
                dental_vision: dec!(25),
                other_pre_tax: Decimal::ZERO,
                other_post_tax: Decimal::ZERO,
            },
            debts: vec![
                Debt {
                    id: "demo-credit-card".to_string(),
                    debt_type: DebtType::CreditCard,
                    balance: dec!(3500),
                    apr: dec!(24.99),
                    minimum_payment: dec!(120),
                },
                Debt {
                    id: "demo-student-loan".to_string(),
                    debt_type: DebtType::StudentLoan,
                    balance: dec!(28000),
                    apr: dec!(5.5),
                    minimum_payment: dec!(320),
                },
            ],
        }
    }
}
