use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::FilingStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    #[default]
    Biweekly,
    Semimonthly,
    Monthly,
}

impl PayFrequency {
    pub fn all() -> &'static [PayFrequency] {
        &[
            PayFrequency::Biweekly,
            PayFrequency::Semimonthly,
            PayFrequency::Monthly,
        ]
    }

    /// Number of paychecks in a year.
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Self::Biweekly => 26,
            Self::Semimonthly => 24,
            Self::Monthly => 12,
        }
    }

    /// Paychecks counted toward one month of budget.
    ///
    /// Biweekly uses 26/12 rather than a flat 2 so the two "extra" paychecks
    /// of the year are spread across months.
    pub fn paychecks_per_month(&self) -> Decimal {
        match self {
            Self::Biweekly => Decimal::from(26) / Decimal::from(12),
            Self::Semimonthly => Decimal::TWO,
            Self::Monthly => Decimal::ONE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Biweekly => "biweekly",
            Self::Semimonthly => "semimonthly",
            Self::Monthly => "monthly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "biweekly" => Some(Self::Biweekly),
            "semimonthly" => Some(Self::Semimonthly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }
}

/// Per-paycheck deductions taken before income tax.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreTaxDeductions {
    pub retirement_401k: Decimal,
    pub hsa: Decimal,
    pub healthcare_premium: Decimal,
    pub dental_vision: Decimal,
    pub other: Decimal,
}

impl PreTaxDeductions {
    pub fn total(&self) -> Decimal {
        self.retirement_401k + self.hsa + self.healthcare_premium + self.dental_vision + self.other
    }
}

/// Per-paycheck deductions taken from net pay; they never touch taxable wages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTaxDeductions {
    pub healthcare_premium: Decimal,
    pub other: Decimal,
}

impl PostTaxDeductions {
    pub fn total(&self) -> Decimal {
        self.healthcare_premium + self.other
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaycheckInput {
    pub annual_gross: Decimal,
    pub pay_frequency: PayFrequency,
    pub filing_status: FilingStatus,
    pub state_code: String,
    /// Local income tax as a percentage (0-20) of taxable wages.
    pub local_tax_percent: Decimal,
    pub pre_tax: PreTaxDeductions,
    pub post_tax: PostTaxDeductions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FicaBreakdown {
    pub social_security: Decimal,
    pub medicare: Decimal,
    pub total: Decimal,
}

/// Net pay breakdown. Every currency field is rounded to cents on its own,
/// so component fields may not add up to the totals to the penny.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaycheckBreakdown {
    pub gross_per_paycheck: Decimal,
    pub pre_tax_total: Decimal,
    pub taxable_wages: Decimal,
    pub federal_tax: Decimal,
    pub state_tax: Decimal,
    pub local_tax: Decimal,
    pub fica: FicaBreakdown,
    pub post_tax_total: Decimal,
    pub net_per_paycheck: Decimal,
    pub net_monthly: Decimal,
    pub net_annual: Decimal,
    pub annual_gross: Decimal,
}
