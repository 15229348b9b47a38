use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Risk posture selected by the user. Each mode fully determines the
/// percentages used for recommendations; see [`BudgetMode::profile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetMode {
    Conservative,
    #[default]
    Balanced,
    Lifestyle,
}

/// Percentages of net monthly income plus the emergency-fund month count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetModeProfile {
    pub mode: BudgetMode,
    pub rent: Decimal,
    pub groceries: Decimal,
    pub lifestyle: Decimal,
    pub transportation: Decimal,
    pub emergency_months: u32,
}

const BUDGET_MODE_PROFILES: [BudgetModeProfile; 3] = [
    BudgetModeProfile {
        mode: BudgetMode::Conservative,
        rent: dec!(0.20),
        groceries: dec!(0.08),
        lifestyle: dec!(0.06),
        transportation: dec!(0.10),
        emergency_months: 6,
    },
    BudgetModeProfile {
        mode: BudgetMode::Balanced,
        rent: dec!(0.25),
        groceries: dec!(0.10),
        lifestyle: dec!(0.10),
        transportation: dec!(0.12),
        emergency_months: 4,
    },
    BudgetModeProfile {
        mode: BudgetMode::Lifestyle,
        rent: dec!(0.30),
        groceries: dec!(0.12),
        lifestyle: dec!(0.14),
        transportation: dec!(0.15),
        emergency_months: 3,
    },
];

impl BudgetMode {
    pub fn all() -> &'static [BudgetMode] {
        &[
            BudgetMode::Conservative,
            BudgetMode::Balanced,
            BudgetMode::Lifestyle,
        ]
    }

    pub fn profile(&self) -> &'static BudgetModeProfile {
        match self {
            Self::Conservative => &BUDGET_MODE_PROFILES[0],
            Self::Balanced => &BUDGET_MODE_PROFILES[1],
            Self::Lifestyle => &BUDGET_MODE_PROFILES[2],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Balanced => "balanced",
            Self::Lifestyle => "lifestyle",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "conservative" => Some(Self::Conservative),
            "balanced" => Some(Self::Balanced),
            "lifestyle" => Some(Self::Lifestyle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentRecommendation {
    pub min: Decimal,
    pub max: Decimal,
    pub recommended: Decimal,
    /// Approximate gross-equivalent of 30% rent, assuming a 30% tax load.
    pub gross30: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRange {
    pub min: Decimal,
    pub max: Decimal,
    pub recommended: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportationCaps {
    pub max_all_in: Decimal,
    pub max_car_payment: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsTargets {
    pub emergency_target: Decimal,
    pub monthly_target: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilitiesEstimate {
    pub default_estimate: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRecommendations {
    pub rent: RentRecommendation,
    pub groceries: CategoryRange,
    pub lifestyle: CategoryRange,
    pub transportation: TransportationCaps,
    pub savings: SavingsTargets,
    pub utilities: UtilitiesEstimate,
}
