use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtType {
    CreditCard,
    StudentLoan,
    Other,
}

impl DebtType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::StudentLoan => "student_loan",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "credit_card" => Some(Self::CreditCard),
            "student_loan" => Some(Self::StudentLoan),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CreditCard => "Credit card",
            Self::StudentLoan => "Student loan",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    pub id: String,
    #[serde(rename = "type")]
    pub debt_type: DebtType,
    pub balance: Decimal,
    /// Annual percentage rate, 0-100.
    pub apr: Decimal,
    pub minimum_payment: Decimal,
}
