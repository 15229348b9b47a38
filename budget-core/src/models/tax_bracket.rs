use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal bracket: income in `[min, max)` is taxed at `rate`.
///
/// `max` is `None` for the final, unbounded bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min: Decimal,
    pub max: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        min: Decimal,
        max: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self { min, max, rate }
    }

    /// Portion of `income` that falls inside this bracket.
    pub fn taxable_portion(
        &self,
        income: Decimal,
    ) -> Decimal {
        if income <= self.min {
            return Decimal::ZERO;
        }
        let upper = match self.max {
            Some(max) => income.min(max),
            None => income,
        };
        upper - self.min
    }
}
