//! Shared arithmetic helpers for the paycheck, budget, and debt engines.

use rust_decimal::Decimal;

/// Rounds a currency value to cents, with midpoints rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::calculations::common::round_cents;
///
/// assert_eq!(round_cents(dec!(405.425)), dec!(405.43));
/// assert_eq!(round_cents(dec!(405.424)), dec!(405.42));
/// assert_eq!(round_cents(dec!(-0.005)), dec!(-0.01)); // Away from zero
/// ```
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps a value at zero.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// `amount × percent / 100`.
pub fn percent_of(
    amount: Decimal,
    percent: Decimal,
) -> Decimal {
    amount * percent / Decimal::ONE_HUNDRED
}

/// Monthly periodic rate from an APR expressed in percent.
pub fn monthly_rate(apr_percent: Decimal) -> Decimal {
    apr_percent / Decimal::ONE_HUNDRED / Decimal::from(12)
}
