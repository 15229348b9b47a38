//! Debt ordering, payoff simulation, and extra-payment advice.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::common::{monthly_rate, non_negative, round_cents};
use crate::models::Debt;

/// Simulation stops here; callers read it as "never pays off".
pub const PAYOFF_MONTHS_CAP: u32 = 600;

/// Free cash flow always left unallocated by [`recommend_extra_payment`].
const LIVING_BUFFER: Decimal = dec!(200);
const PAYOFF_HORIZON_MONTHS: Decimal = dec!(24);

/// Which debt receives extra money first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoffStrategy {
    /// Highest APR first.
    #[default]
    Avalanche,
    /// Smallest balance first.
    Snowball,
}

impl PayoffStrategy {
    pub fn all() -> &'static [PayoffStrategy] {
        &[PayoffStrategy::Avalanche, PayoffStrategy::Snowball]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Avalanche => "avalanche",
            Self::Snowball => "snowball",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "avalanche" => Some(Self::Avalanche),
            "snowball" => Some(Self::Snowball),
            _ => None,
        }
    }

    pub fn order(
        &self,
        debts: &[Debt],
    ) -> Vec<Debt> {
        match self {
            Self::Avalanche => avalanche_order(debts),
            Self::Snowball => snowball_order(debts),
        }
    }
}

/// One row of a [`payoff_schedule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoffEstimate {
    pub debt: Debt,
    pub monthly_payment: Decimal,
    pub months: u32,
    pub never_pays_off: bool,
}

/// Copy of `debts` sorted by APR, highest first. Ties keep input order.
pub fn avalanche_order(debts: &[Debt]) -> Vec<Debt> {
    let mut ordered = debts.to_vec();
    ordered.sort_by(|a, b| b.apr.cmp(&a.apr));
    ordered
}

/// Copy of `debts` sorted by balance, smallest first. Ties keep input order.
pub fn snowball_order(debts: &[Debt]) -> Vec<Debt> {
    let mut ordered = debts.to_vec();
    ordered.sort_by(|a, b| a.balance.cmp(&b.balance));
    ordered
}

pub fn total_minimum_payments(debts: &[Debt]) -> Decimal {
    debts.iter().map(|d| d.minimum_payment).sum()
}

pub fn total_balance(debts: &[Debt]) -> Decimal {
    debts.iter().map(|d| d.balance).sum()
}

/// Months until `balance` reaches zero, simulated one month at a time.
///
/// Returns 0 when there is nothing to pay or no payment, and
/// [`PAYOFF_MONTHS_CAP`] when the payment cannot keep up with interest.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::calculations::estimate_payoff_months;
///
/// assert_eq!(estimate_payoff_months(dec!(1000), dec!(0), dec!(100)), 10);
/// assert_eq!(estimate_payoff_months(dec!(1000), dec!(24), dec!(10)), 600);
/// ```
pub fn estimate_payoff_months(
    balance: Decimal,
    apr_percent: Decimal,
    monthly_payment: Decimal,
) -> u32 {
    simulate_payoff(balance, apr_percent, monthly_payment).0
}

/// Like [`estimate_payoff_months`], paired with whether the balance actually
/// reached zero. A debt cleared in exactly [`PAYOFF_MONTHS_CAP`] months
/// returns `(PAYOFF_MONTHS_CAP, true)`.
pub fn simulate_payoff(
    balance: Decimal,
    apr_percent: Decimal,
    monthly_payment: Decimal,
) -> (u32, bool) {
    if monthly_payment <= Decimal::ZERO || balance <= Decimal::ZERO {
        return (0, true);
    }

    let growth = Decimal::ONE + monthly_rate(apr_percent);
    let mut remaining = balance;
    let mut months = 0;
    while remaining > Decimal::ZERO && months < PAYOFF_MONTHS_CAP {
        // A balance that outgrows Decimal can never be paid off.
        let Some(next) = remaining
            .checked_mul(growth)
            .and_then(|grown| grown.checked_sub(monthly_payment))
        else {
            months = PAYOFF_MONTHS_CAP;
            break;
        };
        remaining = next;
        months += 1;
    }

    let paid_off = remaining <= Decimal::ZERO;
    if !paid_off {
        warn!(
            %balance,
            %apr_percent,
            %monthly_payment,
            cap = PAYOFF_MONTHS_CAP,
            "payoff simulation hit the month cap"
        );
    }
    (months, paid_off)
}

/// Suggested extra monthly debt payment.
///
/// The lesser of half the free cash flow and `total_debt / 24`, further
/// reduced to keep 200 of free cash flow unallocated. Never negative.
pub fn recommend_extra_payment(
    free_cash_flow: Decimal,
    total_debt: Decimal,
    _total_minimums: Decimal,
) -> Decimal {
    if free_cash_flow <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let reasonable = (free_cash_flow / Decimal::TWO).min(total_debt / PAYOFF_HORIZON_MONTHS);
    let with_buffer = reasonable.min(free_cash_flow - LIVING_BUFFER);

    round_cents(non_negative(with_buffer))
}

/// Orders `debts` by `strategy` and estimates each payoff at its minimum
/// payment, with `extra_payment` added to the first debt in order.
pub fn payoff_schedule(
    debts: &[Debt],
    strategy: PayoffStrategy,
    extra_payment: Decimal,
) -> Vec<PayoffEstimate> {
    strategy
        .order(debts)
        .into_iter()
        .enumerate()
        .map(|(index, debt)| {
            let monthly_payment = if index == 0 {
                debt.minimum_payment + non_negative(extra_payment)
            } else {
                debt.minimum_payment
            };
            let (months, paid_off) = simulate_payoff(debt.balance, debt.apr, monthly_payment);
            PayoffEstimate {
                debt,
                monthly_payment,
                months,
                never_pays_off: !paid_off,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::DebtType;

    fn debt(
        id: &str,
        balance: Decimal,
        apr: Decimal,
        minimum_payment: Decimal,
    ) -> Debt {
        Debt {
            id: id.to_string(),
            debt_type: DebtType::Other,
            balance,
            apr,
            minimum_payment,
        }
    }

    fn sample_debts() -> Vec<Debt> {
        vec![
            debt("car", dec!(12000), dec!(6.9), dec!(250)),
            debt("card", dec!(3500), dec!(24.99), dec!(120)),
            debt("loan", dec!(28000), dec!(5.5), dec!(320)),
            debt("store", dec!(800), dec!(24.99), dec!(35)),
        ]
    }

    fn ids(debts: &[Debt]) -> Vec<&str> {
        debts.iter().map(|d| d.id.as_str()).collect()
    }

    // =========================================================================
    // ordering tests
    // =========================================================================

    #[test]
    fn avalanche_orders_by_apr_descending_and_keeps_ties_stable() {
        let debts = sample_debts();

        let result = avalanche_order(&debts);

        assert_eq!(ids(&result), vec!["card", "store", "car", "loan"]);
        assert_eq!(ids(&debts), vec!["car", "card", "loan", "store"]);
    }

    #[test]
    fn snowball_orders_by_balance_ascending() {
        let result = snowball_order(&sample_debts());

        assert_eq!(ids(&result), vec!["store", "card", "car", "loan"]);
    }

    #[test]
    fn orders_handle_empty_input() {
        assert!(avalanche_order(&[]).is_empty());
        assert!(snowball_order(&[]).is_empty());
    }

    #[test]
    fn totals_sum_every_debt() {
        let debts = sample_debts();

        assert_eq!(total_minimum_payments(&debts), dec!(725));
        assert_eq!(total_balance(&debts), dec!(44300));
        assert_eq!(total_balance(&[]), dec!(0));
    }

    #[test]
    fn strategy_parse_round_trips() {
        for strategy in PayoffStrategy::all() {
            assert_eq!(PayoffStrategy::parse(strategy.as_str()), Some(*strategy));
        }
        assert_eq!(PayoffStrategy::parse("tsunami"), None);
    }

    // =========================================================================
    // estimate_payoff_months tests
    // =========================================================================

    #[test]
    fn payoff_zero_apr_is_balance_over_payment() {
        assert_eq!(estimate_payoff_months(dec!(1000), dec!(0), dec!(100)), 10);
        assert_eq!(estimate_payoff_months(dec!(1050), dec!(0), dec!(100)), 11);
    }

    #[test]
    fn payoff_with_interest_takes_longer() {
        assert_eq!(estimate_payoff_months(dec!(1000), dec!(12), dec!(100)), 11);
    }

    #[test]
    fn payoff_returns_zero_for_nothing_to_pay() {
        assert_eq!(estimate_payoff_months(dec!(0), dec!(20), dec!(100)), 0);
        assert_eq!(estimate_payoff_months(dec!(1000), dec!(20), dec!(0)), 0);
        assert_eq!(estimate_payoff_months(dec!(1000), dec!(20), dec!(-5)), 0);
    }

    #[test]
    fn payoff_caps_when_payment_never_covers_interest() {
        // 2% monthly interest on 1000 is 20, more than the payment.
        assert_eq!(
            estimate_payoff_months(dec!(1000), dec!(24), dec!(10)),
            PAYOFF_MONTHS_CAP
        );
    }

    #[test]
    fn payoff_caps_instead_of_overflowing_on_runaway_balance() {
        assert_eq!(
            estimate_payoff_months(dec!(200000000), dec!(100), dec!(10)),
            PAYOFF_MONTHS_CAP
        );
        assert_eq!(
            simulate_payoff(dec!(200000000), dec!(100), dec!(10)),
            (PAYOFF_MONTHS_CAP, false)
        );
        assert_eq!(
            estimate_payoff_months(dec!(5000000), dec!(99), dec!(10)),
            PAYOFF_MONTHS_CAP
        );
    }

    #[test]
    fn payoff_in_exactly_the_cap_counts_as_paid() {
        assert_eq!(simulate_payoff(dec!(600), dec!(0), dec!(1)), (600, true));
        assert_eq!(simulate_payoff(dec!(601), dec!(0), dec!(1)), (600, false));
    }

    // =========================================================================
    // recommend_extra_payment tests
    // =========================================================================

    #[test]
    fn extra_payment_is_half_of_free_cash_flow() {
        assert_eq!(
            recommend_extra_payment(dec!(1000), dec!(28000), dec!(440)),
            dec!(500.00)
        );
    }

    #[test]
    fn extra_payment_capped_by_two_year_horizon() {
        assert_eq!(
            recommend_extra_payment(dec!(1000), dec!(2400), dec!(100)),
            dec!(100.00)
        );
    }

    #[test]
    fn extra_payment_keeps_living_buffer() {
        assert_eq!(
            recommend_extra_payment(dec!(300), dec!(28000), dec!(440)),
            dec!(100.00)
        );
    }

    #[test]
    fn extra_payment_never_negative() {
        assert_eq!(recommend_extra_payment(dec!(150), dec!(28000), dec!(440)), dec!(0));
        assert_eq!(recommend_extra_payment(dec!(0), dec!(28000), dec!(440)), dec!(0));
        assert_eq!(recommend_extra_payment(dec!(-50), dec!(28000), dec!(440)), dec!(0));
    }

    // =========================================================================
    // payoff_schedule tests
    // =========================================================================

    #[test]
    fn schedule_applies_extra_to_focus_debt_only() {
        let debts = vec![
            debt("a", dec!(1000), dec!(0), dec!(100)),
            debt("b", dec!(500), dec!(0), dec!(50)),
        ];

        let result = payoff_schedule(&debts, PayoffStrategy::Snowball, dec!(50));

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].debt.id, "b");
        assert_eq!(result[0].monthly_payment, dec!(100));
        assert_eq!(result[0].months, 5);
        assert_eq!(result[1].debt.id, "a");
        assert_eq!(result[1].monthly_payment, dec!(100));
        assert_eq!(result[1].months, 10);
        assert!(result.iter().all(|row| !row.never_pays_off));
    }

    #[test]
    fn schedule_flags_debts_that_never_pay_off() {
        let debts = vec![debt("stuck", dec!(1000), dec!(24), dec!(10))];

        let result = payoff_schedule(&debts, PayoffStrategy::Avalanche, dec!(0));

        assert_eq!(result[0].months, PAYOFF_MONTHS_CAP);
        assert!(result[0].never_pays_off);
    }
}
