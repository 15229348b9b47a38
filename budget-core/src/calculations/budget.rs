//! Budget recommendations from net monthly income, plus car affordability.
//!
//! Category bounds are the same for every mode; only `recommended` follows
//! the selected [`BudgetMode`]:
//!
//! | Category  | Min | Max |
//! |-----------|-----|-----|
//! | Rent      | 20% | 30% |
//! | Groceries | 8%  | 12% |
//! | Lifestyle | 6%  | 14% |

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use tracing::debug;

use crate::calculations::common::{monthly_rate, non_negative, round_cents};
use crate::models::{
    BudgetMode, BudgetRecommendations, CategoryRange, RentRecommendation, SavingsTargets,
    TransportationCaps, UtilitiesEstimate,
};

/// Flat monthly utilities estimate, not scaled by income.
pub const UTILITIES_DEFAULT_ESTIMATE: Decimal = dec!(250);

const RENT_BOUNDS: (Decimal, Decimal) = (dec!(0.20), dec!(0.30));
const GROCERIES_BOUNDS: (Decimal, Decimal) = (dec!(0.08), dec!(0.12));
const LIFESTYLE_BOUNDS: (Decimal, Decimal) = (dec!(0.06), dec!(0.14));

/// Share of the all-in transportation cap that may go to the car payment.
const CAR_PAYMENT_SHARE: Decimal = dec!(0.7);
/// Assumed take-home share of gross used by the `gross30` approximation.
const NET_TO_GROSS_SHARE: Decimal = dec!(0.7);
const GROSS30_RENT_SHARE: Decimal = dec!(0.3);
/// Added to rent and groceries when no essentials figure is available.
const EMERGENCY_FALLBACK_BUFFER: Decimal = dec!(200);

fn category(
    net_monthly: Decimal,
    bounds: (Decimal, Decimal),
    recommended_share: Decimal,
) -> CategoryRange {
    CategoryRange {
        min: round_cents(net_monthly * bounds.0),
        max: round_cents(net_monthly * bounds.1),
        recommended: round_cents(net_monthly * recommended_share),
    }
}

/// Builds the per-category recommendations for one mode.
///
/// `essentials_monthly` drives the emergency fund target; pass zero when it
/// is unknown and the target falls back to recommended rent and groceries
/// plus a fixed buffer.
pub fn compute_budget_recommendations(
    net_monthly: Decimal,
    mode: BudgetMode,
    essentials_monthly: Decimal,
) -> BudgetRecommendations {
    let profile = mode.profile();

    let rent_recommended = net_monthly * profile.rent;
    let groceries_recommended = net_monthly * profile.groceries;
    let gross30 = net_monthly / NET_TO_GROSS_SHARE * GROSS30_RENT_SHARE;

    let max_all_in = net_monthly * profile.transportation;
    let max_car_payment = max_all_in * CAR_PAYMENT_SHARE;

    let months = Decimal::from(profile.emergency_months);
    let emergency_target = if essentials_monthly > Decimal::ZERO {
        essentials_monthly * months
    } else {
        (rent_recommended + groceries_recommended + EMERGENCY_FALLBACK_BUFFER) * months
    };
    let monthly_target = emergency_target / Decimal::from(12);

    debug!(
        %net_monthly,
        mode = mode.as_str(),
        %essentials_monthly,
        %emergency_target,
        "computed budget recommendations"
    );

    let rent = category(net_monthly, RENT_BOUNDS, profile.rent);
    BudgetRecommendations {
        rent: RentRecommendation {
            min: rent.min,
            max: rent.max,
            recommended: rent.recommended,
            gross30: round_cents(gross30),
        },
        groceries: category(net_monthly, GROCERIES_BOUNDS, profile.groceries),
        lifestyle: category(net_monthly, LIFESTYLE_BOUNDS, profile.lifestyle),
        transportation: TransportationCaps {
            max_all_in: round_cents(max_all_in),
            max_car_payment: round_cents(max_car_payment),
        },
        savings: SavingsTargets {
            emergency_target: round_cents(emergency_target),
            monthly_target: round_cents(monthly_target),
        },
        utilities: UtilitiesEstimate {
            default_estimate: UTILITIES_DEFAULT_ESTIMATE,
        },
    }
}

/// Most expensive car a monthly payment can finance, down payment included.
///
/// Present value of an annuity: `pmt × (1 − (1+r)^−n) / r`. A zero rate
/// degrades to `pmt × n`; a zero term finances nothing.
pub fn max_car_price_from_payment(
    max_monthly_payment: Decimal,
    apr_percent: Decimal,
    term_months: u32,
    down_payment: Decimal,
) -> Decimal {
    let payment = non_negative(max_monthly_payment);
    let rate = monthly_rate(apr_percent);
    let n = Decimal::from(term_months);

    let financed = if term_months == 0 {
        Decimal::ZERO
    } else if rate.is_zero() {
        payment * n
    } else {
        match (Decimal::ONE + rate).checked_powi(i64::from(term_months)) {
            Some(growth) => payment * (Decimal::ONE - Decimal::ONE / growth) / rate,
            // Growth beyond Decimal range: the discount term is effectively zero.
            None => payment / rate,
        }
    };

    round_cents(financed + down_payment)
}

/// Level monthly payment that amortizes `principal` over `term_months`.
///
/// `principal × r × (1+r)^n / ((1+r)^n − 1)`, or `principal / n` at a zero
/// rate. A zero term is due in full.
pub fn monthly_payment_from_price(
    principal: Decimal,
    apr_percent: Decimal,
    term_months: u32,
) -> Decimal {
    if term_months == 0 {
        return round_cents(principal);
    }

    let rate = monthly_rate(apr_percent);
    let n = Decimal::from(term_months);

    let payment = if rate.is_zero() {
        principal / n
    } else {
        match (Decimal::ONE + rate).checked_powi(i64::from(term_months)) {
            Some(growth) => principal * rate * growth / (growth - Decimal::ONE),
            None => principal * rate,
        }
    };

    round_cents(payment)
}
