//! Calculation engines for net pay, budget recommendations, and debt payoff.
//!
//! Every function here is pure and synchronous. Tax data is injected through
//! [`TaxTables`](crate::models::TaxTables) rather than read from globals.

pub mod budget;
pub mod common;
pub mod debt;
pub mod paycheck;
pub mod tax;

pub use budget::{
    UTILITIES_DEFAULT_ESTIMATE, compute_budget_recommendations, max_car_price_from_payment,
    monthly_payment_from_price,
};
pub use debt::{
    PAYOFF_MONTHS_CAP, PayoffEstimate, PayoffStrategy, avalanche_order, estimate_payoff_months,
    payoff_schedule, recommend_extra_payment, simulate_payoff, snowball_order, total_balance,
    total_minimum_payments,
};
pub use paycheck::PaycheckCalculator;
pub use tax::TaxCalculator;
