//! Wizard answers to a complete monthly budget plan.
//!
//! [`BudgetPlanner::plan`] chains the engines in a fixed order:
//!
//! 1. [`build_paycheck_input`] resolves contributions and routes deductions.
//! 2. The paycheck calculator produces net monthly pay.
//! 3. Essentials (rent, groceries, utilities, debt minimums) feed the budget
//!    recommendations.
//! 4. The allocation applies user overrides over the recommendations.
//! 5. Free cash flow after the allocation drives the debt summary.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::budget::{UTILITIES_DEFAULT_ESTIMATE, compute_budget_recommendations};
use crate::calculations::common::{non_negative, round_cents};
use crate::calculations::debt::{
    PayoffEstimate, PayoffStrategy, payoff_schedule, recommend_extra_payment, total_balance,
    total_minimum_payments,
};
use crate::calculations::paycheck::PaycheckCalculator;
use crate::models::{
    BudgetMode, BudgetRecommendations, Contribution, PaycheckBreakdown, PaycheckInput,
    PostTaxDeductions, PreTaxDeductions, TaxTables, WizardData,
};

/// Rent share of net pay assumed for essentials when the user gave none.
const ESSENTIALS_RENT_SHARE: Decimal = dec!(0.25);
/// Groceries share of net pay assumed for essentials when the user gave none.
const ESSENTIALS_GROCERIES_SHARE: Decimal = dec!(0.10);

/// Translates wizard answers into calculator input.
///
/// The bonus joins annual gross only when flagged for the budget. 401k and
/// HSA contributions are resolved to dollars per paycheck against that gross.
/// The healthcare premium lands on the pre-tax or post-tax side per its flag.
pub fn build_paycheck_input(wizard: &WizardData) -> PaycheckInput {
    let annual_gross = wizard.income.budgeted_annual_gross();
    let frequency = wizard.income.pay_frequency;
    let benefits = &wizard.benefits;

    let resolve = |contribution: Option<Contribution>| {
        contribution
            .map(|c| c.per_paycheck(annual_gross, frequency))
            .unwrap_or(Decimal::ZERO)
    };

    let (pre_tax_premium, post_tax_premium) = if benefits.healthcare_pre_tax {
        (benefits.healthcare_premium, Decimal::ZERO)
    } else {
        (Decimal::ZERO, benefits.healthcare_premium)
    };

    PaycheckInput {
        annual_gross,
        pay_frequency: frequency,
        filing_status: benefits.filing_status,
        state_code: wizard.location.state.clone(),
        local_tax_percent: wizard.location.local_tax_percent,
        pre_tax: PreTaxDeductions {
            retirement_401k: resolve(benefits.retirement_401k),
            hsa: resolve(benefits.hsa),
            healthcare_premium: pre_tax_premium,
            dental_vision: benefits.dental_vision,
            other: benefits.other_pre_tax,
        },
        post_tax: PostTaxDeductions {
            healthcare_premium: post_tax_premium,
            other: benefits.other_post_tax,
        },
    }
}

/// Monthly amounts the user typed in instead of taking the recommendation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetOverrides {
    pub rent: Option<Decimal>,
    pub groceries: Option<Decimal>,
    pub lifestyle: Option<Decimal>,
    pub utilities: Option<Decimal>,
}

/// Monthly spending plan after overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetAllocation {
    pub rent: Decimal,
    pub groceries: Decimal,
    pub lifestyle: Decimal,
    pub utilities: Decimal,
    /// Net monthly pay not assigned to the four categories, floored at zero.
    pub leftover: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtSummary {
    pub total_balance: Decimal,
    pub total_minimums: Decimal,
    /// Net monthly minus the allocation and debt minimums. May be negative.
    pub free_cash_flow: Decimal,
    pub recommended_extra_payment: Decimal,
    pub avalanche: Vec<PayoffEstimate>,
    pub snowball: Vec<PayoffEstimate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetPlan {
    pub tax_year: i32,
    pub mode: BudgetMode,
    pub input: PaycheckInput,
    pub breakdown: PaycheckBreakdown,
    pub essentials_monthly: Decimal,
    pub recommendations: BudgetRecommendations,
    pub allocation: BudgetAllocation,
    pub debts: DebtSummary,
}

/// Runs the whole planning pipeline against one year of tax tables.
#[derive(Debug, Clone, Copy)]
pub struct BudgetPlanner<'a> {
    paycheck: PaycheckCalculator<'a>,
    tax_year: i32,
}

impl<'a> BudgetPlanner<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self {
            paycheck: PaycheckCalculator::new(tables),
            tax_year: tables.tax_year(),
        }
    }

    pub fn plan(
        &self,
        wizard: &WizardData,
        mode: BudgetMode,
        overrides: &BudgetOverrides,
    ) -> BudgetPlan {
        let input = build_paycheck_input(wizard);
        let breakdown = self.paycheck.compute(&input);
        let net_monthly = breakdown.net_monthly;

        let total_minimums = total_minimum_payments(&wizard.debts);
        let essentials_monthly = overrides
            .rent
            .unwrap_or(net_monthly * ESSENTIALS_RENT_SHARE)
            + overrides
                .groceries
                .unwrap_or(net_monthly * ESSENTIALS_GROCERIES_SHARE)
            + overrides.utilities.unwrap_or(UTILITIES_DEFAULT_ESTIMATE)
            + total_minimums;

        let recommendations =
            compute_budget_recommendations(net_monthly, mode, essentials_monthly);

        let rent = overrides.rent.unwrap_or(recommendations.rent.recommended);
        let groceries = overrides
            .groceries
            .unwrap_or(recommendations.groceries.recommended);
        let lifestyle = overrides
            .lifestyle
            .unwrap_or(recommendations.lifestyle.recommended);
        let utilities = overrides
            .utilities
            .unwrap_or(recommendations.utilities.default_estimate);
        let allocated = rent + groceries + lifestyle + utilities;

        let allocation = BudgetAllocation {
            rent: round_cents(rent),
            groceries: round_cents(groceries),
            lifestyle: round_cents(lifestyle),
            utilities: round_cents(utilities),
            leftover: round_cents(non_negative(net_monthly - allocated)),
        };

        let balance = total_balance(&wizard.debts);
        let free_cash_flow = net_monthly - allocated - total_minimums;
        let extra = recommend_extra_payment(free_cash_flow, balance, total_minimums);

        debug!(
            %net_monthly,
            %essentials_monthly,
            %free_cash_flow,
            recommended_extra = %extra,
            debts = wizard.debts.len(),
            mode = mode.as_str(),
            "built budget plan"
        );

        BudgetPlan {
            tax_year: self.tax_year,
            mode,
            input,
            breakdown,
            essentials_monthly: round_cents(essentials_monthly),
            recommendations,
            allocation,
            debts: DebtSummary {
                total_balance: round_cents(balance),
                total_minimums: round_cents(total_minimums),
                free_cash_flow: round_cents(free_cash_flow),
                recommended_extra_payment: extra,
                avalanche: payoff_schedule(&wizard.debts, PayoffStrategy::Avalanche, extra),
                snowball: payoff_schedule(&wizard.debts, PayoffStrategy::Snowball, extra),
            },
        }
    }
}
