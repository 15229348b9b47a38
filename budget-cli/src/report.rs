//! Plain-text and JSON rendering of engine results.

use std::fmt;

use anyhow::{Context, Result};
use budget_core::{
    BudgetPlan, PAYOFF_MONTHS_CAP, PayFrequency, PaycheckBreakdown, PayoffEstimate,
    PayoffStrategy, SavedScenario, ScenarioBook,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::utils::{format_money, format_percent};

const LABEL_WIDTH: usize = 28;
const AMOUNT_WIDTH: usize = 14;

/// Pretty-printed JSON for any serializable result.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize report as JSON")
}

fn line(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    amount: Decimal,
) -> fmt::Result {
    writeln!(
        f,
        "  {label:<LABEL_WIDTH$}{:>AMOUNT_WIDTH$}",
        format_money(amount)
    )
}

/// Amount taken out of pay, shown with a leading minus.
fn deduction(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    amount: Decimal,
) -> fmt::Result {
    let text = if amount > Decimal::ZERO {
        format!("-{}", format_money(amount))
    } else {
        format_money(amount)
    };
    writeln!(f, "  {label:<LABEL_WIDTH$}{text:>AMOUNT_WIDTH$}")
}

fn range(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    min: Decimal,
    max: Decimal,
    recommended: Decimal,
) -> fmt::Result {
    writeln!(
        f,
        "  {label:<LABEL_WIDTH$}{:>AMOUNT_WIDTH$}  (range {} to {})",
        format_money(recommended),
        format_money(min),
        format_money(max)
    )
}

fn months_text(estimate: &PayoffEstimate) -> String {
    if estimate.never_pays_off {
        format!("{PAYOFF_MONTHS_CAP}+ months (payment does not outpace interest)")
    } else if estimate.months == 1 {
        "1 month".to_string()
    } else {
        format!("{} months", estimate.months)
    }
}

/// One paycheck from gross to net.
pub struct PaycheckReport<'a> {
    pub breakdown: &'a PaycheckBreakdown,
    pub pay_frequency: PayFrequency,
}

impl fmt::Display for PaycheckReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let b = self.breakdown;
        writeln!(
            f,
            "Paycheck ({}, {} per year)",
            self.pay_frequency.as_str(),
            self.pay_frequency.periods_per_year()
        )?;
        line(f, "Gross pay", b.gross_per_paycheck)?;
        deduction(f, "Pre-tax deductions", b.pre_tax_total)?;
        line(f, "Taxable wages", b.taxable_wages)?;
        deduction(f, "Federal income tax", b.federal_tax)?;
        deduction(f, "State income tax", b.state_tax)?;
        deduction(f, "Local income tax", b.local_tax)?;
        deduction(f, "Social Security", b.fica.social_security)?;
        deduction(f, "Medicare", b.fica.medicare)?;
        deduction(f, "Post-tax deductions", b.post_tax_total)?;
        line(f, "Net pay", b.net_per_paycheck)?;
        writeln!(f)?;
        line(f, "Net monthly", b.net_monthly)?;
        line(f, "Net annual", b.net_annual)?;
        line(f, "Annual gross", b.annual_gross)
    }
}

/// Debts in payoff order with their estimated payoff time.
pub struct ScheduleReport<'a> {
    pub strategy: PayoffStrategy,
    pub schedule: &'a [PayoffEstimate],
}

impl fmt::Display for ScheduleReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "{} order", capitalize(self.strategy.as_str()))?;
        if self.schedule.is_empty() {
            return writeln!(f, "  (no debts)");
        }
        for (i, estimate) in self.schedule.iter().enumerate() {
            let debt = &estimate.debt;
            writeln!(
                f,
                "  {}. {} ({}) {} at {}, paying {}/mo: {}",
                i + 1,
                debt.id,
                debt.debt_type.label(),
                format_money(debt.balance),
                format_percent(debt.apr),
                format_money(estimate.monthly_payment),
                months_text(estimate)
            )?;
        }
        Ok(())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Full plan: paycheck, recommendations, allocation and debts.
pub struct PlanReport<'a>(pub &'a BudgetPlan);

impl fmt::Display for PlanReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let plan = self.0;
        let rec = &plan.recommendations;

        writeln!(
            f,
            "Budget plan: {} mode, {} {}, tax year {}",
            plan.mode.as_str(),
            plan.input.state_code,
            plan.input.filing_status.label(),
            plan.tax_year
        )?;
        writeln!(f)?;
        write!(
            f,
            "{}",
            PaycheckReport {
                breakdown: &plan.breakdown,
                pay_frequency: plan.input.pay_frequency,
            }
        )?;

        writeln!(f)?;
        writeln!(f, "Monthly recommendations")?;
        range(
            f,
            "Rent",
            rec.rent.min,
            rec.rent.max,
            rec.rent.recommended,
        )?;
        line(f, "Rent at 30% of gross", rec.rent.gross30)?;
        range(
            f,
            "Groceries",
            rec.groceries.min,
            rec.groceries.max,
            rec.groceries.recommended,
        )?;
        range(
            f,
            "Lifestyle",
            rec.lifestyle.min,
            rec.lifestyle.max,
            rec.lifestyle.recommended,
        )?;
        line(f, "Transportation, all in", rec.transportation.max_all_in)?;
        line(f, "Car payment cap", rec.transportation.max_car_payment)?;
        line(f, "Utilities estimate", rec.utilities.default_estimate)?;
        line(f, "Monthly savings target", rec.savings.monthly_target)?;
        line(f, "Emergency fund target", rec.savings.emergency_target)?;
        line(f, "Essentials", plan.essentials_monthly)?;

        let allocation = &plan.allocation;
        writeln!(f)?;
        writeln!(f, "Allocation")?;
        line(f, "Rent", allocation.rent)?;
        line(f, "Groceries", allocation.groceries)?;
        line(f, "Lifestyle", allocation.lifestyle)?;
        line(f, "Utilities", allocation.utilities)?;
        line(f, "Left over", allocation.leftover)?;

        let debts = &plan.debts;
        if debts.avalanche.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "Debts")?;
        line(f, "Total balance", debts.total_balance)?;
        line(f, "Minimum payments", debts.total_minimums)?;
        line(f, "Free cash flow", debts.free_cash_flow)?;
        line(f, "Suggested extra payment", debts.recommended_extra_payment)?;
        writeln!(f)?;
        write!(
            f,
            "{}",
            ScheduleReport {
                strategy: PayoffStrategy::Avalanche,
                schedule: &debts.avalanche,
            }
        )?;
        write!(
            f,
            "{}",
            ScheduleReport {
                strategy: PayoffStrategy::Snowball,
                schedule: &debts.snowball,
            }
        )
    }
}

fn comparison_rows(scenario: &SavedScenario) -> [(&'static str, Decimal); 8] {
    let rec = &scenario.recommendations;
    [
        ("Net monthly", scenario.breakdown.net_monthly),
        ("Rent", rec.rent.recommended),
        ("Groceries", rec.groceries.recommended),
        ("Lifestyle", rec.lifestyle.recommended),
        ("Transportation, all in", rec.transportation.max_all_in),
        ("Car payment cap", rec.transportation.max_car_payment),
        ("Monthly savings target", rec.savings.monthly_target),
        ("Emergency fund target", rec.savings.emergency_target),
    ]
}

/// Saved scenarios side by side, one column per scenario.
pub struct ComparisonReport<'a>(pub &'a ScenarioBook);

impl fmt::Display for ComparisonReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let book = self.0;
        write!(f, "  {:<LABEL_WIDTH$}", "")?;
        for scenario in book.iter() {
            write!(f, "{:>AMOUNT_WIDTH$}", scenario.name)?;
        }
        writeln!(f)?;

        let columns: Vec<[(&str, Decimal); 8]> = book.iter().map(comparison_rows).collect();
        let Some(first) = columns.first() else {
            return Ok(());
        };
        for (row, (label, _)) in first.iter().enumerate() {
            write!(f, "  {label:<LABEL_WIDTH$}")?;
            for column in &columns {
                write!(f, "{:>AMOUNT_WIDTH$}", format_money(column[row].1))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
