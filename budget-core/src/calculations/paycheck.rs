//! Paycheck calculator: annual salary and per-paycheck deductions to net pay.
//!
//! # Pipeline
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | Pay periods per year (26, 24, or 12) |
//! | 2    | Gross per paycheck (annual gross / periods) |
//! | 3    | Pre-tax total per paycheck |
//! | 4    | Annual taxable wages (annual gross - pre-tax × periods, minimum 0) |
//! | 5    | Federal and state tax on taxable wages; FICA on **gross** wages |
//! | 6    | Local tax (taxable wages × local percent) |
//! | 7    | Annual taxes / periods |
//! | 8    | Post-tax total per paycheck |
//! | 9    | Net per paycheck |
//! | 10   | Net monthly (net × paychecks per month: 26/12, 2, or 1) |
//! | 11   | Net annual (net monthly × 12) |
//! | 12   | Every output field rounded to cents on its own |

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{non_negative, percent_of, round_cents};
use crate::calculations::tax::TaxCalculator;
use crate::models::{FicaBreakdown, PaycheckBreakdown, PaycheckInput, TaxTables};

const MONTHS_PER_YEAR: u32 = 12;

/// Computes [`PaycheckBreakdown`]s against one year of tax tables.
#[derive(Debug, Clone, Copy)]
pub struct PaycheckCalculator<'a> {
    tax: TaxCalculator<'a>,
}

impl<'a> PaycheckCalculator<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self {
            tax: TaxCalculator::new(tables),
        }
    }

    /// Runs the full paycheck pipeline for `input`.
    pub fn compute(
        &self,
        input: &PaycheckInput,
    ) -> PaycheckBreakdown {
        let periods = Decimal::from(input.pay_frequency.periods_per_year());
        let gross_per_paycheck = input.annual_gross / periods;

        let pre_tax_total = input.pre_tax.total();
        let annual_pre_tax = pre_tax_total * periods;
        let annual_taxable_wages = non_negative(input.annual_gross - annual_pre_tax);

        let federal_annual = self
            .tax
            .federal_income_tax(annual_taxable_wages, input.filing_status);
        let state_annual = self
            .tax
            .state_income_tax(annual_taxable_wages, &input.state_code);
        let local_annual = percent_of(annual_taxable_wages, input.local_tax_percent);
        // Payroll taxes ignore pre-tax deductions.
        let fica_annual = self.tax.fica(input.annual_gross, input.filing_status);

        let federal_tax = federal_annual / periods;
        let state_tax = state_annual / periods;
        let local_tax = local_annual / periods;
        let social_security = fica_annual.social_security / periods;
        let medicare = fica_annual.medicare / periods;
        let fica_total = fica_annual.total / periods;

        let post_tax_total = input.post_tax.total();

        let net_per_paycheck = gross_per_paycheck
            - pre_tax_total
            - federal_tax
            - state_tax
            - local_tax
            - fica_total
            - post_tax_total;
        let net_monthly = net_per_paycheck * input.pay_frequency.paychecks_per_month();
        let net_annual = net_monthly * Decimal::from(MONTHS_PER_YEAR);

        debug!(
            annual_gross = %input.annual_gross,
            %annual_taxable_wages,
            %federal_annual,
            %state_annual,
            fica_annual = %fica_annual.total,
            frequency = input.pay_frequency.as_str(),
            "computed paycheck breakdown"
        );

        PaycheckBreakdown {
            gross_per_paycheck: round_cents(gross_per_paycheck),
            pre_tax_total: round_cents(pre_tax_total),
            taxable_wages: round_cents(annual_taxable_wages / periods),
            federal_tax: round_cents(federal_tax),
            state_tax: round_cents(state_tax),
            local_tax: round_cents(local_tax),
            fica: FicaBreakdown {
                social_security: round_cents(social_security),
                medicare: round_cents(medicare),
                total: round_cents(fica_total),
            },
            post_tax_total: round_cents(post_tax_total),
            net_per_paycheck: round_cents(net_per_paycheck),
            net_monthly: round_cents(net_monthly),
            net_annual: round_cents(net_annual),
            annual_gross: input.annual_gross,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert, proptest};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{FilingStatus, PayFrequency, PostTaxDeductions, PreTaxDeductions};
    use crate::test_fixtures::tables_2024;

    fn input(
        annual_gross: Decimal,
        pay_frequency: PayFrequency,
        state_code: &str,
    ) -> PaycheckInput {
        PaycheckInput {
            annual_gross,
            pay_frequency,
            filing_status: FilingStatus::Single,
            state_code: state_code.to_string(),
            local_tax_percent: Decimal::ZERO,
            pre_tax: PreTaxDeductions::default(),
            post_tax: PostTaxDeductions::default(),
        }
    }

    fn components_sum(breakdown: &PaycheckBreakdown) -> Decimal {
        breakdown.net_per_paycheck
            + breakdown.pre_tax_total
            + breakdown.federal_tax
            + breakdown.state_tax
            + breakdown.local_tax
            + breakdown.fica.total
            + breakdown.post_tax_total
    }

    #[test]
    fn single_arizona_biweekly_without_deductions() {
        let tables = tables_2024();
        let calculator = PaycheckCalculator::new(&tables);

        let result = calculator.compute(&input(dec!(85000), PayFrequency::Biweekly, "AZ"));

        // Annual: federal 10541, state 85000 * 2.5% = 2125, FICA 6502.50.
        assert_eq!(
            result,
            PaycheckBreakdown {
                gross_per_paycheck: dec!(3269.23),
                pre_tax_total: dec!(0.00),
                taxable_wages: dec!(3269.23),
                federal_tax: dec!(405.42),
                state_tax: dec!(81.73),
                local_tax: dec!(0.00),
                fica: FicaBreakdown {
                    social_security: dec!(202.69),
                    medicare: dec!(47.40),
                    total: dec!(250.10),
                },
                post_tax_total: dec!(0.00),
                net_per_paycheck: dec!(2531.98),
                net_monthly: dec!(5485.96),
                net_annual: dec!(65831.50),
                annual_gross: dec!(85000),
            }
        );
        assert!((components_sum(&result) - result.gross_per_paycheck).abs() <= dec!(0.07));
    }

    #[test]
    fn fica_uses_gross_not_taxable_wages() {
        let tables = tables_2024();
        let calculator = PaycheckCalculator::new(&tables);
        let without = calculator.compute(&input(dec!(85000), PayFrequency::Biweekly, "AZ"));

        let mut with_401k = input(dec!(85000), PayFrequency::Biweekly, "AZ");
        with_401k.pre_tax.retirement_401k = dec!(200);
        let with = calculator.compute(&with_401k);

        // Income tax shrinks with the 401k ...
        assert_eq!(with.taxable_wages, dec!(3069.23));
        assert_eq!(with.federal_tax, dec!(361.42));
        assert_eq!(with.state_tax, dec!(76.73));
        // ... payroll tax does not.
        assert_eq!(with.fica, without.fica);
    }

    #[test]
    fn monthly_frequency_converts_one_to_one() {
        let tables = tables_2024();
        let calculator = PaycheckCalculator::new(&tables);

        let result = calculator.compute(&input(dec!(60000), PayFrequency::Monthly, "TX"));

        // Annual federal 5216, FICA 4590, no state tax.
        assert_eq!(result.gross_per_paycheck, dec!(5000.00));
        assert_eq!(result.federal_tax, dec!(434.67));
        assert_eq!(result.state_tax, dec!(0.00));
        assert_eq!(result.fica.social_security, dec!(310.00));
        assert_eq!(result.fica.medicare, dec!(72.50));
        assert_eq!(result.net_per_paycheck, dec!(4182.83));
        assert_eq!(result.net_monthly, dec!(4182.83));
        assert_eq!(result.net_annual, dec!(50194.00));
    }

    #[test]
    fn semimonthly_frequency_uses_two_paychecks_per_month() {
        let tables = tables_2024();
        let calculator = PaycheckCalculator::new(&tables);

        let result = calculator.compute(&input(dec!(60000), PayFrequency::Semimonthly, "TX"));

        assert_eq!(result.gross_per_paycheck, dec!(2500.00));
        assert_eq!(result.net_per_paycheck, dec!(2091.42));
        assert_eq!(result.net_monthly, dec!(4182.83));
        assert_eq!(result.net_annual, dec!(50194.00));
    }

    #[test]
    fn local_tax_applies_to_taxable_wages() {
        let tables = tables_2024();
        let calculator = PaycheckCalculator::new(&tables);
        let mut with_local = input(dec!(60000), PayFrequency::Monthly, "TX");
        with_local.local_tax_percent = dec!(2);

        let result = calculator.compute(&with_local);

        assert_eq!(result.local_tax, dec!(100.00));
        assert_eq!(result.net_per_paycheck, dec!(4082.83));
    }

    #[test]
    fn post_tax_deductions_reduce_net_only() {
        let tables = tables_2024();
        let calculator = PaycheckCalculator::new(&tables);
        let base = calculator.compute(&input(dec!(60000), PayFrequency::Monthly, "TX"));

        let mut with_post_tax = input(dec!(60000), PayFrequency::Monthly, "TX");
        with_post_tax.post_tax = PostTaxDeductions {
            healthcare_premium: dec!(40),
            other: dec!(10),
        };
        let result = calculator.compute(&with_post_tax);

        assert_eq!(result.post_tax_total, dec!(50.00));
        assert_eq!(result.taxable_wages, base.taxable_wages);
        assert_eq!(result.federal_tax, base.federal_tax);
        assert_eq!(result.net_per_paycheck, base.net_per_paycheck - dec!(50));
    }

    #[test]
    fn taxable_wages_floor_at_zero() {
        let tables = tables_2024();
        let calculator = PaycheckCalculator::new(&tables);
        let mut heavy = input(dec!(12000), PayFrequency::Monthly, "AZ");
        heavy.pre_tax.other = dec!(1500);

        let result = calculator.compute(&heavy);

        assert_eq!(result.taxable_wages, dec!(0.00));
        assert_eq!(result.federal_tax, dec!(0.00));
        assert_eq!(result.state_tax, dec!(0.00));
        assert_eq!(result.fica.total, dec!(76.50));
    }

    #[test]
    fn zero_income_yields_zero_breakdown() {
        let tables = tables_2024();
        let calculator = PaycheckCalculator::new(&tables);

        let result = calculator.compute(&input(dec!(0), PayFrequency::Biweekly, "CA"));

        assert_eq!(result.gross_per_paycheck, dec!(0));
        assert_eq!(result.net_per_paycheck, dec!(0));
        assert_eq!(result.net_monthly, dec!(0));
        assert_eq!(result.net_annual, dec!(0));
    }

    #[test]
    fn repeated_computation_is_identical() {
        let tables = tables_2024();
        let calculator = PaycheckCalculator::new(&tables);
        let input = input(dec!(123456.78), PayFrequency::Biweekly, "CA");

        assert_eq!(calculator.compute(&input), calculator.compute(&input));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_components_sum_to_gross_within_rounding(
            annual_gross in 0u32..600_000,
            frequency_index in 0usize..3,
            state_index in 0usize..4,
            retirement in 0u32..800,
            premium in 0u32..300,
            post_tax in 0u32..200,
            local_bp in 0u32..500,
        ) {
            let tables = tables_2024();
            let calculator = PaycheckCalculator::new(&tables);
            let frequency = PayFrequency::all()[frequency_index];
            let state = ["AZ", "CA", "TX", "MS"][state_index];

            let mut paycheck = input(Decimal::from(annual_gross), frequency, state);
            paycheck.local_tax_percent = Decimal::new(i64::from(local_bp), 2);
            paycheck.pre_tax.retirement_401k = Decimal::from(retirement);
            paycheck.pre_tax.healthcare_premium = Decimal::from(premium);
            paycheck.post_tax.other = Decimal::from(post_tax);

            let result = calculator.compute(&paycheck);

            // Seven independently rounded terms plus the rounded gross.
            let drift = (components_sum(&result) - result.gross_per_paycheck).abs();
            prop_assert!(drift <= dec!(0.08), "drift {} for {:?}", drift, paycheck);
        }
    }
}
