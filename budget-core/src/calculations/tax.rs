//! Federal, state, and FICA tax on annual amounts.
//!
//! | Tax      | Base                     | Standard deduction |
//! |----------|--------------------------|--------------------|
//! | Federal  | taxable wages            | yes, per status    |
//! | State    | taxable wages            | no                 |
//! | FICA     | gross wages              | no                 |
//!
//! FICA deliberately uses *gross* wages: payroll pre-tax deductions such as
//! 401k contributions lower income-tax wages but not Social Security or
//! Medicare wages.

use rust_decimal::Decimal;
use tracing::warn;

use crate::calculations::common::{non_negative, round_cents};
use crate::models::{FicaBreakdown, FilingStatus, StateTaxConfig, TaxBracket, TaxTables};

/// Tax calculator bound to one year of [`TaxTables`].
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator<'a> {
    tables: &'a TaxTables,
}

impl<'a> TaxCalculator<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    /// Annual federal income tax after the filing status's standard deduction.
    ///
    /// Returns zero for non-positive income; never negative.
    pub fn federal_income_tax(
        &self,
        annual_taxable_income: Decimal,
        filing_status: FilingStatus,
    ) -> Decimal {
        if annual_taxable_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let schedule = self.tables.federal(filing_status);
        let after_deduction = non_negative(annual_taxable_income - schedule.standard_deduction);

        round_cents(bracket_tax(after_deduction, &schedule.brackets))
    }

    /// Annual state income tax. States have no standard deduction here.
    ///
    /// Unknown state codes are taxed as if the state had no income tax.
    pub fn state_income_tax(
        &self,
        annual_taxable_income: Decimal,
        state_code: &str,
    ) -> Decimal {
        let Some(config) = self.tables.state(state_code) else {
            warn!(state_code, "unknown state code, assuming no state income tax");
            return Decimal::ZERO;
        };

        match config {
            StateTaxConfig::None => Decimal::ZERO,
            StateTaxConfig::Flat { rate } => {
                round_cents(non_negative(annual_taxable_income) * *rate)
            }
            StateTaxConfig::Progressive { brackets } => {
                round_cents(bracket_tax(annual_taxable_income, brackets))
            }
        }
    }

    /// Annual Social Security and Medicare on gross wages.
    ///
    /// Social Security stops at the wage base; Medicare is uncapped and picks
    /// up the additional surtax above the filing status threshold. Each part
    /// is rounded on its own and `total` is the rounded unrounded sum.
    pub fn fica(
        &self,
        annual_gross: Decimal,
        filing_status: FilingStatus,
    ) -> FicaBreakdown {
        let fica = self.tables.fica();
        let gross = non_negative(annual_gross);

        let social_security = gross.min(fica.social_security_wage_base) * fica.social_security_rate;

        let threshold = fica.additional_medicare_threshold(filing_status);
        let mut medicare = gross * fica.medicare_rate;
        if gross > threshold {
            medicare += (gross - threshold) * fica.additional_medicare_rate;
        }

        FicaBreakdown {
            social_security: round_cents(social_security),
            medicare: round_cents(medicare),
            total: round_cents(social_security + medicare),
        }
    }
}

/// Walks ascending brackets, taxing the slice of `income` inside each one.
fn bracket_tax(
    income: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    let mut tax = Decimal::ZERO;
    for bracket in brackets {
        if income <= bracket.min {
            break;
        }
        tax += bracket.taxable_portion(income) * bracket.rate;
    }
    tax
}
