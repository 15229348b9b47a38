//! Versioned tax data consumed by the tax calculator.
//!
//! A [`TaxTables`] value bundles everything that changes from one tax year to
//! the next: federal brackets and standard deductions, per-state income tax
//! configuration, and FICA constants. Calculators borrow a `TaxTables`, so a
//! new year only needs new data, never new calculation code.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{FilingStatus, TaxBracket};

/// Errors raised when tax tables violate the bracket invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxTableError {
    #[error("{schedule}: no brackets provided")]
    NoBrackets { schedule: String },

    #[error("{schedule}: first bracket must start at 0, got {min}")]
    FirstBracketNotZero { schedule: String, min: Decimal },

    #[error("{schedule}: bracket {index} starts at {min} but previous bracket ends at {previous_max}")]
    NonContiguous {
        schedule: String,
        index: usize,
        min: Decimal,
        previous_max: Decimal,
    },

    #[error("{schedule}: bracket {index} is unbounded but is not the last bracket")]
    UnboundedBeforeLast { schedule: String, index: usize },

    #[error("{schedule}: last bracket must be unbounded")]
    LastBracketBounded { schedule: String },

    #[error("{schedule}: bracket {index} has max {max} not above min {min}")]
    EmptyBracket {
        schedule: String,
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("{schedule}: rate must be between 0 and 1, got {rate}")]
    InvalidRate { schedule: String, rate: Decimal },

    #[error("{schedule}: bracket {index} rate {rate} is lower than previous rate {previous_rate}")]
    DecreasingRate {
        schedule: String,
        index: usize,
        rate: Decimal,
        previous_rate: Decimal,
    },

    #[error("{schedule}: amount must be non-negative, got {amount}")]
    NegativeAmount { schedule: String, amount: Decimal },

    #[error("invalid state code '{0}': expected two uppercase letters")]
    InvalidStateCode(String),
}

/// Federal schedule for a single filing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederalSchedule {
    pub standard_deduction: Decimal,
    pub brackets: Vec<TaxBracket>,
}

/// How a state taxes income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateTaxConfig {
    /// No state income tax.
    None,
    /// A single rate applied to all taxable income.
    Flat { rate: Decimal },
    /// Marginal brackets, no state-level standard deduction.
    Progressive { brackets: Vec<TaxBracket> },
}

/// Payroll tax constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FicaConfig {
    pub social_security_rate: Decimal,
    pub social_security_wage_base: Decimal,
    pub medicare_rate: Decimal,
    pub additional_medicare_rate: Decimal,
    pub additional_medicare_threshold_single: Decimal,
    pub additional_medicare_threshold_married_jointly: Decimal,
}

impl FicaConfig {
    /// Gross income above which the additional Medicare surtax applies.
    pub fn additional_medicare_threshold(
        &self,
        filing_status: FilingStatus,
    ) -> Decimal {
        match filing_status {
            FilingStatus::MarriedJointly => self.additional_medicare_threshold_married_jointly,
            FilingStatus::Single => self.additional_medicare_threshold_single,
        }
    }
}

/// Complete, validated tax data for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxTables {
    tax_year: i32,
    single: FederalSchedule,
    married_jointly: FederalSchedule,
    states: BTreeMap<String, StateTaxConfig>,
    fica: FicaConfig,
}

impl TaxTables {
    /// Builds tax tables, checking every bracket list and rate.
    ///
    /// # Errors
    ///
    /// Returns [`TaxTableError`] when a schedule is empty, not contiguous,
    /// not terminated by an unbounded bracket, has decreasing rates, or when a
    /// rate falls outside `[0, 1]`.
    pub fn new(
        tax_year: i32,
        single: FederalSchedule,
        married_jointly: FederalSchedule,
        states: BTreeMap<String, StateTaxConfig>,
        fica: FicaConfig,
    ) -> Result<Self, TaxTableError> {
        validate_federal("federal/single", &single)?;
        validate_federal("federal/married_jointly", &married_jointly)?;

        for (code, config) in &states {
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(TaxTableError::InvalidStateCode(code.clone()));
            }
            let schedule = format!("state/{code}");
            match config {
                StateTaxConfig::None => {}
                StateTaxConfig::Flat { rate } => validate_rate(&schedule, *rate)?,
                StateTaxConfig::Progressive { brackets } => validate_brackets(&schedule, brackets)?,
            }
        }

        validate_fica(&fica)?;

        Ok(Self {
            tax_year,
            single,
            married_jointly,
            states,
            fica,
        })
    }

    pub fn tax_year(&self) -> i32 {
        self.tax_year
    }

    pub fn federal(
        &self,
        filing_status: FilingStatus,
    ) -> &FederalSchedule {
        match filing_status {
            FilingStatus::Single => &self.single,
            FilingStatus::MarriedJointly => &self.married_jointly,
        }
    }

    /// State configuration, or `None` when the code is not in the table.
    pub fn state(
        &self,
        state_code: &str,
    ) -> Option<&StateTaxConfig> {
        self.states.get(state_code)
    }

    /// Known state codes in alphabetical order.
    pub fn state_codes(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    pub fn fica(&self) -> &FicaConfig {
        &self.fica
    }
}

fn validate_federal(
    schedule: &str,
    federal: &FederalSchedule,
) -> Result<(), TaxTableError> {
    if federal.standard_deduction < Decimal::ZERO {
        return Err(TaxTableError::NegativeAmount {
            schedule: schedule.to_string(),
            amount: federal.standard_deduction,
        });
    }
    validate_brackets(schedule, &federal.brackets)
}

fn validate_rate(
    schedule: &str,
    rate: Decimal,
) -> Result<(), TaxTableError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(TaxTableError::InvalidRate {
            schedule: schedule.to_string(),
            rate,
        });
    }
    Ok(())
}

/// Checks the shared bracket invariants: starts at 0, contiguous, strictly
/// widening bounds, unbounded last bracket, non-decreasing rates in `[0, 1]`.
pub fn validate_brackets(
    schedule: &str,
    brackets: &[TaxBracket],
) -> Result<(), TaxTableError> {
    let Some(first) = brackets.first() else {
        return Err(TaxTableError::NoBrackets {
            schedule: schedule.to_string(),
        });
    };
    if first.min != Decimal::ZERO {
        return Err(TaxTableError::FirstBracketNotZero {
            schedule: schedule.to_string(),
            min: first.min,
        });
    }

    let last_index = brackets.len() - 1;
    let mut previous: Option<&TaxBracket> = None;

    for (index, bracket) in brackets.iter().enumerate() {
        validate_rate(schedule, bracket.rate)?;

        match bracket.max {
            Some(max) if max <= bracket.min => {
                return Err(TaxTableError::EmptyBracket {
                    schedule: schedule.to_string(),
                    index,
                    min: bracket.min,
                    max,
                });
            }
            Some(_) if index == last_index => {
                return Err(TaxTableError::LastBracketBounded {
                    schedule: schedule.to_string(),
                });
            }
            None if index != last_index => {
                return Err(TaxTableError::UnboundedBeforeLast {
                    schedule: schedule.to_string(),
                    index,
                });
            }
            _ => {}
        }

        if let Some(prev) = previous {
            // prev.max is Some here: an unbounded non-last bracket was rejected above.
            if let Some(previous_max) = prev.max {
                if bracket.min != previous_max {
                    return Err(TaxTableError::NonContiguous {
                        schedule: schedule.to_string(),
                        index,
                        min: bracket.min,
                        previous_max,
                    });
                }
            }
            if bracket.rate < prev.rate {
                return Err(TaxTableError::DecreasingRate {
                    schedule: schedule.to_string(),
                    index,
                    rate: bracket.rate,
                    previous_rate: prev.rate,
                });
            }
        }
        previous = Some(bracket);
    }

    Ok(())
}

fn validate_fica(fica: &FicaConfig) -> Result<(), TaxTableError> {
    for rate in [
        fica.social_security_rate,
        fica.medicare_rate,
        fica.additional_medicare_rate,
    ] {
        validate_rate("fica", rate)?;
    }
    for amount in [
        fica.social_security_wage_base,
        fica.additional_medicare_threshold_single,
        fica.additional_medicare_threshold_married_jointly,
    ] {
        if amount < Decimal::ZERO {
            return Err(TaxTableError::NegativeAmount {
                schedule: "fica".to_string(),
                amount,
            });
        }
    }
    Ok(())
}
