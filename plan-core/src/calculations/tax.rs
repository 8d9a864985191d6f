//! Progressive marginal income tax.
//!
//! A [`TaxTable`] is an ordered list of contiguous brackets. Tax is computed
//! by consuming income bracket by bracket: each bracket taxes at most its own
//! width at its own rate, and whatever remains moves on to the next one.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use plan_core::calculations::TaxTable;
//!
//! let table = TaxTable::default();
//!
//! // 11,600 at 10% plus 35,550 at 12%
//! assert_eq!(table.compute_tax(dec!(47150)), dec!(5426.00));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

use crate::calculations::common::round_half_up;
use crate::models::TaxBracket;

/// Errors raised when a bracket table breaks the table invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxTableError {
    #[error("tax table has no brackets")]
    Empty,

    #[error("first bracket must start at 0, got {0}")]
    FirstBracketNotZero(Decimal),

    #[error("bracket {index} starts at {found}, expected {expected}")]
    NotContiguous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {index} upper bound {max} is not above its lower bound {min}")]
    EmptyBracket {
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedBeforeLast { index: usize },

    #[error("top bracket must be unbounded")]
    BoundedTopBracket,

    #[error("bracket {index} rate must be between 0 and 1, got {rate}")]
    InvalidRate { index: usize, rate: Decimal },
}

/// Validated, ordered set of marginal brackets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxTable {
    brackets: Vec<TaxBracket>,
}

impl TaxTable {
    /// Builds a table, checking that brackets start at zero, are contiguous
    /// and strictly increasing, and that exactly the last one is unbounded.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, TaxTableError> {
        let first = brackets.first().ok_or(TaxTableError::Empty)?;
        if !first.min_income.is_zero() {
            return Err(TaxTableError::FirstBracketNotZero(first.min_income));
        }

        let last_index = brackets.len() - 1;
        let mut expected_min = Decimal::ZERO;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.tax_rate < Decimal::ZERO || bracket.tax_rate > Decimal::ONE {
                return Err(TaxTableError::InvalidRate {
                    index,
                    rate: bracket.tax_rate,
                });
            }
            if bracket.min_income != expected_min {
                return Err(TaxTableError::NotContiguous {
                    index,
                    expected: expected_min,
                    found: bracket.min_income,
                });
            }
            match bracket.max_income {
                Some(max) if max <= bracket.min_income => {
                    return Err(TaxTableError::EmptyBracket {
                        index,
                        min: bracket.min_income,
                        max,
                    });
                }
                Some(_) if index == last_index => return Err(TaxTableError::BoundedTopBracket),
                Some(max) => expected_min = max,
                None if index != last_index => {
                    return Err(TaxTableError::UnboundedBeforeLast { index });
                }
                None => {}
            }
        }

        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Federal tax owed on `income`, rounded to cents.
    ///
    /// Zero or negative income owes nothing.
    pub fn compute_tax(
        &self,
        income: Decimal,
    ) -> Decimal {
        let mut remaining = income;
        let mut tax = Decimal::ZERO;

        for bracket in &self.brackets {
            if remaining <= Decimal::ZERO {
                break;
            }
            let taxable = match bracket.width() {
                Some(width) if width < remaining => width,
                _ => remaining,
            };
            tax += taxable * bracket.tax_rate;
            remaining -= taxable;
        }

        round_half_up(tax)
    }
}

impl Default for TaxTable {
    /// Single-filer federal brackets for tax year 2024.
    fn default() -> Self {
        let bounds = [
            (dec!(0), Some(dec!(11600)), dec!(0.10)),
            (dec!(11600), Some(dec!(47150)), dec!(0.12)),
            (dec!(47150), Some(dec!(100525)), dec!(0.22)),
            (dec!(100525), Some(dec!(191950)), dec!(0.24)),
            (dec!(191950), Some(dec!(243725)), dec!(0.32)),
            (dec!(243725), Some(dec!(609350)), dec!(0.35)),
            (dec!(609350), None, dec!(0.37)),
        ];
        Self {
            brackets: bounds
                .into_iter()
                .map(|(min, max, rate)| TaxBracket::new(min, max, rate))
                .collect(),
        }
    }
}
