use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::TaxBracket;

/// Errors raised when a sequence of brackets does not form a progressive table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table is empty")]
    Empty,

    #[error("first bracket must start at 0, got {0}")]
    NonZeroStart(Decimal),

    #[error("bracket {index} starts at {found} but the previous bracket ends at {expected}")]
    Gap {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {index} has max {max} not above its min {min}")]
    EmptyRange {
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("bracket {0} is open-ended but is not the last bracket")]
    OpenEndedBeforeLast(usize),

    #[error("last bracket must be open-ended")]
    ClosedTop,

    #[error("bracket {index} rate {rate} must be between 0 and 1")]
    InvalidRate { index: usize, rate: Decimal },

    #[error("bracket {index} rate {rate} is lower than the previous rate {previous}")]
    Regressive {
        index: usize,
        rate: Decimal,
        previous: Decimal,
    },
}

/// Ordered, contiguous, progressive brackets for one jurisdiction.
///
/// The table always covers `[0, ∞)`: it starts at zero, each bracket begins
/// where the previous one ends, and the last bracket is open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Validates `brackets` and wraps them in a table.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTableError`] if the brackets are empty, do not start at
    /// zero, leave gaps, are not open-ended at the top, or have rates outside
    /// `[0, 1)` or decreasing from one bracket to the next.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketTableError> {
        let first = brackets.first().ok_or(BracketTableError::Empty)?;
        if first.min_income != Decimal::ZERO {
            return Err(BracketTableError::NonZeroStart(first.min_income));
        }

        let last_index = brackets.len() - 1;
        let mut previous: Option<&TaxBracket> = None;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.tax_rate < Decimal::ZERO || bracket.tax_rate >= Decimal::ONE {
                return Err(BracketTableError::InvalidRate {
                    index,
                    rate: bracket.tax_rate,
                });
            }

            match bracket.max_income {
                Some(max) if max <= bracket.min_income => {
                    return Err(BracketTableError::EmptyRange {
                        index,
                        min: bracket.min_income,
                        max,
                    });
                }
                Some(_) if index == last_index => return Err(BracketTableError::ClosedTop),
                None if index != last_index => {
                    return Err(BracketTableError::OpenEndedBeforeLast(index));
                }
                _ => {}
            }

            if let Some(prev) = previous {
                // prev is never open-ended here: only the last bracket may be.
                let expected = prev.max_income.unwrap_or(Decimal::MAX);
                if bracket.min_income != expected {
                    return Err(BracketTableError::Gap {
                        index,
                        expected,
                        found: bracket.min_income,
                    });
                }
                if bracket.tax_rate < prev.tax_rate {
                    return Err(BracketTableError::Regressive {
                        index,
                        rate: bracket.tax_rate,
                        previous: prev.tax_rate,
                    });
                }
            }

            previous = Some(bracket);
        }

        Ok(Self { brackets })
    }

    /// Builds a table from `(min, max, rate)` records.
    pub fn from_records(
        records: &[(Decimal, Option<Decimal>, Decimal)]
    ) -> Result<Self, BracketTableError> {
        Self::new(
            records
                .iter()
                .map(|&(min, max, rate)| TaxBracket::new(min, max, rate))
                .collect(),
        )
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Returns the bracket whose `(min, max]` interval contains `income`.
    ///
    /// Falls back to the first bracket when nothing matches, which is the
    /// case for an income of zero.
    pub fn find_bracket(
        &self,
        income: Decimal,
    ) -> &TaxBracket {
        self.brackets
            .iter()
            .find(|b| b.contains(income))
            .unwrap_or(&self.brackets[0])
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketTable {
    type Error = BracketTableError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketTable> for Vec<TaxBracket> {
    fn from(table: BracketTable) -> Self {
        table.brackets
    }
}
