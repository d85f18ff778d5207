//! Maintenance billing plan domain model.
//!
//! A flat (or housing unit) carries exactly one billing plan at a time: a
//! one-time settlement, or a recurring schedule of 3, 6, or 12 monthly
//! amounts. The plan is a sum type so that each variant only carries the
//! fields valid for it, and an unrecognized `amount_type` is rejected at
//! deserialization rather than deep inside a handler.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One billing month inside a recurring plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthAmount {
    /// Calendar month number, 1-12.
    pub month: i32,
    /// Amount billed for that month.
    pub amount: Decimal,
}

/// The billing plan for one flat maintenance record.
///
/// Tagged by `amount_type` on the wire; the variants are mutually exclusive
/// and the most recent management action wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "amount_type", rename_all = "lowercase")]
pub enum MaintenancePlan {
    /// One-time lump settlement.
    Settlement {
        /// The lump amount.
        settlement_amount: Decimal,
    },
    /// Recurring plan billed over exactly 3 months.
    Quarterly {
        /// Month/amount entries; must be exactly 3.
        amounts: Vec<MonthAmount>,
    },
    /// Recurring plan billed over exactly 6 months.
    Halfyearly {
        /// Month/amount entries; must be exactly 6.
        amounts: Vec<MonthAmount>,
    },
    /// Recurring plan billed over exactly 12 months.
    Yearly {
        /// Month/amount entries; must be exactly 12.
        amounts: Vec<MonthAmount>,
    },
}

/// Validation errors for a maintenance plan.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// The entry count does not match the plan type.
    #[error("Plan requires exactly {expected} month entries, got {actual}")]
    WrongEntryCount {
        /// Required entry count for the plan type.
        expected: usize,
        /// Entries actually supplied.
        actual: usize,
    },

    /// A month number outside 1-12.
    #[error("Invalid month number: {0}")]
    InvalidMonth(i32),

    /// A month listed more than once.
    #[error("Duplicate month number: {0}")]
    DuplicateMonth(i32),

    /// A negative amount.
    #[error("Amount cannot be negative")]
    NegativeAmount,
}

impl MaintenancePlan {
    /// Wire name of the plan discriminant.
    #[must_use]
    pub const fn amount_type(&self) -> &'static str {
        match self {
            Self::Settlement { .. } => "settlement",
            Self::Quarterly { .. } => "quarterly",
            Self::Halfyearly { .. } => "halfyearly",
            Self::Yearly { .. } => "yearly",
        }
    }

    /// Number of monthly rows this plan produces (0 for settlement).
    #[must_use]
    pub const fn expected_entries(&self) -> usize {
        match self {
            Self::Settlement { .. } => 0,
            Self::Quarterly { .. } => 3,
            Self::Halfyearly { .. } => 6,
            Self::Yearly { .. } => 12,
        }
    }

    /// The monthly entries, empty for a settlement.
    #[must_use]
    pub fn month_entries(&self) -> &[MonthAmount] {
        match self {
            Self::Settlement { .. } => &[],
            Self::Quarterly { amounts } | Self::Halfyearly { amounts } | Self::Yearly { amounts } => {
                amounts
            }
        }
    }

    /// Validates the plan shape.
    ///
    /// A mismatched entry count is a client error, never silently truncated
    /// or padded. Settlement amounts and all month amounts must be
    /// non-negative, months within 1-12 and unique.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), PlanError> {
        if let Self::Settlement { settlement_amount } = self {
            if *settlement_amount < Decimal::ZERO {
                return Err(PlanError::NegativeAmount);
            }
            return Ok(());
        }

        let entries = self.month_entries();
        let expected = self.expected_entries();
        if entries.len() != expected {
            return Err(PlanError::WrongEntryCount {
                expected,
                actual: entries.len(),
            });
        }

        let mut seen = [false; 12];
        for entry in entries {
            if !(1..=12).contains(&entry.month) {
                return Err(PlanError::InvalidMonth(entry.month));
            }
            #[allow(clippy::cast_sign_loss)]
            let idx = (entry.month - 1) as usize;
            if seen[idx] {
                return Err(PlanError::DuplicateMonth(entry.month));
            }
            seen[idx] = true;
            if entry.amount < Decimal::ZERO {
                return Err(PlanError::NegativeAmount);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
