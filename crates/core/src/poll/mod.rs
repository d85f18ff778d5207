//! Poll lifecycle and result computation.
//!
//! Results are derived at read time from vote rows, never stored.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Poll lifecycle state derived from the expiry timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollStatus {
    /// Votes are still accepted.
    Active,
    /// Expiry has passed; terminal.
    Expired,
}

impl PollStatus {
    /// Derives the status of a poll at a given instant.
    #[must_use]
    pub fn at(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if now < expires_at {
            Self::Active
        } else {
            Self::Expired
        }
    }
}

/// Vote count for a single option, before percentage derivation.
#[derive(Debug, Clone, Copy)]
pub struct OptionTally {
    /// Poll option id.
    pub option_id: Uuid,
    /// Number of votes cast for this option.
    pub votes: u64,
}

/// A single option with derived percentage.
#[derive(Debug, Clone, Serialize)]
pub struct OptionResult {
    /// Poll option id.
    pub option_id: Uuid,
    /// Number of votes cast for this option.
    pub votes: u64,
    /// Share of total votes, rounded to 2 decimal places; 0 when no votes.
    pub percentage: Decimal,
}

/// Computed poll results.
#[derive(Debug, Clone, Serialize)]
pub struct PollResults {
    /// Total votes across all options.
    pub total_votes: u64,
    /// Per-option counts and percentages.
    pub options: Vec<OptionResult>,
}

/// Computes per-option percentages against the total vote count.
///
/// With zero total votes every option reports 0 votes and 0%.
#[must_use]
pub fn compute_results(tallies: &[OptionTally]) -> PollResults {
    let total_votes: u64 = tallies.iter().map(|t| t.votes).sum();

    let options = tallies
        .iter()
        .map(|tally| {
            let percentage = if total_votes == 0 {
                Decimal::ZERO
            } else {
                (Decimal::from(tally.votes) / Decimal::from(total_votes) * Decimal::from(100))
                    .round_dp(2)
            };
            OptionResult {
                option_id: tally.option_id,
                votes: tally.votes,
                percentage,
            }
        })
        .collect();

    PollResults {
        total_votes,
        options,
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
