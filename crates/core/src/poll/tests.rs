//! Tests for poll status derivation and result percentages.

use chrono::{Duration, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::{OptionTally, PollStatus, compute_results};

fn tallies(votes: &[u64]) -> Vec<OptionTally> {
    votes
        .iter()
        .map(|&votes| OptionTally {
            option_id: Uuid::new_v4(),
            votes,
        })
        .collect()
}

#[test]
fn test_status_active_before_expiry() {
    let now = Utc::now();
    assert_eq!(PollStatus::at(now + Duration::hours(1), now), PollStatus::Active);
}

#[test]
fn test_status_expired_at_and_after_expiry() {
    let now = Utc::now();
    assert_eq!(PollStatus::at(now, now), PollStatus::Expired);
    assert_eq!(PollStatus::at(now - Duration::hours(1), now), PollStatus::Expired);
}

#[test]
fn test_zero_votes_reports_zero_percent() {
    let results = compute_results(&tallies(&[0, 0, 0]));
    assert_eq!(results.total_votes, 0);
    for option in &results.options {
        assert_eq!(option.votes, 0);
        assert_eq!(option.percentage, Decimal::ZERO);
    }
}

#[test]
fn test_percentages_for_known_split() {
    let results = compute_results(&tallies(&[3, 1]));
    assert_eq!(results.total_votes, 4);
    assert_eq!(results.options[0].percentage, dec!(75));
    assert_eq!(results.options[1].percentage, dec!(25));
}

#[test]
fn test_rounding_to_two_places() {
    let results = compute_results(&tallies(&[1, 1, 1]));
    assert_eq!(results.options[0].percentage, dec!(33.33));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Percentages sum to approximately 100 whenever there is at least one
    /// vote (rounding can shift the sum by a few hundredths).
    #[test]
    fn prop_percentages_sum_to_about_100(
        votes in proptest::collection::vec(0u64..1000, 1..8)
    ) {
        prop_assume!(votes.iter().sum::<u64>() > 0);
        let results = compute_results(&tallies(&votes));
        let sum: Decimal = results.options.iter().map(|o| o.percentage).sum();
        let drift = (sum - dec!(100)).abs();
        prop_assert!(drift <= dec!(0.1), "sum was {sum}");
    }

    /// Option counts pass through untouched.
    #[test]
    fn prop_counts_preserved(votes in proptest::collection::vec(0u64..1000, 0..8)) {
        let input = tallies(&votes);
        let results = compute_results(&input);
        prop_assert_eq!(results.options.len(), votes.len());
        for (option, expected) in results.options.iter().zip(&votes) {
            prop_assert_eq!(option.votes, *expected);
        }
    }
}
