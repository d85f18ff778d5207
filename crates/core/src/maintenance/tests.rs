//! Tests for maintenance plan validation and wire shape.

use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{MaintenancePlan, MonthAmount, PlanError};

fn entries(months: impl IntoIterator<Item = i32>) -> Vec<MonthAmount> {
    months
        .into_iter()
        .map(|month| MonthAmount {
            month,
            amount: dec!(1500),
        })
        .collect()
}

#[test]
fn test_settlement_validates_without_entries() {
    let plan = MaintenancePlan::Settlement {
        settlement_amount: dec!(25000),
    };
    assert_eq!(plan.expected_entries(), 0);
    assert!(plan.validate().is_ok());
}

#[test]
fn test_negative_settlement_rejected() {
    let plan = MaintenancePlan::Settlement {
        settlement_amount: dec!(-1),
    };
    assert_eq!(plan.validate(), Err(PlanError::NegativeAmount));
}

#[rstest]
#[case(MaintenancePlan::Quarterly { amounts: entries(1..=3) }, 3)]
#[case(MaintenancePlan::Halfyearly { amounts: entries(1..=6) }, 6)]
#[case(MaintenancePlan::Yearly { amounts: entries(1..=12) }, 12)]
fn test_exact_entry_counts_accepted(#[case] plan: MaintenancePlan, #[case] expected: usize) {
    assert_eq!(plan.expected_entries(), expected);
    assert!(plan.validate().is_ok());
}

#[rstest]
#[case(MaintenancePlan::Quarterly { amounts: entries(1..=2) }, 3, 2)]
#[case(MaintenancePlan::Quarterly { amounts: entries(1..=4) }, 3, 4)]
#[case(MaintenancePlan::Halfyearly { amounts: entries(1..=3) }, 6, 3)]
#[case(MaintenancePlan::Yearly { amounts: entries(1..=6) }, 12, 6)]
fn test_wrong_entry_count_rejected(
    #[case] plan: MaintenancePlan,
    #[case] expected: usize,
    #[case] actual: usize,
) {
    assert_eq!(
        plan.validate(),
        Err(PlanError::WrongEntryCount { expected, actual })
    );
}

#[test]
fn test_month_out_of_range_rejected() {
    let plan = MaintenancePlan::Quarterly {
        amounts: entries([1, 2, 13]),
    };
    assert_eq!(plan.validate(), Err(PlanError::InvalidMonth(13)));

    let plan = MaintenancePlan::Quarterly {
        amounts: entries([0, 1, 2]),
    };
    assert_eq!(plan.validate(), Err(PlanError::InvalidMonth(0)));
}

#[test]
fn test_duplicate_month_rejected() {
    let plan = MaintenancePlan::Quarterly {
        amounts: entries([4, 5, 4]),
    };
    assert_eq!(plan.validate(), Err(PlanError::DuplicateMonth(4)));
}

#[test]
fn test_negative_month_amount_rejected() {
    let plan = MaintenancePlan::Quarterly {
        amounts: vec![
            MonthAmount {
                month: 1,
                amount: dec!(100),
            },
            MonthAmount {
                month: 2,
                amount: dec!(-100),
            },
            MonthAmount {
                month: 3,
                amount: dec!(100),
            },
        ],
    };
    assert_eq!(plan.validate(), Err(PlanError::NegativeAmount));
}

#[test]
fn test_tagged_deserialization() {
    let plan: MaintenancePlan = serde_json::from_str(
        r#"{"amount_type": "settlement", "settlement_amount": "12000"}"#,
    )
    .unwrap();
    assert_eq!(plan.amount_type(), "settlement");

    let plan: MaintenancePlan = serde_json::from_str(
        r#"{"amount_type": "quarterly", "amounts": [
            {"month": 1, "amount": "500"},
            {"month": 2, "amount": "500"},
            {"month": 3, "amount": "500"}
        ]}"#,
    )
    .unwrap();
    assert_eq!(plan.amount_type(), "quarterly");
    assert_eq!(plan.month_entries().len(), 3);
}

#[test]
fn test_unknown_amount_type_rejected_at_deserialization() {
    let result: Result<MaintenancePlan, _> =
        serde_json::from_str(r#"{"amount_type": "weekly", "amounts": []}"#);
    assert!(result.is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A yearly plan over all 12 distinct months with non-negative amounts
    /// always validates, regardless of the amounts chosen.
    #[test]
    fn prop_full_year_plan_valid(amounts in proptest::collection::vec(0i64..10_000_000, 12)) {
        let amounts = amounts
            .into_iter()
            .enumerate()
            .map(|(i, cents)| MonthAmount {
                month: i32::try_from(i).unwrap() + 1,
                amount: Decimal::new(cents, 2),
            })
            .collect();
        let plan = MaintenancePlan::Yearly { amounts };
        prop_assert!(plan.validate().is_ok());
    }

    /// Any entry count other than 3 fails quarterly validation.
    #[test]
    fn prop_quarterly_requires_exactly_three(count in 0usize..12) {
        prop_assume!(count != 3);
        let plan = MaintenancePlan::Quarterly {
            amounts: entries(1..=i32::try_from(count).unwrap()),
        };
        prop_assert_eq!(
            plan.validate(),
            Err(PlanError::WrongEntryCount { expected: 3, actual: count })
        );
    }
}
