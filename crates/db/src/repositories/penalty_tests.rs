//! Tests for the unified penalty shape over both table families.

use chrono::Utc;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::entities::{flat_penalties, unit_penalties};
use crate::repositories::penalty::Penalty;
use strata_shared::UnitKind;

fn flat_penalty_model() -> flat_penalties::Model {
    let now = Utc::now().into();
    flat_penalties::Model {
        id: Uuid::new_v4(),
        society_id: Uuid::new_v4(),
        flat_id: Uuid::new_v4(),
        amount: dec!(500),
        reason: "Late maintenance payment".to_string(),
        is_paid: false,
        paid_at: None,
        razorpay_order_id: None,
        razorpay_payment_id: None,
        created_by: Uuid::new_v4(),
        created_at: now,
        updated_by: None,
        updated_at: now,
        is_deleted: false,
        deleted_at: None,
        deleted_by: None,
    }
}

fn unit_penalty_model() -> unit_penalties::Model {
    let now = Utc::now().into();
    unit_penalties::Model {
        id: Uuid::new_v4(),
        society_id: Uuid::new_v4(),
        housing_unit_id: Uuid::new_v4(),
        amount: dec!(750),
        reason: "Parking violation".to_string(),
        is_paid: true,
        paid_at: Some(now),
        razorpay_order_id: Some("order_1".to_string()),
        razorpay_payment_id: Some("pay_1".to_string()),
        created_by: Uuid::new_v4(),
        created_at: now,
        updated_by: None,
        updated_at: now,
        is_deleted: false,
        deleted_at: None,
        deleted_by: None,
    }
}

#[test]
fn test_flat_penalty_folds_to_flat_kind() {
    let model = flat_penalty_model();
    let flat_id = model.flat_id;

    let penalty = Penalty::from(model);
    assert_eq!(penalty.unit.kind, UnitKind::Flat);
    assert_eq!(penalty.unit.id, flat_id);
    assert_eq!(penalty.amount, dec!(500));
    assert!(!penalty.is_paid);
    assert!(penalty.paid_at.is_none());
}

#[test]
fn test_unit_penalty_folds_to_housing_kind() {
    let model = unit_penalty_model();
    let unit_id = model.housing_unit_id;

    let penalty = Penalty::from(model);
    assert_eq!(penalty.unit.kind, UnitKind::HousingUnit);
    assert_eq!(penalty.unit.id, unit_id);
    assert!(penalty.is_paid);
    assert_eq!(penalty.razorpay_order_id.as_deref(), Some("order_1"));
    assert_eq!(penalty.razorpay_payment_id.as_deref(), Some("pay_1"));
}
