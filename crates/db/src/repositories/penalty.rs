//! Penalty repository: the fine ledger for flats and housing units.
//!
//! Penalties live in two mirrored tables, one per unit family. The society's
//! type picks the family; this repository folds both into one [`Penalty`]
//! shape so routes never branch on the table.

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, QueryFilter,
    QueryOrder, Set,
    sea_query::NullOrdering,
};
use strata_shared::UnitKind;
use uuid::Uuid;

use crate::entities::{flat_penalties, flats, housing_units, unit_penalties};
use crate::repositories::unit::UnitRef;
use crate::soft_delete::find_active;

/// Error types for penalty operations.
#[derive(Debug, thiserror::Error)]
pub enum PenaltyError {
    /// Penalty not found.
    #[error("Penalty not found: {0}")]
    NotFound(Uuid),

    /// Flat or housing unit not found.
    #[error("Unit not found: {0}")]
    UnitNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for adding a penalty to a unit.
#[derive(Debug, Clone)]
pub struct AddPenaltyInput {
    /// Society the unit belongs to.
    pub society_id: Uuid,
    /// Fined flat or housing unit.
    pub unit: UnitRef,
    /// Fine amount.
    pub amount: Decimal,
    /// Reason shown to the member.
    pub reason: String,
    /// User levying the fine.
    pub created_by: Uuid,
}

/// A penalty from either table family, folded into one shape.
#[derive(Debug, Clone)]
pub struct Penalty {
    /// Penalty id.
    pub id: Uuid,
    /// Society the penalty belongs to.
    pub society_id: Uuid,
    /// The fined unit.
    pub unit: UnitRef,
    /// Fine amount.
    pub amount: Decimal,
    /// Reason shown to the member.
    pub reason: String,
    /// Whether the fine is settled.
    pub is_paid: bool,
    /// When the fine was settled.
    pub paid_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    /// Gateway order id recorded at payment time.
    pub razorpay_order_id: Option<String>,
    /// Gateway payment id recorded at payment time.
    pub razorpay_payment_id: Option<String>,
    /// When the fine was levied.
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

impl From<flat_penalties::Model> for Penalty {
    fn from(model: flat_penalties::Model) -> Self {
        Self {
            id: model.id,
            society_id: model.society_id,
            unit: UnitRef {
                kind: UnitKind::Flat,
                id: model.flat_id,
            },
            amount: model.amount,
            reason: model.reason,
            is_paid: model.is_paid,
            paid_at: model.paid_at,
            razorpay_order_id: model.razorpay_order_id,
            razorpay_payment_id: model.razorpay_payment_id,
            created_at: model.created_at,
        }
    }
}

impl From<unit_penalties::Model> for Penalty {
    fn from(model: unit_penalties::Model) -> Self {
        Self {
            id: model.id,
            society_id: model.society_id,
            unit: UnitRef {
                kind: UnitKind::HousingUnit,
                id: model.housing_unit_id,
            },
            amount: model.amount,
            reason: model.reason,
            is_paid: model.is_paid,
            paid_at: model.paid_at,
            razorpay_order_id: model.razorpay_order_id,
            razorpay_payment_id: model.razorpay_payment_id,
            created_at: model.created_at,
        }
    }
}

/// Penalty decorated with the unit's display number for listings.
#[derive(Debug, Clone)]
pub struct PenaltyWithUnit {
    /// Penalty record.
    pub penalty: Penalty,
    /// Flat or unit display number.
    pub unit_number: Option<String>,
}

#[cfg(test)]
#[path = "penalty_tests.rs"]
mod penalty_tests;

/// Penalty repository.
#[derive(Debug, Clone)]
pub struct PenaltyRepository {
    db: Arc<DatabaseConnection>,
}

impl PenaltyRepository {
    /// Creates a new penalty repository.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    /// Levies a penalty against a unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit does not exist or the insert fails.
    pub async fn add(&self, input: AddPenaltyInput) -> Result<Penalty, PenaltyError> {
        let now = Utc::now().into();
        match input.unit.kind {
            UnitKind::Flat => {
                find_active::<flats::Entity>()
                    .filter(flats::Column::Id.eq(input.unit.id))
                    .one(self.db.as_ref())
                    .await?
                    .ok_or(PenaltyError::UnitNotFound(input.unit.id))?;

                let penalty = flat_penalties::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    society_id: Set(input.society_id),
                    flat_id: Set(input.unit.id),
                    amount: Set(input.amount),
                    reason: Set(input.reason),
                    is_paid: Set(false),
                    paid_at: Set(None),
                    razorpay_order_id: Set(None),
                    razorpay_payment_id: Set(None),
                    created_by: Set(input.created_by),
                    created_at: Set(now),
                    updated_by: Set(None),
                    updated_at: Set(now),
                    is_deleted: Set(false),
                    deleted_at: Set(None),
                    deleted_by: Set(None),
                };
                Ok(penalty.insert(self.db.as_ref()).await?.into())
            }
            UnitKind::HousingUnit => {
                find_active::<housing_units::Entity>()
                    .filter(housing_units::Column::Id.eq(input.unit.id))
                    .one(self.db.as_ref())
                    .await?
                    .ok_or(PenaltyError::UnitNotFound(input.unit.id))?;

                let penalty = unit_penalties::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    society_id: Set(input.society_id),
                    housing_unit_id: Set(input.unit.id),
                    amount: Set(input.amount),
                    reason: Set(input.reason),
                    is_paid: Set(false),
                    paid_at: Set(None),
                    razorpay_order_id: Set(None),
                    razorpay_payment_id: Set(None),
                    created_by: Set(input.created_by),
                    created_at: Set(now),
                    updated_by: Set(None),
                    updated_at: Set(now),
                    is_deleted: Set(false),
                    deleted_at: Set(None),
                    deleted_by: Set(None),
                };
                Ok(penalty.insert(self.db.as_ref()).await?.into())
            }
        }
    }

    /// Lists a society's penalties for one unit family, unpaid-style order:
    /// settled fines sort by `paid_at` descending, open fines (null
    /// `paid_at`) sink to the end, ties break on id descending.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn list_by_society(
        &self,
        society_id: Uuid,
        kind: UnitKind,
    ) -> Result<Vec<PenaltyWithUnit>, PenaltyError> {
        let penalties: Vec<Penalty> = match kind {
            UnitKind::Flat => find_active::<flat_penalties::Entity>()
                .filter(flat_penalties::Column::SocietyId.eq(society_id))
                .order_by_with_nulls(flat_penalties::Column::PaidAt, Order::Desc, NullOrdering::Last)
                .order_by_desc(flat_penalties::Column::Id)
                .all(self.db.as_ref())
                .await?
                .into_iter()
                .map(Penalty::from)
                .collect(),
            UnitKind::HousingUnit => find_active::<unit_penalties::Entity>()
                .filter(unit_penalties::Column::SocietyId.eq(society_id))
                .order_by_with_nulls(unit_penalties::Column::PaidAt, Order::Desc, NullOrdering::Last)
                .order_by_desc(unit_penalties::Column::Id)
                .all(self.db.as_ref())
                .await?
                .into_iter()
                .map(Penalty::from)
                .collect(),
        };

        let mut result = Vec::with_capacity(penalties.len());
        for penalty in penalties {
            let unit_number = match penalty.unit.kind {
                UnitKind::Flat => flats::Entity::find_by_id(penalty.unit.id)
                    .one(self.db.as_ref())
                    .await?
                    .map(|f| f.flat_number),
                UnitKind::HousingUnit => housing_units::Entity::find_by_id(penalty.unit.id)
                    .one(self.db.as_ref())
                    .await?
                    .map(|u| u.unit_number),
            };
            result.push(PenaltyWithUnit {
                penalty,
                unit_number,
            });
        }
        Ok(result)
    }

    /// Marks a penalty paid, stamping `paid_at = now()` and the gateway ids.
    /// Re-marking an already-paid fine overwrites.
    ///
    /// # Errors
    ///
    /// Returns an error if the penalty is not found or the update fails.
    pub async fn mark_paid(
        &self,
        penalty_id: Uuid,
        kind: UnitKind,
        order_id: Option<String>,
        payment_id: Option<String>,
        updated_by: Uuid,
    ) -> Result<Penalty, PenaltyError> {
        let now = Utc::now().into();
        match kind {
            UnitKind::Flat => {
                let penalty = find_active::<flat_penalties::Entity>()
                    .filter(flat_penalties::Column::Id.eq(penalty_id))
                    .one(self.db.as_ref())
                    .await?
                    .ok_or(PenaltyError::NotFound(penalty_id))?;

                let mut active: flat_penalties::ActiveModel = penalty.into();
                active.is_paid = Set(true);
                active.paid_at = Set(Some(now));
                if order_id.is_some() {
                    active.razorpay_order_id = Set(order_id);
                }
                if payment_id.is_some() {
                    active.razorpay_payment_id = Set(payment_id);
                }
                active.updated_by = Set(Some(updated_by));
                active.updated_at = Set(now);
                Ok(active.update(self.db.as_ref()).await?.into())
            }
            UnitKind::HousingUnit => {
                let penalty = find_active::<unit_penalties::Entity>()
                    .filter(unit_penalties::Column::Id.eq(penalty_id))
                    .one(self.db.as_ref())
                    .await?
                    .ok_or(PenaltyError::NotFound(penalty_id))?;

                let mut active: unit_penalties::ActiveModel = penalty.into();
                active.is_paid = Set(true);
                active.paid_at = Set(Some(now));
                if order_id.is_some() {
                    active.razorpay_order_id = Set(order_id);
                }
                if payment_id.is_some() {
                    active.razorpay_payment_id = Set(payment_id);
                }
                active.updated_by = Set(Some(updated_by));
                active.updated_at = Set(now);
                Ok(active.update(self.db.as_ref()).await?.into())
            }
        }
    }

    /// Soft-deletes a penalty.
    ///
    /// # Errors
    ///
    /// Returns an error if the penalty is not found or the update fails.
    pub async fn delete(
        &self,
        penalty_id: Uuid,
        kind: UnitKind,
        deleted_by: Uuid,
    ) -> Result<(), PenaltyError> {
        let now = Utc::now().into();
        match kind {
            UnitKind::Flat => {
                let penalty = find_active::<flat_penalties::Entity>()
                    .filter(flat_penalties::Column::Id.eq(penalty_id))
                    .one(self.db.as_ref())
                    .await?
                    .ok_or(PenaltyError::NotFound(penalty_id))?;

                let mut active: flat_penalties::ActiveModel = penalty.into();
                active.is_deleted = Set(true);
                active.deleted_at = Set(Some(now));
                active.deleted_by = Set(Some(deleted_by));
                active.updated_at = Set(now);
                active.update(self.db.as_ref()).await?;
            }
            UnitKind::HousingUnit => {
                let penalty = find_active::<unit_penalties::Entity>()
                    .filter(unit_penalties::Column::Id.eq(penalty_id))
                    .one(self.db.as_ref())
                    .await?
                    .ok_or(PenaltyError::NotFound(penalty_id))?;

                let mut active: unit_penalties::ActiveModel = penalty.into();
                active.is_deleted = Set(true);
                active.deleted_at = Set(Some(now));
                active.deleted_by = Set(Some(deleted_by));
                active.updated_at = Set(now);
                active.update(self.db.as_ref()).await?;
            }
        }
        Ok(())
    }
}
