//! Member repository: links users to flats or housing units.
//!
//! Assignment and removal also maintain the unit's `is_occupied` flag, so
//! both run inside a transaction.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use strata_shared::UnitKind;
use uuid::Uuid;

use crate::entities::{flats, housing_units, members, users};
use crate::repositories::unit::UnitRef;
use crate::soft_delete::find_active;

/// Error types for member operations.
#[derive(Debug, thiserror::Error)]
pub enum MemberError {
    /// Member not found.
    #[error("Member not found: {0}")]
    NotFound(Uuid),

    /// User not found.
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Flat or housing unit not found.
    #[error("Unit not found: {0}")]
    UnitNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for assigning a member to a unit.
#[derive(Debug, Clone)]
pub struct AssignMemberInput {
    /// Existing user being assigned.
    pub user_id: Uuid,
    /// Society the unit belongs to.
    pub society_id: Uuid,
    /// The flat or housing unit.
    pub unit: UnitRef,
    /// Move-in date.
    pub move_in_date: NaiveDate,
    /// User performing the assignment.
    pub created_by: Uuid,
}

/// Member row joined with the user's display fields.
#[derive(Debug, Clone)]
pub struct MemberWithUser {
    /// Member record.
    pub member: members::Model,
    /// User display name.
    pub user_name: String,
    /// User email.
    pub user_email: String,
}

/// Member repository.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    db: Arc<DatabaseConnection>,
}

impl MemberRepository {
    /// Creates a new member repository.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    /// Assigns a user to a flat or housing unit and marks it occupied.
    ///
    /// Both writes commit together or not at all.
    ///
    /// # Errors
    ///
    /// Returns an error if the user or unit does not exist or a write fails.
    pub async fn assign(&self, input: AssignMemberInput) -> Result<members::Model, MemberError> {
        let _user = find_active::<users::Entity>()
            .filter(users::Column::Id.eq(input.user_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(MemberError::UserNotFound(input.user_id))?;

        let txn = self.db.begin().await?;

        let building_id = match input.unit.kind {
            UnitKind::Flat => {
                let flat = find_active::<flats::Entity>()
                    .filter(flats::Column::Id.eq(input.unit.id))
                    .one(&txn)
                    .await?
                    .ok_or(MemberError::UnitNotFound(input.unit.id))?;
                let building_id = flat.building_id;
                set_flat_occupied(&txn, flat, true).await?;
                Some(building_id)
            }
            UnitKind::HousingUnit => {
                let unit = find_active::<housing_units::Entity>()
                    .filter(housing_units::Column::Id.eq(input.unit.id))
                    .one(&txn)
                    .await?
                    .ok_or(MemberError::UnitNotFound(input.unit.id))?;
                set_unit_occupied(&txn, unit, true).await?;
                None
            }
        };

        let now = Utc::now().into();
        let (flat_id, housing_unit_id) = match input.unit.kind {
            UnitKind::Flat => (Some(input.unit.id), None),
            UnitKind::HousingUnit => (None, Some(input.unit.id)),
        };

        let member = members::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            society_id: Set(input.society_id),
            building_id: Set(building_id),
            flat_id: Set(flat_id),
            housing_unit_id: Set(housing_unit_id),
            move_in_date: Set(input.move_in_date),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
            is_deleted: Set(false),
            deleted_at: Set(None),
            deleted_by: Set(None),
        };

        let inserted = member.insert(&txn).await?;
        txn.commit().await?;
        Ok(inserted)
    }

    /// Lists members of a society with user display fields.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn list_by_society(
        &self,
        society_id: Uuid,
    ) -> Result<Vec<MemberWithUser>, MemberError> {
        let member_rows = find_active::<members::Entity>()
            .filter(members::Column::SocietyId.eq(society_id))
            .order_by_desc(members::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        let mut result = Vec::with_capacity(member_rows.len());
        for member in member_rows {
            let user = users::Entity::find_by_id(member.user_id).one(self.db.as_ref()).await?;
            let (user_name, user_email) = user.map(|u| (u.name, u.email)).unwrap_or_default();
            result.push(MemberWithUser {
                member,
                user_name,
                user_email,
            });
        }

        Ok(result)
    }

    /// Soft-deletes a member; clears the unit's `is_occupied` flag when this
    /// was the last member of the unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the member is not found or a write fails.
    pub async fn remove(&self, member_id: Uuid, deleted_by: Uuid) -> Result<(), MemberError> {
        let member = find_active::<members::Entity>()
            .filter(members::Column::Id.eq(member_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(MemberError::NotFound(member_id))?;

        let txn = self.db.begin().await?;
        let now = Utc::now().into();

        let flat_id = member.flat_id;
        let housing_unit_id = member.housing_unit_id;

        let mut active: members::ActiveModel = member.into();
        active.is_deleted = Set(true);
        active.deleted_at = Set(Some(now));
        active.deleted_by = Set(Some(deleted_by));
        active.updated_at = Set(now);
        active.update(&txn).await?;

        if let Some(flat_id) = flat_id {
            let remaining = find_active::<members::Entity>()
                .filter(members::Column::FlatId.eq(flat_id))
                .count(&txn)
                .await?;
            if remaining == 0 {
                if let Some(flat) = find_active::<flats::Entity>()
                    .filter(flats::Column::Id.eq(flat_id))
                    .one(&txn)
                    .await?
                {
                    set_flat_occupied(&txn, flat, false).await?;
                }
            }
        }

        if let Some(unit_id) = housing_unit_id {
            let remaining = find_active::<members::Entity>()
                .filter(members::Column::HousingUnitId.eq(unit_id))
                .count(&txn)
                .await?;
            if remaining == 0 {
                if let Some(unit) = find_active::<housing_units::Entity>()
                    .filter(housing_units::Column::Id.eq(unit_id))
                    .one(&txn)
                    .await?
                {
                    set_unit_occupied(&txn, unit, false).await?;
                }
            }
        }

        txn.commit().await?;
        Ok(())
    }
}

async fn set_flat_occupied(
    txn: &DatabaseTransaction,
    flat: flats::Model,
    occupied: bool,
) -> Result<(), DbErr> {
    let mut active: flats::ActiveModel = flat.into();
    active.is_occupied = Set(occupied);
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await?;
    Ok(())
}

async fn set_unit_occupied(
    txn: &DatabaseTransaction,
    unit: housing_units::Model,
    occupied: bool,
) -> Result<(), DbErr> {
    let mut active: housing_units::ActiveModel = unit.into();
    active.is_occupied = Set(occupied);
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await?;
    Ok(())
}
