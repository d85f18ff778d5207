//! Monthly dues repository.
//!
//! A due is the per-month billable instance for one flat or housing unit.
//! Listing decorates each row with society, building, unit, and member
//! display names; the bulk paid-marker is a single UPDATE so a batch either
//! applies to all listed rows or none.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
    sea_query::Expr,
};
use strata_shared::UnitKind;
use uuid::Uuid;

use crate::entities::{buildings, flats, housing_units, member_monthly_dues, members, societies, users};
use crate::repositories::unit::UnitRef;
use crate::soft_delete::find_active;

/// Error types for monthly-due operations.
#[derive(Debug, thiserror::Error)]
pub enum DuesError {
    /// Due record not found.
    #[error("Monthly due not found: {0}")]
    NotFound(Uuid),

    /// A non-deleted due already exists for this unit and month.
    #[error("A due already exists for this unit and month")]
    DuplicateMonth,

    /// Flat or housing unit not found.
    #[error("Unit not found: {0}")]
    UnitNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a monthly due.
#[derive(Debug, Clone)]
pub struct CreateDueInput {
    /// Society the due belongs to.
    pub society_id: Uuid,
    /// Billed flat or housing unit.
    pub unit: UnitRef,
    /// Members billed by this due.
    pub member_ids: Vec<Uuid>,
    /// First day of the billed month.
    pub month_year: NaiveDate,
    /// Maintenance portion.
    pub maintenance_amount: Decimal,
    /// Penalty portion.
    pub penalty_amount: Decimal,
    /// User creating the due.
    pub created_by: Uuid,
}

/// Due row decorated with display names for listings.
#[derive(Debug, Clone)]
pub struct DueWithContext {
    /// Due record.
    pub due: member_monthly_dues::Model,
    /// Society name.
    pub society_name: String,
    /// Building name, absent for housing societies.
    pub building_name: Option<String>,
    /// Flat or unit display number.
    pub unit_number: Option<String>,
    /// Display names of the billed members.
    pub member_names: Vec<String>,
}

#[cfg(test)]
#[path = "dues_tests.rs"]
mod dues_tests;

/// Monthly dues repository.
#[derive(Debug, Clone)]
pub struct DuesRepository {
    db: Arc<DatabaseConnection>,
}

impl DuesRepository {
    /// Creates a new dues repository.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    /// Creates a monthly due for a unit.
    ///
    /// At most one non-deleted due may exist per unit per month; the partial
    /// unique index backs this check under races.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit is unknown, a due already exists for the
    /// month, or the insert fails.
    pub async fn create(
        &self,
        input: CreateDueInput,
    ) -> Result<member_monthly_dues::Model, DuesError> {
        let building_id = match input.unit.kind {
            UnitKind::Flat => {
                let flat = find_active::<flats::Entity>()
                    .filter(flats::Column::Id.eq(input.unit.id))
                    .one(self.db.as_ref())
                    .await?
                    .ok_or(DuesError::UnitNotFound(input.unit.id))?;
                Some(flat.building_id)
            }
            UnitKind::HousingUnit => {
                find_active::<housing_units::Entity>()
                    .filter(housing_units::Column::Id.eq(input.unit.id))
                    .one(self.db.as_ref())
                    .await?
                    .ok_or(DuesError::UnitNotFound(input.unit.id))?;
                None
            }
        };

        let unit_filter = match input.unit.kind {
            UnitKind::Flat => member_monthly_dues::Column::FlatId.eq(input.unit.id),
            UnitKind::HousingUnit => member_monthly_dues::Column::HousingUnitId.eq(input.unit.id),
        };
        let existing = find_active::<member_monthly_dues::Entity>()
            .filter(unit_filter)
            .filter(member_monthly_dues::Column::MonthYear.eq(input.month_year))
            .one(self.db.as_ref())
            .await?;
        if existing.is_some() {
            return Err(DuesError::DuplicateMonth);
        }

        let now = Utc::now().into();
        let (flat_id, housing_unit_id) = match input.unit.kind {
            UnitKind::Flat => (Some(input.unit.id), None),
            UnitKind::HousingUnit => (None, Some(input.unit.id)),
        };

        let due = member_monthly_dues::ActiveModel {
            id: Set(Uuid::new_v4()),
            society_id: Set(input.society_id),
            building_id: Set(building_id),
            flat_id: Set(flat_id),
            housing_unit_id: Set(housing_unit_id),
            member_ids: Set(input.member_ids),
            month_year: Set(input.month_year),
            maintenance_amount: Set(input.maintenance_amount),
            penalty_amount: Set(input.penalty_amount),
            total_due: Set(input.maintenance_amount + input.penalty_amount),
            maintenance_paid: Set(false),
            maintenance_paid_at: Set(None),
            penalty_paid: Set(false),
            penalty_paid_at: Set(None),
            razorpay_payment_id: Set(None),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
            is_deleted: Set(false),
            deleted_at: Set(None),
            deleted_by: Set(None),
        };

        Ok(due.insert(self.db.as_ref()).await?)
    }

    /// Lists dues, optionally scoped to a society and billing month, with
    /// display names attached.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn list(
        &self,
        society_id: Option<Uuid>,
        month_year: Option<NaiveDate>,
    ) -> Result<Vec<DueWithContext>, DuesError> {
        let mut query = find_active::<member_monthly_dues::Entity>();
        if let Some(society_id) = society_id {
            query = query.filter(member_monthly_dues::Column::SocietyId.eq(society_id));
        }
        if let Some(month_year) = month_year {
            query = query.filter(member_monthly_dues::Column::MonthYear.eq(month_year));
        }

        let rows = query
            .order_by_desc(member_monthly_dues::Column::MonthYear)
            .order_by_desc(member_monthly_dues::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        let mut result = Vec::with_capacity(rows.len());
        for due in rows {
            result.push(self.decorate(due).await?);
        }
        Ok(result)
    }

    /// Gets a single due with display names attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the due is not found or a query fails.
    pub async fn view(&self, record_id: Uuid) -> Result<DueWithContext, DuesError> {
        let due = find_active::<member_monthly_dues::Entity>()
            .filter(member_monthly_dues::Column::Id.eq(record_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(DuesError::NotFound(record_id))?;

        self.decorate(due).await
    }

    /// Marks the maintenance portion of many dues paid in one statement.
    ///
    /// Either every listed row updates or none do. Rows already paid are
    /// overwritten with the fresh timestamp and payment id. Returns the
    /// number of rows touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn bulk_mark_paid(
        &self,
        record_ids: &[Uuid],
        payment_id: Option<String>,
        updated_by: Uuid,
    ) -> Result<u64, DuesError> {
        if record_ids.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let mut update = member_monthly_dues::Entity::update_many()
            .col_expr(member_monthly_dues::Column::MaintenancePaid, Expr::value(true))
            .col_expr(
                member_monthly_dues::Column::MaintenancePaidAt,
                Expr::value(Some(now)),
            )
            .col_expr(member_monthly_dues::Column::UpdatedBy, Expr::value(Some(updated_by)))
            .col_expr(member_monthly_dues::Column::UpdatedAt, Expr::value(now));
        if let Some(payment_id) = payment_id {
            update = update.col_expr(
                member_monthly_dues::Column::RazorpayPaymentId,
                Expr::value(Some(payment_id)),
            );
        }

        let result = update
            .filter(member_monthly_dues::Column::Id.is_in(record_ids.iter().copied()))
            .filter(member_monthly_dues::Column::IsDeleted.eq(false))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected)
    }

    /// Attaches society, building, unit, and member display names to a due.
    async fn decorate(
        &self,
        due: member_monthly_dues::Model,
    ) -> Result<DueWithContext, DuesError> {
        let society_name = societies::Entity::find_by_id(due.society_id)
            .one(self.db.as_ref())
            .await?
            .map(|s| s.name)
            .unwrap_or_default();

        let building_name = match due.building_id {
            Some(building_id) => buildings::Entity::find_by_id(building_id)
                .one(self.db.as_ref())
                .await?
                .map(|b| b.name),
            None => None,
        };

        let unit_number = if let Some(flat_id) = due.flat_id {
            flats::Entity::find_by_id(flat_id)
                .one(self.db.as_ref())
                .await?
                .map(|f| f.flat_number)
        } else if let Some(unit_id) = due.housing_unit_id {
            housing_units::Entity::find_by_id(unit_id)
                .one(self.db.as_ref())
                .await?
                .map(|u| u.unit_number)
        } else {
            None
        };

        let mut member_names = Vec::with_capacity(due.member_ids.len());
        for member_id in &due.member_ids {
            let member = members::Entity::find_by_id(*member_id).one(self.db.as_ref()).await?;
            if let Some(member) = member {
                if let Some(user) = users::Entity::find_by_id(member.user_id).one(self.db.as_ref()).await? {
                    member_names.push(user.name);
                }
            }
        }

        Ok(DueWithContext {
            due,
            society_name,
            building_name,
            unit_number,
            member_names,
        })
    }
}
