//! Maintenance repository: billing plan writes and paid-status markers.
//!
//! Setting a plan marks `amount_type` and replaces the child rows in one
//! transaction; a partial plan must never become visible. Marking a row paid
//! is an idempotent overwrite: re-marking refreshes `paid_at` rather than
//! rejecting.

use chrono::Utc;
use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
    TransactionTrait,
    sea_query::Expr,
};
use strata_core::MaintenancePlan;
use uuid::Uuid;

use crate::entities::{
    flat_maintenance_monthlies, flat_maintenance_settlements, flat_maintenances,
};
use crate::soft_delete::find_active;

/// Error types for maintenance operations.
#[derive(Debug, thiserror::Error)]
pub enum MaintenanceError {
    /// Flat maintenance record not found.
    #[error("Flat maintenance not found: {0}")]
    NotFound(Uuid),

    /// Settlement row not found under the given maintenance record.
    #[error("Settlement not found: {0}")]
    SettlementNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A maintenance record with its current plan rows.
#[derive(Debug, Clone)]
pub struct MaintenancePlanRows {
    /// Plan head row.
    pub maintenance: flat_maintenances::Model,
    /// Settlement row, present while `amount_type` is settlement.
    pub settlement: Option<flat_maintenance_settlements::Model>,
    /// Monthly rows, 3/6/12 while the plan is recurring.
    pub monthlies: Vec<flat_maintenance_monthlies::Model>,
}

#[cfg(test)]
#[path = "maintenance_tests.rs"]
mod maintenance_tests;

/// Maintenance repository.
#[derive(Debug, Clone)]
pub struct MaintenanceRepository {
    db: Arc<DatabaseConnection>,
}

impl MaintenanceRepository {
    /// Creates a new maintenance repository.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    /// Sets the billing plan for a maintenance record.
    ///
    /// Marks `amount_type`, retires the previous plan's child rows, and
    /// inserts the new settlement or monthly rows, all in one transaction.
    /// The plan is validated by the caller before reaching here.
    ///
    /// # Errors
    ///
    /// Returns an error if the maintenance record is unknown or any write
    /// fails (in which case nothing persists).
    pub async fn set_plan(
        &self,
        maintenance_id: Uuid,
        plan: &MaintenancePlan,
        updated_by: Uuid,
    ) -> Result<MaintenancePlanRows, MaintenanceError> {
        let maintenance = self.get(maintenance_id).await?;

        let txn = self.db.begin().await?;
        let now = Utc::now().into();

        // Mark the plan type on the head row.
        let mut head: flat_maintenances::ActiveModel = maintenance.into();
        head.amount_type = Set(Some(plan.amount_type().to_string()));
        head.updated_by = Set(Some(updated_by));
        head.updated_at = Set(now);
        let maintenance = head.update(&txn).await?;

        // Retire whatever the previous plan left behind.
        retire_child_rows(&txn, maintenance_id, updated_by).await?;

        // Insert the new plan's rows.
        let mut settlement = None;
        let mut monthlies = Vec::new();

        if let MaintenancePlan::Settlement { settlement_amount } = plan {
            let row = flat_maintenance_settlements::ActiveModel {
                id: Set(Uuid::new_v4()),
                flat_maintenance_id: Set(maintenance_id),
                amount: Set(*settlement_amount),
                is_paid: Set(false),
                paid_at: Set(None),
                razorpay_payment_id: Set(None),
                created_by: Set(updated_by),
                created_at: Set(now),
                updated_by: Set(None),
                updated_at: Set(now),
                is_deleted: Set(false),
                deleted_at: Set(None),
                deleted_by: Set(None),
            };
            settlement = Some(row.insert(&txn).await?);
        } else {
            for entry in plan.month_entries() {
                let row = flat_maintenance_monthlies::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    flat_maintenance_id: Set(maintenance_id),
                    month: Set(entry.month),
                    amount: Set(entry.amount),
                    is_paid: Set(false),
                    paid_at: Set(None),
                    razorpay_payment_id: Set(None),
                    created_by: Set(updated_by),
                    created_at: Set(now),
                    updated_by: Set(None),
                    updated_at: Set(now),
                    is_deleted: Set(false),
                    deleted_at: Set(None),
                    deleted_by: Set(None),
                };
                monthlies.push(row.insert(&txn).await?);
            }
        }

        txn.commit().await?;

        Ok(MaintenancePlanRows {
            maintenance,
            settlement,
            monthlies,
        })
    }

    /// Gets a maintenance head row by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is not found or the query fails.
    pub async fn get(&self, maintenance_id: Uuid) -> Result<flat_maintenances::Model, MaintenanceError> {
        find_active::<flat_maintenances::Entity>()
            .filter(flat_maintenances::Column::Id.eq(maintenance_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(MaintenanceError::NotFound(maintenance_id))
    }

    /// Gets a maintenance record with its current plan rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is not found or a query fails.
    pub async fn get_plan(&self, maintenance_id: Uuid) -> Result<MaintenancePlanRows, MaintenanceError> {
        let maintenance = self.get(maintenance_id).await?;

        let settlement = find_active::<flat_maintenance_settlements::Entity>()
            .filter(flat_maintenance_settlements::Column::FlatMaintenanceId.eq(maintenance_id))
            .one(self.db.as_ref())
            .await?;

        let monthlies = find_active::<flat_maintenance_monthlies::Entity>()
            .filter(flat_maintenance_monthlies::Column::FlatMaintenanceId.eq(maintenance_id))
            .order_by_asc(flat_maintenance_monthlies::Column::Month)
            .all(self.db.as_ref())
            .await?;

        Ok(MaintenancePlanRows {
            maintenance,
            settlement,
            monthlies,
        })
    }

    /// Marks a settlement row paid, stamping `paid_at = now()` and the
    /// gateway payment id. Re-marking an already-paid row overwrites.
    ///
    /// # Errors
    ///
    /// Returns an error if the settlement does not belong to the maintenance
    /// record or the update fails.
    pub async fn mark_settlement_paid(
        &self,
        maintenance_id: Uuid,
        settlement_id: Uuid,
        payment_id: Option<String>,
        updated_by: Uuid,
    ) -> Result<flat_maintenance_settlements::Model, MaintenanceError> {
        let settlement = find_active::<flat_maintenance_settlements::Entity>()
            .filter(flat_maintenance_settlements::Column::Id.eq(settlement_id))
            .filter(flat_maintenance_settlements::Column::FlatMaintenanceId.eq(maintenance_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(MaintenanceError::SettlementNotFound(settlement_id))?;

        let now = Utc::now().into();
        let mut active: flat_maintenance_settlements::ActiveModel = settlement.into();
        active.is_paid = Set(true);
        active.paid_at = Set(Some(now));
        if payment_id.is_some() {
            active.razorpay_payment_id = Set(payment_id);
        }
        active.updated_by = Set(Some(updated_by));
        active.updated_at = Set(now);

        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Marks one or many monthly rows paid in a single statement.
    ///
    /// All listed rows update atomically; rows already paid are overwritten.
    /// Only rows belonging to `maintenance_id` are touched, so ids from
    /// another plan cannot be flipped through this path. Returns the number
    /// of rows touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn mark_monthlies_paid(
        &self,
        maintenance_id: Uuid,
        monthly_ids: &[Uuid],
        payment_id: Option<String>,
        updated_by: Uuid,
    ) -> Result<u64, MaintenanceError> {
        if monthly_ids.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let mut update = flat_maintenance_monthlies::Entity::update_many()
            .col_expr(flat_maintenance_monthlies::Column::IsPaid, Expr::value(true))
            .col_expr(flat_maintenance_monthlies::Column::PaidAt, Expr::value(Some(now)))
            .col_expr(
                flat_maintenance_monthlies::Column::UpdatedBy,
                Expr::value(Some(updated_by)),
            )
            .col_expr(flat_maintenance_monthlies::Column::UpdatedAt, Expr::value(now));
        if let Some(payment_id) = payment_id {
            update = update.col_expr(
                flat_maintenance_monthlies::Column::RazorpayPaymentId,
                Expr::value(Some(payment_id)),
            );
        }

        let result = update
            .filter(flat_maintenance_monthlies::Column::FlatMaintenanceId.eq(maintenance_id))
            .filter(flat_maintenance_monthlies::Column::Id.is_in(monthly_ids.iter().copied()))
            .filter(flat_maintenance_monthlies::Column::IsDeleted.eq(false))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected)
    }
}

/// Soft-deletes the previous plan's settlement and monthly rows inside the
/// plan-change transaction.
async fn retire_child_rows(
    txn: &DatabaseTransaction,
    maintenance_id: Uuid,
    deleted_by: Uuid,
) -> Result<(), DbErr> {
    let now = Utc::now();

    flat_maintenance_settlements::Entity::update_many()
        .col_expr(flat_maintenance_settlements::Column::IsDeleted, Expr::value(true))
        .col_expr(flat_maintenance_settlements::Column::DeletedAt, Expr::value(Some(now)))
        .col_expr(
            flat_maintenance_settlements::Column::DeletedBy,
            Expr::value(Some(deleted_by)),
        )
        .filter(flat_maintenance_settlements::Column::FlatMaintenanceId.eq(maintenance_id))
        .filter(flat_maintenance_settlements::Column::IsDeleted.eq(false))
        .exec(txn)
        .await?;

    flat_maintenance_monthlies::Entity::update_many()
        .col_expr(flat_maintenance_monthlies::Column::IsDeleted, Expr::value(true))
        .col_expr(flat_maintenance_monthlies::Column::DeletedAt, Expr::value(Some(now)))
        .col_expr(
            flat_maintenance_monthlies::Column::DeletedBy,
            Expr::value(Some(deleted_by)),
        )
        .filter(flat_maintenance_monthlies::Column::FlatMaintenanceId.eq(maintenance_id))
        .filter(flat_maintenance_monthlies::Column::IsDeleted.eq(false))
        .exec(txn)
        .await?;

    Ok(())
}
