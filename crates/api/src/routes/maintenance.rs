//! Maintenance-plan routes.
//!
//! The plan body is the tagged [`MaintenancePlan`] sum type, so an
//! unrecognized `amount_type` never reaches a handler: deserialization
//! rejects it. Entry-count violations are 400s, never truncated or padded.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthContext};
use crate::routes::{database_failure, failure, require_management, success};
use strata_core::{MaintenancePlan, PlanError};
use strata_db::repositories::maintenance::{
    MaintenanceError, MaintenancePlanRows, MaintenanceRepository,
};

/// Creates the maintenance routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/flat-maintenance/{id}", patch(set_plan))
        .route("/api/flat-maintenance/{id}", get(get_plan))
        .route(
            "/api/flat-maintenance/{id}/settlements/{settlement_id}",
            patch(mark_settlement_paid),
        )
        .route(
            "/api/flat-maintenance/{id}/monthlies",
            patch(mark_monthlies_paid),
        )
}

/// Request body for marking a settlement paid.
#[derive(Debug, Default, Deserialize)]
pub struct MarkSettlementRequest {
    /// Gateway payment id, when paid through the gateway.
    pub razorpay_payment_id: Option<String>,
}

/// Request body for marking monthly rows paid.
#[derive(Debug, Deserialize)]
pub struct MarkMonthliesRequest {
    /// Monthly row ids to mark paid.
    pub ids: Vec<Uuid>,
    /// Gateway payment id, when paid through the gateway.
    pub razorpay_payment_id: Option<String>,
}

fn plan_rows_json(rows: &MaintenancePlanRows) -> serde_json::Value {
    json!({
        "maintenance": rows.maintenance,
        "settlement": rows.settlement,
        "monthlies": rows.monthlies,
    })
}

/// PATCH `/api/flat-maintenance/{id}` - Set the billing plan.
///
/// Settlement plans get one settlement row; quarterly/halfyearly/yearly get
/// exactly 3/6/12 monthly rows. The previous plan's rows retire in the same
/// transaction.
async fn set_plan(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(plan): Json<MaintenancePlan>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    if let Err(e) = plan.validate() {
        let code = match e {
            PlanError::WrongEntryCount { .. } => "INVALID_PLAN_LENGTH",
            _ => "VALIDATION_ERROR",
        };
        return failure(StatusCode::BAD_REQUEST, e.to_string(), code);
    }

    let repo = MaintenanceRepository::new(state.db.clone());
    match repo.set_plan(id, &plan, auth.user_id()).await {
        Ok(rows) => {
            info!(
                maintenance_id = %id,
                amount_type = plan.amount_type(),
                "Maintenance plan set"
            );
            success(StatusCode::OK, "Maintenance plan set", plan_rows_json(&rows))
        }
        Err(e) => {
            error!(error = %e, "Failed to set maintenance plan");
            map_maintenance_error(&e)
        }
    }
}

/// GET `/api/flat-maintenance/{id}` - Get the current plan and its rows.
async fn get_plan(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = MaintenanceRepository::new(state.db.clone());
    match repo.get_plan(id).await {
        Ok(rows) => success(StatusCode::OK, "ok", plan_rows_json(&rows)),
        Err(e) => map_maintenance_error(&e),
    }
}

/// PATCH `/api/flat-maintenance/{id}/settlements/{settlement_id}` - Mark a
/// settlement paid. Idempotent: a paid row is overwritten, not rejected.
async fn mark_settlement_paid(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((id, settlement_id)): Path<(Uuid, Uuid)>,
    payload: Option<Json<MarkSettlementRequest>>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let payment_id = payload.and_then(|Json(p)| p.razorpay_payment_id);
    let repo = MaintenanceRepository::new(state.db.clone());
    match repo
        .mark_settlement_paid(id, settlement_id, payment_id, auth.user_id())
        .await
    {
        Ok(settlement) => {
            info!(settlement_id = %settlement_id, "Settlement marked paid");
            success(StatusCode::OK, "Settlement marked paid", json!(settlement))
        }
        Err(e) => {
            error!(error = %e, "Failed to mark settlement paid");
            map_maintenance_error(&e)
        }
    }
}

/// PATCH `/api/flat-maintenance/{id}/monthlies` - Mark monthly rows paid in
/// one atomic statement.
async fn mark_monthlies_paid(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<MarkMonthliesRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }
    if payload.ids.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "ids must not be empty", "VALIDATION_ERROR");
    }

    let repo = MaintenanceRepository::new(state.db.clone());
    // Confirm the maintenance record exists before touching its rows.
    if let Err(e) = repo.get(id).await {
        return map_maintenance_error(&e);
    }

    match repo
        .mark_monthlies_paid(id, &payload.ids, payload.razorpay_payment_id, auth.user_id())
        .await
    {
        Ok(updated) => {
            info!(maintenance_id = %id, updated, "Monthly rows marked paid");
            success(StatusCode::OK, "Monthly rows marked paid", json!({ "updated": updated }))
        }
        Err(e) => {
            error!(error = %e, "Failed to mark monthly rows paid");
            map_maintenance_error(&e)
        }
    }
}

/// Maps maintenance errors to HTTP responses.
fn map_maintenance_error(e: &MaintenanceError) -> Response {
    match e {
        MaintenanceError::NotFound(id) => failure(
            StatusCode::NOT_FOUND,
            format!("Flat maintenance not found: {id}"),
            "FLAT_MAINTENANCE_NOT_FOUND",
        ),
        MaintenanceError::SettlementNotFound(id) => failure(
            StatusCode::NOT_FOUND,
            format!("Settlement not found: {id}"),
            "NOT_FOUND",
        ),
        MaintenanceError::Database(db) => database_failure(db.to_string()),
    }
}
