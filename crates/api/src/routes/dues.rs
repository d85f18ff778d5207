//! Monthly dues routes.
//!
//! Listing is a management surface: the member role is always refused. The
//! bulk-monetize endpoint is an administrative write-off that marks dues paid
//! without a gateway signature.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthContext};
use crate::routes::{database_failure, failure, require_management, success};
use strata_db::repositories::dues::{CreateDueInput, DueWithContext, DuesError, DuesRepository};
use strata_db::repositories::unit::UnitRef;
use strata_shared::UnitKind;

/// Creates the dues routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/member-monthly-dues", post(create_due))
        .route("/api/member-monthly-dues", get(list_dues))
        .route("/api/member-monthly-dues/view/{record_id}", get(view_due))
        .route("/api/member-monthly-dues/bulk-monetize", patch(bulk_monetize))
}

/// Query parameters for the dues listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDuesQuery {
    /// Billing month, first of month. Omitted = all months.
    pub month_year: Option<NaiveDate>,
    /// Society scope. Omitted = all societies (privileged roles only).
    pub society_id: Option<Uuid>,
}

/// Request body for creating a monthly due. Exactly one of `flat_id` and
/// `housing_unit_id` must be present.
#[derive(Debug, Deserialize)]
pub struct CreateDueRequest {
    /// Society the due belongs to.
    pub society_id: Uuid,
    /// Flat id, for building societies.
    pub flat_id: Option<Uuid>,
    /// Housing-unit id, for housing societies.
    pub housing_unit_id: Option<Uuid>,
    /// Members billed by this due.
    pub member_ids: Vec<Uuid>,
    /// First day of the billed month.
    pub month_year: NaiveDate,
    /// Maintenance portion.
    pub maintenance_amount: Decimal,
    /// Penalty portion.
    #[serde(default)]
    pub penalty_amount: Decimal,
}

/// Request body for bulk-monetize.
#[derive(Debug, Deserialize)]
pub struct BulkMonetizeRequest {
    /// Due record ids to mark maintenance-paid.
    pub ids: Vec<Uuid>,
}

fn due_json(row: &DueWithContext) -> serde_json::Value {
    json!({
        "id": row.due.id,
        "society_id": row.due.society_id,
        "society_name": row.society_name,
        "building_id": row.due.building_id,
        "building_name": row.building_name,
        "flat_id": row.due.flat_id,
        "housing_unit_id": row.due.housing_unit_id,
        "unit_number": row.unit_number,
        "member_names": row.member_names,
        "month_year": row.due.month_year,
        "maintenance_amount": row.due.maintenance_amount,
        "penalty_amount": row.due.penalty_amount,
        "total_due": row.due.total_due,
        "maintenance_paid": row.due.maintenance_paid,
        "maintenance_paid_at": row.due.maintenance_paid_at,
        "penalty_paid": row.due.penalty_paid,
        "penalty_paid_at": row.due.penalty_paid_at,
        "razorpay_payment_id": row.due.razorpay_payment_id,
    })
}

/// POST `/api/member-monthly-dues` - Create a due for a unit and month.
async fn create_due(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(payload): Json<CreateDueRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let unit = match (payload.flat_id, payload.housing_unit_id) {
        (Some(flat_id), None) => UnitRef {
            kind: UnitKind::Flat,
            id: flat_id,
        },
        (None, Some(unit_id)) => UnitRef {
            kind: UnitKind::HousingUnit,
            id: unit_id,
        },
        _ => {
            return failure(
                StatusCode::BAD_REQUEST,
                "Exactly one of flat_id and housing_unit_id is required",
                "VALIDATION_ERROR",
            );
        }
    };

    let repo = DuesRepository::new(state.db.clone());
    let input = CreateDueInput {
        society_id: payload.society_id,
        unit,
        member_ids: payload.member_ids,
        month_year: payload.month_year,
        maintenance_amount: payload.maintenance_amount,
        penalty_amount: payload.penalty_amount,
        created_by: auth.user_id(),
    };

    match repo.create(input).await {
        Ok(due) => {
            info!(due_id = %due.id, month_year = %due.month_year, "Monthly due created");
            success(StatusCode::CREATED, "Monthly due created", json!(due))
        }
        Err(e) => {
            error!(error = %e, "Failed to create monthly due");
            map_dues_error(&e)
        }
    }
}

/// GET `/api/member-monthly-dues` - List dues with display names.
///
/// Members never see this surface, whatever the scope.
async fn list_dues(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ListDuesQuery>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let repo = DuesRepository::new(state.db.clone());
    match repo.list(query.society_id, query.month_year).await {
        Ok(rows) => {
            let rows: Vec<serde_json::Value> = rows.iter().map(due_json).collect();
            success(StatusCode::OK, "ok", json!(rows))
        }
        Err(e) => {
            error!(error = %e, "Failed to list dues");
            map_dues_error(&e)
        }
    }
}

/// GET `/api/member-monthly-dues/view/{record_id}` - Get a single due.
async fn view_due(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(record_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let repo = DuesRepository::new(state.db.clone());
    match repo.view(record_id).await {
        Ok(row) => success(StatusCode::OK, "ok", due_json(&row)),
        Err(e) => map_dues_error(&e),
    }
}

/// PATCH `/api/member-monthly-dues/bulk-monetize` - Administrative write-off:
/// mark the listed dues maintenance-paid, all-or-nothing.
async fn bulk_monetize(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(payload): Json<BulkMonetizeRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }
    if payload.ids.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "ids must not be empty", "VALIDATION_ERROR");
    }

    let repo = DuesRepository::new(state.db.clone());
    match repo.bulk_mark_paid(&payload.ids, None, auth.user_id()).await {
        Ok(updated) => {
            info!(updated, "Dues bulk-monetized");
            success(StatusCode::OK, "Dues marked paid", json!({ "updated": updated }))
        }
        Err(e) => {
            error!(error = %e, "Failed to bulk-monetize dues");
            map_dues_error(&e)
        }
    }
}

/// Maps dues errors to HTTP responses.
fn map_dues_error(e: &DuesError) -> Response {
    match e {
        DuesError::NotFound(id) => failure(
            StatusCode::NOT_FOUND,
            format!("Monthly due not found: {id}"),
            "NOT_FOUND",
        ),
        DuesError::DuplicateMonth => failure(
            StatusCode::CONFLICT,
            "A due already exists for this unit and month",
            "CONFLICT",
        ),
        DuesError::UnitNotFound(id) => failure(
            StatusCode::NOT_FOUND,
            format!("Unit not found: {id}"),
            "NOT_FOUND",
        ),
        DuesError::Database(db) => database_failure(db.to_string()),
    }
}
