//! Member assignment routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthContext};
use crate::routes::{database_failure, failure, require_management, success};
use strata_db::repositories::member::{AssignMemberInput, MemberError, MemberRepository};
use strata_db::repositories::unit::UnitRef;
use strata_shared::UnitKind;

/// Creates the member routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/members", post(assign_member))
        .route("/api/societies/{society_id}/members", get(list_members))
        .route("/api/members/{member_id}", delete(remove_member))
}

/// Request body for assigning a member. Exactly one of `flat_id` and
/// `housing_unit_id` must be present.
#[derive(Debug, Deserialize)]
pub struct AssignMemberRequest {
    /// Existing user being assigned.
    pub user_id: Uuid,
    /// Society the unit belongs to.
    pub society_id: Uuid,
    /// Flat id, for building societies.
    pub flat_id: Option<Uuid>,
    /// Housing-unit id, for housing societies.
    pub housing_unit_id: Option<Uuid>,
    /// Move-in date.
    pub move_in_date: NaiveDate,
}

/// POST `/api/members` - Assign a user to a flat or housing unit.
async fn assign_member(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(payload): Json<AssignMemberRequest>,
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

    let repo = MemberRepository::new(state.db.clone());
    let input = AssignMemberInput {
        user_id: payload.user_id,
        society_id: payload.society_id,
        unit,
        move_in_date: payload.move_in_date,
        created_by: auth.user_id(),
    };

    match repo.assign(input).await {
        Ok(member) => {
            info!(member_id = %member.id, user_id = %member.user_id, "Member assigned");
            success(StatusCode::CREATED, "Member assigned", json!(member))
        }
        Err(e) => {
            error!(error = %e, "Failed to assign member");
            map_member_error(&e)
        }
    }
}

/// GET `/api/societies/{society_id}/members` - List members with user names.
async fn list_members(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(society_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = MemberRepository::new(state.db.clone());
    match repo.list_by_society(society_id).await {
        Ok(members) => {
            let rows: Vec<serde_json::Value> = members
                .into_iter()
                .map(|m| {
                    json!({
                        "id": m.member.id,
                        "user_id": m.member.user_id,
                        "user_name": m.user_name,
                        "user_email": m.user_email,
                        "society_id": m.member.society_id,
                        "building_id": m.member.building_id,
                        "flat_id": m.member.flat_id,
                        "housing_unit_id": m.member.housing_unit_id,
                        "move_in_date": m.member.move_in_date,
                    })
                })
                .collect();
            success(StatusCode::OK, "ok", json!(rows))
        }
        Err(e) => {
            error!(error = %e, "Failed to list members");
            map_member_error(&e)
        }
    }
}

/// DELETE `/api/members/{member_id}` - Remove a member.
async fn remove_member(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(member_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let repo = MemberRepository::new(state.db.clone());
    match repo.remove(member_id, auth.user_id()).await {
        Ok(()) => success(StatusCode::OK, "Member removed", json!({ "id": member_id })),
        Err(e) => {
            error!(error = %e, "Failed to remove member");
            map_member_error(&e)
        }
    }
}

/// Maps member errors to HTTP responses.
fn map_member_error(e: &MemberError) -> Response {
    match e {
        MemberError::NotFound(id) => failure(
            StatusCode::NOT_FOUND,
            format!("Member not found: {id}"),
            "NOT_FOUND",
        ),
        MemberError::UserNotFound(id) => failure(
            StatusCode::NOT_FOUND,
            format!("User not found: {id}"),
            "NOT_FOUND",
        ),
        MemberError::UnitNotFound(id) => failure(
            StatusCode::NOT_FOUND,
            format!("Unit not found: {id}"),
            "NOT_FOUND",
        ),
        MemberError::Database(db) => database_failure(db.to_string()),
    }
}
