//! Society registry routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, middleware::AuthContext};
use crate::routes::{database_failure, failure, require_super_admin, success};
use strata_db::repositories::society::{
    CreateSocietyInput, SocietyError, SocietyRepository, UpdateSocietyInput,
};

/// Creates the society routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/societies", post(create_society))
        .route("/api/societies", get(list_societies))
        .route("/api/societies/{society_id}", get(get_society))
        .route("/api/societies/{society_id}", put(update_society))
        .route("/api/societies/{society_id}", delete(delete_society))
        .route("/api/societies/{society_id}/end-date", patch(set_end_date))
}

/// Request body for creating a society.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSocietyRequest {
    /// Society name, unique among non-deleted societies.
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    /// Street address.
    #[validate(length(min = 1))]
    pub address: String,
    /// City.
    pub city: String,
    /// State.
    pub state: String,
    /// Country.
    pub country: String,
    /// residential | commercial | housing.
    pub society_type: String,
    /// Opening balance carried in from outside.
    #[serde(default)]
    pub opening_balance: Decimal,
}

/// Request body for updating a society.
#[derive(Debug, Deserialize)]
pub struct UpdateSocietyRequest {
    /// New name.
    pub name: Option<String>,
    /// New address.
    pub address: Option<String>,
    /// New city.
    pub city: Option<String>,
    /// New state.
    pub state: Option<String>,
    /// New country.
    pub country: Option<String>,
    /// New opening balance.
    pub opening_balance: Option<Decimal>,
}

/// Request body for setting the subscription end date.
#[derive(Debug, Deserialize)]
pub struct EndDateRequest {
    /// Subscription expiry date.
    pub end_date: NaiveDate,
}

/// POST `/api/societies` - Create a society (super_admin only).
async fn create_society(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(payload): Json<CreateSocietyRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_super_admin(&auth) {
        return response;
    }
    if let Err(e) = payload.validate() {
        return failure(StatusCode::BAD_REQUEST, e.to_string(), "VALIDATION_ERROR");
    }

    let repo = SocietyRepository::new(state.db.clone());
    let input = CreateSocietyInput {
        name: payload.name,
        address: payload.address,
        city: payload.city,
        state: payload.state,
        country: payload.country,
        society_type: payload.society_type,
        opening_balance: payload.opening_balance,
        created_by: auth.user_id(),
    };

    match repo.create(input).await {
        Ok(society) => {
            info!(society_id = %society.id, name = %society.name, "Society created");
            success(StatusCode::CREATED, "Society created", json!(society))
        }
        Err(e) => {
            error!(error = %e, "Failed to create society");
            map_society_error(&e)
        }
    }
}

/// GET `/api/societies` - List non-deleted societies.
async fn list_societies(State(state): State<AppState>, _auth: AuthContext) -> impl IntoResponse {
    let repo = SocietyRepository::new(state.db.clone());
    match repo.list().await {
        Ok(societies) => success(StatusCode::OK, "ok", json!(societies)),
        Err(e) => {
            error!(error = %e, "Failed to list societies");
            map_society_error(&e)
        }
    }
}

/// GET `/api/societies/{society_id}` - Get a society.
async fn get_society(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(society_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = SocietyRepository::new(state.db.clone());
    match repo.get(society_id).await {
        Ok(society) => success(StatusCode::OK, "ok", json!(society)),
        Err(e) => map_society_error(&e),
    }
}

/// PUT `/api/societies/{society_id}` - Update a society's profile.
async fn update_society(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<UpdateSocietyRequest>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_management(&auth) {
        return response;
    }

    let repo = SocietyRepository::new(state.db.clone());
    let input = UpdateSocietyInput {
        name: payload.name,
        address: payload.address,
        city: payload.city,
        state: payload.state,
        country: payload.country,
        opening_balance: payload.opening_balance,
    };

    match repo.update(society_id, input, auth.user_id()).await {
        Ok(society) => success(StatusCode::OK, "Society updated", json!(society)),
        Err(e) => {
            error!(error = %e, "Failed to update society");
            map_society_error(&e)
        }
    }
}

/// PATCH `/api/societies/{society_id}/end-date` - Set subscription expiry
/// (super_admin only).
async fn set_end_date(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<EndDateRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_super_admin(&auth) {
        return response;
    }

    let repo = SocietyRepository::new(state.db.clone());
    match repo
        .set_end_date(society_id, payload.end_date, auth.user_id())
        .await
    {
        Ok(society) => {
            info!(society_id = %society_id, end_date = %payload.end_date, "End date set");
            success(StatusCode::OK, "End date set", json!(society))
        }
        Err(e) => map_society_error(&e),
    }
}

/// DELETE `/api/societies/{society_id}` - Hard-delete an empty society.
async fn delete_society(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(society_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_super_admin(&auth) {
        return response;
    }

    let repo = SocietyRepository::new(state.db.clone());
    match repo.delete(society_id).await {
        Ok(()) => {
            info!(society_id = %society_id, "Society deleted");
            success(StatusCode::OK, "Society deleted", json!({ "id": society_id }))
        }
        Err(e) => {
            error!(error = %e, "Failed to delete society");
            map_society_error(&e)
        }
    }
}

/// Maps society errors to HTTP responses.
fn map_society_error(e: &SocietyError) -> Response {
    match e {
        SocietyError::NotFound(id) => failure(
            StatusCode::NOT_FOUND,
            format!("Society not found: {id}"),
            "NOT_FOUND",
        ),
        SocietyError::DuplicateName => failure(
            StatusCode::CONFLICT,
            "Society name already exists",
            "CONFLICT",
        ),
        SocietyError::HasBuildings => failure(
            StatusCode::CONFLICT,
            "Society still has buildings and cannot be deleted",
            "CONFLICT",
        ),
        SocietyError::InvalidSocietyType(t) => failure(
            StatusCode::BAD_REQUEST,
            format!("Invalid society type: {t}"),
            "VALIDATION_ERROR",
        ),
        SocietyError::Database(db) => database_failure(db.to_string()),
    }
}
