//! Flat and housing-unit registry routes.
//!
//! Flats live inside buildings; housing units hang directly off a housing
//! society. Both are one `Unit` at the domain layer.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthContext};
use crate::routes::{database_failure, failure, require_management, success};
use strata_db::repositories::unit::{
    CreateFlatInput, CreateHousingUnitInput, UnitError, UnitRef, UnitRepository, UpdateFlatInput,
    UpdateHousingUnitInput,
};
use strata_shared::UnitKind;

/// Creates the unit routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/buildings/{building_id}/flats", post(create_flat))
        .route("/api/buildings/{building_id}/flats", get(list_flats))
        .route("/api/flats/{flat_id}", put(update_flat))
        .route("/api/flats/{flat_id}", delete(delete_flat))
        .route(
            "/api/societies/{society_id}/housing-units",
            post(create_housing_unit),
        )
        .route(
            "/api/societies/{society_id}/housing-units",
            get(list_housing_units),
        )
        .route("/api/housing-units/{unit_id}", put(update_housing_unit))
        .route("/api/housing-units/{unit_id}", delete(delete_housing_unit))
}

/// Request body for creating a flat.
#[derive(Debug, Deserialize)]
pub struct CreateFlatRequest {
    /// Display number, e.g. "A-304".
    pub flat_number: String,
    /// Floor the flat is on.
    pub floor_number: i32,
    /// Area in square feet.
    pub square_foot: Option<Decimal>,
}

/// Request body for updating a flat.
#[derive(Debug, Deserialize)]
pub struct UpdateFlatRequest {
    /// New display number.
    pub flat_number: Option<String>,
    /// New floor.
    pub floor_number: Option<i32>,
    /// New area in square feet.
    pub square_foot: Option<Decimal>,
}

/// Request body for creating a housing unit.
#[derive(Debug, Deserialize)]
pub struct CreateHousingUnitRequest {
    /// Display number.
    pub unit_number: String,
    /// Area in square feet.
    pub square_foot: Option<Decimal>,
}

/// Request body for updating a housing unit.
#[derive(Debug, Deserialize)]
pub struct UpdateHousingUnitRequest {
    /// New display number.
    pub unit_number: Option<String>,
    /// New area in square feet.
    pub square_foot: Option<Decimal>,
}

/// POST `/api/buildings/{building_id}/flats` - Create a flat.
async fn create_flat(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(building_id): Path<Uuid>,
    Json(payload): Json<CreateFlatRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let repo = UnitRepository::new(state.db.clone());
    let input = CreateFlatInput {
        building_id,
        flat_number: payload.flat_number,
        floor_number: payload.floor_number,
        square_foot: payload.square_foot,
        created_by: auth.user_id(),
    };

    match repo.create_flat(input).await {
        Ok(flat) => {
            info!(building_id = %building_id, flat_id = %flat.id, "Flat created");
            success(StatusCode::CREATED, "Flat created", json!(flat))
        }
        Err(e) => {
            error!(error = %e, "Failed to create flat");
            map_unit_error(&e)
        }
    }
}

/// GET `/api/buildings/{building_id}/flats` - List a building's flats.
async fn list_flats(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(building_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = UnitRepository::new(state.db.clone());
    match repo.list_flats(building_id).await {
        Ok(flats) => success(StatusCode::OK, "ok", json!(flats)),
        Err(e) => {
            error!(error = %e, "Failed to list flats");
            map_unit_error(&e)
        }
    }
}

/// PUT `/api/flats/{flat_id}` - Update a flat.
async fn update_flat(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(flat_id): Path<Uuid>,
    Json(payload): Json<UpdateFlatRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let repo = UnitRepository::new(state.db.clone());
    let input = UpdateFlatInput {
        flat_number: payload.flat_number,
        floor_number: payload.floor_number,
        square_foot: payload.square_foot,
    };

    match repo.update_flat(flat_id, input, auth.user_id()).await {
        Ok(flat) => {
            info!(flat_id = %flat_id, "Flat updated");
            success(StatusCode::OK, "Flat updated", json!(flat))
        }
        Err(e) => {
            error!(error = %e, "Failed to update flat");
            map_unit_error(&e)
        }
    }
}

/// DELETE `/api/flats/{flat_id}` - Soft-delete a flat.
async fn delete_flat(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(flat_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let repo = UnitRepository::new(state.db.clone());
    let unit = UnitRef {
        kind: UnitKind::Flat,
        id: flat_id,
    };
    match repo.delete(unit, auth.user_id()).await {
        Ok(()) => success(StatusCode::OK, "Flat deleted", json!({ "id": flat_id })),
        Err(e) => {
            error!(error = %e, "Failed to delete flat");
            map_unit_error(&e)
        }
    }
}

/// POST `/api/societies/{society_id}/housing-units` - Create a housing unit.
async fn create_housing_unit(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<CreateHousingUnitRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let repo = UnitRepository::new(state.db.clone());
    let input = CreateHousingUnitInput {
        society_id,
        unit_number: payload.unit_number,
        square_foot: payload.square_foot,
        created_by: auth.user_id(),
    };

    match repo.create_housing_unit(input).await {
        Ok(unit) => {
            info!(society_id = %society_id, unit_id = %unit.id, "Housing unit created");
            success(StatusCode::CREATED, "Housing unit created", json!(unit))
        }
        Err(e) => {
            error!(error = %e, "Failed to create housing unit");
            map_unit_error(&e)
        }
    }
}

/// GET `/api/societies/{society_id}/housing-units` - List housing units.
async fn list_housing_units(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(society_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = UnitRepository::new(state.db.clone());
    match repo.list_housing_units(society_id).await {
        Ok(units) => success(StatusCode::OK, "ok", json!(units)),
        Err(e) => {
            error!(error = %e, "Failed to list housing units");
            map_unit_error(&e)
        }
    }
}

/// PUT `/api/housing-units/{unit_id}` - Update a housing unit.
async fn update_housing_unit(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(unit_id): Path<Uuid>,
    Json(payload): Json<UpdateHousingUnitRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let repo = UnitRepository::new(state.db.clone());
    let input = UpdateHousingUnitInput {
        unit_number: payload.unit_number,
        square_foot: payload.square_foot,
    };

    match repo.update_housing_unit(unit_id, input, auth.user_id()).await {
        Ok(unit) => {
            info!(unit_id = %unit_id, "Housing unit updated");
            success(StatusCode::OK, "Housing unit updated", json!(unit))
        }
        Err(e) => {
            error!(error = %e, "Failed to update housing unit");
            map_unit_error(&e)
        }
    }
}

/// DELETE `/api/housing-units/{unit_id}` - Soft-delete a housing unit.
async fn delete_housing_unit(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(unit_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let repo = UnitRepository::new(state.db.clone());
    let unit = UnitRef {
        kind: UnitKind::HousingUnit,
        id: unit_id,
    };
    match repo.delete(unit, auth.user_id()).await {
        Ok(()) => success(StatusCode::OK, "Housing unit deleted", json!({ "id": unit_id })),
        Err(e) => {
            error!(error = %e, "Failed to delete housing unit");
            map_unit_error(&e)
        }
    }
}

/// Maps unit errors to HTTP responses.
fn map_unit_error(e: &UnitError) -> Response {
    match e {
        UnitError::NotFound(id) => failure(
            StatusCode::NOT_FOUND,
            format!("Unit not found: {id}"),
            "NOT_FOUND",
        ),
        UnitError::BuildingNotFound(id) => failure(
            StatusCode::NOT_FOUND,
            format!("Building not found: {id}"),
            "NOT_FOUND",
        ),
        UnitError::SocietyNotFound(id) => failure(
            StatusCode::NOT_FOUND,
            format!("Society not found: {id}"),
            "NOT_FOUND",
        ),
        UnitError::FloorOutOfRange { floor, total } => failure(
            StatusCode::BAD_REQUEST,
            format!("Floor {floor} exceeds building total of {total}"),
            "VALIDATION_ERROR",
        ),
        UnitError::Database(db) => database_failure(db.to_string()),
    }
}
