//! Building registry routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthContext};
use crate::routes::{database_failure, failure, require_management, success};
use strata_db::repositories::building::{
    BuildingError, BuildingRepository, CreateBuildingInput, UpdateBuildingInput,
};

/// Creates the building routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/societies/{society_id}/buildings", post(create_building))
        .route("/api/societies/{society_id}/buildings", get(list_buildings))
        .route("/api/buildings/{building_id}", put(update_building))
        .route("/api/buildings/{building_id}", delete(delete_building))
}

/// Request body for creating a building.
#[derive(Debug, Deserialize)]
pub struct CreateBuildingRequest {
    /// Building name.
    pub name: String,
    /// Number of floors, at least 1.
    pub total_floors: i32,
}

/// Request body for updating a building.
#[derive(Debug, Deserialize)]
pub struct UpdateBuildingRequest {
    /// New name.
    pub name: Option<String>,
    /// New floor count.
    pub total_floors: Option<i32>,
}

/// POST `/api/societies/{society_id}/buildings` - Create a building.
async fn create_building(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<CreateBuildingRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let repo = BuildingRepository::new(state.db.clone());
    let input = CreateBuildingInput {
        society_id,
        name: payload.name,
        total_floors: payload.total_floors,
        created_by: auth.user_id(),
    };

    match repo.create(input).await {
        Ok(building) => {
            info!(society_id = %society_id, building_id = %building.id, "Building created");
            success(StatusCode::CREATED, "Building created", json!(building))
        }
        Err(e) => {
            error!(error = %e, "Failed to create building");
            map_building_error(&e)
        }
    }
}

/// GET `/api/societies/{society_id}/buildings` - List a society's buildings.
async fn list_buildings(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(society_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = BuildingRepository::new(state.db.clone());
    match repo.list_by_society(society_id).await {
        Ok(buildings) => success(StatusCode::OK, "ok", json!(buildings)),
        Err(e) => {
            error!(error = %e, "Failed to list buildings");
            map_building_error(&e)
        }
    }
}

/// PUT `/api/buildings/{building_id}` - Update a building.
async fn update_building(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(building_id): Path<Uuid>,
    Json(payload): Json<UpdateBuildingRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let repo = BuildingRepository::new(state.db.clone());
    let input = UpdateBuildingInput {
        name: payload.name,
        total_floors: payload.total_floors,
    };

    match repo.update(building_id, input, auth.user_id()).await {
        Ok(building) => success(StatusCode::OK, "Building updated", json!(building)),
        Err(e) => {
            error!(error = %e, "Failed to update building");
            map_building_error(&e)
        }
    }
}

/// DELETE `/api/buildings/{building_id}` - Soft-delete a building.
async fn delete_building(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(building_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let repo = BuildingRepository::new(state.db.clone());
    match repo.delete(building_id, auth.user_id()).await {
        Ok(()) => success(StatusCode::OK, "Building deleted", json!({ "id": building_id })),
        Err(e) => {
            error!(error = %e, "Failed to delete building");
            map_building_error(&e)
        }
    }
}

/// Maps building errors to HTTP responses.
fn map_building_error(e: &BuildingError) -> Response {
    match e {
        BuildingError::NotFound(id) => failure(
            StatusCode::NOT_FOUND,
            format!("Building not found: {id}"),
            "NOT_FOUND",
        ),
        BuildingError::SocietyNotFound(id) => failure(
            StatusCode::NOT_FOUND,
            format!("Society not found: {id}"),
            "NOT_FOUND",
        ),
        BuildingError::InvalidFloors => failure(
            StatusCode::BAD_REQUEST,
            "Total floors must be at least 1",
            "VALIDATION_ERROR",
        ),
        BuildingError::Database(db) => database_failure(db.to_string()),
    }
}
