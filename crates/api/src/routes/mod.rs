//! API route definitions.
//!
//! Every endpoint responds with the shared envelope: `data` on success,
//! `error` code on failure, `status` repeated in the body. The 500 path
//! carries the raw database error message through to the client.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use strata_shared::{ApiEnvelope, Role};

use crate::{AppState, middleware::auth::auth_middleware};
use crate::middleware::AuthContext;

pub mod buildings;
pub mod dues;
pub mod fines;
pub mod health;
pub mod maintenance;
pub mod members;
pub mod notices;
pub mod payments;
pub mod polls;
pub mod societies;
pub mod units;

/// Creates the API router: health is public, everything else requires the
/// gateway identity headers.
pub fn api_routes() -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(societies::routes())
        .merge(buildings::routes())
        .merge(units::routes())
        .merge(members::routes())
        .merge(maintenance::routes())
        .merge(dues::routes())
        .merge(payments::routes())
        .merge(fines::routes())
        .merge(notices::routes())
        .merge(polls::routes())
        .layer(middleware::from_fn(auth_middleware));

    Router::new().merge(health::routes()).merge(protected_routes)
}

/// Builds a success envelope response.
pub(crate) fn success(status: StatusCode, message: &str, data: Value) -> Response {
    (status, Json(ApiEnvelope::ok(status.as_u16(), message, data))).into_response()
}

/// Builds a failure envelope response.
pub(crate) fn failure(status: StatusCode, message: impl Into<String>, code: &str) -> Response {
    (
        status,
        Json(ApiEnvelope::fail(status.as_u16(), message, json!(code))),
    )
        .into_response()
}

/// Builds the 500 response, surfacing the raw error message.
pub(crate) fn database_failure(message: impl Into<String>) -> Response {
    failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        message,
        "DATABASE_ERROR",
    )
}

/// Rejects callers below management rank (member role).
pub(crate) fn require_management(auth: &AuthContext) -> Result<(), Response> {
    if auth.role().is_management() {
        Ok(())
    } else {
        Err(failure(
            StatusCode::FORBIDDEN,
            "Management role required",
            "FORBIDDEN",
        ))
    }
}

/// Rejects everyone except the platform operator.
pub(crate) fn require_super_admin(auth: &AuthContext) -> Result<(), Response> {
    if auth.role() == Role::SuperAdmin {
        Ok(())
    } else {
        Err(failure(
            StatusCode::FORBIDDEN,
            "Super admin role required",
            "FORBIDDEN",
        ))
    }
}
