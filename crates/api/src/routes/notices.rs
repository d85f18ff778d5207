//! Notice routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthContext};
use crate::routes::{database_failure, failure, require_management, success};
use strata_db::repositories::notice::{
    CreateNoticeInput, NoticeError, NoticeRepository, UpdateNoticeInput,
};

/// Creates the notice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/societies/{society_id}/notices", post(create_notice))
        .route("/api/societies/{society_id}/notices", get(list_notices))
        .route("/api/notices/{notice_id}", put(update_notice))
        .route("/api/notices/{notice_id}", delete(delete_notice))
}

/// Request body for publishing a notice.
#[derive(Debug, Deserialize)]
pub struct CreateNoticeRequest {
    /// Headline.
    pub title: String,
    /// Notice body.
    pub body: String,
    /// First day the notice is visible.
    pub starts_on: NaiveDate,
    /// Last day the notice is visible, if it expires.
    pub ends_on: Option<NaiveDate>,
}

/// Request body for editing a notice.
#[derive(Debug, Deserialize)]
pub struct UpdateNoticeRequest {
    /// New headline.
    pub title: Option<String>,
    /// New body.
    pub body: Option<String>,
    /// New visibility start.
    pub starts_on: Option<NaiveDate>,
    /// New visibility end.
    pub ends_on: Option<NaiveDate>,
}

/// POST `/api/societies/{society_id}/notices` - Publish a notice.
async fn create_notice(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<CreateNoticeRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let repo = NoticeRepository::new(state.db.clone());
    let input = CreateNoticeInput {
        society_id,
        title: payload.title,
        body: payload.body,
        starts_on: payload.starts_on,
        ends_on: payload.ends_on,
        created_by: auth.user_id(),
    };

    match repo.create(input).await {
        Ok(notice) => {
            info!(notice_id = %notice.id, society_id = %society_id, "Notice published");
            success(StatusCode::CREATED, "Notice created", json!(notice))
        }
        Err(e) => {
            error!(error = %e, "Failed to create notice");
            map_notice_error(&e)
        }
    }
}

/// GET `/api/societies/{society_id}/notices` - List a society's notices.
async fn list_notices(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(society_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = NoticeRepository::new(state.db.clone());
    match repo.list_by_society(society_id).await {
        Ok(notices) => success(StatusCode::OK, "ok", json!(notices)),
        Err(e) => {
            error!(error = %e, "Failed to list notices");
            map_notice_error(&e)
        }
    }
}

/// PUT `/api/notices/{notice_id}` - Edit a notice.
async fn update_notice(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(notice_id): Path<Uuid>,
    Json(payload): Json<UpdateNoticeRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let repo = NoticeRepository::new(state.db.clone());
    let input = UpdateNoticeInput {
        title: payload.title,
        body: payload.body,
        starts_on: payload.starts_on,
        ends_on: payload.ends_on.map(Some),
    };

    match repo.update(notice_id, input, auth.user_id()).await {
        Ok(notice) => success(StatusCode::OK, "Notice updated", json!(notice)),
        Err(e) => {
            error!(error = %e, "Failed to update notice");
            map_notice_error(&e)
        }
    }
}

/// DELETE `/api/notices/{notice_id}` - Soft-delete a notice.
async fn delete_notice(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(notice_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let repo = NoticeRepository::new(state.db.clone());
    match repo.delete(notice_id, auth.user_id()).await {
        Ok(()) => success(StatusCode::OK, "Notice deleted", json!({ "id": notice_id })),
        Err(e) => {
            error!(error = %e, "Failed to delete notice");
            map_notice_error(&e)
        }
    }
}

/// Maps notice errors to HTTP responses.
fn map_notice_error(e: &NoticeError) -> Response {
    match e {
        NoticeError::NotFound(id) => failure(
            StatusCode::NOT_FOUND,
            format!("Notice not found: {id}"),
            "NOT_FOUND",
        ),
        NoticeError::SocietyNotFound(id) => failure(
            StatusCode::NOT_FOUND,
            format!("Society not found: {id}"),
            "NOT_FOUND",
        ),
        NoticeError::Database(db) => database_failure(db.to_string()),
    }
}
