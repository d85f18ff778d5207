//! Poll routes.
//!
//! Results are computed at read time; votes are final (one per user per
//! poll, no changes, rejected after expiry).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthContext};
use crate::routes::{database_failure, failure, require_management, success};
use strata_db::repositories::poll::{CreatePollInput, PollError, PollRepository, PollWithResults};

/// Creates the poll routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/societies/{society_id}/polls", post(create_poll))
        .route("/api/societies/{society_id}/polls", get(list_polls))
        .route("/api/polls/{poll_id}", get(get_poll))
        .route("/api/polls/{poll_id}", delete(delete_poll))
        .route("/api/polls/{poll_id}/vote", post(cast_vote))
}

/// Request body for creating a poll.
#[derive(Debug, Deserialize)]
pub struct CreatePollRequest {
    /// Question shown to voters.
    pub question: String,
    /// Option labels, at least two.
    pub options: Vec<String>,
    /// Instant after which votes are rejected.
    pub expires_at: DateTime<FixedOffset>,
}

/// Request body for casting a vote.
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    /// Chosen option.
    pub option_id: Uuid,
}

fn poll_json(poll: &PollWithResults) -> serde_json::Value {
    let options: Vec<serde_json::Value> = poll
        .options
        .iter()
        .map(|option| {
            let result = poll
                .results
                .options
                .iter()
                .find(|r| r.option_id == option.id);
            json!({
                "id": option.id,
                "label": option.label,
                "votes": result.map_or(0, |r| r.votes),
                "percentage": result.map(|r| r.percentage),
            })
        })
        .collect();

    json!({
        "id": poll.poll.id,
        "society_id": poll.poll.society_id,
        "question": poll.poll.question,
        "expires_at": poll.poll.expires_at,
        "status": poll.status,
        "total_votes": poll.results.total_votes,
        "options": options,
    })
}

/// POST `/api/societies/{society_id}/polls` - Create a poll with options.
async fn create_poll(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<CreatePollRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let repo = PollRepository::new(state.db.clone());
    let input = CreatePollInput {
        society_id,
        question: payload.question,
        options: payload.options,
        expires_at: payload.expires_at,
        created_by: auth.user_id(),
    };

    match repo.create(input).await {
        Ok(poll) => {
            info!(poll_id = %poll.poll.id, society_id = %society_id, "Poll created");
            success(StatusCode::CREATED, "Poll created", poll_json(&poll))
        }
        Err(e) => {
            error!(error = %e, "Failed to create poll");
            map_poll_error(&e)
        }
    }
}

/// GET `/api/societies/{society_id}/polls` - List polls with results.
async fn list_polls(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(society_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PollRepository::new(state.db.clone());
    match repo.list_by_society(society_id).await {
        Ok(polls) => {
            let rows: Vec<serde_json::Value> = polls.iter().map(poll_json).collect();
            success(StatusCode::OK, "ok", json!(rows))
        }
        Err(e) => {
            error!(error = %e, "Failed to list polls");
            map_poll_error(&e)
        }
    }
}

/// GET `/api/polls/{poll_id}` - Get a poll with computed results.
async fn get_poll(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(poll_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PollRepository::new(state.db.clone());
    match repo.get_with_results(poll_id).await {
        Ok(poll) => success(StatusCode::OK, "ok", poll_json(&poll)),
        Err(e) => map_poll_error(&e),
    }
}

/// POST `/api/polls/{poll_id}/vote` - Cast a vote.
async fn cast_vote(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(poll_id): Path<Uuid>,
    Json(payload): Json<VoteRequest>,
) -> impl IntoResponse {
    let repo = PollRepository::new(state.db.clone());
    match repo.vote(poll_id, payload.option_id, auth.user_id()).await {
        Ok(vote) => {
            info!(poll_id = %poll_id, user_id = %auth.user_id(), "Vote cast");
            success(StatusCode::CREATED, "Vote cast", json!(vote))
        }
        Err(e) => {
            error!(error = %e, "Failed to cast vote");
            map_poll_error(&e)
        }
    }
}

/// DELETE `/api/polls/{poll_id}` - Soft-delete a poll, cascading to its
/// options and votes.
async fn delete_poll(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(poll_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let repo = PollRepository::new(state.db.clone());
    match repo.delete(poll_id, auth.user_id()).await {
        Ok(()) => success(StatusCode::OK, "Poll deleted", json!({ "id": poll_id })),
        Err(e) => {
            error!(error = %e, "Failed to delete poll");
            map_poll_error(&e)
        }
    }
}

/// Maps poll errors to HTTP responses.
fn map_poll_error(e: &PollError) -> Response {
    match e {
        PollError::NotFound(id) => failure(
            StatusCode::NOT_FOUND,
            format!("Poll not found: {id}"),
            "NOT_FOUND",
        ),
        PollError::OptionNotFound(id) => failure(
            StatusCode::NOT_FOUND,
            format!("Poll option not found: {id}"),
            "NOT_FOUND",
        ),
        PollError::SocietyNotFound(id) => failure(
            StatusCode::NOT_FOUND,
            format!("Society not found: {id}"),
            "NOT_FOUND",
        ),
        PollError::TooFewOptions => failure(
            StatusCode::BAD_REQUEST,
            "A poll needs at least two options",
            "VALIDATION_ERROR",
        ),
        PollError::Expired => failure(StatusCode::BAD_REQUEST, "Poll has expired", "POLL_EXPIRED"),
        PollError::AlreadyVoted => failure(
            StatusCode::CONFLICT,
            "User has already voted on this poll",
            "ALREADY_VOTED",
        ),
        PollError::Database(db) => database_failure(db.to_string()),
    }
}
