//! Fine (penalty) ledger routes.
//!
//! The society's type picks which penalty table family the ledger lives in;
//! handlers resolve it once and hand a `UnitKind` to the repository.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{AppState, middleware::AuthContext};
use crate::routes::{database_failure, failure, require_management, success};
use strata_core::payment::signature;
use strata_db::repositories::penalty::{
    AddPenaltyInput, Penalty, PenaltyError, PenaltyRepository,
};
use strata_db::repositories::society::{SocietyError, SocietyRepository};
use strata_db::repositories::unit::UnitRef;
use strata_shared::{SocietyType, UnitKind};

/// Creates the fine routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/fines/{society_id}", get(list_fines))
        .route("/api/fines/{society_id}", post(add_fine))
        .route("/api/fines/{society_id}/{fine_id}", patch(mark_fine_paid))
        .route("/api/fines/{society_id}/{fine_id}", delete(delete_fine))
        .route("/api/fines/verify-payment", post(verify_fine_payment))
}

/// Request body for levying a fine.
#[derive(Debug, Deserialize)]
pub struct AddFineRequest {
    /// The fined flat or housing unit, per the society's unit family.
    pub unit_id: Uuid,
    /// Fine amount.
    pub amount: Decimal,
    /// Reason shown to the member.
    pub reason: String,
}

/// Request body for marking a fine paid by hand.
#[derive(Debug, Default, Deserialize)]
pub struct MarkFineRequest {
    /// Gateway order id, when paid through the gateway.
    pub razorpay_order_id: Option<String>,
    /// Gateway payment id, when paid through the gateway.
    pub razorpay_payment_id: Option<String>,
}

/// Gateway callback body for a fine payment.
#[derive(Debug, Deserialize)]
pub struct VerifyFinePaymentRequest {
    /// Society the fine belongs to.
    pub society_id: Uuid,
    /// Fine id.
    pub fine_id: Uuid,
    /// Gateway order id.
    pub razorpay_order_id: String,
    /// Gateway payment id.
    pub razorpay_payment_id: String,
    /// Hex HMAC signature over `order_id|payment_id`.
    pub razorpay_signature: String,
}

fn penalty_json(penalty: &Penalty, unit_number: Option<&str>) -> serde_json::Value {
    json!({
        "id": penalty.id,
        "society_id": penalty.society_id,
        "unit_kind": penalty.unit.kind,
        "unit_id": penalty.unit.id,
        "unit_number": unit_number,
        "amount": penalty.amount,
        "reason": penalty.reason,
        "is_paid": penalty.is_paid,
        "paid_at": penalty.paid_at,
        "razorpay_order_id": penalty.razorpay_order_id,
        "razorpay_payment_id": penalty.razorpay_payment_id,
        "created_at": penalty.created_at,
    })
}

/// Resolves a society's penalty table family from its type.
async fn resolve_unit_kind(state: &AppState, society_id: Uuid) -> Result<UnitKind, Response> {
    let repo = SocietyRepository::new(state.db.clone());
    match repo.get(society_id).await {
        Ok(society) => match SocietyType::parse(&society.society_type) {
            Some(society_type) => Ok(society_type.unit_kind()),
            None => Err(failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Unknown society type: {}", society.society_type),
                "INTERNAL_ERROR",
            )),
        },
        Err(SocietyError::NotFound(id)) => Err(failure(
            StatusCode::NOT_FOUND,
            format!("Society not found: {id}"),
            "NOT_FOUND",
        )),
        Err(e) => Err(database_failure(e.to_string())),
    }
}

/// GET `/api/fines/{society_id}` - List a society's fines with unit numbers.
async fn list_fines(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(society_id): Path<Uuid>,
) -> impl IntoResponse {
    let kind = match resolve_unit_kind(&state, society_id).await {
        Ok(kind) => kind,
        Err(response) => return response,
    };

    let repo = PenaltyRepository::new(state.db.clone());
    match repo.list_by_society(society_id, kind).await {
        Ok(rows) => {
            let rows: Vec<serde_json::Value> = rows
                .iter()
                .map(|r| penalty_json(&r.penalty, r.unit_number.as_deref()))
                .collect();
            success(StatusCode::OK, "ok", json!(rows))
        }
        Err(e) => {
            error!(error = %e, "Failed to list fines");
            map_penalty_error(&e)
        }
    }
}

/// POST `/api/fines/{society_id}` - Levy a fine against a unit.
async fn add_fine(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<AddFineRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }
    if payload.amount < Decimal::ZERO {
        return failure(StatusCode::BAD_REQUEST, "Amount cannot be negative", "VALIDATION_ERROR");
    }

    let kind = match resolve_unit_kind(&state, society_id).await {
        Ok(kind) => kind,
        Err(response) => return response,
    };

    let repo = PenaltyRepository::new(state.db.clone());
    let input = AddPenaltyInput {
        society_id,
        unit: UnitRef {
            kind,
            id: payload.unit_id,
        },
        amount: payload.amount,
        reason: payload.reason,
        created_by: auth.user_id(),
    };

    match repo.add(input).await {
        Ok(penalty) => {
            info!(fine_id = %penalty.id, society_id = %society_id, "Fine levied");
            success(StatusCode::CREATED, "Fine created", penalty_json(&penalty, None))
        }
        Err(e) => {
            error!(error = %e, "Failed to create fine");
            map_penalty_error(&e)
        }
    }
}

/// PATCH `/api/fines/{society_id}/{fine_id}` - Mark a fine paid. Idempotent
/// overwrite of an already-paid fine.
async fn mark_fine_paid(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((society_id, fine_id)): Path<(Uuid, Uuid)>,
    payload: Option<Json<MarkFineRequest>>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let kind = match resolve_unit_kind(&state, society_id).await {
        Ok(kind) => kind,
        Err(response) => return response,
    };

    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let repo = PenaltyRepository::new(state.db.clone());
    match repo
        .mark_paid(
            fine_id,
            kind,
            payload.razorpay_order_id,
            payload.razorpay_payment_id,
            auth.user_id(),
        )
        .await
    {
        Ok(penalty) => {
            info!(fine_id = %fine_id, "Fine marked paid");
            success(StatusCode::OK, "Fine marked paid", penalty_json(&penalty, None))
        }
        Err(e) => {
            error!(error = %e, "Failed to mark fine paid");
            map_penalty_error(&e)
        }
    }
}

/// DELETE `/api/fines/{society_id}/{fine_id}` - Soft-delete a fine.
async fn delete_fine(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((society_id, fine_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = require_management(&auth) {
        return response;
    }

    let kind = match resolve_unit_kind(&state, society_id).await {
        Ok(kind) => kind,
        Err(response) => return response,
    };

    let repo = PenaltyRepository::new(state.db.clone());
    match repo.delete(fine_id, kind, auth.user_id()).await {
        Ok(()) => success(StatusCode::OK, "Fine deleted", json!({ "id": fine_id })),
        Err(e) => {
            error!(error = %e, "Failed to delete fine");
            map_penalty_error(&e)
        }
    }
}

/// POST `/api/fines/verify-payment` - Verify a gateway callback for a fine
/// and mark it paid with the gateway ids.
///
/// The signature is the authentication here; members pay their own fines, so
/// no role gate applies.
async fn verify_fine_payment(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(payload): Json<VerifyFinePaymentRequest>,
) -> impl IntoResponse {
    if !signature::verify(
        &state.webhook_secret,
        &payload.razorpay_order_id,
        &payload.razorpay_payment_id,
        &payload.razorpay_signature,
    ) {
        warn!(order_id = %payload.razorpay_order_id, "Fine payment signature mismatch");
        return failure(
            StatusCode::BAD_REQUEST,
            "Payment signature verification failed",
            "INVALID_SIGNATURE",
        );
    }

    let kind = match resolve_unit_kind(&state, payload.society_id).await {
        Ok(kind) => kind,
        Err(response) => return response,
    };

    let repo = PenaltyRepository::new(state.db.clone());
    match repo
        .mark_paid(
            payload.fine_id,
            kind,
            Some(payload.razorpay_order_id),
            Some(payload.razorpay_payment_id),
            auth.user_id(),
        )
        .await
    {
        Ok(penalty) => {
            info!(fine_id = %penalty.id, "Fine payment verified");
            success(
                StatusCode::OK,
                "Fine payment verified",
                penalty_json(&penalty, None),
            )
        }
        Err(e) => {
            error!(error = %e, "Failed to mark fine paid after verification");
            map_penalty_error(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use axum::middleware;
    use sea_orm::DatabaseConnection;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::AppState;
    use crate::middleware::auth_middleware;

    #[tokio::test]
    async fn test_member_fine_callback_reaches_signature_check() {
        let state = AppState {
            db: Arc::new(DatabaseConnection::default()),
            webhook_secret: Arc::from("s"),
        };
        let app = super::routes()
            .layer(middleware::from_fn(auth_middleware))
            .with_state(state);

        let body = json!({
            "society_id": Uuid::new_v4(),
            "fine_id": Uuid::new_v4(),
            "razorpay_order_id": "order_1",
            "razorpay_payment_id": "pay_1",
            "razorpay_signature": "deadbeef",
        });
        let request = Request::builder()
            .method("POST")
            .uri("/api/fines/verify-payment")
            .header("content-type", "application/json")
            .header("userId", Uuid::new_v4().to_string())
            .header("role", "member")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let envelope: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(envelope["error"], "INVALID_SIGNATURE");
    }
}

/// Maps penalty errors to HTTP responses.
fn map_penalty_error(e: &PenaltyError) -> Response {
    match e {
        PenaltyError::NotFound(id) => failure(
            StatusCode::NOT_FOUND,
            format!("Fine not found: {id}"),
            "NOT_FOUND",
        ),
        PenaltyError::UnitNotFound(id) => failure(
            StatusCode::NOT_FOUND,
            format!("Unit not found: {id}"),
            "NOT_FOUND",
        ),
        PenaltyError::Database(db) => database_failure(db.to_string()),
    }
}
