//! Gateway payment callback route.
//!
//! Inbound callbacks carry `hex(HMAC_SHA256(secret, order_id|payment_id))`.
//! A signature mismatch rejects the callback with 400 before any state
//! changes. Outbound order creation is not part of this service.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{AppState, middleware::AuthContext};
use crate::routes::{database_failure, failure, success};
use strata_core::payment::signature;
use strata_db::repositories::dues::DuesRepository;

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/payments/verify", post(verify_payment))
}

/// Gateway callback body. Either one id or an array of ids; the array update
/// runs as one statement.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    /// Gateway order id.
    pub razorpay_order_id: String,
    /// Gateway payment id.
    pub razorpay_payment_id: String,
    /// Hex HMAC signature over `order_id|payment_id`.
    pub razorpay_signature: String,
    /// Single due record id.
    pub maintenance_id: Option<Uuid>,
    /// Batch of due record ids.
    pub maintenance_ids: Option<Vec<Uuid>>,
}

/// POST `/api/payments/verify` - Verify a gateway callback and mark the
/// referenced dues paid atomically.
///
/// The signature is the authentication here; members pay their own dues, so
/// no role gate applies.
async fn verify_payment(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(payload): Json<VerifyPaymentRequest>,
) -> impl IntoResponse {
    if !signature::verify(
        &state.webhook_secret,
        &payload.razorpay_order_id,
        &payload.razorpay_payment_id,
        &payload.razorpay_signature,
    ) {
        warn!(order_id = %payload.razorpay_order_id, "Payment signature mismatch");
        return failure(
            StatusCode::BAD_REQUEST,
            "Payment signature verification failed",
            "INVALID_SIGNATURE",
        );
    }

    let mut ids = payload.maintenance_ids.unwrap_or_default();
    if let Some(id) = payload.maintenance_id {
        ids.push(id);
    }
    if ids.is_empty() {
        return failure(
            StatusCode::BAD_REQUEST,
            "maintenance_id or maintenance_ids is required",
            "VALIDATION_ERROR",
        );
    }

    let repo = DuesRepository::new(state.db.clone());
    match repo
        .bulk_mark_paid(&ids, Some(payload.razorpay_payment_id.clone()), auth.user_id())
        .await
    {
        Ok(updated) => {
            info!(
                order_id = %payload.razorpay_order_id,
                payment_id = %payload.razorpay_payment_id,
                updated,
                "Payment verified"
            );
            success(
                StatusCode::OK,
                "Payment verified",
                json!({ "success": true, "updated": updated }),
            )
        }
        Err(e) => {
            error!(error = %e, "Failed to mark dues paid after verification");
            database_failure(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use axum::middleware;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::AppState;
    use crate::middleware::auth_middleware;
    use strata_core::payment::signature::expected_signature;

    fn app_with(db: DatabaseConnection) -> axum::Router {
        let state = AppState {
            db: Arc::new(db),
            webhook_secret: Arc::from("s"),
        };
        super::routes()
            .layer(middleware::from_fn(auth_middleware))
            .with_state(state)
    }

    fn app() -> axum::Router {
        app_with(DatabaseConnection::default())
    }

    fn member_request(body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/payments/verify")
            .header("content-type", "application/json")
            .header("userId", Uuid::new_v4().to_string())
            .header("role", "member")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_member_callback_reaches_signature_check() {
        let body = json!({
            "razorpay_order_id": "order_1",
            "razorpay_payment_id": "pay_1",
            "razorpay_signature": "deadbeef",
        });

        let response = app().oneshot(member_request(&body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let envelope: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(envelope["error"], "INVALID_SIGNATURE");
    }

    #[tokio::test]
    async fn test_member_with_valid_signature_is_not_role_gated() {
        let body = json!({
            "razorpay_order_id": "order_1",
            "razorpay_payment_id": "pay_1",
            "razorpay_signature": expected_signature("s", "order_1", "pay_1"),
        });

        let response = app().oneshot(member_request(&body)).await.unwrap();
        // Past the signature check; the missing ids are the only complaint.
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let envelope: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(envelope["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_verified_callback_reports_success() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let body = json!({
            "razorpay_order_id": "order_1",
            "razorpay_payment_id": "pay_1",
            "razorpay_signature": expected_signature("s", "order_1", "pay_1"),
            "maintenance_id": Uuid::new_v4(),
        });

        let response = app_with(db).oneshot(member_request(&body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let envelope: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(envelope["data"]["success"], true);
        assert_eq!(envelope["data"]["updated"], 1);
    }
}
