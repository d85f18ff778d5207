//! Auth-context middleware for protected routes.
//!
//! Authentication itself is an external collaborator: an upstream gateway
//! authenticates the caller and forwards identity as plain headers. This
//! middleware reads `userId`, `role`, and the optional `societyId`, and makes
//! them available to handlers as an [`AuthContext`]. Requests without a valid
//! identity are rejected before any handler runs.

use axum::{
    Json,
    extract::{FromRequestParts, Request},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use strata_shared::{ApiEnvelope, Role};
use uuid::Uuid;

/// Identity of the authenticated caller, parsed from gateway headers.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    /// Authenticated user id.
    pub user_id: Uuid,
    /// Caller role.
    pub role: Role,
    /// Society scope forwarded by the gateway, when present.
    pub society_id: Option<Uuid>,
}

impl AuthContext {
    /// Returns the authenticated user id.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Returns the caller role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiEnvelope::fail(401, message, json!("UNAUTHORIZED"))),
    )
        .into_response()
}

/// Middleware that builds the [`AuthContext`] from identity headers.
///
/// Rejects with 401 when `userId` or `role` is missing or malformed. A
/// malformed `societyId` is also a 401; an absent one is fine, since
/// super_admin calls are not society-scoped.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let headers = request.headers();

    let Some(user_id) = headers
        .get("userId")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
    else {
        return unauthorized("Missing or invalid userId header");
    };

    let Some(role) = headers
        .get("role")
        .and_then(|h| h.to_str().ok())
        .and_then(Role::parse)
    else {
        return unauthorized("Missing or invalid role header");
    };

    let society_id = match headers.get("societyId") {
        None => None,
        Some(value) => match value.to_str().ok().and_then(|s| Uuid::parse_str(s).ok()) {
            Some(id) => Some(id),
            None => return unauthorized("Invalid societyId header"),
        },
    };

    request.extensions_mut().insert(AuthContext {
        user_id,
        role,
        society_id,
    });
    next.run(request).await
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .copied()
            .ok_or_else(|| unauthorized("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, middleware, routing::get};
    use tower::ServiceExt;

    async fn whoami(auth: AuthContext) -> String {
        auth.role().as_str().to_string()
    }

    fn app() -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn(auth_middleware))
    }

    #[tokio::test]
    async fn test_missing_identity_is_rejected() {
        let request = Request::builder()
            .uri("/whoami")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["status"], 401);
        assert_eq!(value["error"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_unknown_role_is_rejected() {
        let request = Request::builder()
            .uri("/whoami")
            .header("userId", Uuid::new_v4().to_string())
            .header("role", "owner")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_society_id_is_rejected() {
        let request = Request::builder()
            .uri("/whoami")
            .header("userId", Uuid::new_v4().to_string())
            .header("role", "admin")
            .header("societyId", "not-a-uuid")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_headers_reach_the_handler() {
        let request = Request::builder()
            .uri("/whoami")
            .header("userId", Uuid::new_v4().to_string())
            .header("role", "admin")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"admin");
    }

    #[tokio::test]
    async fn test_society_id_is_optional() {
        let request = Request::builder()
            .uri("/whoami")
            .header("userId", Uuid::new_v4().to_string())
            .header("role", "super_admin")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
