//! The JSON response envelope shared by every endpoint.
//!
//! Success and failure responses use the same shape, differentiated only by
//! `status` and a `data` vs `error` key:
//!
//! ```json
//! { "status": 200, "message": "ok", "data": { ... } }
//! { "status": 404, "message": "Flat maintenance not found", "error": "NOT_FOUND" }
//! ```

use serde::Serialize;
use serde_json::Value;

/// Uniform response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiEnvelope {
    /// HTTP status code, repeated in the body.
    pub status: u16,
    /// Human-readable message.
    pub message: String,
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Error code on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl ApiEnvelope {
    /// Builds a success envelope.
    #[must_use]
    pub fn ok(status: u16, message: impl Into<String>, data: Value) -> Self {
        Self {
            status,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    /// Builds a failure envelope.
    #[must_use]
    pub fn fail(status: u16, message: impl Into<String>, error: Value) -> Self {
        Self {
            status,
            message: message.into(),
            data: None,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_has_data_key_only() {
        let envelope = ApiEnvelope::ok(200, "ok", json!({"id": 1}));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["status"], 200);
        assert_eq!(value["data"]["id"], 1);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_failure_envelope_has_error_key_only() {
        let envelope = ApiEnvelope::fail(404, "Society not found", json!("NOT_FOUND"));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["status"], 404);
        assert_eq!(value["error"], "NOT_FOUND");
        assert!(value.get("data").is_none());
    }
}
