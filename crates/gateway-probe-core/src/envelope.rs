// crates/gateway-probe-core/src/envelope.rs
// ============================================================================
// Module: API Envelope
// Description: Common `{ success, data, error, message }` response wrapper.
// Purpose: Parse gateway JSON responses at the boundary.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every gateway JSON endpoint wraps its payload in the same envelope. The
//! `success` flag is required; a body that lacks it is not an envelope.

use serde::Deserialize;
use serde::Serialize;

/// Gateway response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiEnvelope<T> {
    /// Whether the gateway accepted the request.
    pub success: bool,
    /// Payload when present.
    pub data: Option<T>,
    /// Error reason when present.
    pub error: Option<String>,
    /// Informational message when present.
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Returns the most specific failure reason the gateway supplied.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use serde_json::Value;

    use super::ApiEnvelope;

    #[test]
    fn success_flag_is_required() {
        let parsed = serde_json::from_str::<ApiEnvelope<Value>>(r#"{"data": []}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn reason_prefers_error_over_message() {
        let envelope: ApiEnvelope<Value> =
            serde_json::from_str(r#"{"success": false, "error": "rate limited", "message": "x"}"#)
                .unwrap();
        assert_eq!(envelope.reason(), Some("rate limited"));
        let envelope: ApiEnvelope<Value> =
            serde_json::from_str(r#"{"success": false, "message": "try later"}"#).unwrap();
        assert_eq!(envelope.reason(), Some("try later"));
    }
}
