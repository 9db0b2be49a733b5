//! Send evaluation property-based tests.
//!
//! ## Purpose
//! Exercise the uniform send success rule with randomized statuses and
//! envelope bodies. A probe passes exactly when the status is 200 and the
//! envelope reports `success: true`; arbitrary bodies never panic.
// crates/gateway-probe-core/tests/proptest_send.rs
// ============================================================================
// Module: Send Evaluation Property-Based Tests
// Description: Randomized checks of the send success rule.
// Purpose: Ensure evaluation is total and matches the success rule.
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::use_debug,
    reason = "Test-only assertions and helpers are permitted."
)]

use gateway_probe_core::GatewayResponse;
use gateway_probe_core::ProbeFailure;
use gateway_probe_core::ProbeOutcome;
use gateway_probe_core::probe::evaluate_send;
use proptest::prelude::*;
use serde_json::json;

/// Builds a buffered response.
fn response(status: u16, body: Vec<u8>) -> GatewayResponse {
    GatewayResponse {
        status,
        location: None,
        body,
    }
}

proptest! {
    #[test]
    fn passes_iff_ok_and_success(
        status in prop_oneof![Just(200_u16), 100_u16 .. 600],
        success in any::<bool>(),
        error in proptest::option::of("[a-z ]{0,24}"),
    ) {
        let body = json!({ "success": success, "error": error, "data": null });
        let outcome = evaluate_send(&response(status, serde_json::to_vec(&body).unwrap()));
        prop_assert_eq!(outcome.is_passed(), status == 200 && success);
        if status == 200 && !success {
            prop_assert_eq!(outcome, ProbeOutcome::Failed(ProbeFailure::Rejected { error }));
        }
    }

    #[test]
    fn arbitrary_bodies_never_pass_without_success_flag(
        body in proptest::collection::vec(any::<u8>(), 0 .. 256),
    ) {
        let outcome = evaluate_send(&response(200, body.clone()));
        let flagged = serde_json::from_slice::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| value.get("success").and_then(serde_json::Value::as_bool))
            == Some(true);
        if !flagged {
            prop_assert!(!outcome.is_passed());
        }
    }
}
