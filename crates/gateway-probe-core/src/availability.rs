// crates/gateway-probe-core/src/availability.rs
// ============================================================================
// Module: Availability Probe
// Description: Health-check gate that runs before any authenticated call.
// Purpose: Decide whether the gateway is reachable at all.
// Dependencies: tracing
// ============================================================================

//! ## Overview
//! The availability check issues one GET against the health endpoint with
//! the short health timeout. Only HTTP 200 counts as available; every other
//! status and every transport failure counts as unavailable.

use tracing::info;
use tracing::warn;

use crate::session::GatewaySession;

/// Returns true when the gateway health endpoint answers HTTP 200.
///
/// Never errors: transport failures are reported as unavailable.
pub async fn check_availability(session: &GatewaySession) -> bool {
    let url = &session.endpoints().health;
    match session.get(url, session.timeouts().health()).await {
        Ok(response) if response.is_ok() => {
            info!(url = %url, "gateway health check passed");
            true
        }
        Ok(response) => {
            warn!(url = %url, status = response.status, "gateway health check failed");
            false
        }
        Err(err) => {
            warn!(url = %url, error = %err, "gateway unreachable");
            false
        }
    }
}
