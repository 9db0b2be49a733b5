// crates/gateway-probe-core/src/discovery.rs
// ============================================================================
// Module: Device Discovery
// Description: Lists gateway device sessions and selects the sender device.
// Purpose: Produce the single device every probe sends through.
// Dependencies: serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! Discovery fetches the device session listing with the authenticated
//! session and applies a fixed decision table:
//!
//! | HTTP    | success | data non-empty | Outcome                   |
//! |---------|---------|----------------|---------------------------|
//! | non-200 | any     | any            | [`DiscoveryError::HttpStatus`] |
//! | 200     | false   | any            | [`DiscoveryError::NoConnectedDevices`] |
//! | 200     | true    | no             | [`DiscoveryError::NoDevicesFound`] |
//! | 200     | true    | yes            | element 0 selected        |
//!
//! Only the first listed device is ever selected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::device::Device;
use crate::device::SelectedDevice;
use crate::envelope::ApiEnvelope;
use crate::session::GatewayResponse;
use crate::session::GatewaySession;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Device discovery failures.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The listing request did not complete.
    #[error("device listing request failed: {0}")]
    Transport(String),
    /// The listing endpoint returned a non-200 status.
    #[error("device listing returned http status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Body preview.
        body: String,
    },
    /// The body is not a valid response envelope.
    #[error("device listing response is not a valid envelope: {0}")]
    InvalidEnvelope(String),
    /// The gateway reported failure.
    #[error("no connected devices: {}", .error.as_deref().unwrap_or("gateway reported failure"))]
    NoConnectedDevices {
        /// Gateway-supplied reason.
        error: Option<String>,
    },
    /// The gateway reported success with an empty listing.
    #[error("no devices found")]
    NoDevicesFound,
    /// The selected record is not a device.
    #[error("first device record is invalid: {0}")]
    InvalidDevice(String),
}

// ============================================================================
// SECTION: Discovery
// ============================================================================

/// Fetches the device listing and selects element 0.
///
/// # Errors
///
/// Returns [`DiscoveryError`] per the decision table in the module docs.
pub async fn discover_device(session: &GatewaySession) -> Result<SelectedDevice, DiscoveryError> {
    let url = &session.endpoints().sessions;
    info!(url = %url, "listing device sessions");
    let response = session
        .get(url, session.timeouts().request())
        .await
        .map_err(|err| DiscoveryError::Transport(err.to_string()))?;
    let selected = select_device(&response)?;
    info!(
        device_id = %selected.device.id,
        device_name = %selected.device.name,
        status = %selected.device.status,
        "selected sender device"
    );
    Ok(selected)
}

/// Applies the discovery decision table to a buffered listing response.
///
/// # Errors
///
/// Returns [`DiscoveryError`] for every row other than a non-empty success.
pub fn select_device(response: &GatewayResponse) -> Result<SelectedDevice, DiscoveryError> {
    if !response.is_ok() {
        return Err(DiscoveryError::HttpStatus {
            status: response.status,
            body: response.body_preview(),
        });
    }
    let envelope: ApiEnvelope<Vec<Value>> =
        response.json().map_err(|err| DiscoveryError::InvalidEnvelope(err.to_string()))?;
    if !envelope.success {
        return Err(DiscoveryError::NoConnectedDevices {
            error: envelope.reason().map(str::to_string),
        });
    }
    let record = envelope
        .data
        .and_then(|records| records.into_iter().next())
        .ok_or(DiscoveryError::NoDevicesFound)?;
    let device: Device = serde_json::from_value(record.clone())
        .map_err(|err| DiscoveryError::InvalidDevice(err.to_string()))?;
    Ok(SelectedDevice {
        device,
        record,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
