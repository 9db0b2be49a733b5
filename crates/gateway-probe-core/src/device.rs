// crates/gateway-probe-core/src/device.rs
// ============================================================================
// Module: Gateway Devices
// Description: Device records returned by the gateway session listing.
// Purpose: Type the sender device selected for probe traffic.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A device is a connected messaging account the gateway sends on behalf of.
//! Its identifier may be numeric or textual depending on the gateway build,
//! so [`DeviceId`] accepts any JSON number or string and renders back to the
//! same JSON shape.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Number;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Placeholder used when the gateway omits a name or status.
pub const UNKNOWN_LABEL: &str = "Unknown";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Gateway-assigned device identifier.
///
/// # Invariants
/// - Serializes back to the JSON type it was read from.
/// - Negative and fractional numbers are kept as read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DeviceId {
    /// Numeric identifier.
    Numeric(Number),
    /// Textual identifier.
    Text(String),
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Connection status reported for a device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    /// Linked and able to send.
    Connected,
    /// Linked but offline.
    Disconnected,
    /// Pairing or reconnecting.
    Connecting,
    /// Missing or unrecognized status.
    #[default]
    #[serde(other)]
    Unknown,
}

impl DeviceStatus {
    /// Returns the display label for the status.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Unknown => UNKNOWN_LABEL,
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Typed view of a gateway device record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Device {
    /// Device identifier used as the `accountId` of send requests.
    pub id: DeviceId,
    /// Human-readable device name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Connection status.
    #[serde(default)]
    pub status: DeviceStatus,
}

/// Device chosen for the run together with its raw record.
///
/// # Invariants
/// - `device` was parsed from `record`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedDevice {
    /// Typed device fields.
    pub device: Device,
    /// Full record as returned by the gateway.
    pub record: Value,
}

impl SelectedDevice {
    /// Returns the device identifier.
    #[must_use]
    pub const fn id(&self) -> &DeviceId {
        &self.device.id
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default device name.
fn default_name() -> String {
    UNKNOWN_LABEL.to_string()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
