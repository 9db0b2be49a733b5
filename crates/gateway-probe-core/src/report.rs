// crates/gateway-probe-core/src/report.rs
// ============================================================================
// Module: Run Report
// Description: Ordered probe results and run context.
// Purpose: Aggregate probe outcomes into the overall pass/fail verdict.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! [`RunReport`] is the value handed to the reporter once every probe has
//! run. The verdict is the logical AND of all outcomes; a report with no
//! probes counts as passed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::device::Device;
use crate::probe::ProbeKind;
use crate::probe::ProbeOutcome;
use crate::session::LoginOutcome;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome of one probe with its timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    /// Probe display name.
    pub name: String,
    /// Probe category.
    pub kind: ProbeKind,
    /// Pass/fail outcome.
    pub outcome: ProbeOutcome,
    /// Wall-clock execution time in milliseconds.
    pub elapsed_ms: u64,
}

impl ProbeResult {
    /// Builds a result, saturating the elapsed time to `u64::MAX` ms.
    #[must_use]
    pub fn new(name: String, kind: ProbeKind, outcome: ProbeOutcome, elapsed: Duration) -> Self {
        Self {
            name,
            kind,
            outcome,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Complete record of a harness run.
///
/// # Invariants
/// - `results` are in probe declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Gateway base URL.
    pub base_url: String,
    /// Destination phone number.
    pub recipient: String,
    /// How the login handshake completed.
    pub login: LoginOutcome,
    /// Selected sender device.
    pub device: Device,
    /// Raw device record as listed by the gateway.
    pub device_record: Value,
    /// URL for inspecting recent message logs.
    pub message_log_url: String,
    /// Ordered probe results.
    pub results: Vec<ProbeResult>,
}

impl RunReport {
    /// Returns true when every probe passed (vacuously true when empty).
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|result| result.outcome.is_passed())
    }

    /// Number of passed probes.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|result| result.outcome.is_passed()).count()
    }

    /// Number of failed or skipped probes.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.len() - self.passed_count()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
