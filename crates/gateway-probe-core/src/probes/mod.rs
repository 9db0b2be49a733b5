// crates/gateway-probe-core/src/probes/mod.rs
// ============================================================================
// Module: Send Probes
// Description: Text, image, and document send probes.
// Purpose: Provide the built-in probe set and its shared multipart helper.
// Dependencies: reqwest, tracing
// ============================================================================

//! ## Overview
//! Each built-in probe targets one send endpoint. Media probes share the
//! multipart form layout: a `file` part plus `accountId` and `recipient`
//! text fields, extended with probe-specific fields.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod document;
pub mod image;
pub mod text;

// ============================================================================
// SECTION: Imports
// ============================================================================

use reqwest::multipart::Form;
use reqwest::multipart::Part;
use tracing::debug;
use tracing::warn;

pub use self::document::DocumentProbe;
pub use self::image::ImageProbe;
pub use self::text::TextProbe;
use crate::fixtures::Fixture;
use crate::probe::ProbeFailure;
use crate::probe::ProbeKind;
use crate::probe::ProbeOutcome;
use crate::probe::ProbeTarget;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the shared multipart form for a media upload.
pub(crate) fn media_form(fixture: Fixture, target: &ProbeTarget) -> Result<Form, ProbeFailure> {
    let Fixture {
        file_name,
        mime,
        bytes,
    } = fixture;
    let part = Part::bytes(bytes).file_name(file_name).mime_str(mime).map_err(|err| {
        ProbeFailure::FixtureUnavailable {
            message: err.to_string(),
        }
    })?;
    Ok(Form::new()
        .part("file", part)
        .text("accountId", target.device_id.to_string())
        .text("recipient", target.recipient.clone()))
}

/// Logs a finished probe with full failure detail.
pub(crate) fn log_outcome(kind: ProbeKind, target: &ProbeTarget, outcome: &ProbeOutcome) {
    match outcome.failure() {
        None => debug!(probe = %kind, recipient = %target.recipient, "probe passed"),
        Some(failure) if failure.is_skip() => {
            warn!(probe = %kind, detail = %failure, "probe skipped");
        }
        Some(failure) => {
            warn!(
                probe = %kind,
                device_id = %target.device_id,
                recipient = %target.recipient,
                detail = %failure,
                "probe failed"
            );
        }
    }
}
