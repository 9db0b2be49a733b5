// crates/gateway-probe-core/src/probe.rs
// ============================================================================
// Module: Probe Contract
// Description: Probe trait, outcomes, and the uniform send success rule.
// Purpose: Make every send probe a value-returning, non-fatal capability.
// Dependencies: async-trait, serde, thiserror
// ============================================================================

//! ## Overview
//! A probe sends one message through the gateway on behalf of the selected
//! device and reports a [`ProbeOutcome`]. Probes never return errors: every
//! failure, including transport failures and fixture problems, becomes a
//! [`ProbeFailure`] value so the runner can continue with the next probe.
//!
//! All send endpoints share one success rule, implemented by
//! [`evaluate_send`]: HTTP 200 and an envelope with `success == true`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::device::DeviceId;
use crate::envelope::ApiEnvelope;
use crate::session::GatewayError;
use crate::session::GatewayResponse;
use crate::session::GatewaySession;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Probe category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    /// Plain text message.
    Text,
    /// Image upload with caption.
    Image,
    /// Document upload.
    Document,
}

impl ProbeKind {
    /// Returns the display name used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Text => "Text Message",
            Self::Image => "Image Message",
            Self::Document => "Document Message",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Addressing shared by every probe of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    /// Sender device identifier.
    pub device_id: DeviceId,
    /// Destination phone number.
    pub recipient: String,
}

/// Reason a probe did not pass.
///
/// # Invariants
/// - `FixtureUnavailable` means no request was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ProbeFailure {
    /// The request did not complete.
    #[error("request failed: {message}")]
    Transport {
        /// Transport error detail.
        message: String,
    },
    /// The gateway answered with a non-200 status.
    #[error("http status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Body preview.
        body: String,
    },
    /// The gateway answered 200 with `success == false`.
    #[error("rejected: {}", .error.as_deref().unwrap_or("no reason given"))]
    Rejected {
        /// Gateway-supplied reason.
        error: Option<String>,
    },
    /// The 200 body is not a valid envelope.
    #[error("invalid response envelope: {message}")]
    InvalidEnvelope {
        /// Parse error detail.
        message: String,
    },
    /// The upload fixture could not be produced; the probe was skipped.
    #[error("skipped, fixture unavailable: {message}")]
    FixtureUnavailable {
        /// Fixture error detail.
        message: String,
    },
}

impl ProbeFailure {
    /// Returns true when the probe was skipped without sending a request.
    #[must_use]
    pub const fn is_skip(&self) -> bool {
        matches!(self, Self::FixtureUnavailable { .. })
    }
}

impl From<GatewayError> for ProbeFailure {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::UnexpectedStatus {
                status,
                body,
            } => Self::HttpStatus {
                status,
                body,
            },
            other => Self::Transport {
                message: other.to_string(),
            },
        }
    }
}

/// Result of one probe execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// The send was accepted.
    Passed,
    /// The send failed or was skipped.
    Failed(ProbeFailure),
}

impl ProbeOutcome {
    /// Returns true for [`ProbeOutcome::Passed`].
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Returns the failure when the probe did not pass.
    #[must_use]
    pub const fn failure(&self) -> Option<&ProbeFailure> {
        match self {
            Self::Passed => None,
            Self::Failed(failure) => Some(failure),
        }
    }
}

impl From<Result<GatewayResponse, GatewayError>> for ProbeOutcome {
    fn from(result: Result<GatewayResponse, GatewayError>) -> Self {
        match result {
            Ok(response) => evaluate_send(&response),
            Err(err) => Self::Failed(err.into()),
        }
    }
}

// ============================================================================
// SECTION: Probe Trait
// ============================================================================

/// Send capability exercised by the runner.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Returns the probe category.
    fn kind(&self) -> ProbeKind;

    /// Returns the display name.
    fn name(&self) -> &str {
        self.kind().label()
    }

    /// Sends one message and classifies the response.
    async fn execute(&self, session: &GatewaySession, target: &ProbeTarget) -> ProbeOutcome;
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Applies the uniform send success rule to a buffered response.
#[must_use]
pub fn evaluate_send(response: &GatewayResponse) -> ProbeOutcome {
    if !response.is_ok() {
        return ProbeOutcome::Failed(ProbeFailure::HttpStatus {
            status: response.status,
            body: response.body_preview(),
        });
    }
    match response.json::<ApiEnvelope<Value>>() {
        Ok(envelope) if envelope.success => ProbeOutcome::Passed,
        Ok(envelope) => ProbeOutcome::Failed(ProbeFailure::Rejected {
            error: envelope.reason().map(str::to_string),
        }),
        Err(err) => ProbeOutcome::Failed(ProbeFailure::InvalidEnvelope {
            message: err.to_string(),
        }),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
