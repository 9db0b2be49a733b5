// crates/gateway-probe-core/src/probes/document.rs
// ============================================================================
// Module: Document Probe
// Description: Uploads a timestamped text document.
// Purpose: Verify the document send endpoint.
// Dependencies: async-trait, reqwest
// ============================================================================

//! ## Overview
//! Posts the document fixture as a multipart form with `accountId`,
//! `recipient`, and `fileName` fields.

use async_trait::async_trait;

use super::log_outcome;
use super::media_form;
use crate::fixtures::FixtureFactory;
use crate::fixtures::text_document;
use crate::probe::Probe;
use crate::probe::ProbeFailure;
use crate::probe::ProbeKind;
use crate::probe::ProbeOutcome;
use crate::probe::ProbeTarget;
use crate::session::GatewaySession;

/// Document send probe.
#[derive(Debug, Clone, Copy)]
pub struct DocumentProbe {
    /// Source of the uploaded document.
    fixture: FixtureFactory,
}

impl DocumentProbe {
    /// Creates the probe with the built-in text document.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_fixture(text_document)
    }

    /// Creates the probe with a custom fixture source.
    #[must_use]
    pub const fn with_fixture(fixture: FixtureFactory) -> Self {
        Self {
            fixture,
        }
    }
}

impl Default for DocumentProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Probe for DocumentProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Document
    }

    async fn execute(&self, session: &GatewaySession, target: &ProbeTarget) -> ProbeOutcome {
        let outcome = match (self.fixture)()
            .map_err(|err| ProbeFailure::FixtureUnavailable {
                message: err.to_string(),
            })
            .and_then(|fixture| {
                let file_name = fixture.file_name.clone();
                media_form(fixture, target).map(|form| form.text("fileName", file_name))
            }) {
            Ok(form) => {
                session.post_multipart(&session.endpoints().send_document, form).await.into()
            }
            Err(failure) => ProbeOutcome::Failed(failure),
        };
        log_outcome(self.kind(), target, &outcome);
        outcome
    }
}
