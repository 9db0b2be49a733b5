// crates/gateway-probe-core/src/probes/image.rs
// ============================================================================
// Module: Image Probe
// Description: Uploads a synthesized PNG with a caption.
// Purpose: Verify the image send endpoint.
// Dependencies: async-trait, reqwest
// ============================================================================

//! ## Overview
//! Builds the image fixture through a [`FixtureFactory`] and posts it as a
//! multipart form with `accountId`, `recipient`, and `caption` fields. A
//! fixture failure is reported as a skip and no request is sent.

use async_trait::async_trait;

use super::log_outcome;
use super::media_form;
use crate::fixtures::FixtureFactory;
use crate::fixtures::solid_png;
use crate::probe::Probe;
use crate::probe::ProbeFailure;
use crate::probe::ProbeKind;
use crate::probe::ProbeOutcome;
use crate::probe::ProbeTarget;
use crate::session::GatewaySession;

/// Caption attached to the uploaded image.
pub const IMAGE_CAPTION: &str = "This is a test image sent via the messaging gateway API";

/// Image send probe.
#[derive(Debug, Clone, Copy)]
pub struct ImageProbe {
    /// Source of the uploaded image.
    fixture: FixtureFactory,
}

impl ImageProbe {
    /// Creates the probe with the built-in blue PNG.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_fixture(solid_png)
    }

    /// Creates the probe with a custom fixture source.
    #[must_use]
    pub const fn with_fixture(fixture: FixtureFactory) -> Self {
        Self {
            fixture,
        }
    }
}

impl Default for ImageProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Probe for ImageProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Image
    }

    async fn execute(&self, session: &GatewaySession, target: &ProbeTarget) -> ProbeOutcome {
        let outcome = match (self.fixture)()
            .map_err(|err| ProbeFailure::FixtureUnavailable {
                message: err.to_string(),
            })
            .and_then(|fixture| media_form(fixture, target))
        {
            Ok(form) => {
                let form = form.text("caption", IMAGE_CAPTION);
                session.post_multipart(&session.endpoints().send_image, form).await.into()
            }
            Err(failure) => ProbeOutcome::Failed(failure),
        };
        log_outcome(self.kind(), target, &outcome);
        outcome
    }
}
