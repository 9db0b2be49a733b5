// crates/gateway-probe-core/src/probes/text.rs
// ============================================================================
// Module: Text Probe
// Description: Sends a timestamped plain text message.
// Purpose: Verify the JSON send endpoint.
// Dependencies: async-trait, serde
// ============================================================================

//! ## Overview
//! Posts `{ accountId, recipient, message }` as JSON. The message embeds the
//! send time so repeated runs are distinguishable in the recipient's chat.

use async_trait::async_trait;
use serde::Serialize;

use super::log_outcome;
use crate::device::DeviceId;
use crate::fixtures::timestamp;
use crate::probe::Probe;
use crate::probe::ProbeKind;
use crate::probe::ProbeOutcome;
use crate::probe::ProbeTarget;
use crate::session::GatewaySession;

/// JSON body of the text send endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextMessage<'a> {
    /// Sender device.
    account_id: &'a DeviceId,
    /// Destination phone number.
    recipient: &'a str,
    /// Message text.
    message: String,
}

/// Text send probe.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextProbe;

impl TextProbe {
    /// Creates the probe.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Probe for TextProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Text
    }

    async fn execute(&self, session: &GatewaySession, target: &ProbeTarget) -> ProbeOutcome {
        let payload = TextMessage {
            account_id: &target.device_id,
            recipient: &target.recipient,
            message: format!("Hello! Gateway probe text message sent at {}", timestamp()),
        };
        let outcome: ProbeOutcome =
            session.post_json(&session.endpoints().send_text, &payload).await.into();
        log_outcome(self.kind(), target, &outcome);
        outcome
    }
}
