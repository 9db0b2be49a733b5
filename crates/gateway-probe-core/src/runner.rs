// crates/gateway-probe-core/src/runner.rs
// ============================================================================
// Module: Probe Runner
// Description: Sequential execution of the configured probe set.
// Purpose: Run every probe in order, pacing requests and timing each one.
// Dependencies: gateway-probe-config, tokio, tracing
// ============================================================================

//! ## Overview
//! The runner owns an ordered list of probes. [`ProbeRunner::run`] executes
//! all of them regardless of earlier outcomes, sleeps the inter-probe delay
//! between consecutive probes (never before the first or after the last),
//! and returns one [`ProbeResult`] per probe in declaration order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use gateway_probe_config::ProbeConfig;
use tokio::time::Instant;
use tokio::time::sleep;
use tracing::info;

use crate::harness::HarnessObserver;
use crate::probe::Probe;
use crate::probe::ProbeKind;
use crate::probe::ProbeTarget;
use crate::probes::DocumentProbe;
use crate::probes::ImageProbe;
use crate::probes::TextProbe;
use crate::report::ProbeResult;
use crate::session::GatewaySession;

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Ordered probe set with pacing.
pub struct ProbeRunner {
    /// Probes in execution order.
    probes: Vec<Box<dyn Probe>>,
    /// Pause between consecutive probes.
    inter_probe_delay: Duration,
}

impl ProbeRunner {
    /// Creates an empty runner.
    #[must_use]
    pub fn new(inter_probe_delay: Duration) -> Self {
        Self {
            probes: Vec::new(),
            inter_probe_delay,
        }
    }

    /// Builds the default `[text, image, document]` set minus disabled probes.
    #[must_use]
    pub fn standard(config: &ProbeConfig) -> Self {
        let mut runner = Self::new(config.inter_probe_delay());
        if config.text {
            runner = runner.with_probe(TextProbe::new());
        }
        if config.image {
            runner = runner.with_probe(ImageProbe::new());
        }
        if config.document {
            runner = runner.with_probe(DocumentProbe::new());
        }
        runner
    }

    /// Appends a probe to the end of the set.
    #[must_use]
    pub fn with_probe(mut self, probe: impl Probe + 'static) -> Self {
        self.probes.push(Box::new(probe));
        self
    }

    /// Returns the probe kinds in execution order.
    #[must_use]
    pub fn kinds(&self) -> Vec<ProbeKind> {
        self.probes.iter().map(|probe| probe.kind()).collect()
    }

    /// Returns the number of probes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// Returns true when no probe is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Executes every probe in order and collects their results.
    pub async fn run(
        &self,
        session: &GatewaySession,
        target: &ProbeTarget,
        observer: &mut dyn HarnessObserver,
    ) -> Vec<ProbeResult> {
        let mut results = Vec::with_capacity(self.probes.len());
        for (index, probe) in self.probes.iter().enumerate() {
            if index > 0 && !self.inter_probe_delay.is_zero() {
                sleep(self.inter_probe_delay).await;
            }
            observer.probe_started(index, probe.as_ref(), target);
            info!(probe = probe.name(), index, "running probe");
            let started = Instant::now();
            let outcome = probe.execute(session, target).await;
            let result =
                ProbeResult::new(probe.name().to_string(), probe.kind(), outcome, started.elapsed());
            observer.probe_finished(&result);
            results.push(result);
        }
        results
    }
}
