// crates/gateway-probe-core/src/harness.rs
// ============================================================================
// Module: Verification Harness
// Description: Ordered stage pipeline from health check to run report.
// Purpose: Enforce stage ordering and split fatal from non-fatal failures.
// Dependencies: gateway-probe-config, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`Harness::run`] executes the stages in a fixed order:
//! availability, login, discovery, then the probe run. The first three are
//! gates: any failure aborts with a [`HarnessError`] before a single probe
//! request is sent. Probe failures never abort; they are recorded in the
//! returned [`RunReport`].
//!
//! Progress is surfaced through [`HarnessObserver`] so callers can render it
//! without the harness knowing about terminals.

// ============================================================================
// SECTION: Imports
// ============================================================================

use gateway_probe_config::GatewayProbeConfig;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::availability::check_availability;
use crate::device::SelectedDevice;
use crate::discovery::DiscoveryError;
use crate::discovery::discover_device;
use crate::probe::Probe;
use crate::probe::ProbeTarget;
use crate::report::ProbeResult;
use crate::report::RunReport;
use crate::runner::ProbeRunner;
use crate::session::GatewaySession;
use crate::session::LoginOutcome;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Harness stage identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Health-check gate.
    Availability,
    /// Development login handshake.
    Login,
    /// Sender device selection.
    Discovery,
    /// Send probe execution.
    Probes,
}

impl Stage {
    /// Returns a stable stage label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Availability => "availability",
            Self::Login => "login",
            Self::Discovery => "discovery",
            Self::Probes => "probes",
        }
    }
}

/// Fatal harness failures.
///
/// # Invariants
/// - Returned only before any probe request is sent.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The HTTP client could not be built.
    #[error("gateway client setup failed: {0}")]
    Client(String),
    /// The health check did not return 200.
    #[error("gateway is not available at {url}")]
    Unavailable {
        /// Health endpoint URL.
        url: String,
    },
    /// The login handshake failed.
    #[error("development login failed: {0}")]
    LoginFailed(String),
    /// No usable sender device.
    #[error("device discovery failed: {0}")]
    DeviceDiscovery(#[from] DiscoveryError),
}

impl HarnessError {
    /// Returns the stage that failed.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Client(_) | Self::Unavailable { .. } => Stage::Availability,
            Self::LoginFailed(_) => Stage::Login,
            Self::DeviceDiscovery(_) => Stage::Discovery,
        }
    }
}

/// Progress callbacks invoked by the harness.
///
/// Every method defaults to a no-op.
pub trait HarnessObserver {
    /// A stage is about to run.
    fn stage_started(&mut self, _stage: Stage) {}

    /// The health check completed.
    fn availability_checked(&mut self, _url: &Url, _available: bool) {}

    /// The login handshake succeeded.
    fn logged_in(&mut self, _outcome: &LoginOutcome) {}

    /// A sender device was selected.
    fn device_selected(&mut self, _device: &SelectedDevice) {}

    /// A probe is about to run.
    fn probe_started(&mut self, _index: usize, _probe: &dyn Probe, _target: &ProbeTarget) {}

    /// A probe finished.
    fn probe_finished(&mut self, _result: &ProbeResult) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl HarnessObserver for NoopObserver {}

// ============================================================================
// SECTION: Harness
// ============================================================================

/// Stage pipeline bound to one configuration.
pub struct Harness {
    /// Validated configuration.
    config: GatewayProbeConfig,
    /// Probe set executed after the gates pass.
    runner: ProbeRunner,
}

impl Harness {
    /// Creates a harness running the configured standard probe set.
    #[must_use]
    pub fn new(config: GatewayProbeConfig) -> Self {
        let runner = ProbeRunner::standard(&config.probes);
        Self {
            config,
            runner,
        }
    }

    /// Replaces the probe set.
    #[must_use]
    pub fn with_runner(mut self, runner: ProbeRunner) -> Self {
        self.runner = runner;
        self
    }

    /// Returns the configuration in use.
    #[must_use]
    pub const fn config(&self) -> &GatewayProbeConfig {
        &self.config
    }

    /// Runs every stage and returns the report.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] when a gate stage fails; no probe has run
    /// in that case.
    pub async fn run(&self, observer: &mut dyn HarnessObserver) -> Result<RunReport, HarnessError> {
        let session =
            GatewaySession::new(&self.config).map_err(|err| HarnessError::Client(err.to_string()))?;

        observer.stage_started(Stage::Availability);
        let health = session.endpoints().health.clone();
        let available = check_availability(&session).await;
        observer.availability_checked(&health, available);
        if !available {
            return Err(HarnessError::Unavailable {
                url: health.to_string(),
            });
        }

        observer.stage_started(Stage::Login);
        let login =
            session.login().await.map_err(|err| HarnessError::LoginFailed(err.to_string()))?;
        info!(redirected = !matches!(login, LoginOutcome::Direct), "login established");
        observer.logged_in(&login);

        observer.stage_started(Stage::Discovery);
        let selected = discover_device(&session).await?;
        observer.device_selected(&selected);

        observer.stage_started(Stage::Probes);
        let target = ProbeTarget {
            device_id: selected.device.id.clone(),
            recipient: self.config.probes.recipient.clone(),
        };
        let results = self.runner.run(&session, &target, observer).await;
        info!(
            probes = results.len(),
            passed = results.iter().filter(|result| result.outcome.is_passed()).count(),
            "probe run complete"
        );

        Ok(RunReport {
            base_url: self.config.gateway.base_url.trim().trim_end_matches('/').to_string(),
            recipient: target.recipient,
            login,
            device: selected.device,
            device_record: selected.record,
            message_log_url: session.endpoints().messages.to_string(),
            results,
        })
    }
}
