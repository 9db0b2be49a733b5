// crates/gateway-probe-cli/src/console.rs
// ============================================================================
// Module: Console Reporter
// Description: Colored operator output for harness progress and results.
// Purpose: Render stage progress, fatal remediation hints, and the summary.
// Dependencies: gateway-probe-core, crate::i18n
// ============================================================================

//! ## Overview
//! [`Console`] implements [`HarnessObserver`] and renders progress lines as
//! the harness advances, then the final summary from the [`RunReport`].
//! Lines carry a status marker (`✓`, `✗`, `ℹ`, `→`) and, when enabled, an
//! ANSI color. Observer callbacks cannot return errors, so the first write
//! failure is kept and surfaced by [`Console::finish`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::IsTerminal;
use std::io::Write;

use gateway_probe_config::GatewayProbeConfig;
use gateway_probe_core::HarnessError;
use gateway_probe_core::HarnessObserver;
use gateway_probe_core::LoginOutcome;
use gateway_probe_core::Probe;
use gateway_probe_core::ProbeOutcome;
use gateway_probe_core::ProbeResult;
use gateway_probe_core::ProbeTarget;
use gateway_probe_core::RunReport;
use gateway_probe_core::SelectedDevice;
use gateway_probe_core::Stage;
use url::Url;

use crate::t;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable that disables color when present.
pub const NO_COLOR_ENV: &str = "NO_COLOR";

/// Width of header rules.
const RULE_WIDTH: usize = 50;

/// ANSI reset sequence.
const RESET: &str = "\x1b[0m";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Kind of operator line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Completed step.
    Success,
    /// Failed step.
    Error,
    /// Supplementary information.
    Info,
    /// Step in progress.
    Step,
    /// Section header.
    Header,
    /// Unmarked line.
    Plain,
}

impl Tone {
    /// Returns the line marker.
    const fn marker(self) -> &'static str {
        match self {
            Self::Success => "✓ ",
            Self::Error => "✗ ",
            Self::Info => "ℹ ",
            Self::Step => "→ ",
            Self::Header | Self::Plain => "",
        }
    }

    /// Returns the ANSI color sequence.
    const fn color(self) -> &'static str {
        match self {
            Self::Success => "\x1b[0;32m",
            Self::Error => "\x1b[0;31m",
            Self::Info => "\x1b[1;33m",
            Self::Step => "\x1b[0;36m",
            Self::Header => "\x1b[0;34m",
            Self::Plain => "",
        }
    }
}

/// Decides whether colored output should be used.
#[must_use]
pub fn color_enabled(no_color_flag: bool) -> bool {
    !no_color_flag && std::env::var_os(NO_COLOR_ENV).is_none() && std::io::stdout().is_terminal()
}

/// Line-oriented operator output.
pub struct Console<W: Write> {
    /// Destination stream.
    out: W,
    /// Whether ANSI colors are emitted.
    color: bool,
    /// First write failure, if any.
    error: Option<std::io::Error>,
}

impl<W: Write> Console<W> {
    /// Creates a console writing to `out`.
    pub const fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            error: None,
        }
    }

    /// Writes one line with the tone's marker and color.
    pub fn line(&mut self, tone: Tone, message: &str) {
        if self.error.is_some() {
            return;
        }
        let marker = tone.marker();
        let result = if self.color && tone != Tone::Plain {
            writeln!(self.out, "{}{marker}{message}{RESET}", tone.color())
        } else {
            writeln!(self.out, "{marker}{message}")
        };
        if let Err(err) = result {
            self.error = Some(err);
        }
    }

    /// Writes a ruled section header.
    pub fn header(&mut self, title: &str) {
        let rule = "=".repeat(RULE_WIDTH);
        self.blank();
        self.line(Tone::Header, &rule);
        self.line(Tone::Header, title);
        self.line(Tone::Header, &rule);
        self.blank();
    }

    /// Writes an empty line.
    pub fn blank(&mut self) {
        self.line(Tone::Plain, "");
    }

    /// Writes the run banner.
    pub fn banner(&mut self, config: &GatewayProbeConfig) {
        self.header(&t!("run.banner"));
        self.line(Tone::Info, &t!("run.base_url", url = config.gateway.base_url.trim()));
        self.line(Tone::Info, &t!("run.recipient", recipient = config.probes.recipient));
    }

    /// Writes a fatal error with its remediation hints.
    pub fn fatal(&mut self, err: &HarnessError, config: &GatewayProbeConfig) {
        match err {
            HarnessError::Client(error) => {
                self.line(Tone::Error, &t!("client.failed", error = error));
            }
            HarnessError::Unavailable {
                url,
            } => {
                self.line(Tone::Error, &t!("availability.failed", url = url));
                self.line(
                    Tone::Info,
                    &t!("availability.hint", command = config.gateway.start_hint),
                );
            }
            HarnessError::LoginFailed(error) => {
                self.line(Tone::Error, &t!("login.failed", error = error));
                self.line(Tone::Info, &t!("login.hint"));
            }
            HarnessError::DeviceDiscovery(error) => {
                let dashboard = config
                    .gateway
                    .endpoint(&config.gateway.dashboard_path)
                    .map_or_else(|_| config.gateway.dashboard_path.clone(), |url| url.to_string());
                self.line(Tone::Error, &t!("discovery.failed", error = error));
                self.line(Tone::Info, &t!("discovery.hint.header"));
                self.line(Tone::Info, &t!("discovery.hint.visit", url = dashboard));
                self.line(Tone::Info, &t!("discovery.hint.accounts"));
                self.line(Tone::Info, &t!("discovery.hint.connect"));
            }
        }
    }

    /// Writes the final summary.
    pub fn summary(&mut self, report: &RunReport) {
        self.header(&t!("summary.header"));
        let device = &report.device;
        self.line(Tone::Plain, &t!("summary.device_id", value = device.id));
        self.line(Tone::Plain, &t!("summary.device_name", value = device.name));
        self.line(Tone::Plain, &t!("summary.device_status", value = device.status));
        self.line(Tone::Plain, &t!("summary.recipient", value = report.recipient));
        self.line(Tone::Plain, &t!("summary.base_url", value = report.base_url));
        self.blank();

        self.line(Tone::Plain, &t!("summary.results"));
        if report.results.is_empty() {
            self.line(Tone::Plain, &t!("summary.no_probes"));
        }
        for result in &report.results {
            match result.outcome.failure() {
                None => self.line(Tone::Success, &t!("summary.passed", name = result.name)),
                Some(failure) if failure.is_skip() => self.line(
                    Tone::Error,
                    &t!("summary.skipped", name = result.name, reason = failure),
                ),
                Some(failure) => self.line(
                    Tone::Error,
                    &t!("summary.failed", name = result.name, reason = failure),
                ),
            }
        }
        self.blank();

        self.line(Tone::Info, &t!("summary.logs_hint"));
        self.line(Tone::Plain, &t!("summary.logs_command", url = report.message_log_url));
        self.blank();

        let total = report.results.len();
        if report.all_passed() {
            self.line(
                Tone::Success,
                &t!("summary.all_passed", passed = report.passed_count(), total = total),
            );
        } else {
            self.line(
                Tone::Error,
                &t!("summary.some_failed", failed = report.failed_count(), total = total),
            );
        }
    }

    /// Flushes the stream and returns the first write failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`std::io::Error`] raised while writing.
    pub fn finish(mut self) -> std::io::Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()
    }
}

impl<W: Write> HarnessObserver for Console<W> {
    fn stage_started(&mut self, stage: Stage) {
        match stage {
            Stage::Availability => self.line(Tone::Step, &t!("stage.availability")),
            Stage::Login => self.line(Tone::Step, &t!("stage.login")),
            Stage::Discovery => self.line(Tone::Step, &t!("stage.discovery")),
            Stage::Probes => {}
        }
    }

    fn availability_checked(&mut self, url: &Url, available: bool) {
        if available {
            let base = url.origin().ascii_serialization();
            self.line(Tone::Success, &t!("availability.ok", url = base));
        }
    }

    fn logged_in(&mut self, outcome: &LoginOutcome) {
        match outcome {
            LoginOutcome::Direct => self.line(Tone::Success, &t!("login.ok")),
            LoginOutcome::Redirected {
                status,
                location,
            } => self.line(
                Tone::Success,
                &t!(
                    "login.redirected",
                    status = status,
                    location = location.as_deref().unwrap_or("-")
                ),
            ),
        }
    }

    fn device_selected(&mut self, device: &SelectedDevice) {
        let device = &device.device;
        self.line(
            Tone::Success,
            &t!("discovery.ok", name = device.name, id = device.id, status = device.status),
        );
    }

    fn probe_started(&mut self, index: usize, probe: &dyn Probe, target: &ProbeTarget) {
        self.header(&t!("probe.header", number = index + 1, name = probe.name()));
        self.line(
            Tone::Step,
            &t!("probe.sending", name = probe.name(), recipient = target.recipient),
        );
    }

    fn probe_finished(&mut self, result: &ProbeResult) {
        match &result.outcome {
            ProbeOutcome::Passed => self.line(
                Tone::Success,
                &t!("probe.passed", name = result.name, elapsed_ms = result.elapsed_ms),
            ),
            ProbeOutcome::Failed(failure) if failure.is_skip() => self.line(
                Tone::Error,
                &t!("probe.skipped", name = result.name, reason = failure),
            ),
            ProbeOutcome::Failed(failure) => {
                self.line(Tone::Error, &t!("probe.failed", name = result.name, reason = failure));
            }
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[path = "tests/console.rs"]
mod tests;
