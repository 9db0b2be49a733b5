// crates/gateway-probe-core/src/lib.rs
// ============================================================================
// Module: Gateway Probe Core
// Description: End-to-end verification harness for a messaging gateway API.
// Purpose: Authenticate, select a sender device, run send probes, and report.
// Dependencies: gateway-probe-config, reqwest, serde, image, tokio, tracing
// ============================================================================

//! ## Overview
//! This crate drives a running messaging gateway through five ordered stages:
//! availability check, development login, device discovery, the probe run,
//! and the final report. Each stage consumes the output of the previous one;
//! the authenticated [`GatewaySession`] is passed explicitly to every stage.
//!
//! Invariants:
//! - No probe executes before a session is established and a device selected.
//! - Probe failures are values ([`ProbeOutcome::Failed`]), never fatal errors.
//! - Probe results are reported in declaration order.
//!
//! Security posture: gateway responses are untrusted; bodies are size-limited
//! and parsed strictly at the boundary.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod availability;
pub mod device;
pub mod discovery;
pub mod envelope;
pub mod fixtures;
pub mod harness;
pub mod probe;
pub mod probes;
pub mod report;
pub mod runner;
pub mod session;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use availability::check_availability;
pub use device::Device;
pub use device::DeviceId;
pub use device::DeviceStatus;
pub use device::SelectedDevice;
pub use discovery::DiscoveryError;
pub use discovery::discover_device;
pub use envelope::ApiEnvelope;
pub use harness::Harness;
pub use harness::HarnessError;
pub use harness::HarnessObserver;
pub use harness::NoopObserver;
pub use harness::Stage;
pub use probe::Probe;
pub use probe::ProbeFailure;
pub use probe::ProbeKind;
pub use probe::ProbeOutcome;
pub use probe::ProbeTarget;
pub use probes::DocumentProbe;
pub use probes::ImageProbe;
pub use probes::TextProbe;
pub use report::ProbeResult;
pub use report::RunReport;
pub use runner::ProbeRunner;
pub use session::GatewayError;
pub use session::GatewayResponse;
pub use session::GatewaySession;
pub use session::LoginOutcome;
