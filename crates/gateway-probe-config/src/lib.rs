// crates/gateway-probe-config/src/lib.rs
// ============================================================================
// Module: Gateway Probe Config Library
// Description: Canonical config model and validation for the probe harness.
// Purpose: Single source of truth for gateway-probe.toml semantics.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! `gateway-probe-config` defines the configuration model for the gateway
//! probe harness: where the gateway lives, which endpoints to call, how long
//! each call may take, and which probes to run. Loading is strict and
//! fail-closed; every value is validated before the harness starts.
//!
//! Security posture: config inputs are untrusted and validated before use.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
