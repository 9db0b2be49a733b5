// crates/gateway-probe-cli/src/lib.rs
// ============================================================================
// Module: Gateway Probe CLI Library
// Description: Shared helpers for the gateway-probe binary.
// Purpose: Expose the message catalog, console reporter, and logging setup.
// Dependencies: gateway-probe-core, tracing-subscriber
// ============================================================================

//! ## Overview
//! The `gateway-probe` binary is a thin dispatcher; rendering and logging
//! live here so they can be tested without spawning a process.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod console;
pub mod i18n;
pub mod logging;
