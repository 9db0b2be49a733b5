// crates/gateway-probe-cli/src/logging.rs
// ============================================================================
// Module: Diagnostic Logging
// Description: tracing-subscriber initialization for the CLI.
// Purpose: Route structured diagnostics to stderr, separate from the report.
// Dependencies: gateway-probe-config, tracing-subscriber
// ============================================================================

//! ## Overview
//! Diagnostics go to stderr through a `tracing-subscriber` registry. The
//! filter comes from [`LOG_ENV_VAR`] when set, otherwise from the level
//! chosen on the command line or in the `[logging]` config section. Operator
//! output (progress and summary) never goes through this path.

// ============================================================================
// SECTION: Imports
// ============================================================================

use gateway_probe_config::LogLevel;
use gateway_probe_config::LoggingConfig;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV_VAR: &str = "GATEWAY_PROBE_LOG";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Logging setup failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The filter directive could not be parsed.
    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter {
        /// Rejected directive.
        directive: String,
        /// Parser error detail.
        message: String,
    },
    /// A global subscriber was already installed.
    #[error("logging initialization failed: {0}")]
    InitializationFailed(String),
}

// ============================================================================
// SECTION: Initialization
// ============================================================================

/// Builds the filter from an optional directive and the fallback level.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidFilter`] when `directive` does not parse.
pub fn build_filter(directive: Option<&str>, level: LogLevel) -> Result<EnvFilter, LoggingError> {
    match directive.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => EnvFilter::try_new(value).map_err(|err| LoggingError::InvalidFilter {
            directive: value.to_string(),
            message: err.to_string(),
        }),
        None => Ok(EnvFilter::new(level.as_str())),
    }
}

/// Installs the global subscriber.
///
/// `level_override` takes precedence over the config level; the
/// [`LOG_ENV_VAR`] directive takes precedence over both.
///
/// # Errors
///
/// Returns [`LoggingError`] when the filter is invalid or a subscriber is
/// already installed.
pub fn init(config: &LoggingConfig, level_override: Option<LogLevel>) -> Result<(), LoggingError> {
    let directive = std::env::var(LOG_ENV_VAR).ok();
    let filter = build_filter(directive.as_deref(), level_override.unwrap_or(config.level))?;
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    let registry = tracing_subscriber::registry().with(filter);
    if config.json {
        registry.with(layer.json()).try_init()
    } else {
        registry.with(layer).try_init()
    }
    .map_err(|err| LoggingError::InitializationFailed(err.to_string()))
}
