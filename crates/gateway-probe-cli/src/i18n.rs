// crates/gateway-probe-cli/src/i18n.rs
// ============================================================================
// Module: CLI Message Catalog
// Description: Provides the message catalog and translation utilities.
// Purpose: Centralize operator-facing strings behind stable keys.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! Every line the CLI prints to an operator is looked up by key in a static
//! catalog and rendered through the [`t!`](crate::t) macro. Keeping strings
//! out of the rendering code lets tests pin wording in one place.
//!
//! ## Invariants
//! - The catalog is built once and read-only thereafter.
//! - Missing keys fall back to the key itself.
//! - Placeholder substitutions apply in argument order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `url`).
/// - `value` is preformatted and should be safe for display.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"url"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static catalog entries.
const CATALOG: &[(&str, &str)] = &[
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.override_failed", "Invalid command-line override: {error}"),
    ("logging.init_failed", "Failed to initialize logging: {error}"),
    ("report.serialize_failed", "Failed to serialize run report: {error}"),
    ("signal.install_failed", "Failed to install interrupt handler: {error}"),
    ("run.banner", "Gateway Probe - Message Delivery Check"),
    ("run.base_url", "Base URL: {url}"),
    ("run.recipient", "Using recipient: {recipient}"),
    ("run.recipient_hint", "(Pass a different number as the first argument: gateway-probe {example})"),
    ("run.interrupted", "Interrupted by user"),
    ("stage.availability", "Checking if the gateway is running..."),
    ("availability.ok", "Gateway is running at {url}"),
    ("availability.failed", "Gateway is not running or not accessible at {url}"),
    ("availability.hint", "Please start the gateway first: {command}"),
    ("stage.login", "Logging in via dev-login..."),
    ("login.ok", "Login successful"),
    ("login.redirected", "Login successful (HTTP {status} redirect to {location})"),
    ("login.failed", "Failed to login: {error}"),
    ("login.hint", "Make sure dev-login is enabled (NODE_ENV=development)"),
    ("stage.discovery", "Fetching connected devices..."),
    ("discovery.ok", "Found device: {name} (ID: {id}, Status: {status})"),
    ("discovery.failed", "No connected devices found: {error}"),
    ("discovery.hint.header", "Please connect a device first:"),
    ("discovery.hint.visit", "  1. Visit {url}"),
    ("discovery.hint.accounts", "  2. Go to Accounts section"),
    ("discovery.hint.connect", "  3. Create and connect a new device"),
    ("client.failed", "Gateway client setup failed: {error}"),
    ("probe.header", "Test {number}: Sending {name}"),
    ("probe.sending", "Sending {name} to {recipient}..."),
    ("probe.passed", "{name} sent successfully ({elapsed_ms} ms)"),
    ("probe.failed", "{name} failed: {reason}"),
    ("probe.skipped", "{name} skipped: {reason}"),
    ("summary.header", "Test Summary"),
    ("summary.device_id", "Device ID: {value}"),
    ("summary.device_name", "Device Name: {value}"),
    ("summary.device_status", "Device Status: {value}"),
    ("summary.recipient", "Recipient: {value}"),
    ("summary.base_url", "Base URL: {value}"),
    ("summary.results", "Results:"),
    ("summary.passed", "  {name}: PASSED"),
    ("summary.failed", "  {name}: FAILED ({reason})"),
    ("summary.skipped", "  {name}: SKIPPED ({reason})"),
    ("summary.no_probes", "  No probes enabled"),
    ("summary.logs_hint", "To check message logs:"),
    ("summary.logs_command", "  curl -b cookies.txt '{url}'"),
    ("summary.all_passed", "All tests passed ({passed}/{total})"),
    ("summary.some_failed", "Some tests failed ({failed} of {total})"),
];

/// Returns the message catalog.
pub(crate) fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    CATALOG_MAP.get_or_init(|| CATALOG.iter().copied().collect())
}

/// Returns the raw catalog entries in declaration order.
#[must_use]
pub fn catalog_entries() -> &'static [(&'static str, &'static str)] {
    CATALOG
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Renders `key` while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a catalog message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[path = "tests/i18n.rs"]
mod tests;
