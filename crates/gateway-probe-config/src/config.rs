// crates/gateway-probe-config/src/config.rs
// ============================================================================
// Module: Gateway Probe Configuration
// Description: Configuration loading and validation for the probe harness.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! When no path is given and the default file is absent, built-in defaults
//! apply; an explicitly named file must exist. Every loaded config passes
//! [`GatewayProbeConfig::validate`] before it is returned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "gateway-probe.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "GATEWAY_PROBE_CONFIG";
/// Environment variable used to override the gateway base URL.
pub const BASE_URL_ENV_VAR: &str = "GATEWAY_PROBE_BASE_URL";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 256 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of the base URL.
pub(crate) const MAX_BASE_URL_LENGTH: usize = 2048;
/// Maximum length of an endpoint path.
pub(crate) const MAX_ENDPOINT_PATH_LENGTH: usize = 512;
/// Maximum length of a recipient address.
pub(crate) const MAX_RECIPIENT_LENGTH: usize = 64;
/// Maximum length of the user agent string.
pub(crate) const MAX_USER_AGENT_LENGTH: usize = 256;
/// Minimum allowed request timeout in milliseconds.
pub(crate) const MIN_TIMEOUT_MS: u64 = 100;
/// Maximum allowed request timeout in milliseconds.
pub(crate) const MAX_TIMEOUT_MS: u64 = 300_000;
/// Maximum allowed delay between probes in milliseconds.
pub(crate) const MAX_INTER_PROBE_DELAY_MS: u64 = 60_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Gateway probe configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayProbeConfig {
    /// Gateway location and endpoint paths.
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Per-stage request timeouts.
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    /// Probe selection and pacing.
    #[serde(default)]
    pub probes: ProbeConfig,
    /// Diagnostic logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GatewayProbeConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order is the explicit `path`, then [`CONFIG_ENV_VAR`], then
    /// [`DEFAULT_CONFIG_NAME`]. Only the implicit default file may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        if !explicit && !resolved.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Parses and validates configuration from raw TOML bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the payload is too large, not UTF-8,
    /// malformed, or invalid.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.probes.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gateway.validate()?;
        self.timeouts.validate()?;
        self.probes.validate()?;
        Ok(())
    }

    /// Applies the [`BASE_URL_ENV_VAR`] override when it is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the variable is not UTF-8, is empty, or
    /// names an invalid base URL.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(base_url) = read_env_nonempty(BASE_URL_ENV_VAR)? {
            self.override_base_url(base_url)?;
        }
        Ok(())
    }

    /// Replaces the gateway base URL and revalidates the gateway section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the new base URL is invalid.
    pub fn override_base_url(&mut self, base_url: String) -> Result<(), ConfigError> {
        self.gateway.base_url = base_url;
        self.gateway.validate()
    }

    /// Replaces the default recipient and revalidates the probe section.
    ///
    /// Surrounding whitespace is stripped before the value is stored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the recipient is empty or too long.
    pub fn override_recipient(&mut self, recipient: String) -> Result<(), ConfigError> {
        self.probes.recipient = recipient;
        self.probes.normalize();
        self.probes.validate()
    }
}

/// Gateway location and endpoint paths.
///
/// # Invariants
/// - `base_url` is an absolute `http`/`https` URL without credentials.
/// - Every endpoint path starts with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Gateway base URL (scheme, host, optional port and prefix).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Health-check path.
    #[serde(default = "default_health_path")]
    pub health_path: String,
    /// Development login path.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Device session listing path.
    #[serde(default = "default_sessions_path")]
    pub sessions_path: String,
    /// Text send path.
    #[serde(default = "default_send_text_path")]
    pub send_text_path: String,
    /// Image send path.
    #[serde(default = "default_send_image_path")]
    pub send_image_path: String,
    /// Document send path.
    #[serde(default = "default_send_document_path")]
    pub send_document_path: String,
    /// Message log path shown in the report hint.
    #[serde(default = "default_messages_path")]
    pub messages_path: String,
    /// Dashboard path shown when no device is connected.
    #[serde(default = "default_dashboard_path")]
    pub dashboard_path: String,
    /// User agent for outbound requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Command shown to operators when the gateway is not running.
    #[serde(default = "default_start_hint")]
    pub start_hint: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            health_path: default_health_path(),
            login_path: default_login_path(),
            sessions_path: default_sessions_path(),
            send_text_path: default_send_text_path(),
            send_image_path: default_send_image_path(),
            send_document_path: default_send_document_path(),
            messages_path: default_messages_path(),
            dashboard_path: default_dashboard_path(),
            user_agent: default_user_agent(),
            start_hint: default_start_hint(),
        }
    }
}

impl GatewayConfig {
    /// Validates the base URL and endpoint paths.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_base_url(&self.base_url)?;
        validate_endpoint_path("gateway.health_path", &self.health_path)?;
        validate_endpoint_path("gateway.login_path", &self.login_path)?;
        validate_endpoint_path("gateway.sessions_path", &self.sessions_path)?;
        validate_endpoint_path("gateway.send_text_path", &self.send_text_path)?;
        validate_endpoint_path("gateway.send_image_path", &self.send_image_path)?;
        validate_endpoint_path("gateway.send_document_path", &self.send_document_path)?;
        validate_endpoint_path("gateway.messages_path", &self.messages_path)?;
        validate_endpoint_path("gateway.dashboard_path", &self.dashboard_path)?;
        let user_agent = self.user_agent.trim();
        if user_agent.is_empty() {
            return Err(ConfigError::Invalid("gateway.user_agent must be non-empty".to_string()));
        }
        if user_agent.len() > MAX_USER_AGENT_LENGTH {
            return Err(ConfigError::Invalid("gateway.user_agent too long".to_string()));
        }
        if self.start_hint.trim().is_empty() {
            return Err(ConfigError::Invalid("gateway.start_hint must be non-empty".to_string()));
        }
        Ok(())
    }

    /// Joins the base URL with an endpoint path.
    ///
    /// The base URL prefix is preserved, so `http://host/gw` joined with
    /// `/health` yields `http://host/gw/health`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the joined value is not a valid URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
        let base = self.base_url.trim().trim_end_matches('/');
        let joined = format!("{base}{path}");
        Url::parse(&joined)
            .map_err(|_| ConfigError::Invalid(format!("invalid endpoint url: {joined}")))
    }
}

/// Per-stage request timeouts.
///
/// # Invariants
/// - Each timeout lies within [`MIN_TIMEOUT_MS`, `MAX_TIMEOUT_MS`].
/// - `health_ms` is strictly shorter than `upload_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TimeoutConfig {
    /// Availability probe timeout in milliseconds.
    #[serde(default = "default_health_timeout_ms")]
    pub health_ms: u64,
    /// Login and discovery timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_ms: u64,
    /// Send and upload timeout in milliseconds.
    #[serde(default = "default_upload_timeout_ms")]
    pub upload_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            health_ms: default_health_timeout_ms(),
            request_ms: default_request_timeout_ms(),
            upload_ms: default_upload_timeout_ms(),
        }
    }
}

impl TimeoutConfig {
    /// Validates timeout bounds and ordering.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_timeout("timeouts.health_ms", self.health_ms)?;
        validate_timeout("timeouts.request_ms", self.request_ms)?;
        validate_timeout("timeouts.upload_ms", self.upload_ms)?;
        if self.health_ms >= self.upload_ms {
            return Err(ConfigError::Invalid(
                "timeouts.health_ms must be shorter than timeouts.upload_ms".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the availability probe timeout.
    #[must_use]
    pub const fn health(&self) -> Duration {
        Duration::from_millis(self.health_ms)
    }

    /// Returns the login and discovery timeout.
    #[must_use]
    pub const fn request(&self) -> Duration {
        Duration::from_millis(self.request_ms)
    }

    /// Returns the send and upload timeout.
    #[must_use]
    pub const fn upload(&self) -> Duration {
        Duration::from_millis(self.upload_ms)
    }
}

/// Probe selection and pacing.
///
/// # Invariants
/// - `recipient` carries no surrounding whitespace once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeConfig {
    /// Recipient address used when none is given on the command line.
    #[serde(default = "default_recipient")]
    pub recipient: String,
    /// Delay inserted between consecutive probes in milliseconds.
    #[serde(default = "default_inter_probe_delay_ms")]
    pub inter_probe_delay_ms: u64,
    /// Run the text probe.
    #[serde(default = "default_enabled")]
    pub text: bool,
    /// Run the image probe.
    #[serde(default = "default_enabled")]
    pub image: bool,
    /// Run the document probe.
    #[serde(default = "default_enabled")]
    pub document: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            recipient: default_recipient(),
            inter_probe_delay_ms: default_inter_probe_delay_ms(),
            text: true,
            image: true,
            document: true,
        }
    }
}

impl ProbeConfig {
    /// Strips surrounding whitespace from the recipient.
    fn normalize(&mut self) {
        let trimmed = self.recipient.trim();
        if trimmed.len() != self.recipient.len() {
            self.recipient = trimmed.to_string();
        }
    }

    /// Validates recipient and pacing values.
    fn validate(&self) -> Result<(), ConfigError> {
        let recipient = self.recipient.trim();
        if recipient.is_empty() {
            return Err(ConfigError::Invalid("probes.recipient must be non-empty".to_string()));
        }
        if recipient.len() > MAX_RECIPIENT_LENGTH {
            return Err(ConfigError::Invalid("probes.recipient too long".to_string()));
        }
        if self.inter_probe_delay_ms > MAX_INTER_PROBE_DELAY_MS {
            return Err(ConfigError::Invalid(format!(
                "probes.inter_probe_delay_ms must be at most {MAX_INTER_PROBE_DELAY_MS}"
            )));
        }
        Ok(())
    }

    /// Returns the delay inserted between consecutive probes.
    #[must_use]
    pub const fn inter_probe_delay(&self) -> Duration {
        Duration::from_millis(self.inter_probe_delay_ms)
    }
}

/// Diagnostic logging configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum log level when no filter env var is set.
    #[serde(default)]
    pub level: LogLevel,
    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,
}

/// Supported diagnostic log levels.
///
/// # Invariants
/// - Variants are stable for config parsing and filter construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors (default).
    #[default]
    Warn,
    /// Stage transitions.
    Info,
    /// Full request and response detail.
    Debug,
    /// Transport-level detail.
    Trace,
}

impl LogLevel {
    /// Returns the filter directive for the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
///
/// Returns the path and whether it was named explicitly.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Some(env_path) = read_env_nonempty(CONFIG_ENV_VAR)? {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Reads an environment variable, enforcing UTF-8 and rejecting empty values.
fn read_env_nonempty(name: &str) -> Result<Option<String>, ConfigError> {
    let Some(raw) = env::var_os(name) else {
        return Ok(None);
    };
    let value =
        raw.into_string().map_err(|_| ConfigError::Invalid(format!("{name} must be valid UTF-8")))?;
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{name} must not be empty")));
    }
    Ok(Some(value))
}

/// Validates the gateway base URL.
fn validate_base_url(value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid("gateway.base_url must be non-empty".to_string()));
    }
    if trimmed.len() > MAX_BASE_URL_LENGTH {
        return Err(ConfigError::Invalid("gateway.base_url exceeds max length".to_string()));
    }
    let url = Url::parse(trimmed)
        .map_err(|_| ConfigError::Invalid("gateway.base_url must be an absolute url".to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        _ => {
            return Err(ConfigError::Invalid(
                "gateway.base_url must use http or https".to_string(),
            ));
        }
    }
    if url.host_str().is_none() {
        return Err(ConfigError::Invalid("gateway.base_url requires a host".to_string()));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(ConfigError::Invalid(
            "gateway.base_url must not embed credentials".to_string(),
        ));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::Invalid(
            "gateway.base_url must not carry a query or fragment".to_string(),
        ));
    }
    Ok(())
}

/// Validates an endpoint path value.
fn validate_endpoint_path(field: &str, value: &str) -> Result<(), ConfigError> {
    if !value.starts_with('/') {
        return Err(ConfigError::Invalid(format!("{field} must start with '/'")));
    }
    if value.len() > MAX_ENDPOINT_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid(format!("{field} must not contain whitespace")));
    }
    Ok(())
}

/// Validates a timeout value against global bounds.
fn validate_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if !(MIN_TIMEOUT_MS ..= MAX_TIMEOUT_MS).contains(&value) {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}"
        )));
    }
    Ok(())
}

/// Default gateway base URL.
pub(crate) fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

/// Default health-check path.
pub(crate) fn default_health_path() -> String {
    "/health".to_string()
}

/// Default development login path.
pub(crate) fn default_login_path() -> String {
    "/dev-login".to_string()
}

/// Default device session listing path.
pub(crate) fn default_sessions_path() -> String {
    "/api/whatsapp/sessions".to_string()
}

/// Default text send path.
pub(crate) fn default_send_text_path() -> String {
    "/api/whatsapp/messages/send".to_string()
}

/// Default image send path.
pub(crate) fn default_send_image_path() -> String {
    "/api/whatsapp/messages/send/image".to_string()
}

/// Default document send path.
pub(crate) fn default_send_document_path() -> String {
    "/api/whatsapp/messages/send/document".to_string()
}

/// Default message log path.
pub(crate) fn default_messages_path() -> String {
    "/api/whatsapp/messages?limit=10".to_string()
}

/// Default dashboard path.
pub(crate) fn default_dashboard_path() -> String {
    "/dashboard".to_string()
}

/// Default user agent.
pub(crate) fn default_user_agent() -> String {
    concat!("gateway-probe/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Default gateway start command hint.
pub(crate) fn default_start_hint() -> String {
    "npm run dev".to_string()
}

/// Default availability probe timeout in milliseconds.
pub(crate) const fn default_health_timeout_ms() -> u64 {
    5_000
}

/// Default login and discovery timeout in milliseconds.
pub(crate) const fn default_request_timeout_ms() -> u64 {
    10_000
}

/// Default send and upload timeout in milliseconds.
pub(crate) const fn default_upload_timeout_ms() -> u64 {
    30_000
}

/// Default recipient placeholder.
pub(crate) fn default_recipient() -> String {
    "+6281234567890".to_string()
}

/// Default delay between probes in milliseconds.
pub(crate) const fn default_inter_probe_delay_ms() -> u64 {
    2_000
}

/// Probes are enabled unless turned off.
pub(crate) const fn default_enabled() -> bool {
    true
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions are permitted."
)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_preserves_base_prefix() {
        let gateway = GatewayConfig {
            base_url: "http://127.0.0.1:9000/gw/".to_string(),
            ..GatewayConfig::default()
        };
        let url = gateway.endpoint("/health").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/gw/health");
    }

    #[test]
    fn endpoint_keeps_query_from_path() {
        let gateway = GatewayConfig::default();
        let url = gateway.endpoint(&gateway.messages_path).unwrap();
        assert_eq!(url.query(), Some("limit=10"));
    }

    #[test]
    fn validate_endpoint_path_requires_leading_slash() {
        let result = validate_endpoint_path("gateway.health_path", "health");
        assert!(result.unwrap_err().to_string().contains("must start with '/'"));
    }

    #[test]
    fn validate_timeout_rejects_out_of_range() {
        assert!(validate_timeout("timeouts.health_ms", 0).is_err());
        assert!(validate_timeout("timeouts.health_ms", MAX_TIMEOUT_MS + 1).is_err());
        assert!(validate_timeout("timeouts.health_ms", MIN_TIMEOUT_MS).is_ok());
    }

    #[test]
    fn validate_base_url_rejects_credentials() {
        let err = validate_base_url("http://user:pw@localhost:3000").unwrap_err();
        assert!(err.to_string().contains("credentials"));
    }

    #[test]
    fn log_level_labels_are_filter_directives() {
        assert_eq!(LogLevel::default().as_str(), "warn");
        assert_eq!(LogLevel::Trace.as_str(), "trace");
    }
}
