// crates/gateway-probe-core/src/session.rs
// ============================================================================
// Module: Gateway Session
// Description: Cookie-backed HTTP session shared by every harness stage.
// Purpose: Resolve endpoints, issue bounded requests, and perform dev login.
// Dependencies: gateway-probe-config, reqwest, serde, tracing
// ============================================================================

//! ## Overview
//! [`GatewaySession`] owns the single HTTP client used for the whole run. The
//! client keeps a cookie store, so the session cookie set by
//! [`GatewaySession::login`] is attached to every later request. Redirects
//! are never followed; each request carries an explicit timeout and response
//! bodies are read under a hard byte limit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use gateway_probe_config::GatewayProbeConfig;
use gateway_probe_config::TimeoutConfig;
use reqwest::Client;
use reqwest::RequestBuilder;
use reqwest::header::ACCEPT;
use reqwest::header::LOCATION;
use reqwest::multipart::Form;
use reqwest::redirect::Policy;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use tracing::info;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum gateway response body size accepted by the harness.
pub const MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// Number of body characters kept in error previews.
const BODY_PREVIEW_CHARS: usize = 512;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Gateway transport errors.
///
/// # Invariants
/// - String payloads are user-facing and may include untrusted server text.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration could not be turned into a client or endpoint.
    #[error("gateway client config error: {0}")]
    Config(String),
    /// Connection, protocol, or body read failure.
    #[error("gateway transport error: {0}")]
    Transport(String),
    /// The request exceeded its timeout.
    #[error("gateway request timed out after {}ms", .timeout.as_millis())]
    Timeout {
        /// Timeout applied to the request.
        timeout: Duration,
    },
    /// Response size exceeds limits.
    #[error("gateway response exceeds size limit ({actual} > {limit})")]
    ResponseTooLarge {
        /// Actual size in bytes.
        actual: usize,
        /// Maximum size in bytes.
        limit: usize,
    },
    /// The gateway answered with a status the caller does not accept.
    #[error("gateway returned http status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Body preview.
        body: String,
    },
}

/// Resolved gateway endpoint URLs.
///
/// # Invariants
/// - Every URL is absolute and shares the configured base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Gateway base URL as configured.
    pub base: Url,
    /// Health-check endpoint.
    pub health: Url,
    /// Development login endpoint.
    pub login: Url,
    /// Device session listing endpoint.
    pub sessions: Url,
    /// Text send endpoint.
    pub send_text: Url,
    /// Image send endpoint.
    pub send_image: Url,
    /// Document send endpoint.
    pub send_document: Url,
    /// Message log endpoint.
    pub messages: Url,
    /// Dashboard page.
    pub dashboard: Url,
}

impl Endpoints {
    /// Resolves every endpoint from the gateway config.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] when an endpoint is not a valid URL.
    pub fn from_config(config: &GatewayProbeConfig) -> Result<Self, GatewayError> {
        let gateway = &config.gateway;
        let resolve =
            |path: &str| gateway.endpoint(path).map_err(|err| GatewayError::Config(err.to_string()));
        let base = Url::parse(gateway.base_url.trim())
            .map_err(|err| GatewayError::Config(format!("invalid base url: {err}")))?;
        Ok(Self {
            base,
            health: resolve(&gateway.health_path)?,
            login: resolve(&gateway.login_path)?,
            sessions: resolve(&gateway.sessions_path)?,
            send_text: resolve(&gateway.send_text_path)?,
            send_image: resolve(&gateway.send_image_path)?,
            send_document: resolve(&gateway.send_document_path)?,
            messages: resolve(&gateway.messages_path)?,
            dashboard: resolve(&gateway.dashboard_path)?,
        })
    }
}

/// Buffered gateway response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Location` header value when present.
    pub location: Option<String>,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl GatewayResponse {
    /// Returns true for HTTP 200.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Returns the body decoded lossily as UTF-8.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Returns a trimmed, length-bounded body preview for diagnostics.
    #[must_use]
    pub fn body_preview(&self) -> String {
        let text = self.body_text();
        let trimmed = text.trim();
        if trimmed.chars().count() <= BODY_PREVIEW_CHARS {
            return trimmed.to_string();
        }
        let mut preview: String = trimmed.chars().take(BODY_PREVIEW_CHARS).collect();
        preview.push_str("...");
        preview
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Result of a successful development login.
///
/// # Invariants
/// - `Redirected::status` is one of 301, 302, 303, 307, 308.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoginOutcome {
    /// The gateway answered 200 directly.
    Direct,
    /// The gateway answered with a redirect after setting the session.
    Redirected {
        /// Redirect status code.
        status: u16,
        /// Redirect target when provided.
        location: Option<String>,
    },
}

/// Authenticated HTTP session against the gateway.
///
/// # Invariants
/// - One client (and one cookie store) is used for the entire run.
/// - Cookies accumulate and are never cleared.
pub struct GatewaySession {
    /// Cookie-backed HTTP client.
    client: Client,
    /// Resolved endpoint URLs.
    endpoints: Endpoints,
    /// Per-stage timeouts.
    timeouts: TimeoutConfig,
}

impl GatewaySession {
    /// Builds a session from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] when endpoints cannot be resolved or
    /// the HTTP client cannot be constructed.
    pub fn new(config: &GatewayProbeConfig) -> Result<Self, GatewayError> {
        let endpoints = Endpoints::from_config(config)?;
        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .user_agent(config.gateway.user_agent.clone())
            .build()
            .map_err(|err| GatewayError::Config(err.to_string()))?;
        Ok(Self {
            client,
            endpoints,
            timeouts: config.timeouts,
        })
    }

    /// Returns the resolved endpoints.
    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Returns the configured timeouts.
    #[must_use]
    pub const fn timeouts(&self) -> &TimeoutConfig {
        &self.timeouts
    }

    /// Performs the development login handshake.
    ///
    /// Accepts HTTP 200 or a redirect status; cookies set by the response stay
    /// in the client's cookie store for every later request.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] on transport failure or any other status.
    pub async fn login(&self) -> Result<LoginOutcome, GatewayError> {
        let url = &self.endpoints.login;
        info!(url = %url, "performing development login");
        let request = self.client.get(url.clone()).header(ACCEPT, "text/html,application/json");
        let response = self.send(request, self.timeouts.request()).await?;
        match response.status {
            200 => Ok(LoginOutcome::Direct),
            301 | 302 | 303 | 307 | 308 => Ok(LoginOutcome::Redirected {
                status: response.status,
                location: response.location,
            }),
            status => Err(GatewayError::UnexpectedStatus {
                status,
                body: response.body_preview(),
            }),
        }
    }

    /// Issues a GET request with the given timeout.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] on transport failure, timeout, or oversize body.
    pub async fn get(&self, url: &Url, timeout: Duration) -> Result<GatewayResponse, GatewayError> {
        let request = self.client.get(url.clone()).header(ACCEPT, "application/json");
        self.send(request, timeout).await
    }

    /// Issues a JSON POST request with the upload timeout.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] on transport failure, timeout, or oversize body.
    pub async fn post_json<T: Serialize + Sync>(
        &self,
        url: &Url,
        payload: &T,
    ) -> Result<GatewayResponse, GatewayError> {
        let request =
            self.client.post(url.clone()).header(ACCEPT, "application/json").json(payload);
        self.send(request, self.timeouts.upload()).await
    }

    /// Issues a multipart POST request with the upload timeout.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] on transport failure, timeout, or oversize body.
    pub async fn post_multipart(
        &self,
        url: &Url,
        form: Form,
    ) -> Result<GatewayResponse, GatewayError> {
        let request =
            self.client.post(url.clone()).header(ACCEPT, "application/json").multipart(form);
        self.send(request, self.timeouts.upload()).await
    }

    /// Sends a request and buffers the response under the byte limit.
    async fn send(
        &self,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<GatewayResponse, GatewayError> {
        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| map_transport_error(&err, timeout))?;
        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = read_response_body_with_limit(response, MAX_RESPONSE_BYTES, timeout).await?;
        debug!(
            status = status.as_u16(),
            bytes = body.len(),
            body = %String::from_utf8_lossy(&body),
            "gateway response"
        );
        Ok(GatewayResponse {
            status: status.as_u16(),
            location,
            body,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Classifies a reqwest failure as a timeout or transport error.
fn map_transport_error(err: &reqwest::Error, timeout: Duration) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout {
            timeout,
        }
    } else {
        GatewayError::Transport(err.to_string())
    }
}

/// Reads a response body while enforcing a hard byte limit.
async fn read_response_body_with_limit(
    mut response: reqwest::Response,
    limit: usize,
    timeout: Duration,
) -> Result<Vec<u8>, GatewayError> {
    let mut body = Vec::new();
    let mut total: usize = 0;
    while let Some(chunk) =
        response.chunk().await.map_err(|err| map_transport_error(&err, timeout))?
    {
        let next_total = total.checked_add(chunk.len()).ok_or(GatewayError::ResponseTooLarge {
            actual: usize::MAX,
            limit,
        })?;
        if next_total > limit {
            return Err(GatewayError::ResponseTooLarge {
                actual: next_total,
                limit,
            });
        }
        body.extend_from_slice(&chunk);
        total = next_total;
    }
    Ok(body)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use gateway_probe_config::GatewayProbeConfig;

    use super::Endpoints;
    use super::GatewayResponse;

    #[test]
    fn endpoints_resolve_against_base_prefix() {
        let mut config = GatewayProbeConfig::default();
        config.gateway.base_url = "http://127.0.0.1:4000/gateway".to_string();
        let endpoints = Endpoints::from_config(&config).unwrap();
        assert_eq!(endpoints.health.as_str(), "http://127.0.0.1:4000/gateway/health");
        assert_eq!(
            endpoints.send_document.as_str(),
            "http://127.0.0.1:4000/gateway/api/whatsapp/messages/send/document"
        );
    }

    #[test]
    fn body_preview_truncates_long_bodies() {
        let response = GatewayResponse {
            status: 500,
            location: None,
            body: "x".repeat(2_000).into_bytes(),
        };
        let preview = response.body_preview();
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 515);
    }

    #[test]
    fn body_text_is_lossy_for_invalid_utf8() {
        let response = GatewayResponse {
            status: 200,
            location: None,
            body: vec![0xFF, b'o', b'k'],
        };
        assert!(response.body_text().ends_with("ok"));
    }
}
