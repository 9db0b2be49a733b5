// crates/gateway-probe-core/tests/common/mod.rs
// ============================================================================
// Module: Stub Gateway
// Description: Loopback HTTP stub that plays the messaging gateway.
// Purpose: Drive harness stages against scripted responses and record calls.
// Dependencies: tiny_http, serde_json
// ============================================================================

//! ## Overview
//! [`StubGateway`] serves scripted responses per request path on an
//! ephemeral loopback port and records every request it receives. Routes
//! default to a healthy gateway with one connected device; tests override
//! individual routes. Authenticated routes answer 401 unless the request
//! carries the session cookie set by the login route.

#![allow(dead_code, reason = "Common module may have unused helpers.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::thread::JoinHandle;

use gateway_probe_config::GatewayProbeConfig;
use serde_json::Value;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Cookie issued by the stub login route.
pub const SESSION_COOKIE: &str = "gateway_session=stub-token";

/// Paths that require the session cookie.
const AUTHENTICATED_PATHS: [&str; 4] = [
    "/api/whatsapp/sessions",
    "/api/whatsapp/messages/send",
    "/api/whatsapp/messages/send/image",
    "/api/whatsapp/messages/send/document",
];

// ============================================================================
// SECTION: Types
// ============================================================================

/// Scripted response for one path.
#[derive(Debug, Clone)]
pub struct Route {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
    /// Extra response headers.
    pub headers: Vec<(String, String)>,
}

impl Route {
    /// JSON response with the given status.
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        }
    }

    /// Plain text response with the given status.
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: Vec::new(),
        }
    }

    /// Adds a response header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Request observed by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Path without query string.
    pub path: String,
    /// Cookie header, if any.
    pub cookie: Option<String>,
    /// Content-Type header, if any.
    pub content_type: Option<String>,
    /// Raw body.
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Body decoded lossily.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Running stub gateway.
pub struct StubGateway {
    /// Base URL of the stub.
    base_url: String,
    /// Shared server handle used for shutdown.
    server: Arc<Server>,
    /// Requests received so far.
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Serving thread.
    handle: Option<JoinHandle<()>>,
}

// ============================================================================
// SECTION: Route Presets
// ============================================================================

/// Routes of a healthy gateway with one connected device.
pub fn healthy_routes() -> BTreeMap<String, Route> {
    let accepted = json!({ "success": true, "data": { "messageId": "m-1" } });
    let mut routes = BTreeMap::new();
    routes.insert("/health".to_string(), Route::json(200, &json!({ "status": "ok" })));
    routes.insert(
        "/dev-login".to_string(),
        Route::text(302, "")
            .with_header("Location", "/dashboard")
            .with_header("Set-Cookie", &format!("{SESSION_COOKIE}; Path=/; HttpOnly")),
    );
    routes.insert(
        "/api/whatsapp/sessions".to_string(),
        Route::json(
            200,
            &json!({
                "success": true,
                "data": [
                    { "id": 42, "name": "Primary", "status": "connected", "phone": "+15550001" },
                    { "id": 43, "name": "Backup", "status": "disconnected" }
                ]
            }),
        ),
    );
    routes.insert("/api/whatsapp/messages/send".to_string(), Route::json(200, &accepted));
    routes.insert("/api/whatsapp/messages/send/image".to_string(), Route::json(200, &accepted));
    routes.insert("/api/whatsapp/messages/send/document".to_string(), Route::json(200, &accepted));
    routes
}

// ============================================================================
// SECTION: Stub Gateway
// ============================================================================

impl StubGateway {
    /// Starts a healthy stub gateway.
    pub fn healthy() -> Self {
        Self::start(healthy_routes())
    }

    /// Starts a healthy stub gateway with one route replaced.
    pub fn with_route(path: &str, route: Route) -> Self {
        let mut routes = healthy_routes();
        routes.insert(path.to_string(), route);
        Self::start(routes)
    }

    /// Starts a stub gateway serving the given routes.
    pub fn start(routes: BTreeMap<String, Route>) -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let addr = server.server_addr().to_ip().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handle = {
            let server = Arc::clone(&server);
            let requests = Arc::clone(&requests);
            thread::spawn(move || serve(&server, &routes, &requests))
        };
        Self {
            base_url: format!("http://{addr}"),
            server,
            requests,
            handle: Some(handle),
        }
    }

    /// Base URL of the stub.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Harness configuration pointed at the stub with no inter-probe delay.
    pub fn config(&self) -> GatewayProbeConfig {
        let mut config = GatewayProbeConfig::default();
        config.gateway.base_url = self.base_url.clone();
        config.probes.inter_probe_delay_ms = 0;
        config.timeouts.health_ms = 2_000;
        config.timeouts.request_ms = 2_000;
        config.timeouts.upload_ms = 5_000;
        config
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Paths requested so far, in order.
    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|request| request.path).collect()
    }

    /// Requests received for one path.
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests().into_iter().filter(|request| request.path == path).collect()
    }
}

impl Drop for StubGateway {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Serves requests until the server is unblocked.
fn serve(
    server: &Server,
    routes: &BTreeMap<String, Route>,
    requests: &Mutex<Vec<RecordedRequest>>,
) {
    while let Ok(mut request) = server.recv() {
        let path = request.url().split('?').next().unwrap_or_default().to_string();
        let header = |name: &'static str| {
            request
                .headers()
                .iter()
                .find(|header| header.field.equiv(name))
                .map(|header| header.value.as_str().to_string())
        };
        let cookie = header("Cookie");
        let content_type = header("Content-Type");
        let mut body = Vec::new();
        let _ = request.as_reader().read_to_end(&mut body);
        requests.lock().unwrap().push(RecordedRequest {
            method: request.method().as_str().to_string(),
            path: path.clone(),
            cookie: cookie.clone(),
            content_type,
            body,
        });

        let authorized = cookie.as_deref().is_some_and(|value| value.contains(SESSION_COOKIE));
        let route = if AUTHENTICATED_PATHS.contains(&path.as_str()) && !authorized {
            Route::json(401, &json!({ "success": false, "error": "unauthorized" }))
        } else {
            routes
                .get(&path)
                .cloned()
                .unwrap_or_else(|| Route::json(404, &json!({ "success": false, "error": "not found" })))
        };
        let mut response = Response::from_string(route.body).with_status_code(route.status);
        for (name, value) in &route.headers {
            response.add_header(Header::from_bytes(name.as_bytes(), value.as_bytes()).unwrap());
        }
        let _ = request.respond(response);
    }
}
