// crates/gateway-probe-cli/tests/common/mod.rs
// ============================================================================
// Module: CLI Test Harness
// Description: Stub gateway and binary launcher for end-to-end CLI tests.
// Purpose: Run the gateway-probe binary against scripted gateway responses.
// Dependencies: tiny_http, serde_json, tempfile
// ============================================================================

//! ## Overview
//! [`StubGateway`] answers per-path scripted responses on a loopback port,
//! optionally after a delay, and records request paths. [`ProbeCommand`]
//! writes a config file pointing at the stub into a scratch directory and
//! launches the binary from there with the probe environment cleared.

#![allow(dead_code, reason = "Common module may have unused helpers.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

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
    /// Pause before responding.
    pub delay: Duration,
}

impl Route {
    /// JSON response with the given status.
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            delay: Duration::ZERO,
        }
    }

    /// Adds a response header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Delays the response.
    pub const fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Running stub gateway.
pub struct StubGateway {
    /// Base URL of the stub.
    base_url: String,
    /// Shared server handle used for shutdown.
    server: Arc<Server>,
    /// Paths requested so far.
    paths: Arc<Mutex<Vec<String>>>,
    /// Serving thread.
    handle: Option<JoinHandle<()>>,
}

/// Routes of a healthy gateway with one connected device.
pub fn healthy_routes() -> BTreeMap<String, Route> {
    let accepted = json!({ "success": true, "data": { "messageId": "m-1" } });
    let mut routes = BTreeMap::new();
    routes.insert("/health".to_string(), Route::json(200, &json!({ "status": "ok" })));
    routes.insert(
        "/dev-login".to_string(),
        Route::json(200, &json!({ "ok": true }))
            .with_header("Set-Cookie", "gateway_session=cli-token; Path=/"),
    );
    routes.insert(
        "/api/whatsapp/sessions".to_string(),
        Route::json(
            200,
            &json!({
                "success": true,
                "data": [{ "id": 7, "name": "Front Desk", "status": "connected" }]
            }),
        ),
    );
    routes.insert("/api/whatsapp/messages/send".to_string(), Route::json(200, &accepted));
    routes.insert("/api/whatsapp/messages/send/image".to_string(), Route::json(200, &accepted));
    routes.insert("/api/whatsapp/messages/send/document".to_string(), Route::json(200, &accepted));
    routes
}

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
        let paths = Arc::new(Mutex::new(Vec::new()));
        let handle = {
            let server = Arc::clone(&server);
            let paths = Arc::clone(&paths);
            thread::spawn(move || serve(&server, &routes, &paths))
        };
        Self {
            base_url: format!("http://{addr}"),
            server,
            paths,
            handle: Some(handle),
        }
    }

    /// Base URL of the stub.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Paths requested so far, in order.
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }

    /// Number of requests made to the send endpoints.
    pub fn send_count(&self) -> usize {
        self.paths().iter().filter(|path| path.contains("/messages/send")).count()
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

/// Serves requests until the server is unblocked.
fn serve(server: &Server, routes: &BTreeMap<String, Route>, paths: &Mutex<Vec<String>>) {
    while let Ok(mut request) = server.recv() {
        let path = request.url().split('?').next().unwrap_or_default().to_string();
        let mut body = Vec::new();
        let _ = request.as_reader().read_to_end(&mut body);
        paths.lock().unwrap().push(path.clone());

        let route = routes
            .get(&path)
            .cloned()
            .unwrap_or_else(|| Route::json(404, &json!({ "success": false, "error": "not found" })));
        if !route.delay.is_zero() {
            thread::sleep(route.delay);
        }
        let mut response = Response::from_string(route.body).with_status_code(route.status);
        for (name, value) in &route.headers {
            response.add_header(Header::from_bytes(name.as_bytes(), value.as_bytes()).unwrap());
        }
        let _ = request.respond(response);
    }
}

// ============================================================================
// SECTION: Binary Launcher
// ============================================================================

/// Path to the compiled binary.
pub fn gateway_probe_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_gateway-probe"))
}

/// Scratch directory holding a config file for one invocation.
pub struct ProbeCommand {
    /// Scratch directory used as the working directory.
    dir: TempDir,
    /// Written config path.
    config_path: PathBuf,
}

impl ProbeCommand {
    /// Writes a config that targets `base_url` with no inter-probe delay.
    pub fn for_gateway(base_url: &str) -> Self {
        Self::with_config(&format!(
            r#"
[gateway]
base_url = "{base_url}"

[timeouts]
health_ms = 2000
request_ms = 2000
upload_ms = 10000

[probes]
inter_probe_delay_ms = 0
"#
        ))
    }

    /// Writes the given config body verbatim.
    pub fn with_config(body: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("probe.toml");
        fs::write(&config_path, body.trim()).unwrap();
        Self {
            dir,
            config_path,
        }
    }

    /// Builds the command with `args` after `--config <path> --no-color`.
    pub fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(gateway_probe_bin());
        command
            .current_dir(self.dir.path())
            .env_remove("GATEWAY_PROBE_CONFIG")
            .env_remove("GATEWAY_PROBE_BASE_URL")
            .env_remove("GATEWAY_PROBE_LOG")
            .env("NO_COLOR", "1")
            .arg("--config")
            .arg(&self.config_path)
            .arg("--no-color")
            .args(args);
        command
    }
}
