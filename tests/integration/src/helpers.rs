//! Test helpers for integration tests
//!
//! Mock REST and gateway servers bound to ephemeral ports, and a client
//! configuration pointing at them.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use parking_lot::Mutex;
use revolt_common::{
    try_init_tracing_with_config, ClientConfig, GatewayConfig, HttpConfig, TracingConfig,
};
use revolt_http::{HEADER_REMAINING, HEADER_RESET_AFTER};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::Level;

use crate::fixtures::{ready_frame, TOKEN};

async fn bind() -> Result<(TcpListener, SocketAddr)> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    Ok((listener, addr))
}

/// Install the log subscriber once per test binary
///
/// `RUST_LOG` overrides the default warn level.
pub fn init_test_tracing() {
    // Every test after the first finds the subscriber already set
    let _ = try_init_tracing_with_config(TracingConfig::development().with_level(Level::WARN));
}

/// Client configuration against the two mock servers, with short timers
pub fn client_config(rest: &MockRest, gateway: &MockGateway) -> ClientConfig {
    ClientConfig::new(TOKEN)
        .with_http(HttpConfig {
            api_url: rest.url(),
            ..HttpConfig::default()
        })
        .with_gateway(GatewayConfig {
            ws_url: gateway.url(),
            heartbeat_interval: Duration::from_millis(100),
            heartbeat_timeout: Duration::from_millis(300),
            reconnect_interval: Duration::from_millis(100),
            ..GatewayConfig::default()
        })
}

/// Poll `condition` until it holds or `timeout` passes
pub async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

// ============================================================================
// Mock REST
// ============================================================================

/// Scripted reply for one route
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl MockResponse {
    pub fn json(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            headers: Vec::new(),
            body,
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: serde_json::json!({"type": status.canonical_reason().unwrap_or("Error")}),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Attach rate-limit quota headers
    pub fn ratelimited(self, remaining: u32, reset_after_ms: u64) -> Self {
        self.with_header(HEADER_REMAINING, &remaining.to_string())
            .with_header(HEADER_RESET_AFTER, &reset_after_ms.to_string())
    }
}

impl IntoResponse for MockResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.insert(name, value);
            }
        }
        (self.status, headers, axum::Json(self.body)).into_response()
    }
}

/// A request as the mock server saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
    pub at: Instant,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Default)]
struct RestState {
    routes: Mutex<HashMap<(Method, String), MockResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

async fn rest_handler(
    State(state): State<Arc<RestState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    state.requests.lock().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        headers,
        body: serde_json::from_slice(&body).ok(),
        at: Instant::now(),
    });

    let scripted = state.routes.lock().get(&(method, path)).cloned();
    scripted
        .unwrap_or_else(|| MockResponse::status(StatusCode::NOT_FOUND))
        .into_response()
}

/// REST server answering scripted routes; unknown routes get 404
pub struct MockRest {
    pub addr: SocketAddr,
    state: Arc<RestState>,
    _handle: JoinHandle<()>,
}

impl MockRest {
    pub async fn start() -> Result<Self> {
        init_test_tracing();
        let state = Arc::new(RestState::default());
        let app = Router::new()
            .fallback(rest_handler)
            .with_state(Arc::clone(&state));

        let (listener, addr) = bind().await?;
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            state,
            _handle: handle,
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Script the reply for `method path`
    pub fn respond(&self, method: Method, path: &str, response: MockResponse) {
        self.state
            .routes
            .lock()
            .insert((method, path.to_string()), response);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }
}

// ============================================================================
// Mock Gateway
// ============================================================================

struct GatewayState {
    ready: Value,
    answer_pings: AtomicBool,
    connections: AtomicUsize,
    tokens: Mutex<Vec<String>>,
    received: Mutex<Vec<Value>>,
    push: broadcast::Sender<String>,
    kick: broadcast::Sender<()>,
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<GatewayState>>) -> Response {
    ws.on_upgrade(move |socket| gateway_session(socket, state))
}

/// One client connection: authenticate, send `Ready`, answer pings
async fn gateway_session(mut socket: WebSocket, state: Arc<GatewayState>) {
    state.connections.fetch_add(1, Ordering::SeqCst);
    let mut push = state.push.subscribe();
    let mut kick = state.kick.subscribe();

    loop {
        tokio::select! {
            _ = kick.recv() => return,
            frame = push.recv() => {
                let Ok(frame) = frame else { return };
                if socket.send(Message::Text(frame)).await.is_err() {
                    return;
                }
            }
            message = socket.recv() => {
                let Some(Ok(message)) = message else { return };
                let Message::Text(text) = message else { continue };
                let Ok(frame) = serde_json::from_str::<Value>(&text) else { continue };
                state.received.lock().push(frame.clone());

                let reply = match frame["type"].as_str() {
                    Some("Authenticate") => {
                        let token = frame["token"].as_str().unwrap_or_default().to_string();
                        state.tokens.lock().push(token);
                        if socket
                            .send(Message::Text(r#"{"type":"Authenticated"}"#.to_string()))
                            .await
                            .is_err()
                        {
                            return;
                        }
                        Some(state.ready.to_string())
                    }
                    Some("Ping") if state.answer_pings.load(Ordering::SeqCst) => {
                        Some(serde_json::json!({"type": "Pong", "data": frame["data"]}).to_string())
                    }
                    _ => None,
                };

                if let Some(reply) = reply {
                    if socket.send(Message::Text(reply)).await.is_err() {
                        return;
                    }
                }
            }
        }
    }
}

/// Gateway server speaking the JSON protocol
pub struct MockGateway {
    pub addr: SocketAddr,
    state: Arc<GatewayState>,
    _handle: JoinHandle<()>,
}

impl MockGateway {
    /// Start with the default `Ready` fixture
    pub async fn start() -> Result<Self> {
        Self::start_with_ready(ready_frame()).await
    }

    pub async fn start_with_ready(ready: Value) -> Result<Self> {
        init_test_tracing();
        let (push, _) = broadcast::channel(64);
        let (kick, _) = broadcast::channel(4);
        let state = Arc::new(GatewayState {
            ready,
            answer_pings: AtomicBool::new(true),
            connections: AtomicUsize::new(0),
            tokens: Mutex::new(Vec::new()),
            received: Mutex::new(Vec::new()),
            push,
            kick,
        });

        let app = Router::new()
            .route("/", get(ws_handler))
            .with_state(Arc::clone(&state));

        let (listener, addr) = bind().await?;
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            state,
            _handle: handle,
        })
    }

    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Send a frame to every connected client
    pub fn push(&self, frame: &Value) {
        let _ = self.state.push.send(frame.to_string());
    }

    /// Drop every open connection
    pub fn disconnect_all(&self) {
        let _ = self.state.kick.send(());
    }

    pub fn set_answer_pings(&self, answer: bool) {
        self.state.answer_pings.store(answer, Ordering::SeqCst);
    }

    /// Number of sessions accepted so far
    pub fn connections(&self) -> usize {
        self.state.connections.load(Ordering::SeqCst)
    }

    /// Tokens presented by `Authenticate`, one per session
    pub fn tokens(&self) -> Vec<String> {
        self.state.tokens.lock().clone()
    }

    /// Every frame received from clients
    pub fn received(&self) -> Vec<Value> {
        self.state.received.lock().clone()
    }

    /// Received frames of one `type`
    pub fn received_of(&self, kind: &str) -> Vec<Value> {
        self.received()
            .into_iter()
            .filter(|frame| frame["type"] == kind)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revolt_common::{try_init_tracing, TracingError};

    #[tokio::test]
    async fn test_mock_servers_install_subscriber() {
        let _rest = MockRest::start().await.unwrap();

        assert!(matches!(
            try_init_tracing(),
            Err(TracingError::AlreadyInitialized)
        ));
    }
}
