//! Connection manager
//!
//! Owns the lifecycle of the single gateway connection: connect,
//! authenticate, heartbeat, detect loss and reconnect until closed.

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use revolt_cache::CacheWriter;
use revolt_common::{Diagnostic, GatewayConfig, SharedSink};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use super::{ConnectionState, GatewaySender, Heartbeat, PongOutcome};
use crate::dispatch::{Context, Dispatcher, Observers};
use crate::error::{GatewayError, GatewayResult};
use crate::events::{Decoder, Event, EventKind};
use crate::protocol::ClientMessage;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Upper bound on the closing handshake when a session ends
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

struct Inner {
    token: String,
    config: GatewayConfig,
    state: watch::Sender<ConnectionState>,
    heartbeat: Arc<Heartbeat>,
    sender: GatewaySender,
    observers: Arc<Observers>,
    sink: SharedSink,
    decoder: Decoder,
    /// Taken by `open()`; moved into the dispatch task
    writer: Mutex<Option<CacheWriter>>,
    task: Mutex<Option<JoinHandle<()>>>,
    shutdown: CancellationToken,
}

/// Handle to the gateway connection
///
/// Clones share the same connection.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<Inner>,
}

impl Gateway {
    /// Create a gateway in the `Disconnected` state
    ///
    /// The cache writer is moved into the dispatch task on `open()`.
    pub fn new(
        token: impl Into<String>,
        config: GatewayConfig,
        writer: CacheWriter,
        sink: SharedSink,
    ) -> Self {
        let heartbeat = Heartbeat::new(config.heartbeat_interval, config.heartbeat_timeout);
        let (state, _) = watch::channel(ConnectionState::Disconnected);

        Self {
            inner: Arc::new(Inner {
                token: token.into(),
                config,
                state,
                heartbeat: Arc::new(heartbeat),
                sender: GatewaySender::default(),
                observers: Arc::new(Observers::new()),
                decoder: Decoder::new(Arc::clone(&sink)),
                sink,
                writer: Mutex::new(Some(writer)),
                task: Mutex::new(None),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Start the connection loop
    ///
    /// Valid once, on a gateway that has not been closed. Must be called
    /// from within a Tokio runtime.
    pub fn open(&self) -> GatewayResult<()> {
        if self.inner.shutdown.is_cancelled() {
            return Err(GatewayError::Closed);
        }
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(GatewayError::NoRuntime);
        }
        let writer = self
            .inner
            .writer
            .lock()
            .take()
            .ok_or(GatewayError::AlreadyOpen)?;

        let dispatcher = Dispatcher::new(
            writer,
            Arc::clone(&self.inner.observers),
            Arc::clone(&self.inner.sink),
            self.inner.sender.clone(),
        );
        let task = tokio::spawn(Arc::clone(&self.inner).run(dispatcher));
        *self.inner.task.lock() = Some(task);

        tracing::debug!(url = %self.inner.config.ws_url, "Gateway opened");
        Ok(())
    }

    /// Stop every task and settle in `Disconnected`; the gateway cannot be
    /// reopened afterwards
    pub async fn close(&self) {
        self.inner.shutdown.cancel();
        self.inner.writer.lock().take();

        let task = self.inner.task.lock().take();
        match task {
            Some(task) => {
                if let Err(error) = task.await {
                    tracing::warn!(error = %error, "Gateway task ended abnormally");
                }
            }
            None => self.inner.set_state(ConnectionState::Disconnected),
        }
    }

    /// Whether `close()` has been called
    pub fn is_closed(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.borrow()
    }

    /// Receiver notified on every state transition
    pub fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state.subscribe()
    }

    /// Wait until the connection reaches `target`
    pub async fn wait_for_state(&self, target: ConnectionState) {
        let mut changes = self.state_changes();
        // The sender lives as long as `self`, so this cannot fail
        let _ = changes.wait_for(|state| *state == target).await;
    }

    /// Round trip of the last acknowledged heartbeat
    pub fn latency(&self) -> Option<Duration> {
        self.inner.heartbeat.latency()
    }

    /// Approximate uptime of the current session
    pub fn uptime(&self) -> Duration {
        self.inner.heartbeat.uptime(Instant::now())
    }

    pub fn observers(&self) -> &Arc<Observers> {
        &self.inner.observers
    }

    /// Observe events of one kind
    pub fn on<F>(&self, kind: EventKind, observer: F)
    where
        F: Fn(&Context, &Event) + Send + Sync + 'static,
    {
        self.inner.observers.on(kind, observer);
    }

    /// Observe every event
    pub fn on_all<F>(&self, observer: F)
    where
        F: Fn(&Context, &Event) + Send + Sync + 'static,
    {
        self.inner.observers.on_all(observer);
    }

    pub fn sender(&self) -> GatewaySender {
        self.inner.sender.clone()
    }

    /// Queue a control message on the current session
    pub async fn send(&self, message: ClientMessage) -> GatewayResult<()> {
        self.inner.sender.send(message).await
    }

    pub async fn begin_typing(&self, channel_id: &str) -> GatewayResult<()> {
        self.send(ClientMessage::begin_typing(channel_id)).await
    }

    pub async fn end_typing(&self, channel_id: &str) -> GatewayResult<()> {
        self.send(ClientMessage::end_typing(channel_id)).await
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("url", &self.inner.config.ws_url)
            .field("state", &self.state())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Inner {
    fn set_state(&self, next: ConnectionState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            tracing::debug!(from = %previous, to = %next, "Gateway state changed");
        }
    }

    /// Connection loop; only returns once shutdown is requested
    async fn run(self: Arc<Self>, mut dispatcher: Dispatcher) {
        loop {
            self.set_state(ConnectionState::Connecting);

            if let Err(error) = self.run_session(&mut dispatcher).await {
                tracing::warn!(error = %error, "Gateway session failed");
            }
            self.sender.detach();

            if self.shutdown.is_cancelled() {
                break;
            }

            self.set_state(ConnectionState::Reconnecting);
            tracing::info!(
                delay_ms = self.config.reconnect_interval.as_millis() as u64,
                "Reconnecting to gateway"
            );
            tokio::select! {
                () = self.shutdown.cancelled() => break,
                () = tokio::time::sleep(self.config.reconnect_interval) => {}
            }
        }

        self.set_state(ConnectionState::Disconnected);
        tracing::info!("Gateway closed");
    }

    /// One socket's lifetime, from connect to loss
    async fn run_session(&self, dispatcher: &mut Dispatcher) -> GatewayResult<()> {
        tracing::info!(url = %self.config.ws_url, "Connecting to gateway");

        let connect = tokio_tungstenite::connect_async(self.config.ws_url.as_str());
        let (socket, _response) = tokio::select! {
            () = self.shutdown.cancelled() => return Ok(()),
            result = connect => result?,
        };
        let (mut ws_sink, mut ws_stream) = socket.split();

        self.heartbeat.reset();
        self.set_state(ConnectionState::Authenticating);
        let authenticate = ClientMessage::authenticate(self.token.as_str()).to_json()?;
        ws_sink.send(Message::Text(authenticate)).await?;

        let session = self.shutdown.child_token();
        let (tx, rx) = mpsc::channel(self.config.outbound_buffer.max(1));
        self.sender.attach(tx.clone());
        let writer = tokio::spawn(write_loop(ws_sink, rx, session.clone()));
        let mut heartbeat: Option<JoinHandle<()>> = None;

        let result = loop {
            let frame = tokio::select! {
                () = session.cancelled() => break Ok(()),
                frame = ws_stream.next() => frame,
            };

            let bytes = match frame {
                Some(Ok(Message::Text(text))) => text.into_bytes(),
                Some(Ok(Message::Binary(data))) => data,
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(frame = ?frame, "Gateway closed the connection");
                    break Ok(());
                }
                // Control frames are answered by tungstenite
                Some(Ok(_)) => continue,
                Some(Err(error)) => break Err(GatewayError::from(error)),
                None => {
                    tracing::info!("Gateway stream ended");
                    break Ok(());
                }
            };

            tracing::trace!(bytes = bytes.len(), "RX");
            let Some(event) = self.decoder.decode(&bytes) else {
                continue;
            };
            self.route(&event, &tx, &session, &mut heartbeat);
            dispatcher.dispatch(event);
        };

        session.cancel();
        self.sender.detach();
        drop(tx);
        if let Some(task) = heartbeat {
            if let Err(error) = task.await {
                tracing::warn!(error = %error, "Heartbeat task ended abnormally");
            }
        }
        if let Err(error) = writer.await {
            tracing::warn!(error = %error, "Writer task ended abnormally");
        }

        result
    }

    /// Connection-level handling, ahead of cache and observers
    ///
    /// Sub-events of a `Bulk` are routed in wire order.
    fn route(
        &self,
        event: &Event,
        tx: &mpsc::Sender<ClientMessage>,
        session: &CancellationToken,
        heartbeat: &mut Option<JoinHandle<()>>,
    ) {
        match event {
            Event::Authenticated => {
                if heartbeat.is_none() {
                    self.set_state(ConnectionState::Connected);
                    tracing::info!("Gateway authenticated");
                    *heartbeat = Some(tokio::spawn(heartbeat_loop(
                        Arc::clone(&self.heartbeat),
                        tx.clone(),
                        session.clone(),
                    )));
                }
            }
            Event::Pong(pong) => match self.heartbeat.on_pong(pong.data, Instant::now()) {
                PongOutcome::Acked { latency } => {
                    tracing::trace!(latency_ms = latency.as_millis() as u64, "Heartbeat acknowledged");
                }
                PongOutcome::Mismatch { expected, received } => {
                    self.sink
                        .report(Diagnostic::HeartbeatMismatch { expected, received });
                }
            },
            Event::Error(error) => {
                tracing::warn!(error = %error.error, "Gateway reported an error");
            }
            Event::Bulk(events) => {
                for event in events {
                    self.route(event, tx, session, heartbeat);
                }
            }
            _ => {}
        }
    }
}

/// Send a ping every interval, the first one interval after authentication;
/// drop the session when one goes unanswered
async fn heartbeat_loop(
    heartbeat: Arc<Heartbeat>,
    tx: mpsc::Sender<ClientMessage>,
    session: CancellationToken,
) {
    let interval = heartbeat.interval();
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            () = session.cancelled() => return,
            _ = ticker.tick() => {}
        }

        let now = Instant::now();
        if heartbeat.is_overdue(now) {
            tracing::warn!(
                timeout_ms = heartbeat.timeout().as_millis() as u64,
                "Heartbeat not acknowledged, dropping session"
            );
            session.cancel();
            return;
        }

        let data = heartbeat.next_ping(now);
        if tx.send(ClientMessage::ping(data)).await.is_err() {
            session.cancel();
            return;
        }
        tracing::trace!(data, "Heartbeat sent");
    }
}

/// Drain the outbound queue into the socket
async fn write_loop(
    mut ws_sink: SplitSink<WsStream, Message>,
    mut rx: mpsc::Receiver<ClientMessage>,
    session: CancellationToken,
) {
    loop {
        let message = tokio::select! {
            () = session.cancelled() => break,
            message = rx.recv() => match message {
                Some(message) => message,
                None => break,
            },
        };

        let json = match message.to_json() {
            Ok(json) => json,
            Err(error) => {
                tracing::warn!(kind = message.kind(), error = %error, "Failed to encode gateway message");
                continue;
            }
        };

        tracing::trace!(kind = message.kind(), "TX");
        if let Err(error) = ws_sink.send(Message::Text(json)).await {
            tracing::warn!(error = %error, "Failed to write to gateway");
            session.cancel();
            break;
        }
    }

    if tokio::time::timeout(CLOSE_TIMEOUT, ws_sink.close()).await.is_err() {
        tracing::debug!("Timed out closing gateway socket");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revolt_cache::Cache;
    use revolt_common::{CacheConfig, MemorySink};
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    fn config(url: String) -> GatewayConfig {
        GatewayConfig {
            ws_url: url,
            heartbeat_interval: Duration::from_millis(50),
            heartbeat_timeout: Duration::from_millis(150),
            reconnect_interval: Duration::from_millis(50),
            ..GatewayConfig::default()
        }
    }

    fn gateway(url: String) -> (Gateway, Cache, Arc<MemorySink>) {
        let (cache, writer) = Cache::new(CacheConfig::default());
        let sink = Arc::new(MemorySink::new());
        let gateway = Gateway::new("token", config(url), writer, sink.clone());
        (gateway, cache, sink)
    }

    async fn within<F: std::future::Future>(future: F) -> F::Output {
        tokio::time::timeout(Duration::from_secs(5), future)
            .await
            .expect("timed out")
    }

    fn text(message: Message) -> String {
        match message {
            Message::Text(text) => text,
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_open_twice_rejected() {
        let (gateway, _, _) = gateway("ws://127.0.0.1:9".to_string());
        gateway.open().unwrap();
        assert!(matches!(gateway.open(), Err(GatewayError::AlreadyOpen)));
        gateway.close().await;
    }

    #[tokio::test]
    async fn test_closed_gateway_cannot_open() {
        let (gateway, _, _) = gateway("ws://127.0.0.1:9".to_string());
        gateway.close().await;

        assert_eq!(gateway.state(), ConnectionState::Disconnected);
        assert!(gateway.is_closed());
        assert!(matches!(gateway.open(), Err(GatewayError::Closed)));
    }

    #[test]
    fn test_open_outside_runtime() {
        let (gateway, _, _) = gateway("ws://127.0.0.1:9".to_string());
        assert!(matches!(gateway.open(), Err(GatewayError::NoRuntime)));
    }

    #[tokio::test]
    async fn test_send_without_session() {
        let (gateway, _, _) = gateway("ws://127.0.0.1:9".to_string());
        assert!(matches!(
            gateway.begin_typing("C1").await,
            Err(GatewayError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_then_heartbeat() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        let (gateway, _, sink) = gateway(url);

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();

            let auth: serde_json::Value =
                serde_json::from_str(&text(ws.next().await.unwrap().unwrap())).unwrap();
            assert_eq!(auth["type"], "Authenticate");
            assert_eq!(auth["token"], "token");

            ws.send(Message::Text(r#"{"type":"Authenticated"}"#.into()))
                .await
                .unwrap();

            // Answer the first ping with a wrong counter, then correctly
            for reply in [99_u64, 0] {
                let ping: serde_json::Value =
                    serde_json::from_str(&text(ws.next().await.unwrap().unwrap())).unwrap();
                assert_eq!(ping["type"], "Ping");
                let pong = format!(r#"{{"type":"Pong","data":{reply}}}"#);
                ws.send(Message::Text(pong)).await.unwrap();
            }
            ws
        });

        gateway.open().unwrap();
        within(gateway.wait_for_state(ConnectionState::Connected)).await;
        let _ws = within(server).await.unwrap();

        within(async {
            while gateway.latency().is_none() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;

        assert!(sink.records().iter().any(|d| matches!(
            d,
            Diagnostic::HeartbeatMismatch {
                expected: 0,
                received: 99
            }
        )));
        gateway.close().await;
        assert_eq!(gateway.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_authenticated_inside_bulk_starts_heartbeat() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        let (gateway, _, _) = gateway(url);

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            let _auth = ws.next().await;
            ws.send(Message::Text(
                r#"{"type":"Bulk","v":[{"type":"Authenticated"}]}"#.into(),
            ))
            .await
            .unwrap();

            let ping: serde_json::Value =
                serde_json::from_str(&text(ws.next().await.unwrap().unwrap())).unwrap();
            assert_eq!(ping["type"], "Ping");
            ws.send(Message::Text(
                r#"{"type":"Bulk","v":[{"type":"Pong","data":0}]}"#.into(),
            ))
            .await
            .unwrap();
            ws
        });

        gateway.open().unwrap();
        within(gateway.wait_for_state(ConnectionState::Connected)).await;
        let _ws = within(server).await.unwrap();

        within(async {
            while gateway.latency().is_none() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        gateway.close().await;
    }

    #[tokio::test]
    async fn test_first_ping_waits_one_interval() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        let (_, writer) = Cache::new(CacheConfig::default());
        let config = GatewayConfig {
            heartbeat_interval: Duration::from_millis(300),
            heartbeat_timeout: Duration::from_secs(2),
            ..config(url)
        };
        let gateway = Gateway::new("token", config, writer, Arc::new(MemorySink::new()));

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            let _auth = ws.next().await;
            ws.send(Message::Text(r#"{"type":"Authenticated"}"#.into()))
                .await
                .unwrap();
            let authenticated_at = std::time::Instant::now();

            let ping: serde_json::Value =
                serde_json::from_str(&text(ws.next().await.unwrap().unwrap())).unwrap();
            assert_eq!(ping["type"], "Ping");
            (authenticated_at.elapsed(), ws)
        });

        gateway.open().unwrap();
        let (elapsed, _ws) = within(server).await.unwrap();
        assert!(elapsed >= Duration::from_millis(250), "first ping after {elapsed:?}");
        gateway.close().await;
    }

    #[tokio::test]
    async fn test_session_survives_panicking_observer() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        let (gateway, cache, sink) = gateway(url);

        gateway.on(EventKind::Ready, |_, _| panic!("broken handler"));

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            let _auth = ws.next().await;
            ws.send(Message::Text(r#"{"type":"Authenticated"}"#.into()))
                .await
                .unwrap();
            let ready = r#"{"type":"Ready","users":[{"_id":"U1","username":"me"}],"servers":[],"channels":[]}"#;
            ws.send(Message::Text(ready.into())).await.unwrap();
            let update = r#"{"type":"UserUpdate","id":"U1","data":{"username":"renamed"}}"#;
            ws.send(Message::Text(update.into())).await.unwrap();
            ws
        });

        gateway.open().unwrap();
        let _ws = within(server).await.unwrap();

        within(async {
            while cache.user("U1").map(|u| u.username).as_deref() != Some("renamed") {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert_eq!(gateway.state(), ConnectionState::Connected);
        assert!(sink
            .records()
            .iter()
            .any(|d| matches!(d, Diagnostic::ObserverPanicked { event, .. } if event == "Ready")));
        gateway.close().await;
    }

    #[tokio::test]
    async fn test_reconnects_after_missing_ack() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        let (gateway, _, _) = gateway(url);

        let server = tokio::spawn(async move {
            let mut sessions = 0;
            loop {
                let (stream, _) = listener.accept().await.unwrap();
                let mut ws = accept_async(stream).await.unwrap();
                sessions += 1;
                let _auth = ws.next().await;
                ws.send(Message::Text(r#"{"type":"Authenticated"}"#.into()))
                    .await
                    .unwrap();
                if sessions == 2 {
                    return sessions;
                }
                // Swallow pings without answering until the client gives up
                while let Some(Ok(_)) = ws.next().await {}
            }
        });

        gateway.open().unwrap();
        let mut changes = gateway.state_changes();
        within(changes.wait_for(|s| *s == ConnectionState::Reconnecting))
            .await
            .unwrap();

        assert_eq!(within(server).await.unwrap(), 2);
        gateway.close().await;
    }

    #[tokio::test]
    async fn test_observers_reached_with_cache_context() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        let (gateway, cache, _) = gateway(url);

        let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();
        gateway.on(EventKind::Ready, move |ctx, _| {
            let _ = seen_tx.send(ctx.cache().current_user().map(|u| u.id));
        });

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            let _auth = ws.next().await;
            ws.send(Message::Text(r#"{"type":"Authenticated"}"#.into()))
                .await
                .unwrap();
            let ready = r#"{"type":"Ready","users":[{"_id":"U1","username":"me"}],"servers":[],"channels":[]}"#;
            ws.send(Message::Binary(ready.as_bytes().to_vec()))
                .await
                .unwrap();
            ws
        });

        gateway.open().unwrap();
        let _ws = within(server).await.unwrap();

        let seen = within(seen_rx.recv()).await.unwrap();
        assert_eq!(seen.as_deref(), Some("U1"));
        assert_eq!(cache.current_user().map(|u| u.username).as_deref(), Some("me"));
        gateway.close().await;
    }
}
