//! Client facade

use revolt_cache::Cache;
use revolt_common::{ClientConfig, SharedSink, TracingSink};
use revolt_core::{Channel, Message, Server, ServerMember, User};
use revolt_gateway::{ClientMessage, ConnectionState, Context, Event, EventKind, Gateway};
use revolt_http::{Credentials, HttpClient, Method};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::ClientResult;
use crate::rest::{endpoints, EditMessage, SendMessage};

struct Inner {
    http: HttpClient,
    gateway: Gateway,
    cache: Cache,
    sink: SharedSink,
}

/// One account's connection to the service
///
/// Owns the cache, the REST transport and the gateway. Clones share all
/// three.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

impl Client {
    /// Create a client reporting diagnostics through `tracing`
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    /// Create a client from `REVOLT_*` environment variables
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a client with a caller-supplied diagnostic sink
    pub fn with_sink(config: ClientConfig, sink: SharedSink) -> ClientResult<Self> {
        let credentials = Credentials::from_token(config.token.as_str(), config.selfbot);
        let http = HttpClient::new(credentials, &config.http, Arc::clone(&sink))?;

        let (cache, writer) = Cache::new(config.cache);
        let gateway = Gateway::new(config.token, config.gateway, writer, Arc::clone(&sink));

        tracing::debug!(
            api = %http.api_base(),
            bot = http.credentials().is_bot(),
            "Client created"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                gateway,
                cache,
                sink,
            }),
        })
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Read view of the local cache
    pub fn cache(&self) -> &Cache {
        &self.inner.cache
    }

    pub fn http(&self) -> &HttpClient {
        &self.inner.http
    }

    pub fn gateway(&self) -> &Gateway {
        &self.inner.gateway
    }

    pub fn sink(&self) -> &SharedSink {
        &self.inner.sink
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start the gateway connection
    pub fn open(&self) -> ClientResult<()> {
        self.inner.gateway.open()?;
        Ok(())
    }

    /// Close the gateway and stop background work
    pub async fn close(&self) {
        self.inner.gateway.close().await;
        self.inner.http.close();
        tracing::info!("Client closed");
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.gateway.state()
    }

    /// Observe gateway events of one kind
    pub fn on<F>(&self, kind: EventKind, observer: F)
    where
        F: Fn(&Context, &Event) + Send + Sync + 'static,
    {
        self.inner.gateway.on(kind, observer);
    }

    /// Observe every gateway event
    pub fn on_all<F>(&self, observer: F)
    where
        F: Fn(&Context, &Event) + Send + Sync + 'static,
    {
        self.inner.gateway.on_all(observer);
    }

    pub async fn begin_typing(&self, channel_id: &str) -> ClientResult<()> {
        self.inner
            .gateway
            .send(ClientMessage::begin_typing(channel_id))
            .await?;
        Ok(())
    }

    pub async fn end_typing(&self, channel_id: &str) -> ClientResult<()> {
        self.inner
            .gateway
            .send(ClientMessage::end_typing(channel_id))
            .await?;
        Ok(())
    }

    // =========================================================================
    // REST
    // =========================================================================

    /// Fetch the authenticated account
    pub async fn fetch_self(&self) -> ClientResult<User> {
        self.get(endpoints::SELF).await
    }

    pub async fn fetch_user(&self, user_id: &str) -> ClientResult<User> {
        self.get(&endpoints::user(user_id)).await
    }

    pub async fn fetch_server(&self, server_id: &str) -> ClientResult<Server> {
        self.get(&endpoints::server(server_id)).await
    }

    pub async fn fetch_channel(&self, channel_id: &str) -> ClientResult<Channel> {
        self.get(&endpoints::channel(channel_id)).await
    }

    pub async fn fetch_member(&self, server_id: &str, user_id: &str) -> ClientResult<ServerMember> {
        self.get(&endpoints::server_member(server_id, user_id)).await
    }

    /// Post a message
    ///
    /// A random nonce is attached unless the request carries one, so a
    /// retried send is not posted twice.
    pub async fn send_message(
        &self,
        channel_id: &str,
        mut message: SendMessage,
    ) -> ClientResult<Message> {
        message.validate()?;
        message
            .nonce
            .get_or_insert_with(|| uuid::Uuid::new_v4().to_string());

        self.send_json(Method::POST, &endpoints::channel_messages(channel_id), &message)
            .await
    }

    pub async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        edit: EditMessage,
    ) -> ClientResult<Message> {
        edit.validate()?;
        self.send_json(
            Method::PATCH,
            &endpoints::channel_message(channel_id, message_id),
            &edit,
        )
        .await
    }

    pub async fn delete_message(&self, channel_id: &str, message_id: &str) -> ClientResult<()> {
        self.inner
            .http
            .request_empty(
                Method::DELETE,
                &endpoints::channel_message(channel_id, message_id),
                None,
            )
            .await?;
        Ok(())
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        Ok(self.inner.http.request(Method::GET, path, None).await?)
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize,
        T: serde::de::DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(revolt_http::RequestError::from)?;
        Ok(self.inner.http.request(method, path, Some(body)).await?)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("http", &self.inner.http)
            .field("gateway", &self.inner.gateway)
            .finish()
    }
}
