//! HTTP client that routes every request through the rate limiter

use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, Url};
use revolt_common::{HttpConfig, SharedSink};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::{Credentials, RequestError, RequestResult};
use crate::ratelimit::RateLimiter;

/// Error bodies are cut to this many bytes
pub const MAX_ERROR_BODY: usize = 1024;

const MIN_TIMEOUT: Duration = Duration::from_secs(1);
const MAX_TIMEOUT: Duration = Duration::from_secs(300);

/// REST transport for the API and CDN
pub struct HttpClient {
    client: reqwest::Client,
    credentials: Credentials,
    api_base: Url,
    cdn_base: Url,
    /// Extra headers sent with every request
    headers: RwLock<HeaderMap>,
    timeout: RwLock<Duration>,
    limiter: Arc<RateLimiter>,
    sink: SharedSink,
}

impl HttpClient {
    /// Create a transport
    ///
    /// When called inside a Tokio runtime the rate-limit sweeper is started
    /// as well; it stops on [`HttpClient::close`] or when the client is dropped.
    pub fn new(credentials: Credentials, config: &HttpConfig, sink: SharedSink) -> RequestResult<Self> {
        validate_timeout(config.request_timeout)?;
        let api_base = parse_base(&config.api_url)?;
        let cdn_base = parse_base(&config.cdn_url)?;

        let mut headers = HeaderMap::new();
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| RequestError::InvalidHeader(USER_AGENT.to_string()))?;
        headers.insert(USER_AGENT, user_agent);

        let limiter = Arc::new(RateLimiter::new());
        if tokio::runtime::Handle::try_current().is_ok() {
            limiter.spawn_sweeper(config.ratelimit_sweep_interval);
        } else {
            tracing::debug!("No Tokio runtime, rate-limit sweeper not started");
        }

        Ok(Self {
            client: reqwest::Client::builder().build()?,
            credentials,
            api_base,
            cdn_base,
            headers: RwLock::new(headers),
            timeout: RwLock::new(config.request_timeout),
            limiter,
            sink,
        })
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn cdn_base(&self) -> &Url {
        &self.cdn_base
    }

    /// Stop background work
    pub fn close(&self) {
        self.limiter.shutdown();
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub fn timeout(&self) -> Duration {
        *self.timeout.read()
    }

    /// Set the per-request timeout, between 1 and 300 seconds
    pub fn set_timeout(&self, timeout: Duration) -> RequestResult<()> {
        validate_timeout(timeout)?;
        *self.timeout.write() = timeout;
        Ok(())
    }

    /// Add a header, failing if it is already set
    pub fn add_header(&self, name: &str, value: &str) -> RequestResult<()> {
        let (name, value) = parse_header(name, value)?;
        let mut headers = self.headers.write();
        if headers.contains_key(&name) {
            return Err(RequestError::HeaderExists(name.to_string()));
        }
        headers.insert(name, value);
        Ok(())
    }

    /// Set a header, overwriting any previous value
    pub fn set_header(&self, name: &str, value: &str) -> RequestResult<()> {
        let (name, value) = parse_header(name, value)?;
        self.headers.write().insert(name, value);
        Ok(())
    }

    /// Remove a header, returning whether it was set
    pub fn remove_header(&self, name: &str) -> bool {
        self.headers.write().remove(name).is_some()
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .read()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(String::from)
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Turn a destination into an absolute URL
    ///
    /// Relative paths are appended to the API base. Absolute URLs are only
    /// accepted when they point at the API or CDN host.
    pub fn resolve_url(&self, destination: &str) -> RequestResult<Url> {
        let destination = destination.trim();
        if destination.is_empty() {
            return Err(RequestError::EmptyDestination);
        }

        let is_absolute = destination.starts_with("//") || destination.contains("://");
        if !is_absolute {
            let base = self.api_base.as_str().trim_end_matches('/');
            let path = destination.trim_start_matches('/');
            return Url::parse(&format!("{base}/{path}")).map_err(|e| invalid_url(destination, &e));
        }

        let url = self
            .api_base
            .join(destination)
            .map_err(|e| invalid_url(destination, &e))?;

        if same_host(&url, &self.api_base) || same_host(&url, &self.cdn_base) {
            Ok(url)
        } else {
            Err(RequestError::ExternalUrl(
                url.host_str().unwrap_or_default().to_string(),
            ))
        }
    }

    /// Send a request and return the raw response body
    ///
    /// Waits on the endpoint's rate-limit bucket first. The response's quota
    /// headers are recorded before the status is looked at.
    pub async fn execute(
        &self,
        method: Method,
        destination: &str,
        body: Option<Value>,
    ) -> RequestResult<Vec<u8>> {
        let url = self.resolve_url(destination)?;
        let path = url.path().to_string();

        let wait = self.limiter.acquire(&method, &path);
        if !wait.is_zero() {
            tracing::debug!(
                method = %method,
                path = %path,
                wait_ms = wait.as_millis() as u64,
                "Waiting for rate-limit bucket"
            );
            tokio::time::sleep(wait).await;
        }

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .timeout(self.timeout())
            .headers(self.headers.read().clone())
            .header(CONTENT_TYPE, "application/json")
            .header(self.credentials.header_name(), self.credentials.token());
        if let Some(body) = &body {
            request = request.body(serde_json::to_vec(body)?);
        }

        tracing::trace!(method = %method, url = %url, body = ?body, "HTTP TX");
        let response = request.send().await?;
        let status = response.status();

        if let Err(err) = self.limiter.observe(&method, &path, response.headers()) {
            tracing::warn!(error = %err, "Ignoring malformed rate-limit headers");
            self.sink.report(err.to_diagnostic());
        }

        let bytes = response.bytes().await?;
        tracing::trace!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            bytes = bytes.len(),
            "HTTP RX"
        );

        if !status.is_success() {
            return Err(RequestError::Status {
                status: status.as_u16(),
                body: truncate_body(&bytes),
            });
        }
        Ok(bytes.to_vec())
    }

    /// Send a request and decode the JSON response
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        destination: &str,
        body: Option<Value>,
    ) -> RequestResult<T> {
        let bytes = self.execute(method, destination, body).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send a request whose response has no body worth decoding
    pub async fn request_empty(
        &self,
        method: Method,
        destination: &str,
        body: Option<Value>,
    ) -> RequestResult<()> {
        self.execute(method, destination, body).await?;
        Ok(())
    }
}

impl Drop for HttpClient {
    fn drop(&mut self) {
        self.limiter.shutdown();
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("credentials", &self.credentials)
            .field("api_base", &self.api_base.as_str())
            .field("cdn_base", &self.cdn_base.as_str())
            .field("timeout", &self.timeout())
            .field("buckets", &self.limiter.len())
            .finish()
    }
}

fn validate_timeout(timeout: Duration) -> RequestResult<()> {
    if (MIN_TIMEOUT..=MAX_TIMEOUT).contains(&timeout) {
        Ok(())
    } else {
        Err(RequestError::InvalidTimeout(timeout))
    }
}

fn parse_base(url: &str) -> RequestResult<Url> {
    let parsed = Url::parse(url).map_err(|e| invalid_url(url, &e))?;
    if parsed.host_str().is_none() {
        return Err(RequestError::InvalidUrl {
            url: url.to_string(),
            reason: "missing host".to_string(),
        });
    }
    Ok(parsed)
}

fn parse_header(name: &str, value: &str) -> RequestResult<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| RequestError::InvalidHeader(name.to_string()))?;
    let header_value =
        HeaderValue::from_str(value).map_err(|_| RequestError::InvalidHeader(name.to_string()))?;
    Ok((header_name, header_value))
}

fn invalid_url(url: &str, err: &impl fmt::Display) -> RequestError {
    RequestError::InvalidUrl {
        url: url.to_string(),
        reason: err.to_string(),
    }
}

/// Host and port match; the scheme is not compared
fn same_host(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str() && a.port_or_known_default() == b.port_or_known_default()
}

fn truncate_body(bytes: &[u8]) -> String {
    let end = bytes.len().min(MAX_ERROR_BODY);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
