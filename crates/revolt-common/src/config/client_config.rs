//! Client configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present). Everything except the token has a default.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main client configuration
#[derive(Clone)]
pub struct ClientConfig {
    /// Bot or session token
    pub token: String,
    /// Authenticate REST calls as a user session instead of a bot
    pub selfbot: bool,
    pub http: HttpConfig,
    pub gateway: GatewayConfig,
    pub cache: CacheConfig,
}

/// REST transport configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub api_url: String,
    pub cdn_url: String,
    pub user_agent: String,
    /// Must lie between 1 and 300 seconds
    pub request_timeout: Duration,
    /// Interval between sweeps of expired rate-limit buckets
    pub ratelimit_sweep_interval: Duration,
}

/// Gateway connection configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub ws_url: String,
    pub heartbeat_interval: Duration,
    /// A ping left unacknowledged for this long counts as a lost session
    pub heartbeat_timeout: Duration,
    /// Fixed delay between reconnect attempts
    pub reconnect_interval: Duration,
    /// Capacity of the outbound frame queue
    pub outbound_buffer: usize,
}

/// Which entity kinds the local cache keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub track_users: bool,
    pub track_servers: bool,
    pub track_channels: bool,
    pub track_members: bool,
    pub track_emojis: bool,
    pub track_webhooks: bool,
}

// Default value functions
fn default_api_url() -> String {
    "https://api.revolt.chat".to_string()
}

fn default_cdn_url() -> String {
    "https://cdn.revoltusercontent.com".to_string()
}

fn default_ws_url() -> String {
    "wss://ws.revolt.chat?version=1&format=json".to_string()
}

fn default_user_agent() -> String {
    format!("revolt-rs/{}", env!("CARGO_PKG_VERSION"))
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_ratelimit_sweep_interval() -> Duration {
    Duration::from_secs(60)
}

fn default_heartbeat_interval() -> Duration {
    Duration::from_secs(30)
}

fn default_reconnect_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_outbound_buffer() -> usize {
    64
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            cdn_url: default_cdn_url(),
            user_agent: default_user_agent(),
            request_timeout: default_request_timeout(),
            ratelimit_sweep_interval: default_ratelimit_sweep_interval(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let heartbeat_interval = default_heartbeat_interval();
        Self {
            ws_url: default_ws_url(),
            heartbeat_interval,
            heartbeat_timeout: heartbeat_interval * 2,
            reconnect_interval: default_reconnect_interval(),
            outbound_buffer: default_outbound_buffer(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            track_users: true,
            track_servers: true,
            track_channels: true,
            track_members: true,
            track_emojis: true,
            track_webhooks: false,
        }
    }
}

impl CacheConfig {
    /// Track every entity kind, webhooks included
    #[must_use]
    pub fn all() -> Self {
        Self {
            track_webhooks: true,
            ..Self::default()
        }
    }
}

impl ClientConfig {
    /// Create a bot configuration with default settings
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            selfbot: false,
            http: HttpConfig::default(),
            gateway: GatewayConfig::default(),
            cache: CacheConfig::default(),
        }
    }

    #[must_use]
    pub fn selfbot(mut self, selfbot: bool) -> Self {
        self.selfbot = selfbot;
        self
    }

    #[must_use]
    pub fn with_http(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    #[must_use]
    pub fn with_gateway(mut self, gateway: GatewayConfig) -> Self {
        self.gateway = gateway;
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if `REVOLT_TOKEN` is missing or a variable does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let token = env::var("REVOLT_TOKEN").map_err(|_| ConfigError::MissingVar("REVOLT_TOKEN"))?;
        if token.trim().is_empty() {
            return Err(ConfigError::InvalidValue("REVOLT_TOKEN", "empty token".to_string()));
        }

        let heartbeat_interval =
            parse_millis("REVOLT_HEARTBEAT_INTERVAL_MS")?.unwrap_or_else(default_heartbeat_interval);
        let defaults = CacheConfig::default();

        Ok(Self {
            token,
            selfbot: parse_bool("REVOLT_SELFBOT")?.unwrap_or(false),
            http: HttpConfig {
                api_url: env::var("REVOLT_API_URL").unwrap_or_else(|_| default_api_url()),
                cdn_url: env::var("REVOLT_CDN_URL").unwrap_or_else(|_| default_cdn_url()),
                user_agent: env::var("REVOLT_USER_AGENT").unwrap_or_else(|_| default_user_agent()),
                request_timeout: parse_millis("REVOLT_REQUEST_TIMEOUT_MS")?
                    .unwrap_or_else(default_request_timeout),
                ratelimit_sweep_interval: parse_millis("REVOLT_RATELIMIT_SWEEP_MS")?
                    .unwrap_or_else(default_ratelimit_sweep_interval),
            },
            gateway: GatewayConfig {
                ws_url: env::var("REVOLT_WS_URL").unwrap_or_else(|_| default_ws_url()),
                heartbeat_interval,
                heartbeat_timeout: parse_millis("REVOLT_HEARTBEAT_TIMEOUT_MS")?
                    .unwrap_or(heartbeat_interval * 2),
                reconnect_interval: parse_millis("REVOLT_RECONNECT_INTERVAL_MS")?
                    .unwrap_or_else(default_reconnect_interval),
                outbound_buffer: default_outbound_buffer(),
            },
            cache: CacheConfig {
                track_users: parse_bool("REVOLT_TRACK_USERS")?.unwrap_or(defaults.track_users),
                track_servers: parse_bool("REVOLT_TRACK_SERVERS")?
                    .unwrap_or(defaults.track_servers),
                track_channels: parse_bool("REVOLT_TRACK_CHANNELS")?
                    .unwrap_or(defaults.track_channels),
                track_members: parse_bool("REVOLT_TRACK_MEMBERS")?
                    .unwrap_or(defaults.track_members),
                track_emojis: parse_bool("REVOLT_TRACK_EMOJIS")?.unwrap_or(defaults.track_emojis),
                track_webhooks: parse_bool("REVOLT_TRACK_WEBHOOKS")?
                    .unwrap_or(defaults.track_webhooks),
            },
        })
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("selfbot", &self.selfbot)
            .field("http", &self.http)
            .field("gateway", &self.gateway)
            .field("cache", &self.cache)
            .finish()
    }
}

fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(None),
    }
}

fn parse_millis(name: &'static str) -> Result<Option<Duration>, ConfigError> {
    Ok(parse_var::<u64>(name)?.map(Duration::from_millis))
}

fn parse_bool(name: &'static str) -> Result<Option<bool>, ConfigError> {
    match env::var(name) {
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidValue(name, raw)),
        },
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
