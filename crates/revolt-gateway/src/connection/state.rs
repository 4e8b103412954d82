//! Connection lifecycle state

use std::fmt;

/// Lifecycle state of the gateway connection
///
/// `Disconnected` is both the initial state and the terminal state after
/// `close()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    /// Opening the socket
    Connecting,
    /// Socket open, `Authenticate` sent, waiting for `Authenticated`
    Authenticating,
    /// Authenticated; heartbeats running
    Connected,
    /// Session lost, waiting out the reconnect backoff
    Reconnecting,
}

impl ConnectionState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Authenticating => "authenticating",
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
        }
    }

    #[inline]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Whether a socket is open (authenticated or not)
    #[inline]
    pub const fn has_socket(self) -> bool {
        matches!(self, Self::Authenticating | Self::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
