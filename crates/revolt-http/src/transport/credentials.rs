//! Authentication credentials

use std::fmt;

const HEADER_BOT_TOKEN: &str = "X-Bot-Token";
const HEADER_SESSION_TOKEN: &str = "X-Session-Token";

/// Token a client authenticates with
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Bot account token
    Bot(String),
    /// User session token
    Session(String),
}

impl Credentials {
    /// Pick the credential kind from the selfbot flag
    pub fn from_token(token: impl Into<String>, selfbot: bool) -> Self {
        if selfbot {
            Self::Session(token.into())
        } else {
            Self::Bot(token.into())
        }
    }

    /// Header this credential is sent in
    pub fn header_name(&self) -> &'static str {
        match self {
            Self::Bot(_) => HEADER_BOT_TOKEN,
            Self::Session(_) => HEADER_SESSION_TOKEN,
        }
    }

    pub fn token(&self) -> &str {
        match self {
            Self::Bot(token) | Self::Session(token) => token,
        }
    }

    #[inline]
    pub fn is_bot(&self) -> bool {
        matches!(self, Self::Bot(_))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_bot() { "Bot" } else { "Session" };
        f.debug_tuple(kind).field(&"<redacted>").finish()
    }
}
