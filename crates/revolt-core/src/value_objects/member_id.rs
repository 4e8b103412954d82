//! Composite member identifier
//!
//! A server member is addressed by the pair (server ID, user ID) rather than
//! by a single string.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite identifier of a server member
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId {
    pub server: String,
    pub user: String,
}

impl MemberId {
    /// Create a member ID from its server and user halves
    pub fn new(server: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            user: user.into(),
        }
    }

    /// Parse the `server:user` display form
    pub fn parse(s: &str) -> Result<Self, MemberIdParseError> {
        match s.split_once(':') {
            Some((server, user)) if !server.is_empty() && !user.is_empty() => {
                Ok(Self::new(server, user))
            }
            _ => Err(MemberIdParseError::InvalidFormat),
        }
    }
}

/// Error when parsing a `MemberId` from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MemberIdParseError {
    #[error("invalid member id format, expected `server:user`")]
    InvalidFormat,
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.server, self.user)
    }
}

impl std::str::FromStr for MemberId {
    type Err = MemberIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MemberId::parse(s)
    }
}
