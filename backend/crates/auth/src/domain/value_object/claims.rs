//! Token Claims Value Object
//!
//! The signed payload embedded in every token: subject, user name,
//! issued-at, expiry, and kind (access vs refresh). The codec signs
//! and verifies this structure; it never trusts a field before the
//! signature checks out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::value_object::subject::Subject;

/// Token kind discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: Subject,
    /// User name at issuance time
    pub name: String,
    /// Issued-at (Unix timestamp, seconds)
    pub iat: i64,
    /// Expires-at (Unix timestamp, seconds)
    pub exp: i64,
    /// Token kind
    #[serde(rename = "token_type")]
    pub kind: TokenKind,
}

impl Claims {
    /// Create claims valid for `ttl_secs` from now
    pub fn new(sub: Subject, name: impl Into<String>, kind: TokenKind, ttl_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub,
            name: name.into(),
            iat: now,
            exp: now + ttl_secs,
            kind,
        }
    }

    /// Check expiry against the current time
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Expiry as a timestamp
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}
