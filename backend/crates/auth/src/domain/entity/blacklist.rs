//! Blacklist Entry Entity
//!
//! A denied access token: inserted on logout, consulted on every
//! authenticated request, garbage-collected lazily once the token
//! would have expired anyway.

use chrono::{DateTime, Utc};

use crate::domain::value_object::claims::Claims;
use crate::domain::value_object::token_hash::TokenHash;

/// Blacklisted access token
#[derive(Debug, Clone)]
pub struct BlacklistEntry {
    /// Unique token id (hash hex; tokens carry no jti claim)
    pub jti: String,
    /// SHA-256 hash of the raw access token
    pub token_hash: TokenHash,
    /// When the original token would expire
    pub expires_at: DateTime<Utc>,
    /// When it was blacklisted
    pub blacklisted_at: DateTime<Utc>,
    /// Reason for blacklisting
    pub reason: String,
}

impl BlacklistEntry {
    /// Build an entry from decoded claims; only the expiry is taken
    /// from the token, the caller's right to blacklist is enforced
    /// upstream.
    pub fn new(token_hash: TokenHash, claims: &Claims, reason: impl Into<String>) -> Self {
        Self {
            jti: token_hash.to_hex(),
            token_hash,
            expires_at: claims.expires_at(),
            blacklisted_at: Utc::now(),
            reason: reason.into(),
        }
    }

    /// An entry carries no value past the token's own expiry
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::claims::TokenKind;
    use crate::domain::value_object::subject::Subject;

    #[test]
    fn test_entry_tracks_token_expiry() {
        let claims = Claims::new(Subject::new("user-1"), "alice", TokenKind::Access, 60);
        let entry = BlacklistEntry::new(TokenHash::of("raw"), &claims, "logout");

        assert_eq!(entry.expires_at.timestamp(), claims.exp);
        assert_eq!(entry.reason, "logout");
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_expired_entry() {
        let claims = Claims::new(Subject::new("user-1"), "alice", TokenKind::Access, -5);
        let entry = BlacklistEntry::new(TokenHash::of("raw"), &claims, "logout");
        assert!(entry.is_expired());
    }
}
