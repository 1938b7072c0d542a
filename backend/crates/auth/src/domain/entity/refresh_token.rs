//! Refresh Token Record Entity
//!
//! Server-side registration of an issued refresh token. Stores the
//! SHA-256 hash of the raw token, never the raw token.
//!
//! Lifecycle: ACTIVE -> ROTATED (revoked on use) or ACTIVE -> REVOKED
//! (logout-everywhere/admin) or ACTIVE -> EXPIRED (time-based). All
//! three are terminal.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::value_object::claims::Claims;
use crate::domain::value_object::{subject::Subject, token_hash::TokenHash};

/// Refresh token record
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    /// Opaque server-generated id, used only for revocation lookups
    pub token_id: Uuid,
    /// Owner subject
    pub subject: Subject,
    /// User name at issuance (consistency check against claims)
    pub user_name: String,
    /// SHA-256 hash of the raw refresh token
    pub token_hash: TokenHash,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Expiry timestamp
    pub expires_at: DateTime<Utc>,
    /// Revocation flag (terminal)
    pub revoked: bool,
}

impl RefreshTokenRecord {
    /// Register a freshly issued refresh token
    pub fn new(
        subject: Subject,
        user_name: impl Into<String>,
        token_hash: TokenHash,
        ttl_secs: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            token_id: Uuid::new_v4(),
            subject,
            user_name: user_name.into(),
            token_hash,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_secs),
            revoked: false,
        }
    }

    /// Check if the record has passed its expiry
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Active = not revoked and not expired
    pub fn is_active(&self) -> bool {
        !self.revoked && !self.is_expired()
    }

    /// Mark revoked (idempotent)
    pub fn revoke(&mut self) {
        self.revoked = true;
    }

    /// Consistency check between decoded claims and this record.
    /// A mismatch means the signed token and the stored registration
    /// disagree about who owns it - a tamper signal.
    pub fn matches_claims(&self, claims: &Claims) -> bool {
        self.subject == claims.sub && self.user_name == claims.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::claims::TokenKind;

    fn record() -> RefreshTokenRecord {
        RefreshTokenRecord::new(
            Subject::new("user-1"),
            "alice",
            TokenHash::of("raw-token"),
            3600,
        )
    }

    #[test]
    fn test_new_record_is_active() {
        let record = record();
        assert!(record.is_active());
        assert!(!record.is_expired());
    }

    #[test]
    fn test_revoke_is_terminal() {
        let mut record = record();
        record.revoke();
        assert!(!record.is_active());
        record.revoke();
        assert!(record.revoked);
    }

    #[test]
    fn test_expired_record_is_inactive() {
        let record = RefreshTokenRecord::new(
            Subject::new("user-1"),
            "alice",
            TokenHash::of("raw-token"),
            -1,
        );
        assert!(record.is_expired());
        assert!(!record.is_active());
    }

    #[test]
    fn test_matches_claims() {
        let record = record();
        let good = Claims::new(Subject::new("user-1"), "alice", TokenKind::Refresh, 60);
        let bad_name = Claims::new(Subject::new("user-1"), "mallory", TokenKind::Refresh, 60);
        let bad_subject = Claims::new(Subject::new("user-2"), "alice", TokenKind::Refresh, 60);

        assert!(record.matches_claims(&good));
        assert!(!record.matches_claims(&bad_name));
        assert!(!record.matches_claims(&bad_subject));
    }
}
