//! Token Hash Value Object
//!
//! SHA-256 digest of a raw token string. The raw refresh token is the
//! only credential the client holds; the server stores and looks up
//! this hash, never the raw token itself.

use std::fmt;

use platform::crypto::{constant_time_eq, sha256};

/// SHA-256 hash of a raw token
#[derive(Clone, Copy)]
pub struct TokenHash([u8; 32]);

impl TokenHash {
    /// Hash a raw token string
    pub fn of(raw_token: &str) -> Self {
        Self(sha256(raw_token.as_bytes()))
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex encoding for storage and map keys
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Parse from the stored hex encoding
    pub fn from_hex(s: &str) -> Option<Self> {
        if s.len() != 64 {
            return None;
        }
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(Self(bytes))
    }
}

impl PartialEq for TokenHash {
    fn eq(&self, other: &Self) -> bool {
        // Comparison against stored hashes is constant-time
        constant_time_eq(&self.0, &other.0)
    }
}

impl Eq for TokenHash {}

impl fmt::Debug for TokenHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Enough to correlate in logs without reproducing the digest
        write!(f, "TokenHash({}..)", &self.to_hex()[..8])
    }
}
