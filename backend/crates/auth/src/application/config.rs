//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::crypto::sha256;

use crate::error::{AuthError, AuthResult};

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Symmetric signing secret for HS256 tokens (32 bytes)
    pub token_secret: [u8; 32],
    /// Access token TTL (30 minutes)
    pub access_token_ttl: Duration,
    /// Refresh token TTL (7 days)
    pub refresh_token_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    /// Same as `with_random_secret`: there is no meaningful fixed
    /// default for a signing secret, and an all-zero one would sign
    /// tokens just fine.
    fn default() -> Self {
        Self::with_random_secret()
    }
}

impl AuthConfig {
    /// Create config with a random signing secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            token_secret: secret,
            access_token_ttl: Duration::from_secs(30 * 60), // 30 minutes
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600), // 7 days
            password_pepper: None,
        }
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    /// Load config from environment variables
    ///
    /// - `JWT_SECRET_KEY` (required): arbitrary string, digested to
    ///   the 32-byte signing secret
    /// - `ACCESS_TOKEN_EXPIRE_MINUTES` (default 30)
    /// - `REFRESH_TOKEN_EXPIRE_DAYS` (default 7)
    /// - `PASSWORD_PEPPER` (optional)
    pub fn from_env() -> AuthResult<Self> {
        let secret_key = std::env::var("JWT_SECRET_KEY")
            .map_err(|_| AuthError::Internal("JWT_SECRET_KEY is not set".to_string()))?;

        let access_minutes = match std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Ok(v) => v.parse::<u64>().map_err(|_| {
                AuthError::Internal("ACCESS_TOKEN_EXPIRE_MINUTES is not a number".to_string())
            })?,
            Err(_) => 30,
        };

        let refresh_days = match std::env::var("REFRESH_TOKEN_EXPIRE_DAYS") {
            Ok(v) => v.parse::<u64>().map_err(|_| {
                AuthError::Internal("REFRESH_TOKEN_EXPIRE_DAYS is not a number".to_string())
            })?,
            Err(_) => 7,
        };

        let password_pepper = std::env::var("PASSWORD_PEPPER")
            .ok()
            .map(String::into_bytes);

        Ok(Self {
            token_secret: sha256(secret_key.as_bytes()),
            access_token_ttl: Duration::from_secs(access_minutes * 60),
            refresh_token_ttl: Duration::from_secs(refresh_days * 24 * 3600),
            password_pepper,
        })
    }

    /// Get access token TTL in seconds
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_token_ttl.as_secs() as i64
    }

    /// Get refresh token TTL in seconds
    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_token_ttl.as_secs() as i64
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_secret_is_random() {
        let a = AuthConfig::default();
        let b = AuthConfig::default();
        assert_ne!(a.token_secret, [0u8; 32]);
        assert_ne!(a.token_secret, b.token_secret);
    }

    #[test]
    fn test_default_ttls() {
        let config = AuthConfig::default();
        assert_eq!(config.access_ttl_secs(), 30 * 60);
        assert_eq!(config.refresh_ttl_secs(), 7 * 24 * 3600);
        assert!(config.pepper().is_none());
    }
}
