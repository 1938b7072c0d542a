//! Logout Use Case
//!
//! Blacklists the presented access token so it stops working before
//! its natural expiry. `execute_all` additionally revokes every
//! refresh token for the subject ("log out everywhere").

use std::sync::Arc;

use crate::codec::TokenCodec;
use crate::domain::entity::blacklist::BlacklistEntry;
use crate::domain::repository::{BlacklistRepository, RefreshTokenRepository};
use crate::domain::value_object::claims::{Claims, TokenKind};
use crate::domain::value_object::token_hash::TokenHash;
use crate::error::{AuthError, AuthResult};

/// Logout use case
pub struct LogoutUseCase<B, R>
where
    B: BlacklistRepository,
    R: RefreshTokenRepository,
{
    blacklist_repo: Arc<B>,
    refresh_repo: Arc<R>,
    codec: Arc<TokenCodec>,
}

impl<B, R> LogoutUseCase<B, R>
where
    B: BlacklistRepository,
    R: RefreshTokenRepository,
{
    pub fn new(blacklist_repo: Arc<B>, refresh_repo: Arc<R>, codec: Arc<TokenCodec>) -> Self {
        Self {
            blacklist_repo,
            refresh_repo,
            codec,
        }
    }

    /// Blacklist the presented access token
    pub async fn execute(&self, raw_access_token: &str) -> AuthResult<()> {
        let Some(claims) = self.decode_for_logout(raw_access_token)? else {
            return Ok(());
        };

        let entry = BlacklistEntry::new(TokenHash::of(raw_access_token), &claims, "logout");
        self.blacklist_repo.insert(&entry).await?;

        tracing::info!(subject = %claims.sub, "User logged out");

        Ok(())
    }

    /// Blacklist the access token and revoke every refresh token for
    /// its subject
    pub async fn execute_all(&self, raw_access_token: &str) -> AuthResult<()> {
        let Some(claims) = self.decode_for_logout(raw_access_token)? else {
            return Ok(());
        };

        let entry = BlacklistEntry::new(TokenHash::of(raw_access_token), &claims, "logout");
        self.blacklist_repo.insert(&entry).await?;

        let revoked = self.refresh_repo.revoke_all_for_subject(&claims.sub).await?;

        tracing::info!(
            subject = %claims.sub,
            refresh_tokens_revoked = revoked,
            "User logged out everywhere"
        );

        Ok(())
    }

    /// An already-expired token needs no blacklisting; any other
    /// decode failure is a real rejection.
    fn decode_for_logout(&self, raw_access_token: &str) -> AuthResult<Option<Claims>> {
        match self.codec.decode(raw_access_token) {
            Ok(claims) if claims.kind != TokenKind::Access => Err(AuthError::WrongKind),
            Ok(claims) => Ok(Some(claims)),
            Err(AuthError::Expired) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
