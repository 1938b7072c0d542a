//! Verify Access Use Case
//!
//! The gate every authenticated request passes: decode and verify the
//! access token, then consult the blacklist. Decode failures win over
//! blacklist state; a forged token is rejected before any lookup.
//!
//! Blacklist storage errors fail open: a broken blacklist degrades
//! revocation latency, it does not take down every authenticated
//! endpoint. The failure is logged at error level.

use std::sync::Arc;

use crate::codec::TokenCodec;
use crate::domain::repository::BlacklistRepository;
use crate::domain::value_object::claims::{Claims, TokenKind};
use crate::domain::value_object::token_hash::TokenHash;
use crate::error::{AuthError, AuthResult};

/// Access token verification use case
pub struct VerifyAccessUseCase<B>
where
    B: BlacklistRepository,
{
    blacklist_repo: Arc<B>,
    codec: Arc<TokenCodec>,
}

impl<B> VerifyAccessUseCase<B>
where
    B: BlacklistRepository + Send + Sync + 'static,
{
    pub fn new(blacklist_repo: Arc<B>, codec: Arc<TokenCodec>) -> Self {
        Self {
            blacklist_repo,
            codec,
        }
    }

    pub async fn execute(&self, raw_access_token: &str) -> AuthResult<Claims> {
        let claims = self.codec.decode(raw_access_token)?;
        if claims.kind != TokenKind::Access {
            return Err(AuthError::WrongKind);
        }

        let token_hash = TokenHash::of(raw_access_token);
        if self.is_blacklisted(token_hash).await {
            return Err(AuthError::TokenRevoked);
        }

        Ok(claims)
    }

    async fn is_blacklisted(&self, token_hash: TokenHash) -> bool {
        match self.blacklist_repo.find(&token_hash).await {
            Ok(Some(entry)) if entry.is_expired() => {
                // Lazy cleanup: the token is past its own expiry, so
                // the entry carries no value. Deletion happens off the
                // request path.
                let repo = Arc::clone(&self.blacklist_repo);
                tokio::spawn(async move {
                    if let Err(e) = repo.remove(&token_hash).await {
                        tracing::debug!(error = %e, "Failed to remove expired blacklist entry");
                    }
                });
                false
            }
            Ok(Some(_)) => true,
            Ok(None) => false,
            Err(e) => {
                tracing::error!(error = %e, "Blacklist lookup failed, failing open");
                false
            }
        }
    }
}
