//! Refresh Use Case
//!
//! Exchanges a live refresh token for a fresh pair. Rotation on use:
//! the presented token is revoked in the same step that finds it, so
//! of two concurrent refreshes with the same token exactly one wins
//! and a stolen token is usable at most once.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::issue::{TokenPair, issue_pair};
use crate::codec::TokenCodec;
use crate::domain::repository::RefreshTokenRepository;
use crate::domain::value_object::claims::TokenKind;
use crate::domain::value_object::token_hash::TokenHash;
use crate::error::{AuthError, AuthResult};

/// Refresh use case
pub struct RefreshUseCase<R>
where
    R: RefreshTokenRepository,
{
    refresh_repo: Arc<R>,
    codec: Arc<TokenCodec>,
    config: Arc<AuthConfig>,
}

impl<R> RefreshUseCase<R>
where
    R: RefreshTokenRepository,
{
    pub fn new(refresh_repo: Arc<R>, codec: Arc<TokenCodec>, config: Arc<AuthConfig>) -> Self {
        Self {
            refresh_repo,
            codec,
            config,
        }
    }

    pub async fn execute(&self, raw_refresh_token: &str) -> AuthResult<TokenPair> {
        let claims = self.codec.decode(raw_refresh_token)?;
        if claims.kind != TokenKind::Refresh {
            return Err(AuthError::WrongKind);
        }

        let token_hash = TokenHash::of(raw_refresh_token);
        let record = self
            .refresh_repo
            .take_active(&claims.sub, &token_hash)
            .await?
            .ok_or(AuthError::TokenNotActive)?;

        // Token passed signature verification but disagrees with the
        // server-side registration. The record is already revoked by
        // the take, which is exactly what we want here.
        if !record.matches_claims(&claims) {
            tracing::warn!(
                subject = %claims.sub,
                token_id = %record.token_id,
                "Refresh claims do not match stored record"
            );
            return Err(AuthError::TokenNotActive);
        }

        let pair = issue_pair(
            self.refresh_repo.as_ref(),
            &self.codec,
            &self.config,
            claims.sub.clone(),
            &record.user_name,
        )
        .await?;

        tracing::debug!(
            subject = %claims.sub,
            rotated_token_id = %record.token_id,
            "Refresh token rotated"
        );

        Ok(pair)
    }
}
