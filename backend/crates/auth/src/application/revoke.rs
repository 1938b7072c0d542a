//! Revoke Use Case
//!
//! Administrative/maintenance surface over the refresh token store:
//! revoke one record, revoke everything for a subject, purge expired
//! records.

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::repository::RefreshTokenRepository;
use crate::domain::value_object::subject::Subject;
use crate::error::AuthResult;

/// Revocation use case
pub struct RevokeUseCase<R>
where
    R: RefreshTokenRepository,
{
    refresh_repo: Arc<R>,
}

impl<R> RevokeUseCase<R>
where
    R: RefreshTokenRepository,
{
    pub fn new(refresh_repo: Arc<R>) -> Self {
        Self { refresh_repo }
    }

    /// Revoke a single record by id. Revoking a missing or already
    /// revoked record succeeds; the returned flag says whether the
    /// record existed.
    pub async fn revoke(&self, token_id: Uuid) -> AuthResult<bool> {
        let existed = self.refresh_repo.revoke(token_id).await?;
        if existed {
            tracing::info!(token_id = %token_id, "Refresh token revoked");
        }
        Ok(existed)
    }

    /// Revoke every active record for a subject
    pub async fn revoke_all(&self, subject: &Subject) -> AuthResult<u64> {
        let revoked = self.refresh_repo.revoke_all_for_subject(subject).await?;
        tracing::info!(
            subject = %subject,
            refresh_tokens_revoked = revoked,
            "All refresh tokens revoked for subject"
        );
        Ok(revoked)
    }

    /// Drop records past their expiry
    pub async fn purge_expired(&self) -> AuthResult<u64> {
        self.refresh_repo.purge_expired().await
    }
}
