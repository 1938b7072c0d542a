//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer (in-memory and PostgreSQL).
//!
//! Concurrency contract: read-modify-write sequences must be atomic
//! per implementation. In particular `take_active` must observe and
//! revoke a record in one step, so that of two concurrent refresh
//! calls with the same raw token exactly one wins.

use uuid::Uuid;

use crate::domain::entity::{
    blacklist::BlacklistEntry, refresh_token::RefreshTokenRecord, user::User,
};
use crate::domain::value_object::{
    subject::Subject, token_hash::TokenHash, user_name::UserName,
};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create_user(&self, user: &User) -> AuthResult<()>;

    /// Find user by user name (canonical form)
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    /// Check if user name exists
    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;
}

/// Refresh token store trait
#[trait_variant::make(RefreshTokenRepository: Send)]
pub trait LocalRefreshTokenRepository {
    /// Register an issued refresh token
    async fn register(&self, record: &RefreshTokenRecord) -> AuthResult<()>;

    /// Find the active (non-revoked, unexpired) record matching
    /// subject + token hash. Lookup is by content hash because the
    /// raw token is the only credential the client holds; a claimed
    /// token_id is never trusted.
    async fn lookup_active(
        &self,
        subject: &Subject,
        token_hash: &TokenHash,
    ) -> AuthResult<Option<RefreshTokenRecord>>;

    /// Atomically find and revoke the active record matching
    /// subject + token hash. Returns the record (now revoked) if one
    /// was active; `None` if it was already rotated, revoked,
    /// expired, or never registered.
    async fn take_active(
        &self,
        subject: &Subject,
        token_hash: &TokenHash,
    ) -> AuthResult<Option<RefreshTokenRecord>>;

    /// Mark a record revoked; idempotent. Returns whether a record
    /// existed.
    async fn revoke(&self, token_id: Uuid) -> AuthResult<bool>;

    /// Revoke every non-revoked record for a subject
    /// ("log out everywhere"). Returns the number revoked.
    async fn revoke_all_for_subject(&self, subject: &Subject) -> AuthResult<u64>;

    /// Remove records whose expiry has passed
    async fn purge_expired(&self) -> AuthResult<u64>;
}

/// Blacklist store trait
#[trait_variant::make(BlacklistRepository: Send)]
pub trait LocalBlacklistRepository {
    /// Insert a blacklist entry
    async fn insert(&self, entry: &BlacklistEntry) -> AuthResult<()>;

    /// Find an entry by token hash
    async fn find(&self, token_hash: &TokenHash) -> AuthResult<Option<BlacklistEntry>>;

    /// Remove an entry by token hash. Returns whether one existed.
    async fn remove(&self, token_hash: &TokenHash) -> AuthResult<bool>;
}
