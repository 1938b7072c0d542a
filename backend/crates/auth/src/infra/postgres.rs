//! PostgreSQL Repository Implementations
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE users (
//!     user_id UUID PRIMARY KEY,
//!     user_name TEXT NOT NULL,
//!     user_name_canonical TEXT NOT NULL UNIQUE,
//!     password_hash TEXT NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL
//! );
//!
//! CREATE TABLE refresh_tokens (
//!     token_id UUID PRIMARY KEY,
//!     subject TEXT NOT NULL,
//!     user_name TEXT NOT NULL,
//!     token_hash TEXT NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL,
//!     expires_at TIMESTAMPTZ NOT NULL,
//!     revoked BOOLEAN NOT NULL DEFAULT FALSE
//! );
//! CREATE INDEX idx_refresh_tokens_subject_hash
//!     ON refresh_tokens (subject, token_hash);
//!
//! CREATE TABLE token_blacklist (
//!     jti TEXT PRIMARY KEY,
//!     token_hash TEXT NOT NULL,
//!     expires_at TIMESTAMPTZ NOT NULL,
//!     blacklisted_at TIMESTAMPTZ NOT NULL,
//!     reason TEXT NOT NULL
//! );
//! ```

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    blacklist::BlacklistEntry, refresh_token::RefreshTokenRecord, user::User,
};
use crate::domain::repository::{
    BlacklistRepository, RefreshTokenRepository, UserRepository,
};
use crate::domain::value_object::{
    subject::Subject, token_hash::TokenHash, user_name::UserName,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create_user(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                user_name,
                user_name_canonical,
                password_hash,
                created_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.user_id)
        .bind(user.user_name.original())
        .bind(user.user_name.canonical())
        .bind(user.password_hash.as_phc_string())
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                user_name,
                password_hash,
                created_at
            FROM users
            WHERE user_name_canonical = $1
            "#,
        )
        .bind(user_name.canonical())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE user_name_canonical = $1)",
        )
        .bind(user_name.canonical())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

// ============================================================================
// Refresh Token Repository Implementation
// ============================================================================

impl RefreshTokenRepository for PgAuthRepository {
    async fn register(&self, record: &RefreshTokenRecord) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (
                token_id,
                subject,
                user_name,
                token_hash,
                created_at,
                expires_at,
                revoked
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.token_id)
        .bind(record.subject.as_str())
        .bind(&record.user_name)
        .bind(record.token_hash.to_hex())
        .bind(record.created_at)
        .bind(record.expires_at)
        .bind(record.revoked)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn lookup_active(
        &self,
        subject: &Subject,
        token_hash: &TokenHash,
    ) -> AuthResult<Option<RefreshTokenRecord>> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            r#"
            SELECT
                token_id,
                subject,
                user_name,
                token_hash,
                created_at,
                expires_at,
                revoked
            FROM refresh_tokens
            WHERE subject = $1
              AND token_hash = $2
              AND NOT revoked
              AND expires_at > $3
            "#,
        )
        .bind(subject.as_str())
        .bind(token_hash.to_hex())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_record()).transpose()
    }

    async fn take_active(
        &self,
        subject: &Subject,
        token_hash: &TokenHash,
    ) -> AuthResult<Option<RefreshTokenRecord>> {
        // Single UPDATE ... RETURNING so concurrent refreshes with the
        // same token race on the row lock and only one sees NOT revoked
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            r#"
            UPDATE refresh_tokens SET
                revoked = TRUE
            WHERE subject = $1
              AND token_hash = $2
              AND NOT revoked
              AND expires_at > $3
            RETURNING
                token_id,
                subject,
                user_name,
                token_hash,
                created_at,
                expires_at,
                revoked
            "#,
        )
        .bind(subject.as_str())
        .bind(token_hash.to_hex())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_record()).transpose()
    }

    async fn revoke(&self, token_id: Uuid) -> AuthResult<bool> {
        let affected = sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE token_id = $1")
            .bind(token_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }

    async fn revoke_all_for_subject(&self, subject: &Subject) -> AuthResult<u64> {
        let revoked = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE WHERE subject = $1 AND NOT revoked",
        )
        .bind(subject.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(revoked)
    }

    async fn purge_expired(&self) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted > 0 {
            tracing::info!(tokens_deleted = deleted, "Purged expired refresh tokens");
        }

        Ok(deleted)
    }
}

// ============================================================================
// Blacklist Repository Implementation
// ============================================================================

impl BlacklistRepository for PgAuthRepository {
    async fn insert(&self, entry: &BlacklistEntry) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO token_blacklist (
                jti,
                token_hash,
                expires_at,
                blacklisted_at,
                reason
            ) VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (jti) DO NOTHING
            "#,
        )
        .bind(&entry.jti)
        .bind(entry.token_hash.to_hex())
        .bind(entry.expires_at)
        .bind(entry.blacklisted_at)
        .bind(&entry.reason)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, token_hash: &TokenHash) -> AuthResult<Option<BlacklistEntry>> {
        let row = sqlx::query_as::<_, BlacklistRow>(
            r#"
            SELECT
                jti,
                token_hash,
                expires_at,
                blacklisted_at,
                reason
            FROM token_blacklist
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash.to_hex())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_entry()).transpose()
    }

    async fn remove(&self, token_hash: &TokenHash) -> AuthResult<bool> {
        let affected = sqlx::query("DELETE FROM token_blacklist WHERE token_hash = $1")
            .bind(token_hash.to_hex())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    user_name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let password_hash = HashedPassword::from_phc_string(&self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(User {
            user_id: self.user_id,
            user_name: UserName::from_db(&self.user_name),
            password_hash,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    token_id: Uuid,
    subject: String,
    user_name: String,
    token_hash: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    revoked: bool,
}

impl RefreshTokenRow {
    fn into_record(self) -> AuthResult<RefreshTokenRecord> {
        let token_hash = TokenHash::from_hex(&self.token_hash)
            .ok_or_else(|| AuthError::Internal(format!("Invalid token_hash: {}", self.token_hash)))?;

        Ok(RefreshTokenRecord {
            token_id: self.token_id,
            subject: Subject::new(self.subject),
            user_name: self.user_name,
            token_hash,
            created_at: self.created_at,
            expires_at: self.expires_at,
            revoked: self.revoked,
        })
    }
}

#[derive(sqlx::FromRow)]
struct BlacklistRow {
    jti: String,
    token_hash: String,
    expires_at: DateTime<Utc>,
    blacklisted_at: DateTime<Utc>,
    reason: String,
}

impl BlacklistRow {
    fn into_entry(self) -> AuthResult<BlacklistEntry> {
        let token_hash = TokenHash::from_hex(&self.token_hash)
            .ok_or_else(|| AuthError::Internal(format!("Invalid token_hash: {}", self.token_hash)))?;

        Ok(BlacklistEntry {
            jti: self.jti,
            token_hash,
            expires_at: self.expires_at,
            blacklisted_at: self.blacklisted_at,
            reason: self.reason,
        })
    }
}
