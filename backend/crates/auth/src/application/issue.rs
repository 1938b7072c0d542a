//! Token Pair Issuance
//!
//! Shared by login and refresh: mint an access/refresh pair for a
//! subject and register the refresh token's hash server-side.

use serde::Serialize;

use crate::application::config::AuthConfig;
use crate::codec::TokenCodec;
use crate::domain::entity::refresh_token::RefreshTokenRecord;
use crate::domain::repository::RefreshTokenRepository;
use crate::domain::value_object::claims::{Claims, TokenKind};
use crate::domain::value_object::{subject::Subject, token_hash::TokenHash};
use crate::error::AuthResult;

/// Freshly issued access/refresh token pair
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Mint a pair and register the refresh token hash. The raw refresh
/// token leaves the server only through the returned pair.
pub(crate) async fn issue_pair<R: RefreshTokenRepository>(
    refresh_repo: &R,
    codec: &TokenCodec,
    config: &AuthConfig,
    subject: Subject,
    user_name: &str,
) -> AuthResult<TokenPair> {
    let access_claims = Claims::new(
        subject.clone(),
        user_name,
        TokenKind::Access,
        config.access_ttl_secs(),
    );
    let refresh_claims = Claims::new(
        subject.clone(),
        user_name,
        TokenKind::Refresh,
        config.refresh_ttl_secs(),
    );

    let access_token = codec.encode(&access_claims)?;
    let refresh_token = codec.encode(&refresh_claims)?;

    let record = RefreshTokenRecord::new(
        subject,
        user_name,
        TokenHash::of(&refresh_token),
        config.refresh_ttl_secs(),
    );
    refresh_repo.register(&record).await?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}
