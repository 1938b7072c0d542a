//! HTTP Handlers

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::{Extension, Json};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    LoginInput, LoginUseCase, LogoutUseCase, RefreshUseCase, RegisterInput, RegisterUseCase,
};
use crate::codec::TokenCodec;
use crate::domain::repository::{BlacklistRepository, RefreshTokenRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::middleware::AuthContext;
use crate::presentation::dto::{
    LoginRequest, MeResponse, MessageResponse, RefreshRequest, RegisterRequest, RegisterResponse,
    TokenResponse,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + RefreshTokenRepository + BlacklistRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub codec: Arc<TokenCodec>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)>
where
    R: UserRepository + RefreshTokenRepository + BlacklistRepository + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let input = RegisterInput {
        user_name: req.user_name,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: output.user_id,
            user_name: output.user_name,
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<TokenResponse>>
where
    R: UserRepository + RefreshTokenRepository + BlacklistRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.codec.clone(),
        state.config.clone(),
    );

    let input = LoginInput {
        user_name: req.user_name,
        password: req.password,
    };

    let pair = use_case.execute(input).await?;

    Ok(Json(TokenResponse::bearer(
        pair.access_token,
        pair.refresh_token,
        state.config.access_ttl_secs(),
    )))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RefreshRequest>,
) -> AuthResult<Json<TokenResponse>>
where
    R: UserRepository + RefreshTokenRepository + BlacklistRepository + Clone + Send + Sync + 'static,
{
    let use_case = RefreshUseCase::new(
        state.repo.clone(),
        state.codec.clone(),
        state.config.clone(),
    );

    let pair = use_case.execute(&req.refresh_token).await?;

    Ok(Json(TokenResponse::bearer(
        pair.access_token,
        pair.refresh_token,
        state.config.access_ttl_secs(),
    )))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + RefreshTokenRepository + BlacklistRepository + Clone + Send + Sync + 'static,
{
    let token = extract_bearer(&headers)?;

    let use_case = LogoutUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.codec.clone(),
    );
    use_case.execute(token).await?;

    Ok(Json(MessageResponse {
        detail: "Successfully logged out".to_string(),
    }))
}

/// POST /logout-all
pub async fn logout_all<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + RefreshTokenRepository + BlacklistRepository + Clone + Send + Sync + 'static,
{
    let token = extract_bearer(&headers)?;

    let use_case = LogoutUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.codec.clone(),
    );
    use_case.execute_all(token).await?;

    Ok(Json(MessageResponse {
        detail: "Successfully logged out from all devices".to_string(),
    }))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /me
///
/// Runs behind `require_access_token`; the claims arrive already
/// verified in request extensions.
pub async fn me(Extension(ctx): Extension<AuthContext>) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: ctx.claims.sub.into_inner(),
        user_name: ctx.claims.name,
    })
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Pull the raw token out of `Authorization: Bearer <token>`.
/// A missing or non-bearer header is a malformed credential, which
/// collapses to the uniform 401 like every other token failure.
pub(crate) fn extract_bearer(headers: &HeaderMap) -> AuthResult<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::Malformed)
}
