//! Auth Middleware
//!
//! Middleware for requiring a valid access token on protected routes.
//! Decoded claims are stored in request extensions for downstream
//! handlers.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::VerifyAccessUseCase;
use crate::codec::TokenCodec;
use crate::domain::repository::BlacklistRepository;
use crate::domain::value_object::claims::Claims;
use crate::presentation::handlers::extract_bearer;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<B>
where
    B: BlacklistRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<B>,
    pub codec: Arc<TokenCodec>,
}

/// Verified claims stored in request extensions
#[derive(Clone)]
pub struct AuthContext {
    pub claims: Claims,
}

/// Middleware that requires a valid, non-blacklisted access token.
/// Applied per-route with `axum::middleware::from_fn_with_state`.
pub async fn require_access_token<B>(
    State(state): State<AuthMiddlewareState<B>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    B: BlacklistRepository + Clone + Send + Sync + 'static,
{
    let token = match extract_bearer(req.headers()) {
        Ok(token) => token.to_string(),
        Err(e) => return Err(e.into_response()),
    };

    let use_case = VerifyAccessUseCase::new(state.repo.clone(), state.codec.clone());

    let claims = match use_case.execute(&token).await {
        Ok(claims) => claims,
        Err(e) => return Err(e.into_response()),
    };

    req.extensions_mut().insert(AuthContext { claims });

    Ok(next.run(req).await)
}
