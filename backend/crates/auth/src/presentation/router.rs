//! Auth Router

use axum::middleware::from_fn_with_state;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::codec::TokenCodec;
use crate::domain::repository::{BlacklistRepository, RefreshTokenRepository, UserRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_access_token};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: UserRepository + RefreshTokenRepository + BlacklistRepository + Clone + Send + Sync + 'static,
{
    let repo = Arc::new(repo);
    let codec = Arc::new(TokenCodec::new(config.token_secret));
    let state = AuthAppState {
        repo: repo.clone(),
        codec: codec.clone(),
        config: Arc::new(config),
    };
    let mw_state = AuthMiddlewareState { repo, codec };

    // Routes behind the access-token gate; the handler receives the
    // verified claims via request extensions
    let protected = Router::new()
        .route("/me", get(handlers::me))
        .route_layer(from_fn_with_state(mw_state, require_access_token::<R>));

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/refresh", post(handlers::refresh::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .route("/logout-all", post(handlers::logout_all::<R>))
        .merge(protected)
        .with_state(state)
}
