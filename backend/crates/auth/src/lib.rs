//! Auth (Token Lifecycle) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - In-memory and PostgreSQL implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - User registration/login with username + password
//! - Short-lived access tokens, longer-lived refresh tokens (HS256)
//! - Refresh token rotation: every refresh revokes the token just used
//! - Revocation (single token and all-tokens-for-subject)
//! - Access token blacklisting on logout
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional application pepper
//! - Raw refresh tokens are never stored, only their SHA-256 hash
//! - Rotate-on-use makes a stolen refresh token usable at most once
//! - Decode failures collapse to a single 401 on the wire so callers
//!   cannot distinguish expired from forged tokens

pub mod application;
pub mod codec;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use codec::TokenCodec;
pub use error::{AuthError, AuthResult};
pub use infra::memory::MemoryAuthRepository;
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::{auth_router, auth_router_generic};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
