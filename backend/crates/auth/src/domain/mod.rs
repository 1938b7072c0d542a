//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{blacklist::BlacklistEntry, refresh_token::RefreshTokenRecord, user::User};
pub use repository::{BlacklistRepository, RefreshTokenRepository, UserRepository};
