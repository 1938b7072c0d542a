//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod issue;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;
pub mod revoke;
pub mod verify_access;

// Re-exports
pub use config::AuthConfig;
pub use issue::TokenPair;
pub use login::{LoginInput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use refresh::RefreshUseCase;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use revoke::RevokeUseCase;
pub use verify_access::VerifyAccessUseCase;
