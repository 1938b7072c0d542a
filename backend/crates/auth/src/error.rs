//! Auth Error Types
//!
//! Token-decode failures (`Malformed`, `InvalidSignature`, `Expired`,
//! `WrongKind`, `TokenNotActive`, `TokenRevoked`) carry their precise
//! cause for internal logging, but all collapse to one uniform 401
//! response body on the wire. An attacker must not be able to tell an
//! expired token from a forged one.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token cannot be parsed (wrong segment count, bad base64/JSON)
    #[error("Token is malformed")]
    Malformed,

    /// Token signature does not verify (tampered or wrong secret)
    #[error("Token signature is invalid")]
    InvalidSignature,

    /// Token is past its expiry
    #[error("Token has expired")]
    Expired,

    /// Access token presented where refresh expected, or vice versa
    #[error("Wrong token kind")]
    WrongKind,

    /// Refresh token not active in the store (rotated, revoked,
    /// expired server-side, or never issued) - covers replay
    #[error("Refresh token is not active")]
    TokenNotActive,

    /// Access token has been blacklisted
    #[error("Token has been revoked")]
    TokenRevoked,

    /// Invalid credentials (unknown user or wrong password)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// User name already exists
    #[error("User name already exists")]
    UserNameTaken,

    /// User name validation error
    #[error("Invalid user name: {0}")]
    InvalidUserName(String),

    /// Password policy violation
    #[error("Password validation failed: {0}")]
    PasswordValidation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether this error is part of the token taxonomy that must be
    /// indistinguishable on the wire
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            AuthError::Malformed
                | AuthError::InvalidSignature
                | AuthError::Expired
                | AuthError::WrongKind
                | AuthError::TokenNotActive
                | AuthError::TokenRevoked
        )
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            e if e.is_token_error() => StatusCode::UNAUTHORIZED,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::UserNameTaken => StatusCode::CONFLICT,
            AuthError::InvalidUserName(_) | AuthError::PasswordValidation(_) => {
                StatusCode::BAD_REQUEST
            }
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Externally visible message
    ///
    /// Token errors share one opaque message; the variant only shows
    /// up in logs.
    fn public_message(&self) -> String {
        if self.is_token_error() {
            return "Could not validate credentials".to_string();
        }
        match self {
            AuthError::Database(_) | AuthError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::TokenNotActive => {
                tracing::warn!("Refresh token not active (possible replay)");
            }
            e if e.is_token_error() => {
                tracing::debug!(error = %e, "Token rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        let body = Json(json!({ "detail": self.public_message() }));
        (status, body).into_response()
    }
}
