//! End-to-end flows over the in-memory repository: registration,
//! login, rotation, logout, and the blacklist gate.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::issue::TokenPair;
use crate::application::{
    LoginInput, LoginUseCase, LogoutUseCase, RefreshUseCase, RegisterInput, RegisterUseCase,
    VerifyAccessUseCase,
};
use crate::codec::TokenCodec;
use crate::domain::entity::blacklist::BlacklistEntry;
use crate::domain::entity::refresh_token::RefreshTokenRecord;
use crate::domain::repository::{BlacklistRepository, RefreshTokenRepository};
use crate::domain::value_object::claims::{Claims, TokenKind};
use crate::domain::value_object::subject::Subject;
use crate::domain::value_object::token_hash::TokenHash;
use crate::error::AuthError;
use crate::infra::memory::MemoryAuthRepository;

struct Harness {
    repo: Arc<MemoryAuthRepository>,
    codec: Arc<TokenCodec>,
    config: Arc<AuthConfig>,
}

impl Harness {
    fn new() -> Self {
        let config = AuthConfig::with_random_secret();
        Self {
            repo: Arc::new(MemoryAuthRepository::new()),
            codec: Arc::new(TokenCodec::new(config.token_secret)),
            config: Arc::new(config),
        }
    }

    async fn register(&self, user_name: &str, password: &str) -> Result<(), AuthError> {
        RegisterUseCase::new(self.repo.clone(), self.config.clone())
            .execute(RegisterInput {
                user_name: user_name.to_string(),
                password: password.to_string(),
            })
            .await
            .map(|_| ())
    }

    async fn login(&self, user_name: &str, password: &str) -> Result<TokenPair, AuthError> {
        LoginUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            self.codec.clone(),
            self.config.clone(),
        )
        .execute(LoginInput {
            user_name: user_name.to_string(),
            password: password.to_string(),
        })
        .await
    }

    fn refresh_use_case(&self) -> RefreshUseCase<MemoryAuthRepository> {
        RefreshUseCase::new(self.repo.clone(), self.codec.clone(), self.config.clone())
    }

    fn verify_use_case(&self) -> VerifyAccessUseCase<MemoryAuthRepository> {
        VerifyAccessUseCase::new(self.repo.clone(), self.codec.clone())
    }

    fn logout_use_case(&self) -> LogoutUseCase<MemoryAuthRepository, MemoryAuthRepository> {
        LogoutUseCase::new(self.repo.clone(), self.repo.clone(), self.codec.clone())
    }
}

// ============================================================================
// Registration and Login
// ============================================================================

#[tokio::test]
async fn test_register_login_verify() {
    let h = Harness::new();
    h.register("alice", "ValidPass123!").await.unwrap();

    let pair = h.login("alice", "ValidPass123!").await.unwrap();

    let claims = h.verify_use_case().execute(&pair.access_token).await.unwrap();
    assert_eq!(claims.name, "alice");
    assert_eq!(claims.kind, TokenKind::Access);
}

#[tokio::test]
async fn test_register_duplicate_name() {
    let h = Harness::new();
    h.register("alice", "ValidPass123!").await.unwrap();

    // Uniqueness is on the canonical form
    let err = h.register("Alice", "OtherPass456!").await.unwrap_err();
    assert!(matches!(err, AuthError::UserNameTaken));
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let h = Harness::new();
    for weak in ["short1!", "nouppercase123!", "NOLOWERCASE123!", "NoDigits!!", "NoSpecial123"] {
        let err = h.register("alice", weak).await.unwrap_err();
        assert!(
            matches!(err, AuthError::PasswordValidation(_)),
            "expected PasswordValidation for {weak:?}, got {err:?}"
        );
    }
}

#[tokio::test]
async fn test_register_rejects_bad_user_name() {
    let h = Harness::new();
    let err = h.register("a!", "ValidPass123!").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidUserName(_)));
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let h = Harness::new();
    h.register("alice", "ValidPass123!").await.unwrap();

    // Wrong password, unknown user, and invalid user name all map to
    // the same error
    let wrong_password = h.login("alice", "WrongPass123!").await.unwrap_err();
    let unknown_user = h.login("mallory", "ValidPass123!").await.unwrap_err();
    let bad_name = h.login("a!", "ValidPass123!").await.unwrap_err();

    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert!(matches!(unknown_user, AuthError::InvalidCredentials));
    assert!(matches!(bad_name, AuthError::InvalidCredentials));
}

// ============================================================================
// Refresh Rotation
// ============================================================================

#[tokio::test]
async fn test_refresh_rotates_token() {
    let h = Harness::new();
    h.register("alice", "ValidPass123!").await.unwrap();
    let pair = h.login("alice", "ValidPass123!").await.unwrap();

    let refresh = h.refresh_use_case();
    let rotated = refresh.execute(&pair.refresh_token).await.unwrap();
    assert_ne!(rotated.refresh_token, pair.refresh_token);

    // The used token is dead, the new one works
    let replay = refresh.execute(&pair.refresh_token).await.unwrap_err();
    assert!(matches!(replay, AuthError::TokenNotActive));

    refresh.execute(&rotated.refresh_token).await.unwrap();
}

#[tokio::test]
async fn test_concurrent_refresh_single_winner() {
    let h = Harness::new();
    h.register("alice", "ValidPass123!").await.unwrap();
    let pair = h.login("alice", "ValidPass123!").await.unwrap();

    let refresh = h.refresh_use_case();
    let (a, b) = tokio::join!(
        refresh.execute(&pair.refresh_token),
        refresh.execute(&pair.refresh_token)
    );

    let winners = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one concurrent refresh must win");

    let loser = if a.is_err() { a } else { b };
    assert!(matches!(loser.unwrap_err(), AuthError::TokenNotActive));
}

#[tokio::test]
async fn test_refresh_rejects_wrong_kind() {
    let h = Harness::new();
    h.register("alice", "ValidPass123!").await.unwrap();
    let pair = h.login("alice", "ValidPass123!").await.unwrap();

    let err = h
        .refresh_use_case()
        .execute(&pair.access_token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::WrongKind));

    let err = h
        .verify_use_case()
        .execute(&pair.refresh_token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::WrongKind));
}

#[tokio::test]
async fn test_refresh_rejects_unregistered_token() {
    let h = Harness::new();
    h.register("alice", "ValidPass123!").await.unwrap();

    // Signed correctly, but never registered server-side
    let claims = Claims::new(Subject::new("ghost"), "alice", TokenKind::Refresh, 3600);
    let forged = h.codec.encode(&claims).unwrap();

    let err = h.refresh_use_case().execute(&forged).await.unwrap_err();
    assert!(matches!(err, AuthError::TokenNotActive));
}

#[tokio::test]
async fn test_refresh_claims_record_mismatch() {
    let h = Harness::new();

    // Register a record whose stored user name disagrees with the
    // claims that will be presented
    let claims = Claims::new(Subject::new("user-1"), "alice", TokenKind::Refresh, 3600);
    let token = h.codec.encode(&claims).unwrap();
    let record = RefreshTokenRecord::new(
        Subject::new("user-1"),
        "mallory",
        TokenHash::of(&token),
        3600,
    );
    h.repo.register(&record).await.unwrap();

    let err = h.refresh_use_case().execute(&token).await.unwrap_err();
    assert!(matches!(err, AuthError::TokenNotActive));

    // The take already revoked the record; the token cannot be retried
    let err = h.refresh_use_case().execute(&token).await.unwrap_err();
    assert!(matches!(err, AuthError::TokenNotActive));
}

// ============================================================================
// Logout and Blacklist
// ============================================================================

#[tokio::test]
async fn test_logout_blacklists_access_token() {
    let h = Harness::new();
    h.register("alice", "ValidPass123!").await.unwrap();
    let pair = h.login("alice", "ValidPass123!").await.unwrap();

    let verify = h.verify_use_case();
    verify.execute(&pair.access_token).await.unwrap();

    h.logout_use_case().execute(&pair.access_token).await.unwrap();

    let err = verify.execute(&pair.access_token).await.unwrap_err();
    assert!(matches!(err, AuthError::TokenRevoked));

    // Plain logout does not touch refresh tokens
    h.refresh_use_case().execute(&pair.refresh_token).await.unwrap();
}

#[tokio::test]
async fn test_logout_all_revokes_refresh_tokens() {
    let h = Harness::new();
    h.register("alice", "ValidPass123!").await.unwrap();
    let first = h.login("alice", "ValidPass123!").await.unwrap();
    let second = h.login("alice", "ValidPass123!").await.unwrap();

    h.logout_use_case().execute_all(&first.access_token).await.unwrap();

    let refresh = h.refresh_use_case();
    for token in [&first.refresh_token, &second.refresh_token] {
        let err = refresh.execute(token).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenNotActive));
    }
}

#[tokio::test]
async fn test_logout_with_expired_token_is_noop() {
    let h = Harness::new();
    let claims = Claims::new(Subject::new("user-1"), "alice", TokenKind::Access, -60);
    let expired = h.codec.encode(&claims).unwrap();

    h.logout_use_case().execute(&expired).await.unwrap();
    assert!(h
        .repo
        .find(&TokenHash::of(&expired))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_expired_blacklist_entry_is_removed_lazily() {
    let h = Harness::new();
    h.register("alice", "ValidPass123!").await.unwrap();
    let pair = h.login("alice", "ValidPass123!").await.unwrap();

    // Live token, but its blacklist entry is past expiry: the entry
    // must not block the request and should get cleaned up
    let hash = TokenHash::of(&pair.access_token);
    let stale_claims = Claims::new(Subject::new("user-1"), "alice", TokenKind::Access, -60);
    let entry = BlacklistEntry::new(hash, &stale_claims, "logout");
    h.repo.insert(&entry).await.unwrap();

    h.verify_use_case().execute(&pair.access_token).await.unwrap();

    // Removal runs off the request path
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(h.repo.find(&hash).await.unwrap().is_none());
}

// ============================================================================
// Router and Middleware
// ============================================================================

#[tokio::test]
async fn test_middleware_guards_protected_route() {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    let h = Harness::new();
    h.register("alice", "ValidPass123!").await.unwrap();
    let pair = h.login("alice", "ValidPass123!").await.unwrap();

    let app = crate::presentation::router::auth_router_generic(
        (*h.repo).clone(),
        (*h.config).clone(),
    );

    // Valid token: the middleware verifies it and hands the claims to
    // the handler through request extensions
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/me")
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", pair.access_token),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["user_name"], "alice");

    // Missing header and garbage token both get the uniform 401
    for auth_header in [None, Some("Bearer not-a-token")] {
        let mut builder = Request::builder().uri("/me");
        if let Some(value) = auth_header {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let response = app
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["detail"], "Could not validate credentials");
    }

    // The blacklist is enforced behind the middleware too
    h.logout_use_case().execute(&pair.access_token).await.unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/me")
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", pair.access_token),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Wire-Level Rejections
// ============================================================================

#[tokio::test]
async fn test_forged_and_garbage_tokens() {
    let h = Harness::new();
    h.register("alice", "ValidPass123!").await.unwrap();
    let pair = h.login("alice", "ValidPass123!").await.unwrap();

    let verify = h.verify_use_case();

    let err = verify.execute("not-a-token").await.unwrap_err();
    assert!(matches!(err, AuthError::Malformed));

    // Re-signed with a different secret
    let other_codec = TokenCodec::new(AuthConfig::with_random_secret().token_secret);
    let claims = h.codec.decode(&pair.access_token).unwrap();
    let forged = other_codec.encode(&claims).unwrap();
    let err = verify.execute(&forged).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidSignature));
}

#[tokio::test]
async fn test_all_token_errors_share_wire_status() {
    for err in [
        AuthError::Malformed,
        AuthError::InvalidSignature,
        AuthError::Expired,
        AuthError::WrongKind,
        AuthError::TokenNotActive,
        AuthError::TokenRevoked,
    ] {
        assert!(err.is_token_error());
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
