//! Token Codec
//!
//! Encodes and decodes signed, expiring claim sets as compact
//! JWT-format strings: `base64url(header) . base64url(claims) .
//! base64url(HMAC-SHA256 signature)`, alg HS256.
//!
//! The codec is stateless: it holds only the symmetric secret and is
//! safe to share across concurrent callers. Kind checks (access vs
//! refresh) belong to the caller, not the codec.

use serde::{Deserialize, Serialize};

use platform::crypto::{from_base64url, hmac_sha256, hmac_sha256_verify, to_base64url};

use crate::domain::value_object::claims::Claims;
use crate::error::{AuthError, AuthResult};

/// Token header (fixed for this codec)
#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

impl Header {
    fn hs256() -> Self {
        Self {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// Stateless HS256 token codec
#[derive(Clone)]
pub struct TokenCodec {
    secret: Vec<u8>,
}

impl TokenCodec {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Encode and sign a claim set
    pub fn encode(&self, claims: &Claims) -> AuthResult<String> {
        let header = serde_json::to_vec(&Header::hs256())
            .map_err(|e| AuthError::Internal(format!("Failed to encode token header: {e}")))?;
        let payload = serde_json::to_vec(claims)
            .map_err(|e| AuthError::Internal(format!("Failed to encode token claims: {e}")))?;

        let signing_input = format!("{}.{}", to_base64url(&header), to_base64url(&payload));
        let signature = hmac_sha256(&self.secret, signing_input.as_bytes());

        Ok(format!("{}.{}", signing_input, to_base64url(&signature)))
    }

    /// Verify and decode a raw token
    ///
    /// The signature is verified before any field is parsed or
    /// trusted; expiry is checked last.
    pub fn decode(&self, raw_token: &str) -> AuthResult<Claims> {
        let mut parts = raw_token.split('.');
        let (header_b64, payload_b64, signature_b64) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(h), Some(p), Some(s), None)
                    if !h.is_empty() && !p.is_empty() && !s.is_empty() =>
                {
                    (h, p, s)
                }
                _ => return Err(AuthError::Malformed),
            };

        let signature = from_base64url(signature_b64).map_err(|_| AuthError::Malformed)?;
        let signing_input = format!("{header_b64}.{payload_b64}");
        if !hmac_sha256_verify(&self.secret, signing_input.as_bytes(), &signature) {
            return Err(AuthError::InvalidSignature);
        }

        let payload = from_base64url(payload_b64).map_err(|_| AuthError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&payload).map_err(|_| AuthError::Malformed)?;

        if claims.is_expired() {
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
