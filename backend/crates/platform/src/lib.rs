//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations for the token
//! lifecycle core:
//! - Cryptographic utilities (SHA-256, HMAC-SHA256, Base64url)
//! - Password hashing (Argon2id with optional pepper)

pub mod crypto;
pub mod password;
