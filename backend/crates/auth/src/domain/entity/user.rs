//! User Entity
//!
//! The credential owner. Only the fields the auth core needs: the
//! surrounding todo application keeps its own richer user profile.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;
use uuid::Uuid;

use crate::domain::value_object::{subject::Subject, user_name::UserName};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// User ID (UUID v4)
    pub user_id: Uuid,
    /// Login handle
    pub user_name: UserName,
    /// Argon2id hash, PHC string format
    pub password_hash: HashedPassword,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a freshly hashed password
    pub fn new(user_name: UserName, password_hash: HashedPassword) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            user_name,
            password_hash,
            created_at: Utc::now(),
        }
    }

    /// Token subject for this user
    pub fn subject(&self) -> Subject {
        Subject::from(self.user_id)
    }
}
