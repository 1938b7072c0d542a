//! In-Memory Repository Implementation
//!
//! A single mutex guards all maps: register/lookup/revoke interleave
//! across concurrent refresh requests for the same subject, and the
//! lookup-then-revoke sequence in `take_active` must not be visible
//! half-done. The guard is never held across an await point.
//!
//! Refresh token expiry is additionally indexed with a min-heap so
//! `purge_expired` does not scan the whole map; without purging the
//! map would grow without bound in a long-running process.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::domain::entity::{
    blacklist::BlacklistEntry, refresh_token::RefreshTokenRecord, user::User,
};
use crate::domain::repository::{
    BlacklistRepository, RefreshTokenRepository, UserRepository,
};
use crate::domain::value_object::{
    subject::Subject, token_hash::TokenHash, user_name::UserName,
};
use crate::error::AuthResult;

#[derive(Default)]
struct Store {
    /// Users keyed by canonical user name
    users: HashMap<String, User>,
    /// Refresh token records keyed by token_id
    refresh_tokens: HashMap<Uuid, RefreshTokenRecord>,
    /// Min-heap on (expiry timestamp, token_id) for cheap purging
    expiry_queue: BinaryHeap<Reverse<(i64, Uuid)>>,
    /// Blacklist entries keyed by token hash hex
    blacklist: HashMap<String, BlacklistEntry>,
}

/// In-memory auth repository
#[derive(Clone, Default)]
pub struct MemoryAuthRepository {
    inner: Arc<Mutex<Store>>,
}

impl MemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        // A poisoned lock means a panic elsewhere; the data itself
        // is still consistent for our single-step mutations
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl UserRepository for MemoryAuthRepository {
    async fn create_user(&self, user: &User) -> AuthResult<()> {
        self.lock()
            .users
            .insert(user.user_name.canonical().to_string(), user.clone());
        Ok(())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        Ok(self.lock().users.get(user_name.canonical()).cloned())
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        Ok(self.lock().users.contains_key(user_name.canonical()))
    }
}

impl RefreshTokenRepository for MemoryAuthRepository {
    async fn register(&self, record: &RefreshTokenRecord) -> AuthResult<()> {
        let mut store = self.lock();
        store
            .expiry_queue
            .push(Reverse((record.expires_at.timestamp(), record.token_id)));
        store.refresh_tokens.insert(record.token_id, record.clone());
        Ok(())
    }

    async fn lookup_active(
        &self,
        subject: &Subject,
        token_hash: &TokenHash,
    ) -> AuthResult<Option<RefreshTokenRecord>> {
        let store = self.lock();
        Ok(store
            .refresh_tokens
            .values()
            .find(|r| r.subject == *subject && r.token_hash == *token_hash && r.is_active())
            .cloned())
    }

    async fn take_active(
        &self,
        subject: &Subject,
        token_hash: &TokenHash,
    ) -> AuthResult<Option<RefreshTokenRecord>> {
        let mut store = self.lock();
        let record = store
            .refresh_tokens
            .values_mut()
            .find(|r| r.subject == *subject && r.token_hash == *token_hash && r.is_active());

        Ok(record.map(|r| {
            r.revoke();
            r.clone()
        }))
    }

    async fn revoke(&self, token_id: Uuid) -> AuthResult<bool> {
        let mut store = self.lock();
        match store.refresh_tokens.get_mut(&token_id) {
            Some(record) => {
                record.revoke();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_all_for_subject(&self, subject: &Subject) -> AuthResult<u64> {
        let mut store = self.lock();
        let mut revoked = 0u64;
        for record in store.refresh_tokens.values_mut() {
            if record.subject == *subject && !record.revoked {
                record.revoke();
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn purge_expired(&self) -> AuthResult<u64> {
        let now = chrono::Utc::now().timestamp();
        let mut store = self.lock();
        let mut removed = 0u64;

        while let Some(Reverse((expires_ts, token_id))) = store.expiry_queue.peek().copied() {
            if expires_ts > now {
                break;
            }
            store.expiry_queue.pop();
            if store.refresh_tokens.remove(&token_id).is_some() {
                removed += 1;
            }
        }

        Ok(removed)
    }
}

impl BlacklistRepository for MemoryAuthRepository {
    async fn insert(&self, entry: &BlacklistEntry) -> AuthResult<()> {
        self.lock()
            .blacklist
            .insert(entry.token_hash.to_hex(), entry.clone());
        Ok(())
    }

    async fn find(&self, token_hash: &TokenHash) -> AuthResult<Option<BlacklistEntry>> {
        Ok(self.lock().blacklist.get(&token_hash.to_hex()).cloned())
    }

    async fn remove(&self, token_hash: &TokenHash) -> AuthResult<bool> {
        Ok(self.lock().blacklist.remove(&token_hash.to_hex()).is_some())
    }
}
