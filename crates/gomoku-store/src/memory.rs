//! In-memory [`UserStore`] implementation.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use gomoku_protocol::UserId;

use crate::{StoreError, UserProfile, UserStore, INITIAL_SCORE, SCORE_DELTA};

struct StoredUser {
    profile: UserProfile,
    // Kept verbatim; hashing is the responsibility of real storage
    // backends, not this test/demo implementation.
    password: String,
}

struct Inner {
    next_uid: u64,
    users: HashMap<UserId, StoredUser>,
    /// username → uid, kept in sync with `users`.
    names: HashMap<String, UserId>,
}

/// A [`UserStore`] held entirely in process memory.
///
/// Accounts vanish when the process exits. Good enough for tests and for
/// running the bundled server binary without a database.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_uid: 1,
                users: HashMap::new(),
                names: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means another thread panicked mid-update;
        // the maps themselves are still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for MemoryStore {
    fn lookup_by_uid(&self, uid: UserId) -> Result<UserProfile, StoreError> {
        let inner = self.lock();
        inner
            .users
            .get(&uid)
            .map(|u| u.profile.clone())
            .ok_or(StoreError::NotFound(uid))
    }

    fn lookup_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserProfile, StoreError> {
        let inner = self.lock();
        let uid = inner
            .names
            .get(username)
            .copied()
            .ok_or(StoreError::InvalidCredentials)?;
        let user = inner
            .users
            .get(&uid)
            .ok_or(StoreError::InvalidCredentials)?;
        if user.password != password {
            return Err(StoreError::InvalidCredentials);
        }
        Ok(user.profile.clone())
    }

    fn create_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserProfile, StoreError> {
        let mut inner = self.lock();
        if inner.names.contains_key(username) {
            return Err(StoreError::UsernameTaken(username.to_string()));
        }

        let uid = UserId(inner.next_uid);
        inner.next_uid += 1;

        let profile = UserProfile {
            uid,
            username: username.to_string(),
            score: INITIAL_SCORE,
            play_count: 0,
            win_count: 0,
        };
        inner.names.insert(username.to_string(), uid);
        inner.users.insert(
            uid,
            StoredUser {
                profile: profile.clone(),
                password: password.to_string(),
            },
        );

        tracing::info!(%uid, username, "user registered");
        Ok(profile)
    }

    fn record_win(&self, uid: UserId) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let user = inner.users.get_mut(&uid).ok_or(StoreError::NotFound(uid))?;
        user.profile.score += SCORE_DELTA;
        user.profile.play_count += 1;
        user.profile.win_count += 1;
        Ok(())
    }

    fn record_loss(&self, uid: UserId) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let user = inner.users.get_mut(&uid).ok_or(StoreError::NotFound(uid))?;
        user.profile.score -= SCORE_DELTA;
        user.profile.play_count += 1;
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================
