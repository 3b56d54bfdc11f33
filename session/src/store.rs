//! Persistent session store: the bearer token and the cached user record.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser keeps these two keys in `localStorage`, the CLI in a JSON
//! file, tests in memory. [`SessionStore`] layers the typed token/user
//! contract over any [`KeyValueStore`] so all three behave the same.
//!
//! ERROR HANDLING
//! ==============
//! A malformed cached user reads as "no user" rather than an error; the
//! manager treats a half-present session as logged out.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::types::User;

pub const TOKEN_KEY: &str = "authToken";
pub const USER_KEY: &str = "authUser";

/// Errors surfaced by a [`KeyValueStore`] write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backing store refused the write (quota, disabled storage, I/O).
    #[error("storage write failed for {key}: {reason}")]
    Write { key: String, reason: String },

    /// The value could not be serialized before writing.
    #[error("could not encode {key}: {reason}")]
    Encode { key: String, reason: String },
}

/// Minimal string key/value storage with `localStorage` semantics.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the backend refuses the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the backend refuses the removal.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-local store, used by tests and by server-side rendering where no
/// durable storage exists.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Typed token/user view over a shared [`KeyValueStore`]. Cheap to clone.
#[derive(Clone)]
pub struct SessionStore {
    backend: Rc<dyn KeyValueStore>,
}

impl SessionStore {
    #[must_use]
    pub fn new(backend: Rc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Shorthand for a store over a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Rc::new(MemoryStore::new()))
    }

    /// # Errors
    ///
    /// Propagates the backend's [`StoreError`].
    pub fn set_token(&self, token: &str) -> Result<(), StoreError> {
        self.backend.set(TOKEN_KEY, token)
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.backend.get(TOKEN_KEY)
    }

    /// # Errors
    ///
    /// Propagates the backend's [`StoreError`].
    pub fn remove_token(&self) -> Result<(), StoreError> {
        self.backend.remove(TOKEN_KEY)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Encode`] if the user cannot be serialized, or the
    /// backend's write error.
    pub fn set_user(&self, user: &User) -> Result<(), StoreError> {
        let raw = serde_json::to_string(user).map_err(|e| StoreError::Encode {
            key: USER_KEY.to_owned(),
            reason: e.to_string(),
        })?;
        self.backend.set(USER_KEY, &raw)
    }

    /// Cached user, or `None` when absent or unparseable.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        let raw = self.backend.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                log::warn!("ignoring malformed cached user record: {e}");
                None
            }
        }
    }

    /// # Errors
    ///
    /// Propagates the backend's [`StoreError`].
    pub fn remove_user(&self) -> Result<(), StoreError> {
        self.backend.remove(USER_KEY)
    }

    /// Remove both keys. Attempts both removals even if the first fails.
    ///
    /// # Errors
    ///
    /// Returns the first removal error encountered.
    pub fn clear(&self) -> Result<(), StoreError> {
        let token = self.remove_token();
        let user = self.remove_user();
        token.and(user)
    }

    /// True when neither key is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backend.get(TOKEN_KEY).is_none() && self.backend.get(USER_KEY).is_none()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("has_token", &self.token().is_some())
            .field("has_user", &self.backend.get(USER_KEY).is_some())
            .finish()
    }
}
