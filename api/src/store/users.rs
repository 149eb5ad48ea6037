use crate::{
    config::PasswordStorage,
    errors::ForumError,
    models::{Credential, User},
};
use chrono::Utc;
use dashmap::{DashMap, mapref::entry::Entry};
use std::sync::atomic::{AtomicU64, Ordering};

/// Registered users keyed by username. Users are never updated or removed.
pub struct UserStore {
    users: DashMap<String, User>,
    next_id: AtomicU64,
    storage: PasswordStorage,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new(PasswordStorage::default())
    }
}

impl UserStore {
    pub fn new(storage: PasswordStorage) -> Self {
        Self {
            users: DashMap::new(),
            next_id: AtomicU64::new(1),
            storage,
        }
    }

    /// Adds a user unless the username is taken. The uniqueness check, id
    /// allocation and insert happen under the username's shard lock, so two
    /// concurrent registrations of one name cannot both succeed.
    pub fn register(&self, username: &str, password: &str) -> Result<User, ForumError> {
        if self.users.contains_key(username) {
            return Err(ForumError::DuplicateUsername);
        }

        let password = Credential::seal(self.storage, password)
            .map_err(|e| ForumError::Internal(format!("Password hashing failed: {}", e)))?;

        match self.users.entry(username.to_owned()) {
            Entry::Occupied(_) => Err(ForumError::DuplicateUsername),
            Entry::Vacant(slot) => {
                let user = User {
                    id: self.next_id.fetch_add(1, Ordering::SeqCst),
                    username: username.to_owned(),
                    password,
                    created_at: Utc::now(),
                };
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    /// Returns the user whose username and password both match. An unknown
    /// username and a wrong password fail the same way.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User, ForumError> {
        let user = self
            .users
            .get(username)
            .ok_or(ForumError::InvalidCredentials)?;

        let valid = user
            .password
            .matches(password)
            .map_err(|e| ForumError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(ForumError::InvalidCredentials);
        }

        Ok(user.clone())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
