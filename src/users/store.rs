//! In-memory user registry.
//!
//! One `Mutex` guards the whole map. Each operation takes the lock for a
//! single lookup or insert and never holds it across an `.await`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Placeholder token returned on successful login.
pub const PLACEHOLDER_TOKEN: &str = "dummy-token";

/// A registered user. The password is stored as given.
///
/// Absent and `null` fields both decode as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct User {
    #[serde(deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub password: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl User {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserStoreError {
    #[error("User already exists")]
    AlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Username → user map, alive for the process lifetime only.
#[derive(Debug, Default)]
pub struct UserStore {
    users: Mutex<HashMap<String, User>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `user` unless the username is already taken.
    pub fn register(&self, user: User) -> Result<(), UserStoreError> {
        let mut users = self.lock();
        if users.contains_key(&user.username) {
            return Err(UserStoreError::AlreadyExists);
        }
        users.insert(user.username.clone(), user);
        Ok(())
    }

    /// Check `password` against the stored record for `username`.
    ///
    /// Unknown users and wrong passwords are indistinguishable to the caller.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<(), UserStoreError> {
        let users = self.lock();
        match users.get(username) {
            Some(user) if user.password == password => Ok(()),
            _ => Err(UserStoreError::InvalidCredentials),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic mid-operation cannot leave a half-written entry, so a poisoned
    // map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, User>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
