//! User registration and credential lookup.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use solace_core::types::{UserId, UserRecord, UserSummary};

use crate::error::StoreError;
use crate::password::{hash_password, verify_password};

/// Message returned when a registration field is blank.
pub const REGISTER_FIELDS_REQUIRED: &str = "All fields are required";
/// Message returned when a login field is blank.
pub const LOGIN_FIELDS_REQUIRED: &str = "Email and password are required";

/// Storage seam for registered users.
pub trait UserStore: Send + Sync {
    /// Register a new user.
    ///
    /// Name and email are stored trimmed; the password is hashed exactly as
    /// given. Fails with `Validation` if any field is blank and with
    /// `DuplicateEmail` if the email is already taken (exact match).
    fn register(&self, name: &str, email: &str, password: &str) -> Result<UserId, StoreError>;

    /// Look up a user by exact email and password.
    fn authenticate(&self, email: &str, password: &str) -> Result<UserSummary, StoreError>;

    /// Number of registered users.
    fn count(&self) -> Result<usize, StoreError>;
}

/// In-memory user store guarded by a single mutex.
///
/// The duplicate-email check and the insert happen under one lock
/// acquisition, so concurrent registrations cannot both claim an email.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for InMemoryUserStore {
    fn register(&self, name: &str, email: &str, password: &str) -> Result<UserId, StoreError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() || password.trim().is_empty() {
            return Err(StoreError::Validation(REGISTER_FIELDS_REQUIRED.to_string()));
        }

        // Hash before taking the lock.
        let password_hash = hash_password(password)?;

        let mut users = self.users.lock().map_err(|_| StoreError::poisoned("user"))?;
        if users.values().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail);
        }

        let id = UserId::generate();
        users.insert(
            id.clone(),
            UserRecord {
                id: id.clone(),
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
            },
        );
        debug!(user_id = %id, total = users.len(), "User registered");
        Ok(id)
    }

    fn authenticate(&self, email: &str, password: &str) -> Result<UserSummary, StoreError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(StoreError::Validation(LOGIN_FIELDS_REQUIRED.to_string()));
        }

        let candidate = {
            let users = self.users.lock().map_err(|_| StoreError::poisoned("user"))?;
            users.values().find(|u| u.email == email).cloned()
        };

        match candidate {
            Some(record) if verify_password(password, &record.password_hash) => {
                Ok(record.summary())
            }
            _ => Err(StoreError::InvalidCredentials),
        }
    }

    fn count(&self) -> Result<usize, StoreError> {
        let users = self.users.lock().map_err(|_| StoreError::poisoned("user"))?;
        Ok(users.len())
    }
}
