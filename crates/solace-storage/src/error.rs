//! Error types for the user and session stores.

/// Errors from the stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A required field was missing or blank.
    #[error("{0}")]
    Validation(String),
    #[error("email already registered")]
    DuplicateEmail,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error("store error: {0}")]
    Internal(String),
}

impl StoreError {
    pub(crate) fn poisoned(what: &str) -> Self {
        StoreError::Internal(format!("{} lock poisoned", what))
    }
}
