//! Solace Storage crate - user and session stores.
//!
//! Defines the `UserStore` and `SessionStore` seams the rest of the
//! workspace is written against, mutex-guarded in-memory implementations
//! of both, and Argon2 password hashing for user records.

pub mod error;
pub mod password;
pub mod sessions;
pub mod users;

pub use error::StoreError;
pub use sessions::{InMemorySessionStore, SessionStore};
pub use users::{InMemoryUserStore, UserStore};
