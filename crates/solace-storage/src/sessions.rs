//! Append-only conversation history keyed by session.
//!
//! Sessions are created lazily on first append and live for the lifetime
//! of the store. Turns are never edited or removed, and nothing bounds a
//! session's length; callers that want a shorter prompt window apply it
//! when reading.

use std::collections::HashMap;
use std::sync::Mutex;

use solace_core::types::{Role, SessionId, Turn};

use crate::error::StoreError;

/// Storage seam for per-session turn history.
pub trait SessionStore: Send + Sync {
    /// Append a turn, creating the session if it does not exist yet.
    fn append_turn(
        &self,
        session_id: &SessionId,
        role: Role,
        content: &str,
        timestamp: &str,
    ) -> Result<(), StoreError>;

    /// All turns of a session in insertion order.
    ///
    /// An unknown session yields an empty vector.
    fn turns(&self, session_id: &SessionId) -> Result<Vec<Turn>, StoreError>;

    /// Number of sessions that have at least one turn.
    fn session_count(&self) -> Result<usize, StoreError>;
}

/// In-memory session store guarded by a single mutex.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<SessionId, Vec<Turn>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn append_turn(
        &self,
        session_id: &SessionId,
        role: Role,
        content: &str,
        timestamp: &str,
    ) -> Result<(), StoreError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| StoreError::poisoned("session"))?;
        sessions
            .entry(session_id.clone())
            .or_default()
            .push(Turn::new(role, content, timestamp));
        Ok(())
    }

    fn turns(&self, session_id: &SessionId) -> Result<Vec<Turn>, StoreError> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|_| StoreError::poisoned("session"))?;
        Ok(sessions.get(session_id).cloned().unwrap_or_default())
    }

    fn session_count(&self) -> Result<usize, StoreError> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|_| StoreError::poisoned("session"))?;
        Ok(sessions.len())
    }
}
