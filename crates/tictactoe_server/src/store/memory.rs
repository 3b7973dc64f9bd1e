//! In-process session store.

use super::{SessionId, SessionStore, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tictactoe_rules::GameState;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone)]
struct Entry {
    state: GameState,
    touched: Instant,
}

/// Session store backed by a shared `HashMap`.
///
/// Clones share the same map. State is lost when the process exits.
#[derive(Debug, Clone)]
pub struct MemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, Entry>>>,
    ttl: Duration,
}

impl MemorySessionStore {
    /// Creates an empty store whose entries expire after `ttl` without a save.
    #[instrument]
    pub fn new(ttl: Duration) -> Self {
        info!(ttl_secs = ttl.as_secs(), "Creating in-memory session store");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Number of stored sessions, expired or not.
    pub fn len(&self) -> usize {
        self.lock().map(|sessions| sessions.len()).unwrap_or(0)
    }

    /// True if no sessions are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, Entry>>, StoreError> {
        self.sessions
            .lock()
            .map_err(|_| StoreError::new("Session map lock poisoned"))
    }

    fn expired(&self, entry: &Entry) -> bool {
        entry.touched.elapsed() >= self.ttl
    }
}

impl SessionStore for MemorySessionStore {
    #[instrument(skip(self))]
    fn load(&self, id: &str) -> Result<Option<GameState>, StoreError> {
        let mut sessions = self.lock()?;
        match sessions.get(id) {
            Some(entry) if self.expired(entry) => {
                debug!(session_id = id, "Session expired");
                sessions.remove(id);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.state.clone())),
            None => {
                debug!(session_id = id, "Session not found");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, state))]
    fn save(&self, id: &str, state: &GameState) -> Result<(), StoreError> {
        let entry = Entry {
            state: state.clone(),
            touched: Instant::now(),
        };
        self.lock()?.insert(id.to_string(), entry);
        debug!(session_id = id, "Session saved");
        Ok(())
    }

    #[instrument(skip(self))]
    fn reset(&self, id: &str) -> Result<(), StoreError> {
        self.lock()?.remove(id);
        debug!(session_id = id, "Session reset");
        Ok(())
    }

    #[instrument(skip(self))]
    fn purge_expired(&self) -> Result<usize, StoreError> {
        let mut sessions = self.lock()?;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.touched.elapsed() < self.ttl);
        let purged = before - sessions.len();
        if purged > 0 {
            info!(purged, remaining = sessions.len(), "Purged expired sessions");
        }
        Ok(purged)
    }
}
