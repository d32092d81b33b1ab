//! Session storage behind a trait so the planner can run against other backends

use super::session::PlanningSession;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock, TryLockError};
use std::time::Duration;

/// Shared handle to one session; the mutex serializes operations on it
pub type SessionHandle = Arc<Mutex<PlanningSession>>;

/// Keyed storage for planning sessions
pub trait SessionStore: Send + Sync {
    /// Register a session under its id, replacing any previous entry
    fn insert(&self, session: PlanningSession);

    /// Look up a session
    fn get(&self, id: &str) -> Option<SessionHandle>;

    /// Remove a session, returning its handle
    fn remove(&self, id: &str) -> Option<SessionHandle>;

    /// Whether an id is taken
    fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Drop sessions idle for longer than `max_idle`; returns how many were dropped
    fn evict_idle(&self, max_idle: Duration) -> usize;

    /// Number of live sessions
    fn len(&self) -> usize;

    /// Whether no sessions are live
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local session store
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl InMemorySessionStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, session: PlanningSession) {
        let id = session.id().to_string();
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(Mutex::new(session)));
    }

    fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn remove(&self, id: &str) -> Option<SessionHandle> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    fn contains(&self, id: &str) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => session.idle_for() <= max_idle,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().idle_for() <= max_idle,
            // In use right now, so not idle
            Err(TryLockError::WouldBlock) => true,
        });
        before - sessions.len()
    }

    fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
