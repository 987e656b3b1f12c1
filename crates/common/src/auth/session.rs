//! Single-use PKCE session store with moka
//!
//! Pending authorizations are keyed by their `state` value. An entry is
//! readable exactly once via [`PkceSessionStore::take`]; entries that are
//! never claimed disappear after the configured TTL.

use std::time::{Duration, Instant};

use moka::sync::Cache;
use tracing::debug;

/// Default TTL for pending sessions (10 minutes).
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(600);

/// Default max number of concurrently pending sessions.
pub const DEFAULT_SESSION_CAPACITY: u64 = 10_000;

#[derive(Clone)]
struct PendingSession {
    code_verifier: String,
    issued_at: Instant,
}

/// In-memory store of code verifiers awaiting their callback.
///
/// moka evicts expired entries lazily, so every read also checks the issue
/// time against the TTL.
#[derive(Clone)]
pub struct PkceSessionStore {
    sessions: Cache<String, PendingSession>,
    ttl: Duration,
}

impl Default for PkceSessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL, DEFAULT_SESSION_CAPACITY)
    }
}

impl PkceSessionStore {
    /// Create a store whose entries expire `ttl` after insertion.
    #[must_use]
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let sessions = Cache::builder().time_to_live(ttl).max_capacity(max_capacity).build();
        Self { sessions, ttl }
    }

    /// Register the verifier for a freshly issued `state`.
    pub fn insert(&self, state: impl Into<String>, code_verifier: impl Into<String>) {
        let state = state.into();
        debug!(state_len = state.len(), "pkce session registered");
        let session = PendingSession { code_verifier: code_verifier.into(), issued_at: Instant::now() };
        self.sessions.insert(state, session);
    }

    /// Claim and destroy the verifier for `state`.
    ///
    /// Returns `None` when the state is unknown, already claimed, or expired.
    pub fn take(&self, state: &str) -> Option<String> {
        let verifier = self
            .sessions
            .remove(state)
            .filter(|session| self.is_live(session))
            .map(|session| session.code_verifier);
        debug!(found = verifier.is_some(), "pkce session claimed");
        verifier
    }

    /// Destroy the session for `state` without reading it.
    pub fn discard(&self, state: &str) {
        self.sessions.invalidate(state);
    }

    /// Whether a live session is currently pending for `state`.
    #[must_use]
    pub fn contains(&self, state: &str) -> bool {
        self.sessions.get(state).is_some_and(|session| self.is_live(&session))
    }

    fn is_live(&self, session: &PendingSession) -> bool {
        session.issued_at.elapsed() < self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_returns_verifier_once() {
        let store = PkceSessionStore::default();
        store.insert("state-1", "verifier-1");

        assert_eq!(store.take("state-1").as_deref(), Some("verifier-1"));
        assert_eq!(store.take("state-1"), None);
    }

    #[test]
    fn unknown_state_yields_none() {
        let store = PkceSessionStore::default();
        assert_eq!(store.take("missing"), None);
    }

    #[test]
    fn discard_removes_pending_session() {
        let store = PkceSessionStore::default();
        store.insert("state-2", "verifier-2");
        assert!(store.contains("state-2"));

        store.discard("state-2");
        assert!(!store.contains("state-2"));
        assert_eq!(store.take("state-2"), None);
    }

    #[test]
    fn sessions_expire_after_ttl() {
        let store = PkceSessionStore::new(Duration::from_millis(50), 16);
        store.insert("state-3", "verifier-3");

        std::thread::sleep(Duration::from_millis(120));
        assert!(!store.contains("state-3"));
        assert_eq!(store.take("state-3"), None);
    }

    #[test]
    fn expired_session_is_not_claimable_before_eviction() {
        let store = PkceSessionStore::new(Duration::from_millis(50), 16);
        store.insert("state-4", "verifier-4");
        assert!(store.contains("state-4"));

        std::thread::sleep(Duration::from_millis(200));
        assert_eq!(store.take("state-4"), None);
        assert_eq!(store.take("state-4"), None);
    }

    #[test]
    fn live_session_survives_until_claimed() {
        let store = PkceSessionStore::new(Duration::from_secs(60), 16);
        store.insert("state-5", "verifier-5");

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(store.take("state-5").as_deref(), Some("verifier-5"));
    }
}
