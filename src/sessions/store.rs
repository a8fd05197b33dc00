use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::error::{ClassifiedError, Layer};
use crate::store::EntityId;

use super::token;

struct Session {
    user_id: EntityId,
    created_at: Instant,
}

/// A locked mapping from opaque token to user identifier.
///
/// Follows the same locking discipline as the entity stores (one
/// store-wide `RwLock`, shared for reads, exclusive for writes) but
/// shares no state and no lock with them. Creating a user and creating
/// their session are two independent lock scopes, not a transaction.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Option<Duration>,
}

impl SessionStore {
    /// A store whose sessions never expire server-side; session lifetime
    /// is whatever the transport's cookie policy says.
    pub fn new() -> Self {
        SessionStore {
            sessions: RwLock::new(HashMap::new()),
            ttl: None,
        }
    }

    /// A store with opt-in server-side expiry. Sessions older than `ttl`
    /// resolve as absent; reclaiming their memory is the caller's job
    /// via [`SessionStore::purge_expired`]. There is no background
    /// sweeper.
    pub fn with_ttl(ttl: Duration) -> Self {
        SessionStore {
            sessions: RwLock::new(HashMap::new()),
            ttl: Some(ttl),
        }
    }

    /// Start a session for a user and return its token.
    ///
    /// The user id is not validated against the user store (weak
    /// reference). The only failure path is a poisoned lock.
    pub fn create(&self, user_id: EntityId) -> Result<String, ClassifiedError> {
        let token = token::generate();
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| self.poisoned("create"))?;
        sessions.insert(
            token.clone(),
            Session {
                user_id,
                created_at: Instant::now(),
            },
        );
        tracing::info!(user_id, "session created");
        Ok(token)
    }

    /// Resolve a token to a user id.
    ///
    /// `None` for unknown tokens and, when a TTL is configured, for
    /// expired ones. Not being logged in is a routine outcome, never an
    /// error.
    pub fn check(&self, token: &str) -> Result<Option<EntityId>, ClassifiedError> {
        let sessions = self.sessions.read().map_err(|_| self.poisoned("check"))?;
        Ok(sessions.get(token).and_then(|session| {
            if self.expired(session) {
                None
            } else {
                Some(session.user_id)
            }
        }))
    }

    /// End a session. Idempotent: deleting an unknown token returns
    /// `false` without error.
    pub fn delete(&self, token: &str) -> Result<bool, ClassifiedError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| self.poisoned("delete"))?;
        let removed = sessions.remove(token).is_some();
        if removed {
            tracing::info!("session deleted");
        }
        Ok(removed)
    }

    /// Drop expired sessions and return how many were dropped. A no-op
    /// returning 0 when no TTL is configured.
    pub fn purge_expired(&self) -> Result<usize, ClassifiedError> {
        if self.ttl.is_none() {
            return Ok(0);
        }
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| self.poisoned("purge_expired"))?;
        let before = sessions.len();
        sessions.retain(|_, session| !self.expired(session));
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::info!(purged, "expired sessions purged");
        }
        Ok(purged)
    }

    /// Number of stored sessions, expired-but-unpurged ones included.
    pub fn len(&self) -> Result<usize, ClassifiedError> {
        let sessions = self.sessions.read().map_err(|_| self.poisoned("len"))?;
        Ok(sessions.len())
    }

    pub fn is_empty(&self) -> Result<bool, ClassifiedError> {
        Ok(self.len()? == 0)
    }

    fn expired(&self, session: &Session) -> bool {
        self.ttl
            .map(|ttl| session.created_at.elapsed() > ttl)
            .unwrap_or(false)
    }

    fn poisoned(&self, op: &'static str) -> ClassifiedError {
        ClassifiedError::internal(
            Layer::Storage,
            format!("session store lock poisoned during {}", op),
        )
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn create_check_delete_lifecycle() {
        let store = SessionStore::new();
        let token = store.create(5).unwrap();
        assert_eq!(store.check(&token).unwrap(), Some(5));
        assert!(store.delete(&token).unwrap());
        assert_eq!(store.check(&token).unwrap(), None);
    }

    #[test]
    fn delete_unknown_token_is_false_not_error() {
        let store = SessionStore::new();
        assert!(!store.delete("no-such-token").unwrap());
    }

    #[test]
    fn check_unknown_token_is_none() {
        let store = SessionStore::new();
        assert_eq!(store.check("stranger").unwrap(), None);
    }

    #[test]
    fn tokens_are_independent_per_session() {
        let store = SessionStore::new();
        let first = store.create(1).unwrap();
        let second = store.create(2).unwrap();
        assert_ne!(first, second);
        assert!(store.delete(&first).unwrap());
        assert_eq!(store.check(&second).unwrap(), Some(2));
    }

    #[test]
    fn ttl_expires_sessions_lazily() {
        let store = SessionStore::with_ttl(Duration::from_millis(10));
        let token = store.create(9).unwrap();
        assert_eq!(store.check(&token).unwrap(), Some(9));

        thread::sleep(Duration::from_millis(30));
        assert_eq!(store.check(&token).unwrap(), None);
        // expired but not yet reclaimed
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.purge_expired().unwrap(), 1);
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn without_ttl_purge_is_a_noop() {
        let store = SessionStore::new();
        store.create(1).unwrap();
        assert_eq!(store.purge_expired().unwrap(), 0);
        assert_eq!(store.len().unwrap(), 1);
    }
}
