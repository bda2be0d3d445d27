use chrono::{DateTime, Duration, Utc};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::session::{Identity, Session, StoredSession};

/// In-process session table keyed by the id carried in the session cookie.
///
/// Sessions live only as long as the process.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, StoredSession>>>,
    ttl: Duration,
}

impl SessionStore {
    /// Creates a new, empty `SessionStore` whose sessions last `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Stores a session for `identity` and returns its id.
    pub async fn create(&self, identity: Identity) -> Uuid {
        let now = Utc::now();
        let session_id = Uuid::new_v4();

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, stored| !stored.is_expired(now));
        sessions.insert(
            session_id,
            StoredSession {
                identity,
                expires_at: now
                    .checked_add_signed(self.ttl)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            },
        );

        session_id
    }

    /// Resolves a session id. Unknown and expired ids resolve to an anonymous
    /// session; expired entries are evicted.
    pub async fn load(&self, session_id: &Uuid) -> Session {
        let now = Utc::now();

        {
            let sessions = self.sessions.read().await;
            match sessions.get(session_id) {
                None => return Session::Anonymous,
                Some(stored) if !stored.is_expired(now) => {
                    return Session::Authenticated(stored.identity.clone());
                }
                Some(_) => {}
            }
        }

        tracing::warn!("❌ Session expired: {}", session_id);
        self.sessions.write().await.remove(session_id);
        Session::Anonymous
    }

    /// Removes a session. Removing an unknown id is a no-op.
    pub async fn destroy(&self, session_id: &Uuid) {
        self.sessions.write().await.remove(session_id);
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::Role;

    fn identity() -> Identity {
        Identity {
            username: "doctor".to_string(),
            role: Role::Doctor,
        }
    }

    #[tokio::test]
    async fn created_session_loads_back() {
        let store = SessionStore::new(Duration::hours(1));
        let id = store.create(identity()).await;

        assert_eq!(store.load(&id).await, Session::Authenticated(identity()));
        assert_eq!(store.load(&Uuid::new_v4()).await, Session::Anonymous);
    }

    #[tokio::test]
    async fn destroyed_session_is_anonymous_and_destroy_is_idempotent() {
        let store = SessionStore::new(Duration::hours(1));
        let id = store.create(identity()).await;

        store.destroy(&id).await;
        store.destroy(&id).await;

        assert_eq!(store.load(&id).await, Session::Anonymous);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn huge_lifetime_saturates_instead_of_overflowing() {
        let store = SessionStore::new(Duration::MAX);
        let id = store.create(identity()).await;

        assert_eq!(store.load(&id).await, Session::Authenticated(identity()));
    }

    #[tokio::test]
    async fn expired_session_is_evicted() {
        let store = SessionStore::new(Duration::seconds(-1));
        let id = store.create(identity()).await;

        assert_eq!(store.load(&id).await, Session::Anonymous);
        assert_eq!(store.len().await, 0);
    }
}
