use crate::models::{SessionData, SessionToken};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(SessionToken),
    #[error("session backend failure: {0}")]
    Backend(String),
}

/// Keeps session attributes keyed by the token stored in the client's
/// cookie.
pub trait SessionStore: Send + Sync {
    fn create(&self, data: SessionData) -> Result<SessionToken, SessionError>;

    /// Returns `None` for unknown or expired tokens. A successful load
    /// extends the session's expiry.
    fn load(&self, token: &SessionToken) -> Result<Option<SessionData>, SessionError>;

    fn save(&self, token: &SessionToken, data: SessionData) -> Result<(), SessionError>;

    /// Adds one to the session's visit counter in a single step and returns
    /// the count from before the increment.
    fn increment_visits(&self, token: &SessionToken) -> Result<u64, SessionError>;

    /// Destroying an unknown token is not an error.
    fn destroy(&self, token: &SessionToken) -> Result<(), SessionError>;

    /// Drops expired sessions and returns how many were removed.
    fn purge_expired(&self) -> usize;
}

struct Entry {
    data: SessionData,
    expires_at: DateTime<Utc>,
}

/// In-process session store with a sliding expiry window.
pub struct MemorySessionStore {
    sessions: DashMap<SessionToken, Entry>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&self, data: SessionData) -> Result<SessionToken, SessionError> {
        let token = SessionToken::generate();
        let expires_at = Utc::now() + self.ttl;
        self.sessions.insert(token, Entry { data, expires_at });
        Ok(token)
    }

    fn load(&self, token: &SessionToken) -> Result<Option<SessionData>, SessionError> {
        let now = Utc::now();

        if let Some(mut entry) = self.sessions.get_mut(token) {
            if entry.expires_at > now {
                entry.expires_at = now + self.ttl;
                return Ok(Some(entry.data.clone()));
            }
        }

        self.sessions.remove_if(token, |_, entry| entry.expires_at <= now);
        Ok(None)
    }

    fn save(&self, token: &SessionToken, data: SessionData) -> Result<(), SessionError> {
        let mut entry = self
            .sessions
            .get_mut(token)
            .ok_or(SessionError::NotFound(*token))?;
        entry.data = data;
        entry.expires_at = Utc::now() + self.ttl;
        Ok(())
    }

    fn increment_visits(&self, token: &SessionToken) -> Result<u64, SessionError> {
        let mut entry = self
            .sessions
            .get_mut(token)
            .ok_or(SessionError::NotFound(*token))?;
        let previous = entry.data.visit_count;
        entry.data.visit_count += 1;
        entry.expires_at = Utc::now() + self.ttl;
        Ok(previous)
    }

    fn destroy(&self, token: &SessionToken) -> Result<(), SessionError> {
        self.sessions.remove(token);
        Ok(())
    }

    fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut purged = 0;
        self.sessions.retain(|_, entry| {
            let live = entry.expires_at > now;
            if !live {
                purged += 1;
            }
            live
        });
        purged
    }
}

/// Background task that drops expired sessions on a fixed interval.
pub async fn run_session_sweeper(store: Arc<dyn SessionStore>, interval_secs: u64) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(interval_secs.max(1)));

    loop {
        interval.tick().await;

        let purged = store.purge_expired();
        if purged > 0 {
            info!("Session sweep: purged {} expired sessions", purged);
        }
    }
}
