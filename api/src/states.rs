use crate::{
    config::Config,
    store::{CommentStore, MemorySessionStore, SessionStore, UserStore},
};
use std::sync::Arc;

// ============================================================================
// APPLICATION STATE - Shared data across all requests
// ============================================================================
/// Every field is behind an `Arc`, so cloning the state per request only
/// bumps reference counts. The stores synchronize internally.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub comments: Arc<CommentStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let sessions = Arc::new(MemorySessionStore::new(chrono::Duration::hours(
            config.session_ttl_hours,
        )));
        Self::with_session_store(config, sessions)
    }

    pub fn with_session_store(config: Config, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            users: Arc::new(UserStore::new(config.password_storage)),
            comments: Arc::new(CommentStore::new()),
            sessions,
            config: Arc::new(config),
        }
    }
}
