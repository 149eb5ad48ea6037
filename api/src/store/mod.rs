mod comments;
mod sessions;
mod users;

pub use comments::CommentStore;
pub use sessions::{MemorySessionStore, SessionError, SessionStore, run_session_sweeper};
pub use users::UserStore;
