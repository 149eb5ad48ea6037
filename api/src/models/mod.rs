mod comment;
mod session;
mod user;

pub use comment::Comment;
pub use session::{SessionData, SessionToken};
pub use user::{Credential, User};
