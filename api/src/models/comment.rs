use chrono::{DateTime, Utc};

/// One entry on the board. The author is the poster's username copied at
/// post time; there is no link back to the user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
