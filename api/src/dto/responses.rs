use chrono::{DateTime, Utc};
use serde::Serialize;

/// Identity shown in the navigation bar and on most pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub name: String,
    pub is_logged_in: bool,
}

impl UserView {
    pub fn guest() -> Self {
        Self {
            name: "Guest".into(),
            is_logged_in: false,
        }
    }

    pub fn signed_in(username: impl Into<String>) -> Self {
        Self {
            name: username.into(),
            is_logged_in: true,
        }
    }
}

/// The homepage also shows when the session started and how many times
/// the homepage was visited before this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeUserView {
    pub name: String,
    pub is_logged_in: bool,
    pub login_time: Option<DateTime<Utc>>,
    pub visit_count: u64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}
