use chrono::{DateTime, Utc};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Opaque identifier carried in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(Uuid);

impl SessionToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Attributes kept for a session between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub is_logged_in: bool,
    pub username: String,
    pub login_time: DateTime<Utc>,
    pub visit_count: u64,
}

impl SessionData {
    pub fn logged_in(username: impl Into<String>, login_time: DateTime<Utc>) -> Self {
        Self {
            is_logged_in: true,
            username: username.into(),
            login_time,
            visit_count: 0,
        }
    }
}
