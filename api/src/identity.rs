use crate::{
    dto::{HomeUserView, UserView},
    models::SessionData,
};
use chrono::{DateTime, Utc};

/// Who is making the request, as far as the session can tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Guest,
    Authenticated {
        username: String,
        login_time: DateTime<Utc>,
        visit_count: u64,
    },
}

/// Missing sessions and sessions without the login flag both resolve to
/// `Guest`.
pub fn resolve(session: Option<&SessionData>) -> Identity {
    match session {
        Some(data) if data.is_logged_in => Identity::Authenticated {
            username: data.username.clone(),
            login_time: data.login_time,
            visit_count: data.visit_count,
        },
        _ => Identity::Guest,
    }
}

impl Identity {
    pub fn username(&self) -> Option<&str> {
        match self {
            Identity::Guest => None,
            Identity::Authenticated { username, .. } => Some(username.as_str()),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, Identity::Authenticated { .. })
    }

    pub fn view(&self) -> UserView {
        match self {
            Identity::Guest => UserView::guest(),
            Identity::Authenticated { username, .. } => UserView::signed_in(username.as_str()),
        }
    }

    pub fn home_view(&self) -> HomeUserView {
        match self {
            Identity::Guest => HomeUserView {
                name: "Guest".into(),
                is_logged_in: false,
                login_time: None,
                visit_count: 0,
            },
            Identity::Authenticated {
                username,
                login_time,
                visit_count,
            } => HomeUserView {
                name: username.clone(),
                is_logged_in: true,
                login_time: Some(*login_time),
                visit_count: *visit_count,
            },
        }
    }
}
