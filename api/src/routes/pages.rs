use crate::{
    AppState,
    auth::CurrentSession,
    dto::{HomeUserView, LoginQuery, UserView},
    views::{Page, View},
};
use axum::extract::{Query, State};
use tracing::warn;

/// GET /
/// Shows the visit count from before this request, then counts the visit.
pub async fn home(State(state): State<AppState>, session: CurrentSession) -> View {
    let identity = session.identity();
    let mut user = identity.home_view();

    if let Some(token) = session.token.filter(|_| identity.is_logged_in()) {
        match state.sessions.increment_visits(&token) {
            Ok(previous) => user.visit_count = previous,
            Err(e) => warn!("Failed to record visit for session {}: {}", token, e),
        }
    }

    View::new(
        identity.view(),
        Page::Home {
            title: "Welcome to Wild West Forum".into(),
            user,
            message: None,
        },
    )
}

/// GET /test
/// Smoke test for the page layout.
pub async fn render_test(session: CurrentSession) -> View {
    let nav = session.identity().view();
    View::new(
        nav.clone(),
        Page::Home {
            title: "Handlebars Test".into(),
            user: HomeUserView {
                name: nav.name,
                is_logged_in: nav.is_logged_in,
                login_time: None,
                visit_count: 0,
            },
            message: Some("If you see this, Handlebars is working properly.".into()),
        },
    )
}

/// GET /register
pub async fn register_form(session: CurrentSession) -> View {
    View::new(session.identity().view(), Page::Register { error: None })
}

/// GET /login?error=1&registered=1
pub async fn login_form(session: CurrentSession, Query(query): Query<LoginQuery>) -> View {
    let error = query
        .failed()
        .then(|| "Invalid username or password".to_string());
    let success = query
        .registered()
        .then(|| "Successfully registered! Log in.".to_string());

    View::new(session.identity().view(), Page::Login { error, success })
}

/// GET /comment/new
pub async fn new_comment_form(session: CurrentSession) -> View {
    let user: UserView = session.identity().view();
    View::new(user.clone(), Page::NewComment { user, error: None })
}
