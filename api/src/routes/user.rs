use crate::{
    AppState,
    auth::{CurrentSession, expired_session_cookie, session_cookie},
    dto::{LoginForm, RegisterForm},
    errors::ForumError,
    extract::Submitted,
    models::SessionData,
};
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use tracing::{info, warn};

/// POST /register
/// Body: username=...&password=... (urlencoded or JSON)
pub async fn register(
    State(state): State<AppState>,
    Submitted(form): Submitted<RegisterForm>,
) -> Result<Redirect, ForumError> {
    let user = state.users.register(&form.username, &form.password)?;

    info!("New user registered: {} (id {})", user.username, user.id);

    Ok(Redirect::to("/login?registered=1"))
}

/// POST /login
/// Body: username=...&password=... (urlencoded or JSON)
pub async fn login(
    State(state): State<AppState>,
    session: CurrentSession,
    jar: CookieJar,
    Submitted(form): Submitted<LoginForm>,
) -> Result<Response, ForumError> {
    let user = state.users.authenticate(&form.username, &form.password)?;

    // Start from a fresh token rather than promoting the one the client sent.
    if let Some(old) = session.token {
        if let Err(e) = state.sessions.destroy(&old) {
            warn!("Failed to destroy previous session {}: {}", old, e);
        }
    }

    let data = SessionData::logged_in(user.username, Utc::now());
    let login_time = data.login_time;
    let username = data.username.clone();
    let token = state
        .sessions
        .create(data)
        .map_err(|e| ForumError::Internal(format!("Session creation failed: {}", e)))?;

    info!("User {} logged in at {}", username, login_time.to_rfc3339());

    let jar = jar.add(session_cookie(&state.config, token));
    Ok((jar, Redirect::to("/")).into_response())
}

/// POST /logout
/// Always ends at the login page with the cookie cleared, even when the
/// session store fails to destroy the session.
pub async fn logout(
    State(state): State<AppState>,
    session: CurrentSession,
    jar: CookieJar,
) -> (CookieJar, Result<Redirect, ForumError>) {
    let username = session
        .identity()
        .username()
        .map(str::to_owned)
        .unwrap_or_else(|| "Guest".into());

    let destroyed = match session.token {
        Some(token) => state
            .sessions
            .destroy(&token)
            .map_err(|e| ForumError::SessionDestroyFailure(e.to_string())),
        None => Ok(()),
    };

    info!("User {} logged out.", username);

    // The removal cookie rides on the error response too.
    let jar = jar.remove(expired_session_cookie(&state.config));
    (jar, destroyed.map(|()| Redirect::to("/login")))
}
