use crate::{
    config::Config,
    identity::{self, Identity},
    models::{SessionData, SessionToken},
    states::AppState,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderValue, header, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::convert::Infallible;
use tracing::warn;

/// Session state resolved from the request's cookie.
///
/// `token` is whatever well-formed token the client sent, even if the store
/// no longer knows it; `data` is present only for a live session.
#[derive(Debug, Clone, Default)]
pub struct CurrentSession {
    pub token: Option<SessionToken>,
    pub data: Option<SessionData>,
}

impl CurrentSession {
    pub fn identity(&self) -> Identity {
        identity::resolve(self.data.as_ref())
    }
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let Some(token) = jar
            .get(&state.config.session_cookie)
            .and_then(|cookie| cookie.value().parse::<SessionToken>().ok())
        else {
            return Ok(Self::default());
        };

        // A broken store degrades the request to a guest view.
        let data = state.sessions.load(&token).unwrap_or_else(|e| {
            warn!("Failed to load session {}: {}", token, e);
            None
        });

        Ok(Self {
            token: Some(token),
            data,
        })
    }
}

/// Re-sends the session cookie on every response to a request that carried
/// a live session, so the browser's `Max-Age` slides with the store's
/// expiry. Responses that already set the cookie (login, logout) are left
/// alone.
pub async fn refresh_session_cookie(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let token = CookieJar::from_headers(req.headers())
        .get(&state.config.session_cookie)
        .and_then(|cookie| cookie.value().parse::<SessionToken>().ok());

    let mut response = next.run(req).await;

    let Some(token) = token else {
        return response;
    };

    let prefix = format!("{}=", state.config.session_cookie);
    let already_set = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with(&prefix));
    if already_set {
        return response;
    }

    match state.sessions.load(&token) {
        Ok(Some(data)) if data.is_logged_in => {
            let cookie = session_cookie(&state.config, token).to_string();
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
                Err(e) => warn!("Session cookie is not a valid header value: {}", e),
            }
        }
        Ok(_) => {}
        Err(e) => warn!("Failed to refresh session {}: {}", token, e),
    }

    response
}

pub fn session_cookie(config: &Config, token: SessionToken) -> Cookie<'static> {
    Cookie::build((config.session_cookie.clone(), token.to_string()))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(config.session_ttl_hours))
        .build()
}

/// The cookie to hand to `CookieJar::remove`; path must match the one set
/// at login.
pub fn expired_session_cookie(config: &Config) -> Cookie<'static> {
    Cookie::build((config.session_cookie.clone(), "")).path("/").build()
}
