//! Wild West Forum: registration, cookie-session login and a shared comment
//! board, served as server-rendered HTML from in-memory stores.

pub mod auth;
pub mod config;
pub mod dto;
pub mod errors;
pub mod extract;
pub mod identity;
pub mod models;
pub mod routes;
pub mod states;
pub mod store;
pub mod views;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use errors::ForumError;
pub use states::AppState;

/// Builds the full router over the given state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/", get(routes::pages::home))
        .route("/test", get(routes::pages::render_test))
        .route(
            "/register",
            get(routes::pages::register_form).post(routes::user::register),
        )
        .route(
            "/login",
            get(routes::pages::login_form).post(routes::user::login),
        )
        .route("/logout", post(routes::user::logout))
        .route(
            "/comments",
            get(routes::comment::list_comments).post(routes::comment::create_comment),
        )
        .route("/comment/new", get(routes::pages::new_comment_form))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::refresh_session_cookie,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
