use crate::{
    dto::UserView,
    views::{Page, View},
};
use axum::response::{IntoResponse, Redirect, Response};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ForumError {
    #[error("Username already exists")]
    DuplicateUsername,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("You must be logged in to post a comment.")]
    Unauthorized,
    #[error("Comment cannot be empty.")]
    EmptyComment { username: String },
    #[error("Error destroying session: {0}")]
    SessionDestroyFailure(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Every failure is shown to the user as a form or a redirect; none of them
/// surface as an error status except `Internal`, which renders a generic
/// page.
impl IntoResponse for ForumError {
    fn into_response(self) -> Response {
        match self {
            ForumError::DuplicateUsername => View::new(
                UserView::guest(),
                Page::Register {
                    error: Some(self.to_string()),
                },
            )
            .into_response(),
            ForumError::InvalidCredentials => Redirect::to("/login?error=1").into_response(),
            ForumError::Unauthorized => View::new(
                UserView::guest(),
                Page::Login {
                    error: Some(self.to_string()),
                    success: None,
                },
            )
            .into_response(),
            ForumError::EmptyComment { ref username } => {
                let user = UserView::signed_in(username.as_str());
                View::new(
                    user.clone(),
                    Page::NewComment {
                        user,
                        error: Some(self.to_string()),
                    },
                )
                .into_response()
            }
            ForumError::SessionDestroyFailure(_) => {
                error!("{}", self);
                Redirect::to("/login").into_response()
            }
            ForumError::Internal(ref msg) => {
                error!("Internal error: {}", msg);
                View::new(UserView::guest(), Page::ServerError).into_response()
            }
        }
    }
}
