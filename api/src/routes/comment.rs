use crate::{
    AppState,
    auth::CurrentSession,
    dto::{CommentForm, UserView},
    errors::ForumError,
    extract::Submitted,
    identity::Identity,
    views::{Page, View},
};
use axum::extract::State;
use tracing::info;
use validator::Validate;

/// GET /comments
/// Every comment, oldest first.
pub async fn list_comments(State(state): State<AppState>, session: CurrentSession) -> View {
    let user = session.identity().view();
    let comments = state.comments.all().await;

    View::new(
        user.clone(),
        Page::Comments {
            comments,
            user,
            message: None,
        },
    )
}

/// POST /comments
/// Body: text=...
/// Renders the updated list directly instead of redirecting.
pub async fn create_comment(
    State(state): State<AppState>,
    session: CurrentSession,
    Submitted(form): Submitted<CommentForm>,
) -> Result<View, ForumError> {
    let Identity::Authenticated { username, .. } = session.identity() else {
        return Err(ForumError::Unauthorized);
    };

    form.validate().map_err(|_| ForumError::EmptyComment {
        username: username.clone(),
    })?;

    state.comments.append(&username, &form.text).await?;

    info!("Comment added by {}", username);

    let user = UserView::signed_in(username);
    Ok(View::new(
        user.clone(),
        Page::Comments {
            comments: state.comments.all().await,
            user,
            message: Some("Comment added.".into()),
        },
    ))
}
