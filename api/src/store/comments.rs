use crate::{errors::ForumError, models::Comment};
use chrono::Utc;
use tokio::sync::RwLock;

/// The shared board. Appends are serialized, so reading back yields
/// comments in exactly the order they were accepted.
#[derive(Default)]
pub struct CommentStore {
    comments: RwLock<Vec<Comment>>,
}

impl CommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `text` as written; only its trimmed form has to be non-empty.
    pub async fn append(&self, author: &str, text: &str) -> Result<Comment, ForumError> {
        if text.trim().is_empty() {
            return Err(ForumError::EmptyComment {
                username: author.to_owned(),
            });
        }

        let comment = Comment {
            author: author.to_owned(),
            text: text.to_owned(),
            created_at: Utc::now(),
        };

        self.comments.write().await.push(comment.clone());
        Ok(comment)
    }

    /// Oldest first.
    pub async fn all(&self) -> Vec<Comment> {
        self.comments.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.comments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.comments.read().await.is_empty()
    }
}
