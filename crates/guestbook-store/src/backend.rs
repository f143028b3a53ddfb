use async_trait::async_trait;

use crate::error::Result;
use crate::models::Comment;

/// Storage backend for comment records.
///
/// Implementations must be cheap to share behind an `Arc`: the server opens
/// one [`crate::Session`] per request, so every method takes `&self`.
#[async_trait]
pub trait CommentBackend: Send + Sync {
    /// Persist a new comment.
    async fn insert(&self, comment: &Comment) -> Result<()>;

    /// Return up to `limit` comments, newest first.
    async fn recent(&self, limit: i64) -> Result<Vec<Comment>>;
}
