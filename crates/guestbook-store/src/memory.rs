//! In-memory backend used by tests and database-less local runs.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::backend::CommentBackend;
use crate::error::Result;
use crate::models::Comment;

#[derive(Default)]
pub struct MemoryBackend {
    comments: RwLock<Vec<Comment>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentBackend for MemoryBackend {
    async fn insert(&self, comment: &Comment) -> Result<()> {
        self.comments.write().await.push(comment.clone());
        Ok(())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Comment>> {
        let comments = self.comments.read().await;
        let mut recent: Vec<Comment> = comments.clone();
        // Stable sort: comments sharing an instant keep insertion order.
        recent.sort_by(|a, b| b.when.cmp(&a.when));
        recent.truncate(limit.max(0) as usize);
        Ok(recent)
    }
}
