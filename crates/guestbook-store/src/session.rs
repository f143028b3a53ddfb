//! Long-lived store handle and per-request sessions.
//!
//! [`Store`] is created once at process start and never queries the backend
//! itself; it only hands out [`Session`] copies.  Each request gets exactly
//! one session, and the session is released exactly once, when the last
//! live handle to it is dropped.  An atomic gauge tracks open sessions so
//! the bracket is observable in tests and trace logs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::trace;

use crate::backend::CommentBackend;
use crate::error::Result;
use crate::memory::MemoryBackend;
use crate::models::Comment;
use crate::mongo::MongoBackend;

/// Long-lived handle to the comment store, shared by all requests as a
/// template for per-request [`Session`]s.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn CommentBackend>,
    active: Arc<AtomicUsize>,
}

impl Store {
    /// Connect to a MongoDB-backed store.  Fails fast if the store address
    /// is unreachable.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let backend = MongoBackend::connect(uri, database, collection).await?;
        Ok(Self::from_backend(backend))
    }

    /// Store backed by process memory, for tests and database-less runs.
    pub fn in_memory() -> Self {
        Self::from_backend(MemoryBackend::new())
    }

    fn from_backend(backend: impl CommentBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Open a session scoped to a single request.
    ///
    /// This is a cheap local copy of the shared backend handle, not a new
    /// connection.
    pub fn session(&self) -> Session {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        trace!(active, "store session opened");
        Session {
            backend: Arc::clone(&self.backend),
            _guard: Arc::new(SessionGuard {
                active: Arc::clone(&self.active),
            }),
        }
    }

    /// Number of sessions currently open.
    pub fn active_sessions(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

/// A store handle owned by one in-flight request.
///
/// Cloning shares the same scope; the session counts as released when the
/// last clone is dropped.
#[derive(Clone)]
pub struct Session {
    backend: Arc<dyn CommentBackend>,
    _guard: Arc<SessionGuard>,
}

impl Session {
    /// Persist a new comment.
    pub async fn insert(&self, comment: &Comment) -> Result<()> {
        self.backend.insert(comment).await
    }

    /// Return up to `limit` comments, newest first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<Comment>> {
        self.backend.recent(limit).await
    }
}

struct SessionGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let remaining = self.active.fetch_sub(1, Ordering::SeqCst) - 1;
        trace!(remaining, "store session released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_release_resets_gauge() {
        let store = Store::in_memory();
        assert_eq!(store.active_sessions(), 0);

        let session = store.session();
        assert_eq!(store.active_sessions(), 1);

        drop(session);
        assert_eq!(store.active_sessions(), 0);
    }

    #[tokio::test]
    async fn test_clones_share_one_scope() {
        let store = Store::in_memory();
        let session = store.session();
        let copy = session.clone();

        drop(session);
        assert_eq!(store.active_sessions(), 1);

        drop(copy);
        assert_eq!(store.active_sessions(), 0);
    }

    #[tokio::test]
    async fn test_sessions_reach_shared_backend() {
        let store = Store::in_memory();

        let writer = store.session();
        writer.insert(&Comment::new("alice".into(), "hi".into())).await.unwrap();
        drop(writer);

        let reader = store.session();
        let comments = reader.recent(100).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author, "alice");
    }

    #[tokio::test]
    async fn test_concurrent_sessions_are_independent() {
        let store = Store::in_memory();

        let mut tasks = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                let session = store.session();
                session
                    .insert(&Comment::new(format!("user{i}"), "hello".into()))
                    .await
                    .unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(store.active_sessions(), 0);
        assert_eq!(store.session().recent(100).await.unwrap().len(), 8);
    }
}
