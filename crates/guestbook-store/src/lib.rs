//! # guestbook-store
//!
//! Persistence layer for the guestbook service, backed by a MongoDB
//! collection.
//!
//! The crate exposes a long-lived [`Store`] handle that is created once at
//! process start and then only used as a template: every request opens its
//! own [`Session`] copy and runs all queries through it.  An in-memory
//! backend is provided for tests and local runs without a database.

pub mod backend;
pub mod memory;
pub mod models;
pub mod mongo;
pub mod session;

mod error;

pub use backend::CommentBackend;
pub use error::StoreError;
pub use models::Comment;
pub use session::{Session, Store};
