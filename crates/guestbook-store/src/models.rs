//! Domain model structs persisted in the comment store.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to the HTTP layer as JSON.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single guestbook comment.
///
/// `id` and `when` are assigned by the server at insert time; whatever a
/// client supplies for them is discarded.  Comments are immutable once
/// stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    /// Unique identifier, the 24-char hex form of a store object id.
    pub id: String,
    /// Display name supplied by the client.
    pub author: String,
    /// Comment body supplied by the client.
    pub text: String,
    /// When the comment was recorded (server clock, RFC 3339 on the wire).
    pub when: DateTime<Utc>,
}

impl Comment {
    /// Build a comment with a fresh id and the current instant.
    pub fn new(author: String, text: String) -> Self {
        Self {
            id: ObjectId::new().to_hex(),
            author,
            text,
            when: Utc::now(),
        }
    }
}
