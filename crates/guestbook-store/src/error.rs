use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Driver-level error (connection, query, write).
    #[error("document store error: {0}")]
    Driver(#[from] mongodb::error::Error),

    /// A comment id that is not a valid object id.
    #[error("invalid comment id: {0}")]
    InvalidId(#[from] bson::oid::Error),

    /// A stored document is missing a field or holds the wrong type.
    #[error("malformed stored document: {0}")]
    Malformed(#[from] bson::document::ValueAccessError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
