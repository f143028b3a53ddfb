use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use guestbook_store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body did not decode into a comment submission.
    #[error("invalid request body: {0}")]
    BadRequest(String),

    /// Any method other than GET/POST on the comments resource.
    #[error("Not supported")]
    MethodNotAllowed,

    /// The store failed the operation.  Store-side failures are server
    /// errors, never client errors.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// No session attached to the request: the adapter chain is miswired.
    #[error("no store session attached to request")]
    MissingSession,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MissingSession => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
