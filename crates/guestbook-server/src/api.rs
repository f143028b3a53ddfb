use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::Request;
use axum::http::Method;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower::service_fn;
use tower::util::BoxCloneService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use guestbook_store::{Comment, Session, Store};

use crate::adapter::{adapt, Adapter, WithSession};
use crate::error::ApiError;

/// Maximum number of comments a single list request returns.
const MAX_LISTED: i64 = 100;

/// Maximum accepted request body, in bytes.
const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn build_router(store: Store) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    // Every request to the comments resource runs inside a scoped store
    // session; the dispatcher below is the terminal handler.
    let adapters: Vec<Box<dyn Adapter>> = vec![Box::new(WithSession::new(store))];
    let comments = adapt(
        BoxCloneService::new(service_fn(|req: Request| async move {
            Ok::<_, Infallible>(dispatch(req).await)
        })),
        &adapters,
    );

    Router::new()
        .route("/health", get(health_check))
        .route_service("/comments", comments)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Route a comments request on its method token.
async fn dispatch(req: Request) -> Response {
    match req.method().as_str() {
        "GET" => handle_list(req).await.into_response(),
        "POST" => handle_insert(req).await.into_response(),
        _ => ApiError::MethodNotAllowed.into_response(),
    }
}

/// The session attached by [`WithSession`] for the lifetime of this request.
fn request_session(req: &Request) -> Result<Session, ApiError> {
    req.extensions()
        .get::<Session>()
        .cloned()
        .ok_or(ApiError::MissingSession)
}

/// Insert payload.  Only `author` and `text` are read; any `id` or `when`
/// in the body is discarded and assigned server-side.
#[derive(Deserialize)]
struct CommentSubmission {
    #[serde(default)]
    author: String,
    #[serde(default)]
    text: String,
}

async fn handle_insert(req: Request) -> Result<Response, ApiError> {
    let session = request_session(&req)?;

    let body = axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let submission: CommentSubmission =
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let comment = Comment::new(submission.author, submission.text);
    session.insert(&comment).await?;

    info!(id = %comment.id, "comment recorded");

    Ok(Redirect::temporary(&format!("/comments/{}", comment.id)).into_response())
}

async fn handle_list(req: Request) -> Result<Json<Vec<Comment>>, ApiError> {
    let session = request_session(&req)?;
    let comments = session.recent(MAX_LISTED).await?;
    Ok(Json(comments))
}

pub async fn serve(store: Store, addr: SocketAddr) -> anyhow::Result<()> {
    let app = build_router(store);

    info!(addr = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
