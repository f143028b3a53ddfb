//! # guestbook-server
//!
//! HTTP service that records and lists timestamped guestbook comments,
//! persisting them to a document store.
//!
//! This binary provides:
//! - a single `/comments` resource: POST records a comment and redirects to
//!   it, GET lists the 100 most recent, newest first
//! - a per-request store session, opened and released by the adapter chain
//!   wrapped around the method dispatcher
//! - a `/health` endpoint for deployment checks

mod adapter;
mod api;
mod config;
mod error;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use guestbook_store::Store;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,guestbook_server=debug")),
        )
        .init();

    info!("Starting guestbook server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Connect to the document store
    // -----------------------------------------------------------------------
    // An unreachable store is fatal here; nothing in the request path ever
    // re-dials.
    let store = Store::connect(
        &config.mongodb_uri,
        &config.database_name,
        &config.collection_name,
    )
    .await
    .context("cannot dial document store")?;

    // -----------------------------------------------------------------------
    // 4. Run the HTTP server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(store, config.http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
