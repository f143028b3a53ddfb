//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// Connection string for the document store.
    /// Env: `MONGODB_URI`
    /// Default: `mongodb://localhost:27017`
    pub mongodb_uri: String,

    /// Database holding the comments collection.
    /// Env: `DATABASE_NAME`
    /// Default: `commentsapp`
    pub database_name: String,

    /// Collection the comments are stored in.
    /// Env: `COLLECTION_NAME`
    /// Default: `comments`
    pub collection_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], 8080).into(),
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            database_name: "commentsapp".to_string(),
            collection_name: "comments".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(
                    value = %addr,
                    "Invalid HTTP_ADDR, using default"
                );
            }
        }

        if let Ok(uri) = std::env::var("MONGODB_URI") {
            config.mongodb_uri = uri;
        }

        if let Ok(name) = std::env::var("DATABASE_NAME") {
            config.database_name = name;
        }

        if let Ok(name) = std::env::var("COLLECTION_NAME") {
            config.collection_name = name;
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 8080).into());
        assert_eq!(config.mongodb_uri, "mongodb://localhost:27017");
        assert_eq!(config.database_name, "commentsapp");
        assert_eq!(config.collection_name, "comments");
    }
}
