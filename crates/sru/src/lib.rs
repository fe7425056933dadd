//! # biblio-sru - SRU/CQL Search Service
//!
//! This crate implements an [SRU](https://www.loc.gov/standards/sru/) 1.1/1.2
//! endpoint over a bibliographic catalog. Clients send CQL queries over HTTP
//! GET and receive XML responses carrying MARCXML, Dublin Core or MODS
//! records.
//!
//! ## Operations
//!
//! | Operation | Description |
//! |-----------|-------------|
//! | `explain` | ZeeRex description of indexes, schemas and limits |
//! | `searchRetrieve` | CQL search with paging, sorting and record packing |
//! | `scan` | Ordered browse of the terms of one index |
//!
//! Every failure is reported as an SRU diagnostic inside the envelope of the
//! requested operation. Only internal failures (diagnostic 1) and rate-limit
//! rejections change the HTTP status.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use biblio_sru::{create_app_with_config, ServerConfig};
//! use biblio_persistence::backends::sqlite::SqliteBackend;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SqliteBackend::open("catalog.db")?;
//!     backend.init_schema()?;
//!
//!     let app = create_app_with_config(backend, ServerConfig::default());
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Endpoints
//!
//! | Path | Description |
//! |------|-------------|
//! | `GET /`, `GET /sru` | SRU operations, selected by the `operation` parameter |
//! | `GET /health` | JSON health check |
//!
//! ## Architecture
//!
//! - [`config`] - Server configuration
//! - [`error`] - SRU errors and their diagnostics
//! - [`state`] - Application state (storage, configuration, rate limiter)
//! - [`handlers`] - The SRU operations and the health check
//! - [`formats`] - Record formatters (MARCXML, Dublin Core, MODS)
//! - [`ratelimit`] - Per-client request limit policy
//! - [`middleware`] - Rate limiting middleware
//! - [`extractors`] - SRU parameters and client identity
//! - [`responses`] - Response envelopes
//! - [`xml`] - Minimal XML tree and writer
//! - [`routing`] - Route configuration

#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod formats;
pub mod handlers;
pub mod middleware;
pub mod ratelimit;
pub mod responses;
pub mod routing;
pub mod state;
pub mod xml;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{Diagnostic, SruError, SruResult};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use biblio_persistence::core::LibraryStorage;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<S>(storage: S) -> Router
where
    S: LibraryStorage + Send + Sync + 'static,
{
    create_app_with_config(storage, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// # Arguments
///
/// * `storage` - The storage backend to use
/// * `config` - Server configuration
///
/// # Example
///
/// ```rust,ignore
/// use biblio_sru::{create_app_with_config, ServerConfig};
/// use biblio_persistence::backends::sqlite::SqliteBackend;
///
/// let backend = SqliteBackend::in_memory()?;
/// let config = ServerConfig {
///     port: 3000,
///     rate_limit_enabled: false,
///     ..Default::default()
/// };
/// let app = create_app_with_config(backend, config);
/// ```
pub fn create_app_with_config<S>(storage: S, config: ServerConfig) -> Router
where
    S: LibraryStorage + Send + Sync + 'static,
{
    info!(
        backend = storage.backend_name(),
        rate_limit = config.rate_limit_enabled,
        "Creating SRU server"
    );

    let state = AppState::new(Arc::new(storage), config.clone());

    let router = routing::create_routes(state);

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods([
        axum::http::Method::GET,
        axum::http::Method::OPTIONS,
    ]);

    if config.cors_origins == "*" {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "biblio_sru={level},biblio_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
