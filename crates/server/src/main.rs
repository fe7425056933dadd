//! Biblio SRU Server
//!
//! Serves a library catalog over SRU 1.1/1.2 with CQL queries.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use biblio_persistence::types::CatalogRecord;
use biblio_sru::{ServerConfig, create_app_with_config, init_logging};
use clap::Parser;
use tracing::info;

#[cfg(feature = "sqlite")]
use biblio_persistence::backends::sqlite::SqliteBackend;

/// Command line of the `sru-server` binary.
#[derive(Debug, Parser)]
#[command(name = "sru-server", version)]
#[command(about = "SRU/CQL bibliographic search server")]
struct Cli {
    #[command(flatten)]
    config: ServerConfig,

    /// JSON file with an array of catalog records to load before serving.
    #[arg(long, value_name = "CATALOG_JSON")]
    import: Option<PathBuf>,
}

/// Creates and initializes a SQLite backend from the server configuration.
#[cfg(feature = "sqlite")]
fn create_sqlite_backend(config: &ServerConfig) -> anyhow::Result<SqliteBackend> {
    let db_path = config.database_url.as_deref().unwrap_or("biblio.db");
    info!(database = %db_path, "Initializing SQLite backend");

    let backend = if db_path == ":memory:" {
        SqliteBackend::in_memory()?
    } else {
        SqliteBackend::open(db_path)?
    };
    backend.init_schema()?;

    Ok(backend)
}

/// Reads catalog records from a JSON array.
fn load_catalog(path: &Path) -> anyhow::Result<Vec<CatalogRecord>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file {}", path.display()))?;
    let records = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse catalog file {}", path.display()))?;
    Ok(records)
}

/// Starts the Axum HTTP server.
///
/// The connection address is made available to handlers for rate limiting
/// and the access log.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli { config, import } = Cli::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        database = %config.database_name,
        rate_limit = config.rate_limit_enabled,
        "Starting Biblio SRU Server"
    );

    start_sqlite(config, import).await
}

/// Starts the server with the SQLite backend.
#[cfg(feature = "sqlite")]
async fn start_sqlite(config: ServerConfig, import: Option<PathBuf>) -> anyhow::Result<()> {
    let backend = create_sqlite_backend(&config)?;

    if let Some(path) = import {
        let records = load_catalog(&path)?;
        let imported = backend.import_records(&records)?;
        info!(path = %path.display(), records = imported, "Catalog imported");
    }

    let app = create_app_with_config(backend, config.clone());
    serve(app, &config).await
}

/// Fallback when sqlite feature is not enabled.
#[cfg(not(feature = "sqlite"))]
async fn start_sqlite(_config: ServerConfig, _import: Option<PathBuf>) -> anyhow::Result<()> {
    anyhow::bail!(
        "The sqlite backend requires the 'sqlite' feature. \
         Build with: cargo build -p biblio-server --features sqlite"
    )
}
