//! Health check endpoint handler.
//!
//! Reports the storage backend and the catalog size, for monitoring and load
//! balancers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use biblio_persistence::core::LibraryStorage;
use tracing::{debug, error};

use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET [base]/health`
///
/// # Response
///
/// - `200 OK` - The catalog can be read
/// - `503 Service Unavailable` - The storage backend failed
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: LibraryStorage + Send + Sync,
{
    debug!("Processing health check request");

    let backend_name = state.storage().backend_name();
    let timestamp = chrono::Utc::now().to_rfc3339();

    match state.storage().count_records().await {
        Ok(records) => {
            let body = serde_json::json!({
                "status": "healthy",
                "backend": backend_name,
                "records": records,
                "timestamp": timestamp
            });
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Health check failed");
            let body = serde_json::json!({
                "status": "unhealthy",
                "backend": backend_name,
                "timestamp": timestamp
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
        }
    }
}
