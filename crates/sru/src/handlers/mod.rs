//! HTTP request handlers for the SRU service.
//!
//! [`sru_handler`] validates `operation` and `version`, dispatches to the
//! operation, and records the request in the access log. The access-log row
//! id is local to the request and is completed once the response is known.
//!
//! - [`explain`] - Capability discovery
//! - [`search_retrieve`] - CQL search
//! - [`scan`] - Index term browsing
//! - [`health`] - JSON health check

pub mod explain;
pub mod health;
pub mod scan;
pub mod search_retrieve;

pub use health::health_handler;

use std::time::Instant;

use axum::extract::State;
use biblio_persistence::core::LibraryStorage;
use biblio_persistence::types::{AccessLogCompletion, AccessLogEntry};
use tracing::{debug, info, warn};

use crate::error::{SruError, SruResult};
use crate::extractors::{ClientInfo, SruParams};
use crate::responses::{DEFAULT_VERSION, Operation, SUPPORTED_VERSIONS, SruResponse};
use crate::state::AppState;

/// Handler for `GET /` and `GET /sru`.
pub async fn sru_handler<S>(
    State(state): State<AppState<S>>,
    client: ClientInfo,
    params: SruParams,
) -> SruResponse
where
    S: LibraryStorage + Send + Sync + 'static,
{
    let started = Instant::now();
    debug!(
        ip = %client.ip,
        operation = ?params.operation,
        "Processing SRU request"
    );

    let log_id = if state.config().access_log {
        open_access_log(&state, &client, &params).await
    } else {
        None
    };

    let response = dispatch(&state, &params).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    info!(
        operation = SruParams::get(&params.operation).unwrap_or("none"),
        status = response.status().as_u16(),
        diagnostic = response.diagnostic().map(|d| d.code),
        elapsed_ms,
        "SRU request completed"
    );

    if let Some(id) = log_id {
        let completion = AccessLogCompletion {
            response_time_ms: elapsed_ms,
            http_status: response.status().as_u16(),
            error_message: response.error_message().map(String::from),
        };
        if let Err(e) = state.storage().complete_entry(id, &completion).await {
            warn!(error = %e, log_id = id, "Failed to complete access log entry");
        }
    }

    response
}

async fn open_access_log<S>(
    state: &AppState<S>,
    client: &ClientInfo,
    params: &SruParams,
) -> Option<i64>
where
    S: LibraryStorage + Send + Sync,
{
    let entry = AccessLogEntry {
        ip: client.ip.clone(),
        user_agent: client.user_agent.clone(),
        operation: SruParams::get(&params.operation).map(String::from),
        query: SruParams::get(&params.query)
            .or(SruParams::get(&params.scan_clause))
            .map(String::from),
        format: SruParams::get(&params.record_schema).map(String::from),
    };

    match state.storage().open_entry(&entry).await {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(error = %e, "Failed to write access log entry");
            None
        }
    }
}

/// Validates the operation and version and runs the operation.
pub async fn dispatch<S>(state: &AppState<S>, params: &SruParams) -> SruResponse
where
    S: LibraryStorage + Send + Sync,
{
    let operation = match SruParams::get(&params.operation) {
        None => {
            return SruResponse::from_error(
                Operation::Explain,
                DEFAULT_VERSION,
                &SruError::missing("operation"),
            );
        }
        Some(name) => match Operation::parse(name) {
            Some(operation) => operation,
            None => {
                return SruResponse::from_error(
                    Operation::Explain,
                    DEFAULT_VERSION,
                    &SruError::UnsupportedOperation {
                        operation: name.to_string(),
                    },
                );
            }
        },
    };

    let version = match check_version(SruParams::get(&params.version)) {
        Ok(version) => version,
        Err(e) => return SruResponse::from_error(operation, DEFAULT_VERSION, &e),
    };

    let result = match operation {
        Operation::Explain => Ok(explain::explain(state.config(), version)),
        Operation::SearchRetrieve => search_retrieve::search_retrieve(state, params, version).await,
        Operation::Scan => scan::scan(state, params, version).await,
    };

    match result {
        Ok(root) => SruResponse::ok(root),
        Err(e) => SruResponse::from_error(operation, version, &e),
    }
}

/// Accepts the supported protocol versions, defaulting to 1.2.
fn check_version(version: Option<&str>) -> SruResult<&'static str> {
    match version {
        None => Ok(DEFAULT_VERSION),
        Some(requested) => SUPPORTED_VERSIONS
            .iter()
            .find(|v| **v == requested)
            .copied()
            .ok_or_else(|| SruError::UnsupportedVersion {
                version: requested.to_string(),
            }),
    }
}

/// Parses an optional positive integer parameter.
///
/// Returns `default` when the parameter is absent and diagnostic 6 when it is
/// not an integer within `min..=max`.
pub(crate) fn positive_param(
    name: &str,
    value: &Option<String>,
    default: u64,
    min: u64,
    max: u64,
) -> SruResult<u64> {
    let Some(raw) = SruParams::get(value) else {
        return Ok(default);
    };
    match raw.parse::<u64>() {
        Ok(n) if (min..=max).contains(&n) => Ok(n),
        _ => Err(SruError::bad_value(name, raw)),
    }
}
