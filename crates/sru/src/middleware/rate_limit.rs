//! Rate limiting middleware.
//!
//! Counts every SRU request against the client's window before it reaches a
//! handler. Requests over the limit are answered with HTTP 429, a
//! `Retry-After` header and an SRU diagnostic in the envelope of the
//! requested operation.

use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use biblio_persistence::core::LibraryStorage;

use crate::extractors::{SruParams, client_ip};
use crate::ratelimit::RateLimitDecision;
use crate::responses::{Operation, SruResponse};
use crate::state::AppState;

/// Applies the configured rate limit.
///
/// This can be used with `axum::middleware::from_fn_with_state`.
pub async fn rate_limit_middleware<S>(
    State(state): State<AppState<S>>,
    request: Request,
    next: Next,
) -> Response
where
    S: LibraryStorage + Send + Sync + 'static,
{
    if !state.config().rate_limit_enabled {
        return next.run(request).await;
    }

    let ip = client_ip(
        request.headers(),
        request.extensions(),
        state.config().trust_forwarded_for,
    );

    match state.rate_limiter().check(&ip).await {
        RateLimitDecision::Allowed { .. } => next.run(request).await,
        RateLimitDecision::Limited { retry_after } => {
            SruResponse::rate_limited(requested_operation(&request), retry_after).into_response()
        }
    }
}

/// The operation named in the query string, falling back to explain.
fn requested_operation(request: &Request) -> Operation {
    let params = Query::<Vec<(String, String)>>::try_from_uri(request.uri())
        .map(|Query(pairs)| SruParams::from_pairs(pairs))
        .unwrap_or_default();

    SruParams::get(&params.operation)
        .and_then(Operation::parse)
        .unwrap_or(Operation::Explain)
}
