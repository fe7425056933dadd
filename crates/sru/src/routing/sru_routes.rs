//! SRU route configuration.

use axum::{Router, middleware, routing::get};
use biblio_persistence::core::LibraryStorage;

use crate::handlers;
use crate::middleware::rate_limit_middleware;
use crate::state::AppState;

/// Creates all routes.
///
/// # Routes
///
/// - `GET /` - SRU endpoint
/// - `GET /sru` - SRU endpoint
/// - `GET /health` - Health check
///
/// The rate limiter sits in front of the SRU endpoint only, so health probes
/// never consume a client's allowance.
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: LibraryStorage + Send + Sync + 'static,
{
    let sru = Router::new()
        .route("/", get(handlers::sru_handler::<S>))
        .route("/sru", get(handlers::sru_handler::<S>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware::<S>,
        ));

    Router::new()
        .merge(sru)
        .route("/health", get(handlers::health_handler::<S>))
        .with_state(state)
}
