//! SRU endpoint test harness.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::{TestResponse, TestServer};
use biblio_persistence::backends::sqlite::SqliteBackend;
use biblio_sru::{AppState, ServerConfig};

use super::fixtures::sample_catalog;

/// Test server over an in-memory catalog.
///
/// The backend stays reachable so tests can inspect the access log and the
/// rate-limit table after a request.
pub struct SruTestHarness {
    pub server: TestServer,
    pub backend: Arc<SqliteBackend>,
}

impl SruTestHarness {
    /// A harness seeded with [`sample_catalog`] and the testing configuration.
    pub fn new() -> Self {
        Self::with_config(ServerConfig::for_testing())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
        backend.init_schema().expect("Failed to init schema");
        backend
            .import_records(&sample_catalog())
            .expect("Failed to import sample catalog");
        let backend = Arc::new(backend);

        let state = AppState::new(Arc::clone(&backend), config);
        let app = biblio_sru::routing::create_routes(state);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self { server, backend }
    }

    /// Sends `GET /sru` with the given query parameters.
    pub async fn sru(&self, params: &[(&str, &str)]) -> TestResponse {
        let mut request = self.server.get("/sru");
        for (key, value) in params {
            request = request.add_query_param(key, *value);
        }
        request.await
    }

    pub async fn search(&self, query: &str) -> TestResponse {
        self.sru(&[("operation", "searchRetrieve"), ("query", query)])
            .await
    }
}

/// Returns the diagnostic URI in a response body, if any.
pub fn diagnostic_uri(body: &str) -> Option<String> {
    let start = body.find("<diag:uri>")? + "<diag:uri>".len();
    let end = body[start..].find("</diag:uri>")? + start;
    Some(body[start..end].to_string())
}

/// Asserts that a response carries SRU diagnostic `code`.
pub fn assert_diagnostic(response: &TestResponse, code: u16) {
    let body = response.text();
    assert_eq!(
        diagnostic_uri(&body).as_deref(),
        Some(format!("info:srw/diagnostic/1/{}", code).as_str()),
        "unexpected body: {}",
        body
    );
}

/// Text of the first `<name>` element in `body`.
pub fn element_text<'a>(body: &'a str, name: &str) -> Option<&'a str> {
    let open = format!("<{}>", name);
    let close = format!("</{}>", name);
    let start = body.find(&open)? + open.len();
    let end = body[start..].find(&close)? + start;
    Some(&body[start..end])
}
