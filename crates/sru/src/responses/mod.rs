//! SRU response envelopes.
//!
//! Every SRU request, successful or not, is answered with a well-formed XML
//! document of content type `text/xml; charset=utf-8`. Failures reuse the
//! envelope of the operation that was requested and carry a `srw:diagnostics`
//! block instead of results.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::error::{Diagnostic, SruError};
use crate::xml::{XmlElement, to_document};

/// Namespace of the SRU response elements.
pub const SRU_NAMESPACE: &str = "http://www.loc.gov/zing/srw/";

/// Content type of every SRU response.
pub const XML_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Protocol version used when a request names none.
pub const DEFAULT_VERSION: &str = "1.2";

/// Protocol versions the server answers.
pub const SUPPORTED_VERSIONS: &[&str] = &["1.1", "1.2"];

/// Sent when the envelope itself cannot be serialized.
const FALLBACK_BODY: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
<srw:explainResponse xmlns:srw=\"http://www.loc.gov/zing/srw/\"><srw:version>1.2</srw:version>\
<srw:diagnostics><diag:diagnostic xmlns:diag=\"http://www.loc.gov/zing/srw/diagnostic/\">\
<diag:uri>info:srw/diagnostic/1/1</diag:uri><diag:message>General system error</diag:message>\
</diag:diagnostic></srw:diagnostics></srw:explainResponse>";

/// The SRU operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Explain,
    SearchRetrieve,
    Scan,
}

impl Operation {
    /// Parses the `operation` parameter.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "explain" => Some(Operation::Explain),
            "searchRetrieve" => Some(Operation::SearchRetrieve),
            "scan" => Some(Operation::Scan),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Explain => "explain",
            Operation::SearchRetrieve => "searchRetrieve",
            Operation::Scan => "scan",
        }
    }

    /// Name of the response root element.
    pub fn response_element(&self) -> &'static str {
        match self {
            Operation::Explain => "srw:explainResponse",
            Operation::SearchRetrieve => "srw:searchRetrieveResponse",
            Operation::Scan => "srw:scanResponse",
        }
    }

    /// Creates the response root with its namespace and version.
    pub fn envelope(&self, version: &str) -> XmlElement {
        XmlElement::new(self.response_element())
            .with_attr("xmlns:srw", SRU_NAMESPACE)
            .with_child(XmlElement::text_element("srw:version", version))
    }
}

/// A complete SRU response.
#[derive(Debug, Clone)]
pub struct SruResponse {
    status: StatusCode,
    root: XmlElement,
    diagnostic: Option<Diagnostic>,
    error: Option<String>,
    retry_after: Option<i64>,
}

impl SruResponse {
    /// A successful response.
    pub fn ok(root: XmlElement) -> Self {
        Self {
            status: StatusCode::OK,
            root,
            diagnostic: None,
            error: None,
            retry_after: None,
        }
    }

    /// A failed operation, rendered in the envelope of `operation`.
    pub fn from_error(operation: Operation, version: &str, err: &SruError) -> Self {
        let diagnostic = err.to_diagnostic();
        let mut response = Self::with_diagnostic(operation, version, diagnostic);
        response.error = Some(err.to_string());
        response
    }

    /// A request refused by the rate limiter.
    pub fn rate_limited(operation: Operation, retry_after: i64) -> Self {
        let diagnostic = Diagnostic {
            code: 1,
            message: "Too many requests",
            details: Some(format!("retry after {} seconds", retry_after)),
        };
        let mut response = Self::with_diagnostic(operation, DEFAULT_VERSION, diagnostic);
        response.status = StatusCode::TOO_MANY_REQUESTS;
        response.error = Some("rate limit exceeded".to_string());
        response.retry_after = Some(retry_after);
        response
    }

    fn with_diagnostic(operation: Operation, version: &str, diagnostic: Diagnostic) -> Self {
        let mut root = operation.envelope(version);
        if operation == Operation::SearchRetrieve {
            root.push(XmlElement::text_element("srw:numberOfRecords", "0"));
        }
        root.push(XmlElement::new("srw:diagnostics").with_child(diagnostic.to_xml()));

        Self {
            status: diagnostic.status(),
            root,
            diagnostic: Some(diagnostic),
            error: None,
            retry_after: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        self.diagnostic.as_ref()
    }

    /// Server-side description of the failure, never sent to the client.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl IntoResponse for SruResponse {
    fn into_response(self) -> Response {
        let (status, body) = match to_document(&self.root) {
            Ok(body) => (self.status, body),
            Err(e) => {
                error!(error = %e, "Failed to serialize SRU response");
                (StatusCode::INTERNAL_SERVER_ERROR, FALLBACK_BODY.to_string())
            }
        };

        let mut response = (status, body).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(XML_CONTENT_TYPE),
        );
        if let Some(retry_after) = self.retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_parse() {
        assert_eq!(Operation::parse("scan"), Some(Operation::Scan));
        assert_eq!(
            Operation::parse("searchRetrieve"),
            Some(Operation::SearchRetrieve)
        );
        assert_eq!(Operation::parse("update"), None);
    }

    #[test]
    fn test_search_retrieve_error_envelope() {
        let response = SruResponse::from_error(
            Operation::SearchRetrieve,
            "1.2",
            &SruError::missing("query"),
        );
        let root = response.root();

        assert_eq!(root.name(), "srw:searchRetrieveResponse");
        assert_eq!(root.find("srw:numberOfRecords").unwrap().text(), "0");
        assert!(root.find("srw:diagnostics").is_some());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.diagnostic().unwrap().code, 7);
    }

    #[test]
    fn test_internal_error_status() {
        let response =
            SruResponse::from_error(Operation::Scan, "1.2", &SruError::Internal("boom".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error_message(), Some("internal error: boom"));

        let xml = to_document(response.root()).unwrap();
        assert!(!xml.contains("boom"));
    }

    #[test]
    fn test_rate_limited_response() {
        let response = SruResponse::rate_limited(Operation::Explain, 30).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "30");
        assert_eq!(response.headers()[header::CONTENT_TYPE], XML_CONTENT_TYPE);
    }
}
