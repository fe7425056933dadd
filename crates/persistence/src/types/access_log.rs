//! Access log types.

use serde::{Deserialize, Serialize};

/// Request details written when an SRU request starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLogEntry {
    pub ip: String,
    pub user_agent: Option<String>,
    /// SRU operation name as requested, if any.
    pub operation: Option<String>,
    /// The CQL query or scan clause.
    pub query: Option<String>,
    /// Requested record schema.
    pub format: Option<String>,
}

/// Outcome applied to an access log row once the response is ready.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLogCompletion {
    pub response_time_ms: u64,
    pub http_status: u16,
    /// Diagnostic message for failed requests.
    pub error_message: Option<String>,
}

/// A stored access log row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLogRecord {
    pub id: i64,
    pub entry: AccessLogEntry,
    /// `None` until the request has completed.
    pub completion: Option<AccessLogCompletion>,
    /// RFC 3339 timestamp of the insert.
    pub created_at: String,
}
