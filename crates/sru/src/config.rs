//! Server configuration for the SRU service.
//!
//! This module provides configuration types for the SRU server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SRU_SERVER_PORT` | 8080 | Server port |
//! | `SRU_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `SRU_LOG_LEVEL` | info | Log level |
//! | `SRU_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `SRU_ENABLE_CORS` | true | Enable CORS |
//! | `SRU_CORS_ORIGINS` | * | Allowed origins |
//! | `SRU_DATABASE_URL` | biblio.db | SQLite database path |
//! | `SRU_DATABASE_NAME` | catalog | Database name reported by explain |
//! | `SRU_DATABASE_TITLE` | Library Catalog | Database title reported by explain |
//! | `SRU_DATABASE_DESCRIPTION` | | Database description reported by explain |
//! | `SRU_DEFAULT_SCHEMA` | marcxml | Record schema when none is requested |
//! | `SRU_DEFAULT_MAXIMUM_RECORDS` | 10 | Records per page when none is requested |
//! | `SRU_MAX_MAXIMUM_RECORDS` | 100 | Upper bound for `maximumRecords` |
//! | `SRU_RATE_LIMIT_ENABLED` | true | Enable per-IP rate limiting |
//! | `SRU_RATE_LIMIT_MAX_REQUESTS` | 100 | Requests allowed per window |
//! | `SRU_RATE_LIMIT_WINDOW_SECS` | 3600 | Window length (seconds) |
//! | `SRU_TRUST_FORWARDED_FOR` | false | Take the client IP from `X-Forwarded-For` |
//! | `SRU_STRICT_INDEXES` | false | Reject unknown indexes with diagnostic 16 |
//! | `SRU_ACCESS_LOG` | true | Record every request in the access log |
//!
//! # Example
//!
//! ```rust
//! use biblio_sru::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     default_schema: "mods".to_string(),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use clap::Parser;

use crate::formats;

/// Highest `startRecord` a client may request.
pub const MAX_START_RECORD: u64 = 10_000;

/// Default number of terms returned by scan.
pub const DEFAULT_MAXIMUM_TERMS: usize = 10;

/// Upper bound for `maximumTerms`.
pub const MAX_MAXIMUM_TERMS: usize = 100;

/// Server configuration for the SRU service.
///
/// This struct can be constructed from command line arguments using
/// [`ServerConfig::parse`] (with environment fallbacks) or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "sru-server")]
#[command(about = "SRU/CQL bibliographic search server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "SRU_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "SRU_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "SRU_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "SRU_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "SRU_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "SRU_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// SQLite database path, or `:memory:`.
    #[arg(long, env = "SRU_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Database name reported by explain.
    #[arg(long, env = "SRU_DATABASE_NAME", default_value = "catalog")]
    pub database_name: String,

    /// Database title reported by explain.
    #[arg(long, env = "SRU_DATABASE_TITLE", default_value = "Library Catalog")]
    pub database_title: String,

    /// Database description reported by explain.
    #[arg(long, env = "SRU_DATABASE_DESCRIPTION", default_value = "")]
    pub database_description: String,

    /// Record schema used when a request names none.
    #[arg(long, env = "SRU_DEFAULT_SCHEMA", default_value = "marcxml")]
    pub default_schema: String,

    /// Records per page when a request names no `maximumRecords`.
    #[arg(long, env = "SRU_DEFAULT_MAXIMUM_RECORDS", default_value = "10")]
    pub default_maximum_records: usize,

    /// Upper bound applied to `maximumRecords`.
    #[arg(long, env = "SRU_MAX_MAXIMUM_RECORDS", default_value = "100")]
    pub max_maximum_records: usize,

    /// Enable per-IP rate limiting.
    #[arg(long, env = "SRU_RATE_LIMIT_ENABLED", default_value = "true")]
    pub rate_limit_enabled: bool,

    /// Requests allowed per client within one window.
    #[arg(long, env = "SRU_RATE_LIMIT_MAX_REQUESTS", default_value = "100")]
    pub rate_limit_max_requests: u32,

    /// Rate-limit window length in seconds.
    #[arg(long, env = "SRU_RATE_LIMIT_WINDOW_SECS", default_value = "3600")]
    pub rate_limit_window_secs: i64,

    /// Take the client address from the first `X-Forwarded-For` entry.
    #[arg(long, env = "SRU_TRUST_FORWARDED_FOR", default_value = "false")]
    pub trust_forwarded_for: bool,

    /// Reject queries naming an unknown index instead of searching everywhere.
    #[arg(long, env = "SRU_STRICT_INDEXES", default_value = "false")]
    pub strict_indexes: bool,

    /// Record every SRU request in the access log.
    #[arg(long, env = "SRU_ACCESS_LOG", default_value = "true")]
    pub access_log: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            database_url: None,
            database_name: "catalog".to_string(),
            database_title: "Library Catalog".to_string(),
            database_description: String::new(),
            default_schema: "marcxml".to_string(),
            default_maximum_records: 10,
            max_maximum_records: 100,
            rate_limit_enabled: true,
            rate_limit_max_requests: 100,
            rate_limit_window_secs: 3600,
            trust_forwarded_for: false,
            strict_indexes: false,
            access_log: true,
        }
    }
}

impl ServerConfig {
    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.max_maximum_records == 0 {
            errors.push("Max maximumRecords cannot be 0".to_string());
        }

        if self.default_maximum_records > self.max_maximum_records {
            errors.push("Default maximumRecords cannot exceed max maximumRecords".to_string());
        }

        if formats::formatter_for(&self.default_schema).is_err() {
            errors.push(format!("Unknown default schema '{}'", self.default_schema));
        }

        if self.rate_limit_enabled {
            if self.rate_limit_max_requests == 0 {
                errors.push("Rate limit max requests cannot be 0".to_string());
            }
            if self.rate_limit_window_secs <= 0 {
                errors.push("Rate limit window must be positive".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0 and disables rate limiting and CORS.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            database_url: Some(":memory:".to_string()),
            database_title: "Test Catalog".to_string(),
            rate_limit_enabled: false,
            rate_limit_max_requests: 5,
            rate_limit_window_secs: 60,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_schema, "marcxml");
        assert!(config.rate_limit_enabled);
        assert!(!config.strict_indexes);
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            port: 3000,
            host: "0.0.0.0".to_string(),
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_validate_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_port() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("Port")));
    }

    #[test]
    fn test_validate_record_limits() {
        let config = ServerConfig {
            default_maximum_records: 200,
            max_maximum_records: 100,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_unknown_schema() {
        let config = ServerConfig {
            default_schema: "bibtex".to_string(),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("bibtex")));
    }

    #[test]
    fn test_validate_rate_limit_only_when_enabled() {
        let config = ServerConfig {
            rate_limit_window_secs: 0,
            rate_limit_enabled: false,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = ServerConfig {
            rate_limit_enabled: true,
            ..config
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_for_testing() {
        let config = ServerConfig::for_testing();
        assert_eq!(config.port, 0);
        assert!(!config.enable_cors);
        assert!(!config.rate_limit_enabled);
    }
}
