//! Client identity extractor.
//!
//! The client address comes from the TCP connection, or from the first
//! `X-Forwarded-For` entry when the server sits behind a trusted proxy.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{Extensions, HeaderMap, header, request::Parts},
};
use biblio_persistence::core::LibraryStorage;

use crate::state::AppState;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Address reported when neither the connection nor a header names one.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Who sent the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip: String,
    pub user_agent: Option<String>,
}

/// Resolves the client address of a request.
pub fn client_ip(
    headers: &HeaderMap,
    extensions: &Extensions,
    trust_forwarded_for: bool,
) -> String {
    if trust_forwarded_for {
        let forwarded = headers
            .get(X_FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

impl<S> FromRequestParts<AppState<S>> for ClientInfo
where
    S: LibraryStorage,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let ip = client_ip(
            &parts.headers,
            &parts.extensions,
            state.config().trust_forwarded_for,
        );
        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Ok(ClientInfo { ip, user_agent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_connection_address() {
        let mut extensions = Extensions::new();
        extensions.insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 5000))));

        let ip = client_ip(&HeaderMap::new(), &extensions, false);
        assert_eq!(ip, "192.0.2.1");
    }

    #[test]
    fn test_forwarded_for_only_when_trusted() {
        let mut headers = HeaderMap::new();
        headers.insert(
            X_FORWARDED_FOR,
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        let extensions = Extensions::new();

        assert_eq!(client_ip(&headers, &extensions, true), "203.0.113.9");
        assert_eq!(client_ip(&headers, &extensions, false), UNKNOWN_CLIENT);
    }
}
