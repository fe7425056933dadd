//! Axum extractors for SRU requests.
//!
//! - [`ClientInfo`] - Client address and user agent
//! - [`SruParams`] - Raw SRU query parameters

mod client;
mod sru_params;

pub use client::{ClientInfo, client_ip};
pub use sru_params::SruParams;
