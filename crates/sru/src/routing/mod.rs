//! Route configuration for the SRU service.
//!
//! This module contains the routing configuration that maps HTTP paths
//! to handlers.

pub mod sru_routes;

pub use sru_routes::create_routes;
