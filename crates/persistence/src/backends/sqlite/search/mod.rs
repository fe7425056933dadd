//! SQLite search implementation.
//!
//! - [`QueryCompiler`] translates CQL trees into bound SQL predicates
//! - [`SqlFragment`] carries SQL text with its numbered parameters
//! - [`build_order_by`] maps sort keys onto catalog columns

pub mod compiler;
pub mod query_builder;

pub use compiler::{FALSE_PREDICATE, QueryCompiler, TRUE_PREDICATE};
pub use query_builder::{SqlFragment, SqlParam, build_order_by, escape_like};
