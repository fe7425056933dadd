//! # biblio-cql - Contextual Query Language parser
//!
//! A bounded, recursive-descent parser for the subset of
//! [CQL](https://www.loc.gov/standards/sru/cql/) accepted by the Biblio SRU server.
//!
//! ## Grammar
//!
//! ```text
//! query      = or_expr EOF ;
//! or_expr    = and_expr { "OR" and_expr } ;
//! and_expr   = not_expr { "AND" not_expr } ;
//! not_expr   = "NOT" not_expr | primary ;
//! primary    = "(" or_expr ")" | condition ;
//! condition  = index relation term | term ;
//! relation   = "=" | "<" | ">" | "<=" | ">=" | "<>" | "==" | "exact" | "all" | "any" ;
//! term       = WORD | STRING ;
//! ```
//!
//! A bare term without an index is searched against `cql.anywhere`.
//!
//! ## Bounds
//!
//! Queries are rejected before the AST is complete when they exceed
//! [`MAX_QUERY_LENGTH`] characters, [`MAX_TOKENS`] tokens, or [`MAX_DEPTH`]
//! levels of parenthesised nesting.
//!
//! ## Example
//!
//! ```
//! use biblio_cql::{parse, BooleanOp, CqlNode};
//!
//! let ast = parse("title=foo AND author=bar").unwrap();
//! match ast {
//!     CqlNode::Boolean { op, .. } => assert_eq!(op, BooleanOp::And),
//!     other => panic!("unexpected node: {other:?}"),
//! }
//! ```

pub mod ast;
pub mod error;
pub mod parser;
pub mod token;

pub use ast::{BooleanOp, Condition, CqlNode, Relation};
pub use error::{CqlError, CqlResult};
pub use parser::{DEFAULT_INDEX, MAX_DEPTH, MAX_QUERY_LENGTH, MAX_TOKENS, Parser, parse};
pub use token::{Token, TokenKind, tokenize};
