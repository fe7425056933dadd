//! Recursive-descent CQL parser.
//!
//! Precedence, lowest first: `OR`, `AND`, prefix `NOT` (right-associative),
//! then primaries (parenthesised sub-queries or search clauses).

use crate::ast::{BooleanOp, Condition, CqlNode, Relation};
use crate::error::{CqlError, CqlResult};
use crate::token::{Token, TokenKind, tokenize};

/// Maximum query length in characters.
pub const MAX_QUERY_LENGTH: usize = 2000;

/// Maximum number of tokens in a query (end-of-input excluded).
pub const MAX_TOKENS: usize = 500;

/// Maximum parenthesis nesting depth.
pub const MAX_DEPTH: usize = 20;

/// Index used for bare search terms.
pub const DEFAULT_INDEX: &str = "cql.anywhere";

/// Parses a CQL query into an AST.
///
/// # Errors
///
/// Returns [`CqlError::InvalidSyntax`] for empty, oversized or malformed input
/// and [`CqlError::UnsupportedRelation`] when an unknown word sits in relation
/// position.
pub fn parse(query: &str) -> CqlResult<CqlNode> {
    Parser::parse(query)
}

/// Parser state over a token stream.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    /// Parses the entire query.
    pub fn parse(query: &str) -> CqlResult<CqlNode> {
        if query.trim().is_empty() {
            return Err(CqlError::syntax("query is empty"));
        }

        let length = query.chars().count();
        if length > MAX_QUERY_LENGTH {
            return Err(CqlError::syntax(format!(
                "query is {} characters long, maximum is {}",
                length, MAX_QUERY_LENGTH
            )));
        }

        let mut parser = Parser {
            tokens: tokenize(query)?,
            pos: 0,
            depth: 0,
        };

        let node = parser.parse_or()?;

        let trailing = parser.current();
        if trailing.kind != TokenKind::Eof {
            return Err(CqlError::syntax_at(
                format!("unexpected token '{}'", trailing.value),
                trailing.position,
            ));
        }

        Ok(node)
    }

    fn current(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        // The token list always ends with Eof, so clamp to it.
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.pos + offset).min(last)]
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn parse_or(&mut self) -> CqlResult<CqlNode> {
        let mut left = self.parse_and()?;

        while self.current().is_boolean("OR") {
            self.advance();
            let right = self.parse_and()?;
            left = CqlNode::Boolean {
                op: BooleanOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> CqlResult<CqlNode> {
        let mut left = self.parse_not()?;

        while self.current().is_boolean("AND") {
            self.advance();
            let right = self.parse_not()?;
            left = CqlNode::Boolean {
                op: BooleanOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_not(&mut self) -> CqlResult<CqlNode> {
        if self.current().is_boolean("NOT") {
            self.advance();
            let operand = self.parse_not()?;
            return Ok(CqlNode::Not {
                operand: Box::new(operand),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> CqlResult<CqlNode> {
        if self.current().kind != TokenKind::LParen {
            return self.parse_condition();
        }

        let open = self.advance();
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CqlError::syntax_at(
                format!("parentheses nested deeper than {}", MAX_DEPTH),
                open.position,
            ));
        }

        let node = self.parse_or()?;

        let close = self.current();
        if close.kind != TokenKind::RParen {
            return Err(CqlError::syntax_at(
                format!("missing closing parenthesis for '(' at offset {}", open.position),
                close.position,
            ));
        }
        self.advance();
        self.depth -= 1;

        Ok(node)
    }

    fn parse_condition(&mut self) -> CqlResult<CqlNode> {
        let first = self.current().clone();

        if first.kind == TokenKind::Word {
            let second = self.peek_at(1);
            if second.is_relation() {
                self.advance();
                let relation_token = self.advance();
                let relation = Relation::parse(&relation_token.value).ok_or_else(|| {
                    CqlError::UnsupportedRelation {
                        relation: relation_token.value.clone(),
                    }
                })?;
                let value = self.parse_term()?;
                return Ok(CqlNode::Condition(Condition {
                    index: first.value.to_lowercase(),
                    relation,
                    value,
                    explicit_index: true,
                }));
            }

            // `index word term`: the middle word sits where a relation belongs.
            if second.kind == TokenKind::Word && is_value_token(self.peek_at(2)) {
                return Err(CqlError::UnsupportedRelation {
                    relation: second.value.clone(),
                });
            }
        }

        let value = self.parse_term()?;
        Ok(CqlNode::Condition(Condition {
            index: DEFAULT_INDEX.to_string(),
            relation: Relation::Eq,
            value,
            explicit_index: false,
        }))
    }

    fn parse_term(&mut self) -> CqlResult<String> {
        let token = self.current();
        if !is_value_token(token) {
            let found = match token.kind {
                TokenKind::Eof => "end of query".to_string(),
                _ => format!("'{}'", token.value),
            };
            return Err(CqlError::syntax_at(
                format!("expected a search term, found {}", found),
                token.position,
            ));
        }
        Ok(self.advance().value)
    }
}

fn is_value_token(token: &Token) -> bool {
    token.is_term() || token.kind == TokenKind::RelWord
}
