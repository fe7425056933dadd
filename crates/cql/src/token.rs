//! CQL tokenizer.
//!
//! Scans query text left to right. Two-character relation symbols (`>=`, `<=`,
//! `<>`, `==`) are recognized before single-character ones (`=`, `<`, `>`).
//! Words end at whitespace, parentheses, quotes or relation symbols.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::{CqlError, CqlResult};
use crate::parser::MAX_TOKENS;

/// The kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// Symbolic relation: `=`, `<`, `>`, `<=`, `>=`, `<>`, `==`.
    RelOp,
    /// Word relation: `exact`, `all`, `any`.
    RelWord,
    /// `AND`, `OR`, `NOT` (value is upper-cased).
    Boolean,
    /// Quoted literal with escapes resolved.
    String,
    /// Bare word.
    Word,
    /// End of input.
    Eof,
}

/// A single token with its source offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    /// Byte offset of the first character of the token.
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, value: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            position,
        }
    }

    /// Returns true for either relation token kind.
    pub fn is_relation(&self) -> bool {
        matches!(self.kind, TokenKind::RelOp | TokenKind::RelWord)
    }

    /// Returns true if the token can stand as a search term.
    pub fn is_term(&self) -> bool {
        matches!(self.kind, TokenKind::Word | TokenKind::String)
    }

    /// Returns true if this is the given boolean keyword.
    pub fn is_boolean(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Boolean && self.value == keyword
    }
}

/// Tokenizes a query, always terminating the list with an [`TokenKind::Eof`] token.
///
/// Fails when a quoted literal is not terminated or when the query produces
/// more than [`MAX_TOKENS`] tokens.
pub fn tokenize(input: &str) -> CqlResult<Vec<Token>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token()?;
        if token.kind == TokenKind::Eof {
            tokens.push(token);
            return Ok(tokens);
        }
        if tokens.len() >= MAX_TOKENS {
            return Err(CqlError::syntax_at(
                format!("query has more than {} tokens", MAX_TOKENS),
                token.position,
            ));
        }
        tokens.push(token);
    }
}

struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(pos, _)| *pos)
            .unwrap_or(self.input.len())
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.chars.next();
        }
    }

    fn next_token(&mut self) -> CqlResult<Token> {
        self.skip_whitespace();
        let start = self.offset();

        let Some(ch) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, "", start));
        };

        match ch {
            '(' => {
                self.chars.next();
                Ok(Token::new(TokenKind::LParen, "(", start))
            }
            ')' => {
                self.chars.next();
                Ok(Token::new(TokenKind::RParen, ")", start))
            }
            '"' | '\'' => self.read_string(ch, start),
            '=' | '<' | '>' => Ok(self.read_relation(ch, start)),
            _ => Ok(self.read_word(start)),
        }
    }

    fn read_relation(&mut self, first: char, start: usize) -> Token {
        self.chars.next();
        let two = match (first, self.peek()) {
            ('>', Some('=')) => Some(">="),
            ('<', Some('=')) => Some("<="),
            ('<', Some('>')) => Some("<>"),
            ('=', Some('=')) => Some("=="),
            _ => None,
        };

        match two {
            Some(op) => {
                self.chars.next();
                Token::new(TokenKind::RelOp, op, start)
            }
            None => Token::new(TokenKind::RelOp, first.to_string(), start),
        }
    }

    fn read_string(&mut self, quote: char, start: usize) -> CqlResult<Token> {
        self.chars.next();
        let mut value = String::new();

        loop {
            match self.chars.next() {
                None => {
                    return Err(CqlError::syntax_at(
                        format!("unterminated string literal starting at offset {}", start),
                        start,
                    ));
                }
                Some((_, ch)) if ch == quote => break,
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, escaped)) => value.push(escaped),
                    None => {
                        return Err(CqlError::syntax_at(
                            "unterminated escape sequence",
                            self.input.len(),
                        ));
                    }
                },
                Some((_, ch)) => value.push(ch),
            }
        }

        Ok(Token::new(TokenKind::String, value, start))
    }

    fn read_word(&mut self, start: usize) -> Token {
        while let Some(ch) = self.peek() {
            if is_word_boundary(ch) {
                break;
            }
            self.chars.next();
        }
        let end = self.offset();
        let word = &self.input[start..end];

        match word.to_ascii_lowercase().as_str() {
            "and" | "or" | "not" => {
                Token::new(TokenKind::Boolean, word.to_ascii_uppercase(), start)
            }
            "exact" | "all" | "any" => {
                Token::new(TokenKind::RelWord, word.to_ascii_lowercase(), start)
            }
            _ => Token::new(TokenKind::Word, word, start),
        }
    }
}

fn is_word_boundary(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | '"' | '\'' | '=' | '<' | '>')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_two_char_relations_win() {
        let tokens = tokenize("year>=1990 year<>2000 a==b").unwrap();
        let relations: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::RelOp)
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(relations, vec![">=", "<>", "=="]);
    }

    #[test]
    fn test_words_end_at_relation_symbols() {
        let tokens = tokenize("dc.title=moby").unwrap();
        assert_eq!(tokens[0].value, "dc.title");
        assert_eq!(tokens[1].value, "=");
        assert_eq!(tokens[2].value, "moby");
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let tokens = tokenize("a and b Or NOT c title ALL x").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Boolean);
        assert_eq!(tokens[1].value, "AND");
        assert_eq!(tokens[3].value, "OR");
        assert_eq!(tokens[4].value, "NOT");
        assert_eq!(tokens[7].kind, TokenKind::RelWord);
        assert_eq!(tokens[7].value, "all");
    }

    #[test]
    fn test_quoted_strings_and_escapes() {
        let tokens = tokenize(r#"title="moby \"dick\"" 'it\'s'"#).unwrap();
        assert_eq!(tokens[2].kind, TokenKind::String);
        assert_eq!(tokens[2].value, r#"moby "dick""#);
        assert_eq!(tokens[3].value, "it's");
    }

    #[test]
    fn test_parens() {
        assert_eq!(
            kinds("(a)"),
            vec![
                TokenKind::LParen,
                TokenKind::Word,
                TokenKind::RParen,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("a = \"open").unwrap_err();
        assert!(matches!(err, CqlError::InvalidSyntax { .. }));
    }

    #[test]
    fn test_token_cap() {
        let query = vec!["x"; MAX_TOKENS + 1].join(" ");
        assert!(tokenize(&query).is_err());

        let query = vec!["x"; MAX_TOKENS].join(" ");
        assert_eq!(tokenize(&query).unwrap().len(), MAX_TOKENS + 1);
    }

    #[test]
    fn test_unicode_words() {
        let tokens = tokenize("città=Roma").unwrap();
        assert_eq!(tokens[0].value, "città");
        assert_eq!(tokens[2].value, "Roma");
    }
}
