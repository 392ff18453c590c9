//! Lexical analysis for BrightScript.
//!
//! This module converts BrightScript source code into a stream of [`Token`]s.
//! It handles:
//!
//! - Case-insensitive keyword recognition
//! - Decimal, hexadecimal (`&H`) and suffixed float literals
//! - String literals with doubled-quote escaping
//! - Comments (both `'` and `REM` styles), which are dropped
//! - Compound assignment and increment operators
//!
//! ## Example
//!
//! ```
//! use brscov::lexer::Lexer;
//!
//! let source = r#"print "Hello, World!""#;
//! let mut lexer = Lexer::new(source);
//!
//! while let Some(token) = lexer.next_token() {
//!     println!("{}: {:?}", token.text, token.kind);
//! }
//! ```
//!
//! ## Design Notes
//!
//! The lexer is built on the [`logos`](https://docs.rs/logos) crate, which
//! generates a fast DFA-based lexer from our token definitions. We wrap logos
//! in our own [`Lexer`] struct to attach line/column [`Location`]s to every
//! token, which the coverage rewriter needs for column-precise edits.

mod token;

pub use token::{Token, TokenKind};

use logos::Logos;

use crate::ast::{LineIndex, Location};

/// The lexer for BrightScript source code.
///
/// Wraps a `logos` lexer and provides a convenient iterator interface
/// that yields [`Token`]s with their source positions.
///
/// ## Example
///
/// ```
/// use brscov::lexer::{Lexer, TokenKind};
///
/// let lexer = Lexer::new("print 42");
/// let tokens: Vec<_> = lexer.collect();
///
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[0].kind, TokenKind::Print);
/// assert_eq!(tokens[1].kind, TokenKind::IntegerLiteral);
/// assert_eq!(tokens[1].text, "42");
/// ```
pub struct Lexer<'source> {
    /// The underlying logos lexer
    inner: logos::Lexer<'source, TokenKind>,
    /// The original source (for error reporting)
    source: &'source str,
    /// Line start offsets, for span → line/column conversion
    lines: LineIndex,
}

impl<'source> Lexer<'source> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'source str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
            lines: LineIndex::new(source),
        }
    }

    /// Get the original source code.
    pub fn source(&self) -> &'source str {
        self.source
    }

    /// Get the next token, if any.
    ///
    /// Returns `None` when the end of input is reached.
    /// Unrecognized characters come back as [`TokenKind::Unknown`] tokens
    /// so the parser can report them.
    pub fn next_token(&mut self) -> Option<Token> {
        let kind = self.inner.next()?.unwrap_or(TokenKind::Unknown);
        let span = self.inner.span();
        let location = Location::new(
            self.lines.position(span.start),
            self.lines.position(span.end),
        );
        let text = self.inner.slice().to_string();
        Some(Token::new(kind, span, location, text))
    }

    /// Collect all remaining tokens into a vector.
    ///
    /// This consumes the lexer.
    pub fn collect_tokens(self) -> Vec<Token> {
        self.collect()
    }
}

impl<'source> Iterator for Lexer<'source> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Convenience function to lex source code directly.
///
/// # Example
///
/// ```
/// use brscov::lexer::{lex, TokenKind};
///
/// let tokens = lex("print 42");
/// assert_eq!(tokens[0].kind, TokenKind::Print);
/// ```
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect_tokens()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Position;

    #[test]
    fn test_lexer_iterator() {
        let tokens: Vec<_> = Lexer::new("print 42").collect();
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_token_spans() {
        let tokens = lex("print 42");

        assert_eq!(tokens[0].span, 0..5);
        assert_eq!(tokens[0].text, "print");

        assert_eq!(tokens[1].span, 6..8);
        assert_eq!(tokens[1].text, "42");
    }

    #[test]
    fn test_token_locations() {
        let tokens = lex("x = 1\n  if y then");

        // `if` on the second line, two columns in
        let if_token = &tokens[4];
        assert_eq!(if_token.kind, TokenKind::If);
        assert_eq!(if_token.location.start, Position::new(2, 2));
        assert_eq!(if_token.location.end, Position::new(2, 4));
    }

    #[test]
    fn test_multiline() {
        let source = "x = 1\ny = 2";
        let tokens = lex(source);

        let kinds: Vec<_> = tokens.iter().map(|t| &t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &TokenKind::Identifier,
                &TokenKind::Equals,
                &TokenKind::IntegerLiteral,
                &TokenKind::Newline,
                &TokenKind::Identifier,
                &TokenKind::Equals,
                &TokenKind::IntegerLiteral,
            ]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let tokens = lex("x = 1\r\ny = 2");
        assert_eq!(tokens[3].kind, TokenKind::Newline);
        assert_eq!(tokens[4].location.start, Position::new(2, 0));
    }

    #[test]
    fn test_invalid_characters_are_kept() {
        let tokens = lex("x = `y`");
        let kinds: Vec<_> = tokens.iter().map(|t| &t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &TokenKind::Identifier,
                &TokenKind::Equals,
                &TokenKind::Unknown,
                &TokenKind::Identifier,
                &TokenKind::Unknown,
            ]
        );
        assert_eq!(tokens[2].text, "`");
        assert_eq!(tokens[2].location.start, Position::new(1, 4));
    }

    #[test]
    fn test_member_call() {
        let tokens = lex("m.top.observeField(\"focus\", \"onFocus\")");
        let kinds: Vec<_> = tokens.iter().map(|t| &t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &TokenKind::Identifier,
                &TokenKind::Dot,
                &TokenKind::Identifier,
                &TokenKind::Dot,
                &TokenKind::Identifier,
                &TokenKind::LeftParen,
                &TokenKind::StringLiteral,
                &TokenKind::Comma,
                &TokenKind::StringLiteral,
                &TokenKind::RightParen,
            ]
        );
    }
}
