//! Token navigation utilities for the parser.
//!
//! This module provides the low-level token stream operations that form
//! the foundation of the recursive descent parser:
//! - Peeking at tokens without consuming them
//! - Advancing through the token stream
//! - Matching and expecting specific tokens
//! - Node extents (span + location) from a starting token
//! - Error recovery (synchronization)

use crate::ast::{Location, Span};
use crate::lexer::{Token, TokenKind};

use super::{ParseError, Parser};

impl<'a> Parser<'a> {
    // ==================== Token Navigation ====================

    /// Returns the current token without consuming it.
    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    /// Returns the kind of the current token.
    pub(super) fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    /// Looks ahead n tokens (0 = current token).
    pub(super) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.current + n)
    }

    /// Consumes and returns the current token.
    pub(super) fn advance(&mut self) -> Option<&Token> {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.tokens.get(self.current - 1)
    }

    /// Returns true if we've reached the end of the token stream.
    pub(super) fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    /// Checks if the current token matches the expected kind.
    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    /// Checks if the token `n` positions ahead matches the expected kind.
    pub(super) fn check_ahead(&self, n: usize, kind: &TokenKind) -> bool {
        self.peek_ahead(n).map(|t| &t.kind) == Some(kind)
    }

    /// Consumes the current token if it matches, returns true if consumed.
    pub(super) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects the current token to match, or records an error.
    pub(super) fn expect(&mut self, kind: &TokenKind, expected_desc: &str) -> Result<&Token, ()> {
        if self.check(kind) {
            Ok(self.advance().expect("advance after check"))
        } else {
            self.error_expected(expected_desc);
            Err(())
        }
    }

    /// Expects a word (identifier or keyword) and returns its text.
    ///
    /// Member names, associative-array keys, parameter names and type names
    /// may all be spelled like keywords.
    pub(super) fn expect_word(&mut self, expected_desc: &str) -> Result<String, ()> {
        if self.peek().is_some_and(Token::is_word) {
            Ok(self.advance().expect("advance after peek").text.clone())
        } else {
            self.error_expected(expected_desc);
            Err(())
        }
    }

    /// Records an "expected X, found Y" error at the current token.
    pub(super) fn error_expected(&mut self, expected_desc: &str) {
        let error = match self.peek() {
            Some(token) => {
                ParseError::unexpected(expected_desc, describe(token), token.span.clone().into())
            }
            None => ParseError::eof(expected_desc),
        };
        self.errors.push(error);
    }

    /// Records an error for tokens trailing a complete statement.
    pub(super) fn error_expected_statement_end(&mut self) {
        self.error_expected("end of statement");
    }

    /// Skips newline tokens.
    pub(super) fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    /// Skips statement separators (newlines and `:`).
    pub(super) fn skip_separators(&mut self) {
        while self.check(&TokenKind::Newline) || self.check(&TokenKind::Colon) {
            self.advance();
        }
    }

    /// Returns true if the current token ends a statement.
    ///
    /// `else` ends the statements of a single-line `if ... then ...`.
    pub(super) fn at_statement_end(&self) -> bool {
        matches!(
            self.peek_kind(),
            None | Some(TokenKind::Newline | TokenKind::Colon | TokenKind::Else | TokenKind::ElseIf)
        )
    }

    /// Attempts to recover from an error by skipping to a synchronization point.
    ///
    /// Synchronization points are:
    /// - Newlines (statement boundaries)
    /// - Statement-starting keywords (PRINT, IF, FOR, etc.)
    pub(super) fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            // Newline is a natural statement boundary
            if self.tokens.get(self.current - 1).map(|t| &t.kind) == Some(&TokenKind::Newline) {
                return;
            }

            match self.peek_kind() {
                Some(
                    TokenKind::Print
                    | TokenKind::If
                    | TokenKind::For
                    | TokenKind::While
                    | TokenKind::Function
                    | TokenKind::Sub
                    | TokenKind::Return,
                ) => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Returns the byte span and line/column location from the token at
    /// index `start` through the last consumed token.
    pub(super) fn extent_from(&self, start: usize) -> (Span, Location) {
        let first = &self.tokens[start];
        let last = self
            .tokens
            .get(self.current.saturating_sub(1))
            .filter(|_| self.current > start)
            .unwrap_or(first);
        (
            Span::new(first.span.start, last.span.end),
            Location::new(first.location.start, last.location.end),
        )
    }

    /// Byte span of the token at index `index`.
    pub(super) fn token_span(&self, index: usize) -> Span {
        self.tokens[index].span.clone().into()
    }
}

/// Human-readable description of a token for error messages.
fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Newline => "newline".to_string(),
        _ => format!("`{}`", token.text),
    }
}
