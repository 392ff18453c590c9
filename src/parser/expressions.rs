//! Expression parsing using Pratt parsing (precedence climbing).
//!
//! Pratt parsing handles operator precedence and associativity elegantly by
//! assigning binding power to each operator. Postfix forms (calls, member
//! access, indexing, `@` attributes) bind tighter than any operator and are
//! parsed as a chain on top of a primary expression.

use crate::ast::{BinaryOp, Expr, ExprKind, Span, UnaryOp};
use crate::lexer::TokenKind;

use super::statements::unquote;
use super::{ParseError, Parser, Precedence};

impl<'a> Parser<'a> {
    /// Parses an expression.
    pub(super) fn parse_expression(&mut self) -> Result<Expr, ()> {
        self.parse_precedence(Precedence::Lowest)
    }

    /// Parses an expression whose operators all bind tighter than `min`.
    fn parse_precedence(&mut self, min: Precedence) -> Result<Expr, ()> {
        let start = self.current;
        let mut left = self.parse_prefix()?;

        while let Some((op, precedence)) = self.peek_kind().and_then(binary_op) {
            if precedence <= min {
                break;
            }
            self.advance();

            let right = self.parse_precedence(precedence)?;
            let (span, location) = self.extent_from(start);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
                location,
            );
        }

        Ok(left)
    }

    /// Parses unary operators, falling through to postfix expressions.
    fn parse_prefix(&mut self) -> Result<Expr, ()> {
        let start = self.current;
        let (op, precedence) = match self.peek_kind() {
            Some(TokenKind::Minus) => (UnaryOp::Negate, Precedence::Unary),
            Some(TokenKind::Not) => (UnaryOp::Not, Precedence::Not),
            _ => return self.parse_postfix(),
        };
        self.advance();

        let operand = self.parse_precedence(precedence)?;
        let (span, location) = self.extent_from(start);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
            location,
        ))
    }

    /// Parses a primary expression followed by any chain of `(...)`, `.name`,
    /// `[index]` and `@attr`.
    pub(super) fn parse_postfix(&mut self) -> Result<Expr, ()> {
        let start = self.current;
        let mut expr = self.parse_primary()?;

        loop {
            let kind = match self.peek_kind() {
                Some(TokenKind::LeftParen) => {
                    let args = self.parse_arguments()?;
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    }
                }
                Some(TokenKind::Dot) => {
                    self.advance();
                    let name = self.expect_word("member name")?;
                    ExprKind::Member {
                        object: Box::new(expr),
                        name,
                    }
                }
                Some(TokenKind::LeftBracket) => {
                    self.advance();
                    self.skip_newlines();
                    let index = self.parse_expression()?;
                    self.skip_newlines();
                    self.expect(&TokenKind::RightBracket, "]")?;
                    ExprKind::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    }
                }
                Some(TokenKind::At) => {
                    self.advance();
                    let name = self.expect_word("attribute name")?;
                    ExprKind::Attribute {
                        object: Box::new(expr),
                        name,
                    }
                }
                _ => break,
            };

            let (span, location) = self.extent_from(start);
            expr = Expr::new(kind, span, location);
        }

        Ok(expr)
    }

    /// Parses `(arg, arg, ...)`; arguments may span lines.
    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ()> {
        self.advance(); // consume (
        self.skip_newlines();

        let mut args = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                args.push(self.parse_expression()?);
                self.skip_newlines();
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
                self.skip_newlines();
            }
        }

        self.expect(&TokenKind::RightParen, ")")?;
        Ok(args)
    }

    /// Parses literals, identifiers, grouping, collection literals and
    /// anonymous functions.
    fn parse_primary(&mut self) -> Result<Expr, ()> {
        let start = self.current;
        let token = match self.peek() {
            Some(t) => t,
            None => {
                self.errors.push(ParseError::eof("expression"));
                return Err(());
            }
        };
        let token_kind = token.kind.clone();
        let span: Span = token.span.clone().into();
        let text = token.text.clone();

        let kind = match token_kind {
            TokenKind::IntegerLiteral => {
                self.advance();
                let value = text.trim_end_matches('&').parse::<i64>();
                ExprKind::IntegerLiteral(self.number(value, span, &text)?)
            }
            TokenKind::HexLiteral => {
                self.advance();
                let digits = text[2..].trim_end_matches('&');
                let value = i64::from_str_radix(digits, 16);
                ExprKind::IntegerLiteral(self.number(value, span, &text)?)
            }
            TokenKind::FloatLiteral => {
                self.advance();
                let value = text.trim_end_matches(['!', '#']).parse::<f64>();
                ExprKind::FloatLiteral(self.number(value, span, &text)?)
            }
            TokenKind::StringLiteral => {
                self.advance();
                ExprKind::StringLiteral(unquote(&text))
            }
            TokenKind::UnterminatedString => {
                self.advance();
                self.errors.push(ParseError::UnterminatedString { span });
                return Err(());
            }
            TokenKind::True => {
                self.advance();
                ExprKind::BooleanLiteral(true)
            }
            TokenKind::False => {
                self.advance();
                ExprKind::BooleanLiteral(false)
            }
            TokenKind::Invalid => {
                self.advance();
                ExprKind::Invalid
            }
            TokenKind::Identifier => {
                self.advance();
                ExprKind::Identifier(text)
            }
            TokenKind::LeftParen => {
                self.advance();
                self.skip_newlines();
                let inner = self.parse_expression()?;
                self.skip_newlines();
                self.expect(&TokenKind::RightParen, ")")?;
                ExprKind::Grouped(Box::new(inner))
            }
            TokenKind::LeftBracket => ExprKind::ArrayLiteral(self.parse_array_literal()?),
            TokenKind::LeftBrace => ExprKind::AssocArrayLiteral(self.parse_assoc_array_literal()?),
            TokenKind::Function | TokenKind::Sub => {
                let kind = self.consume_function_keyword();
                let func = self.parse_function_rest(kind, start)?;
                ExprKind::Function(Box::new(func))
            }
            _ => {
                let message = match token_kind {
                    TokenKind::Newline => "expected expression, found end of line".to_string(),
                    _ => format!("expected expression, found `{}`", text),
                };
                self.errors.push(ParseError::InvalidExpression { span, message });
                return Err(());
            }
        };

        let (span, location) = self.extent_from(start);
        Ok(Expr::new(kind, span, location))
    }

    /// Converts a numeric parse result, recording an error on failure.
    fn number<T, E>(&mut self, value: Result<T, E>, span: Span, text: &str) -> Result<T, ()> {
        value.map_err(|_| {
            self.errors.push(ParseError::InvalidNumber {
                span,
                message: format!("`{}` is out of range", text),
            });
        })
    }

    /// Parses `[a, b, c]`. Items are separated by commas and/or newlines.
    fn parse_array_literal(&mut self) -> Result<Vec<Expr>, ()> {
        self.advance(); // consume [
        let mut items = Vec::new();

        loop {
            self.skip_newlines();
            if self.check(&TokenKind::RightBracket) {
                break;
            }
            items.push(self.parse_expression()?);
            if !self.continue_collection() {
                break;
            }
        }

        self.expect(&TokenKind::RightBracket, "]")?;
        Ok(items)
    }

    /// Parses `{ key: value, "quoted key": value }`. Entries are separated
    /// by commas and/or newlines.
    fn parse_assoc_array_literal(&mut self) -> Result<Vec<(String, Expr)>, ()> {
        self.advance(); // consume {
        let mut entries = Vec::new();

        loop {
            self.skip_newlines();
            if self.check(&TokenKind::RightBrace) {
                break;
            }

            let key = if self.check(&TokenKind::StringLiteral) {
                let text = self.advance().expect("string key").text.clone();
                unquote(&text)
            } else {
                self.expect_word("key")?
            };
            self.expect(&TokenKind::Colon, ":")?;
            let value = self.parse_expression()?;
            entries.push((key, value));

            if !self.continue_collection() {
                break;
            }
        }

        self.expect(&TokenKind::RightBrace, "}")?;
        Ok(entries)
    }

    /// Consumes the separator after a collection item. Returns false when
    /// neither a comma nor a newline follows.
    fn continue_collection(&mut self) -> bool {
        let had_comma = self.match_token(&TokenKind::Comma);
        let had_newline = self.check(&TokenKind::Newline);
        self.skip_newlines();
        had_comma || had_newline
    }
}

/// Maps a binary operator token to its operator and precedence.
fn binary_op(kind: &TokenKind) -> Option<(BinaryOp, Precedence)> {
    let entry = match kind {
        TokenKind::Or => (BinaryOp::Or, Precedence::Or),
        TokenKind::And => (BinaryOp::And, Precedence::And),
        TokenKind::Equals => (BinaryOp::Equal, Precedence::Comparison),
        TokenKind::NotEquals => (BinaryOp::NotEqual, Precedence::Comparison),
        TokenKind::LessThan => (BinaryOp::LessThan, Precedence::Comparison),
        TokenKind::LessEquals => (BinaryOp::LessEqual, Precedence::Comparison),
        TokenKind::GreaterThan => (BinaryOp::GreaterThan, Precedence::Comparison),
        TokenKind::GreaterEquals => (BinaryOp::GreaterEqual, Precedence::Comparison),
        TokenKind::ShiftLeft => (BinaryOp::ShiftLeft, Precedence::Shift),
        TokenKind::ShiftRight => (BinaryOp::ShiftRight, Precedence::Shift),
        TokenKind::Plus => (BinaryOp::Add, Precedence::Additive),
        TokenKind::Minus => (BinaryOp::Subtract, Precedence::Additive),
        TokenKind::Star => (BinaryOp::Multiply, Precedence::Multiplicative),
        TokenKind::Slash => (BinaryOp::Divide, Precedence::Multiplicative),
        TokenKind::Backslash => (BinaryOp::IntDivide, Precedence::Multiplicative),
        TokenKind::Mod => (BinaryOp::Modulo, Precedence::Multiplicative),
        TokenKind::Caret => (BinaryOp::Power, Precedence::Power),
        _ => return None,
    };
    Some(entry)
}
