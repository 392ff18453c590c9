//! Statement parsing for the parser.
//!
//! This module contains the main statement dispatcher and parsing for
//! simple statements like PRINT, assignments, calls, DIM, GOTO, RETURN, etc.
//!
//! More complex statements (control flow, procedures) are handled in their
//! respective modules.

use crate::ast::{
    AssignOp, ExitType, Expr, ExprKind, PrintItem, PrintSeparator, Span, Statement, StatementKind,
};
use crate::lexer::TokenKind;

use super::{ParseError, Parser};

impl<'a> Parser<'a> {
    // ==================== Statement Dispatcher ====================

    /// Parses a single statement.
    pub(super) fn parse_statement(&mut self) -> Result<Statement, ()> {
        let token = match self.peek() {
            Some(t) => t,
            None => {
                self.errors.push(ParseError::eof("statement"));
                return Err(());
            }
        };

        match &token.kind {
            // Output
            TokenKind::Print | TokenKind::Question => self.parse_print(),

            // Control flow (delegated to control_flow.rs)
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while(),
            TokenKind::Goto => self.parse_goto(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Exit | TokenKind::ExitWhile => self.parse_exit(),
            TokenKind::End => self.parse_end(),
            TokenKind::Stop => self.parse_keyword_statement(StatementKind::Stop),

            // Declarations
            TokenKind::Function | TokenKind::Sub => self.parse_function_statement(),
            TokenKind::Dim => self.parse_dim(),
            TokenKind::Library => self.parse_library(),

            // Conditional compilation (delegated to directives.rs)
            TokenKind::Directive => self.parse_directive(),

            TokenKind::Identifier => {
                if self.at_label() {
                    self.parse_label()
                } else {
                    self.parse_identifier_statement()
                }
            }

            TokenKind::UnterminatedString => {
                let span = token.span.clone().into();
                self.errors.push(ParseError::UnterminatedString { span });
                Err(())
            }

            _ => {
                let span: Span = token.span.clone().into();
                self.errors.push(ParseError::InvalidStatement {
                    span,
                    message: format!("unexpected token `{}`", token.text),
                });
                Err(())
            }
        }
    }

    // ==================== PRINT Statement ====================

    /// Parses a PRINT (or `?`) statement.
    pub(super) fn parse_print(&mut self) -> Result<Statement, ()> {
        let start = self.current;
        self.advance(); // consume PRINT / ?
        let mut values: Vec<PrintItem> = Vec::new();

        while !self.at_statement_end() {
            if self.check(&TokenKind::Semicolon) || self.check(&TokenKind::Comma) {
                let sep = if self.match_token(&TokenKind::Semicolon) {
                    PrintSeparator::Semicolon
                } else {
                    self.advance();
                    PrintSeparator::Comma
                };

                if let Some(last) = values.last_mut() {
                    last.separator = Some(sep);
                }
                continue;
            }

            let expr = self.parse_expression()?;
            values.push(PrintItem {
                expr,
                separator: None,
            });
        }

        Ok(self.finish(StatementKind::Print { values }, start))
    }

    // ==================== Assignments and Calls ====================

    /// Parses a statement that starts with an identifier.
    ///
    /// The target is parsed as a postfix expression, then classified:
    /// - `name op value` → [`StatementKind::Assignment`]
    /// - `object.name op value` → [`StatementKind::DottedSet`]
    /// - `object[index] op value` → [`StatementKind::IndexedSet`]
    /// - `target++` / `target--` → [`StatementKind::Increment`]
    /// - `callee(args)` → [`StatementKind::Expression`]
    fn parse_identifier_statement(&mut self) -> Result<Statement, ()> {
        let start = self.current;
        let target = self.parse_postfix()?;

        if let Some(operator) = self.peek_kind().and_then(assign_op) {
            self.advance();
            let value = self.parse_expression()?;
            let kind = match target.kind {
                ExprKind::Identifier(name) => StatementKind::Assignment {
                    name,
                    operator,
                    value,
                },
                ExprKind::Member { object, name } => StatementKind::DottedSet {
                    object: *object,
                    name,
                    operator,
                    value,
                },
                ExprKind::Index { object, index } => StatementKind::IndexedSet {
                    object: *object,
                    index: *index,
                    operator,
                    value,
                },
                _ => {
                    self.errors.push(ParseError::InvalidStatement {
                        span: target.span,
                        message: "invalid assignment target".to_string(),
                    });
                    return Err(());
                }
            };
            return Ok(self.finish(kind, start));
        }

        if self.check(&TokenKind::PlusPlus) || self.check(&TokenKind::MinusMinus) {
            let decrement = self.check(&TokenKind::MinusMinus);
            self.advance();
            return Ok(self.finish(StatementKind::Increment { target, decrement }, start));
        }

        if matches!(target.kind, ExprKind::Call { .. }) {
            return Ok(self.finish(StatementKind::Expression(target), start));
        }

        self.reject_expression_statement(&target);
        Err(())
    }

    /// Records an error for an expression that is neither a call nor an assignment.
    fn reject_expression_statement(&mut self, target: &Expr) {
        let span = match self.peek() {
            Some(token) => target.span.merge(&Span::from(token.span.clone())),
            None => target.span,
        };
        self.errors.push(ParseError::InvalidStatement {
            span,
            message: "expected assignment or call".to_string(),
        });
    }

    // ==================== Labels and GOTO ====================

    /// Returns true if the current tokens form a label (`name:` alone on its line).
    fn at_label(&self) -> bool {
        self.check_ahead(1, &TokenKind::Colon)
            && matches!(
                self.peek_ahead(2).map(|t| &t.kind),
                None | Some(TokenKind::Newline)
            )
    }

    fn parse_label(&mut self) -> Result<Statement, ()> {
        let start = self.current;
        let name = self.advance().expect("label name").text.clone();
        self.advance(); // consume ':'
        Ok(self.finish(StatementKind::Label { name }, start))
    }

    fn parse_goto(&mut self) -> Result<Statement, ()> {
        let start = self.current;
        self.advance(); // consume GOTO
        let label = self.expect(&TokenKind::Identifier, "label name")?.text.clone();
        Ok(self.finish(StatementKind::Goto { label }, start))
    }

    // ==================== RETURN / EXIT / END ====================

    fn parse_return(&mut self) -> Result<Statement, ()> {
        let start = self.current;
        self.advance(); // consume RETURN

        let value = if self.at_statement_end() {
            None
        } else {
            Some(self.parse_expression()?)
        };

        Ok(self.finish(StatementKind::Return { value }, start))
    }

    /// Parses `exit for`, `exit while` or `exitwhile`.
    fn parse_exit(&mut self) -> Result<Statement, ()> {
        let start = self.current;
        if self.match_token(&TokenKind::ExitWhile) {
            return Ok(self.finish(
                StatementKind::Exit {
                    exit_type: ExitType::While,
                },
                start,
            ));
        }

        self.advance(); // consume EXIT
        let exit_type = if self.match_token(&TokenKind::For) {
            ExitType::For
        } else if self.match_token(&TokenKind::While) {
            ExitType::While
        } else {
            self.error_expected("FOR or WHILE after EXIT");
            return Err(());
        };

        Ok(self.finish(StatementKind::Exit { exit_type }, start))
    }

    /// Parses a bare `end`. Block terminators reaching here have no opener.
    fn parse_end(&mut self) -> Result<Statement, ()> {
        let start = self.current;
        let span = self.token_span(start);
        self.advance(); // consume END

        if let Some(next) = self.peek()
            && matches!(
                next.kind,
                TokenKind::If
                    | TokenKind::For
                    | TokenKind::While
                    | TokenKind::Sub
                    | TokenKind::Function
            )
        {
            let message = format!("`end {}` without a matching opener", next.text);
            self.errors
                .push(ParseError::syntax(message, span.merge(&Span::from(next.span.clone()))));
            return Err(());
        }

        Ok(self.finish(StatementKind::End, start))
    }

    /// Parses a statement consisting of a single keyword (`stop`).
    fn parse_keyword_statement(&mut self, kind: StatementKind) -> Result<Statement, ()> {
        let start = self.current;
        self.advance();
        Ok(self.finish(kind, start))
    }

    // ==================== DIM / LIBRARY ====================

    /// Parses `dim name[d1, d2, ...]`.
    fn parse_dim(&mut self) -> Result<Statement, ()> {
        let start = self.current;
        self.advance(); // consume DIM

        let name = self.expect(&TokenKind::Identifier, "array name")?.text.clone();
        self.expect(&TokenKind::LeftBracket, "[")?;

        let mut dimensions = vec![self.parse_expression()?];
        while self.match_token(&TokenKind::Comma) {
            dimensions.push(self.parse_expression()?);
        }
        self.expect(&TokenKind::RightBracket, "]")?;

        Ok(self.finish(StatementKind::Dim { name, dimensions }, start))
    }

    /// Parses `library "path"`.
    fn parse_library(&mut self) -> Result<Statement, ()> {
        let start = self.current;
        self.advance(); // consume LIBRARY

        let text = self
            .expect(&TokenKind::StringLiteral, "library path string")?
            .text
            .clone();
        let path = unquote(&text);

        Ok(self.finish(StatementKind::Library { path }, start))
    }

    /// Wraps `kind` in a statement covering the tokens from `start` to here.
    pub(super) fn finish(&self, kind: StatementKind, start: usize) -> Statement {
        let (span, location) = self.extent_from(start);
        Statement::new(kind, span, location)
    }
}

/// Maps an assignment token to its operator.
fn assign_op(kind: &TokenKind) -> Option<AssignOp> {
    let op = match kind {
        TokenKind::Equals => AssignOp::Assign,
        TokenKind::PlusEquals => AssignOp::Add,
        TokenKind::MinusEquals => AssignOp::Subtract,
        TokenKind::StarEquals => AssignOp::Multiply,
        TokenKind::SlashEquals => AssignOp::Divide,
        TokenKind::BackslashEquals => AssignOp::IntDivide,
        TokenKind::ShiftLeftEquals => AssignOp::ShiftLeft,
        TokenKind::ShiftRightEquals => AssignOp::ShiftRight,
        _ => return None,
    };
    Some(op)
}

/// Strips the surrounding quotes from a string literal and unescapes `""`.
pub(super) fn unquote(text: &str) -> String {
    let inner = text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(text);
    inner.replace("\"\"", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    fn first_kind(source: &str) -> StatementKind {
        parse_source(source).unwrap().statements.remove(0).kind
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote(r#""plain""#), "plain");
        assert_eq!(unquote(r#""say ""hi""""#), r#"say "hi""#);
    }

    #[test]
    fn test_print_with_separators() {
        match first_kind(r#"? "a"; b, c"#) {
            StatementKind::Print { values } => {
                assert_eq!(values.len(), 3);
                assert_eq!(values[0].separator, Some(PrintSeparator::Semicolon));
                assert_eq!(values[1].separator, Some(PrintSeparator::Comma));
                assert_eq!(values[2].separator, None);
            }
            other => panic!("expected print, got {:?}", other),
        }
    }

    #[test]
    fn test_compound_assignment() {
        match first_kind("total += 5") {
            StatementKind::Assignment { name, operator, .. } => {
                assert_eq!(name, "total");
                assert_eq!(operator, AssignOp::Add);
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_increment_member() {
        match first_kind("m.count--") {
            StatementKind::Increment { target, decrement } => {
                assert!(decrement);
                assert!(matches!(target.kind, ExprKind::Member { .. }));
            }
            other => panic!("expected increment, got {:?}", other),
        }
    }

    #[test]
    fn test_label_and_goto() {
        let program = parse_source("retry:\n  goto retry").unwrap();
        assert!(matches!(
            &program.statements[0].kind,
            StatementKind::Label { name } if name == "retry"
        ));
        assert!(matches!(
            &program.statements[1].kind,
            StatementKind::Goto { label } if label == "retry"
        ));
    }

    #[test]
    fn test_exit_forms() {
        assert!(matches!(
            first_kind("exit while"),
            StatementKind::Exit {
                exit_type: ExitType::While
            }
        ));
        assert!(matches!(
            first_kind("exitwhile"),
            StatementKind::Exit {
                exit_type: ExitType::While
            }
        ));
        assert!(matches!(
            first_kind("exit for"),
            StatementKind::Exit {
                exit_type: ExitType::For
            }
        ));
    }

    #[test]
    fn test_dim_library_stop_end() {
        assert!(matches!(
            first_kind("dim grid[3, 4]"),
            StatementKind::Dim { ref dimensions, .. } if dimensions.len() == 2
        ));
        assert!(matches!(
            first_kind(r#"library "v30/bslCore.brs""#),
            StatementKind::Library { ref path } if path == "v30/bslCore.brs"
        ));
        assert!(matches!(first_kind("stop"), StatementKind::Stop));
        assert!(matches!(first_kind("end"), StatementKind::End));
    }

    #[test]
    fn test_return_forms() {
        assert!(matches!(
            first_kind("return"),
            StatementKind::Return { value: None }
        ));
        assert!(matches!(
            first_kind("return invalid"),
            StatementKind::Return { value: Some(_) }
        ));
    }

    #[test]
    fn test_stray_end_if_is_error() {
        let errors = parse_source("end if").unwrap_err();
        assert!(matches!(errors[0], ParseError::SyntaxError { .. }));
    }

    #[test]
    fn test_statement_location_spans_line() {
        let program = parse_source("x = 1\n  m.y = foo(2)").unwrap();
        let second = &program.statements[1];
        assert_eq!(second.location.start.line, 2);
        assert_eq!(second.location.start.column, 2);
        assert_eq!(second.location.end.column, 14);
    }
}
