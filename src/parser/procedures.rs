//! Procedure parsing.
//!
//! This module handles named `function`/`sub` declarations and anonymous
//! function expressions, which share one shape ([`FunctionDecl`]):
//!
//! ```text
//! function name(a, b = 1 as integer) as string
//!     ...
//! end function
//! ```

use crate::ast::{FunctionDecl, FunctionKind, Parameter, Statement, StatementKind};
use crate::lexer::TokenKind;

use super::{ParseError, Parser};

impl<'a> Parser<'a> {
    /// Parses a named `function` or `sub` declaration.
    pub(super) fn parse_function_statement(&mut self) -> Result<Statement, ()> {
        let start = self.current;
        let kind = self.consume_function_keyword();

        let name = self.expect(&TokenKind::Identifier, "function name")?.text.clone();
        let func = self.parse_function_rest(kind, start)?;

        Ok(self.finish(StatementKind::Function { name, func }, start))
    }

    /// Consumes `function` or `sub` and reports which one it was.
    pub(super) fn consume_function_keyword(&mut self) -> FunctionKind {
        match self.advance().map(|t| &t.kind) {
            Some(TokenKind::Sub) => FunctionKind::Sub,
            _ => FunctionKind::Function,
        }
    }

    /// Parses everything after the name: parameters, return type, body and
    /// the matching terminator.
    pub(super) fn parse_function_rest(
        &mut self,
        kind: FunctionKind,
        start: usize,
    ) -> Result<FunctionDecl, ()> {
        let params = self.parse_parameter_list()?;

        let return_type = if self.match_token(&TokenKind::As) {
            Some(self.expect_word("return type")?)
        } else {
            None
        };

        let body = match kind {
            FunctionKind::Function => self.parse_block(Self::check_end_function)?,
            FunctionKind::Sub => self.parse_block(Self::check_end_sub)?,
        };
        self.expect_end_function(kind, start)?;

        Ok(FunctionDecl {
            kind,
            params,
            return_type,
            body,
        })
    }

    /// Parses `(name [= default] [as type], ...)`.
    fn parse_parameter_list(&mut self) -> Result<Vec<Parameter>, ()> {
        self.expect(&TokenKind::LeftParen, "(")?;
        let mut params = Vec::new();

        if !self.check(&TokenKind::RightParen) {
            loop {
                params.push(self.parse_parameter()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(&TokenKind::RightParen, ")")?;
        Ok(params)
    }

    fn parse_parameter(&mut self) -> Result<Parameter, ()> {
        let name = self.expect_word("parameter name")?;

        let default = if self.match_token(&TokenKind::Equals) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let type_name = if self.match_token(&TokenKind::As) {
            Some(self.expect_word("type name")?)
        } else {
            None
        };

        Ok(Parameter {
            name,
            default,
            type_name,
        })
    }

    /// Checks for END FUNCTION (handles both "END FUNCTION" and "ENDFUNCTION").
    fn check_end_function(&self) -> bool {
        self.check(&TokenKind::EndFunction)
            || (self.check(&TokenKind::End) && self.check_ahead(1, &TokenKind::Function))
    }

    /// Checks for END SUB (handles both "END SUB" and "ENDSUB").
    fn check_end_sub(&self) -> bool {
        self.check(&TokenKind::EndSub)
            || (self.check(&TokenKind::End) && self.check_ahead(1, &TokenKind::Sub))
    }

    fn expect_end_function(&mut self, kind: FunctionKind, start: usize) -> Result<(), ()> {
        let (single, at_end, keyword) = match kind {
            FunctionKind::Function => (
                TokenKind::EndFunction,
                self.check_end_function(),
                "FUNCTION",
            ),
            FunctionKind::Sub => (TokenKind::EndSub, self.check_end_sub(), "SUB"),
        };

        if self.match_token(&single) {
            return Ok(());
        }
        if at_end {
            self.advance();
            self.advance();
            return Ok(());
        }

        if self.is_at_end() {
            let function_span = self.token_span(start);
            self.errors.push(ParseError::MissingEndFunction {
                keyword,
                function_span,
            });
        } else {
            self.error_expected(&format!("END {}", keyword));
        }
        Err(())
    }
}
