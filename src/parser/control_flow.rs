//! Control flow statement parsing.
//!
//! This module handles parsing of control flow constructs:
//! - IF/THEN/ELSE IF/ELSE/END IF, in both block and single-line form
//! - FOR/TO/STEP and FOR EACH/IN loops, closed by END FOR or NEXT
//! - WHILE/END WHILE loops
//!
//! It also owns [`Parser::parse_block`], the shared loop that collects the
//! statements of any block up to its terminator.

use crate::ast::{ElseIfClause, Statement, StatementKind};
use crate::lexer::TokenKind;

use super::{ParseError, Parser};

impl<'a> Parser<'a> {
    // ==================== Blocks ====================

    /// Parses statements until `is_end` reports a terminator or input runs out.
    ///
    /// The terminator itself is left for the caller to consume.
    pub(super) fn parse_block(&mut self, is_end: fn(&Self) -> bool) -> Result<Vec<Statement>, ()> {
        let mut body = Vec::new();

        loop {
            self.skip_separators();
            if self.is_at_end() || is_end(self) {
                break;
            }

            body.push(self.parse_statement()?);

            if !self.at_statement_end() {
                self.error_expected_statement_end();
                return Err(());
            }
        }

        Ok(body)
    }

    // ==================== IF Statement ====================

    /// Parses an IF statement.
    pub(super) fn parse_if(&mut self) -> Result<Statement, ()> {
        let start = self.current;
        self.advance(); // consume IF

        let condition = self.parse_expression()?;
        let has_then = self.match_token(&TokenKind::Then);

        // Anything on the same line after the condition makes this a single-line IF
        let block_form = matches!(
            self.peek_kind(),
            None | Some(TokenKind::Newline | TokenKind::Colon)
        );
        if !block_form {
            if !has_then {
                self.error_expected("THEN");
                return Err(());
            }
            return self.parse_single_line_if(start, condition);
        }

        let then_branch = self.parse_block(Self::at_if_branch_end)?;

        let mut else_ifs = Vec::new();
        while self.check_else_if() {
            else_ifs.push(self.parse_else_if_clause()?);
        }

        let else_branch = if self.match_token(&TokenKind::Else) {
            Some(self.parse_block(Self::check_end_if)?)
        } else {
            None
        };

        self.expect_end_if(start)?;

        Ok(self.finish(
            StatementKind::If {
                condition,
                then_branch,
                else_ifs,
                else_branch,
            },
            start,
        ))
    }

    /// Parses the rest of `if cond then stmt [: stmt] [else stmt [: stmt]]`.
    fn parse_single_line_if(
        &mut self,
        start: usize,
        condition: crate::ast::Expr,
    ) -> Result<Statement, ()> {
        let then_branch = self.parse_inline_statements()?;

        let else_branch = if self.check(&TokenKind::Else) || self.check(&TokenKind::ElseIf) {
            if self.check(&TokenKind::ElseIf) {
                // `elseif` on one line behaves like `else if`
                Some(vec![self.parse_if_from_elseif()?])
            } else {
                self.advance(); // consume ELSE
                Some(self.parse_inline_statements()?)
            }
        } else {
            None
        };

        Ok(self.finish(
            StatementKind::If {
                condition,
                then_branch,
                else_ifs: Vec::new(),
                else_branch,
            },
            start,
        ))
    }

    /// Parses `elseif cond then ...` on a single line as a nested IF.
    fn parse_if_from_elseif(&mut self) -> Result<Statement, ()> {
        let start = self.current;
        self.advance(); // consume ELSEIF
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::Then, "THEN")?;
        self.parse_single_line_if(start, condition)
    }

    /// Parses colon-separated statements up to the end of the line or an ELSE.
    fn parse_inline_statements(&mut self) -> Result<Vec<Statement>, ()> {
        let mut statements = vec![self.parse_statement()?];

        while self.check(&TokenKind::Colon) {
            self.advance();
            if matches!(
                self.peek_kind(),
                None | Some(TokenKind::Newline | TokenKind::Else | TokenKind::ElseIf)
            ) {
                break;
            }
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// Parses one `else if cond [then]` / `elseif cond [then]` clause and its block.
    fn parse_else_if_clause(&mut self) -> Result<ElseIfClause, ()> {
        let keyword_start = self.current;
        if !self.match_token(&TokenKind::ElseIf) {
            self.advance(); // consume ELSE
            self.advance(); // consume IF
        }
        let (_, keyword_location) = self.extent_from(keyword_start);

        let condition = self.parse_expression()?;
        self.match_token(&TokenKind::Then);

        let then_branch = self.parse_block(Self::at_if_branch_end)?;

        Ok(ElseIfClause {
            condition,
            then_branch,
            keyword_location: Some(keyword_location),
        })
    }

    /// Returns true at any token that closes an IF branch.
    fn at_if_branch_end(&self) -> bool {
        self.check_else_if() || self.check(&TokenKind::Else) || self.check_end_if()
    }

    /// Checks for `else if` (two words) or `elseif`.
    pub(super) fn check_else_if(&self) -> bool {
        self.check(&TokenKind::ElseIf)
            || (self.check(&TokenKind::Else) && self.check_ahead(1, &TokenKind::If))
    }

    /// Checks for END IF (handles both "END IF" and "ENDIF").
    pub(super) fn check_end_if(&self) -> bool {
        self.check(&TokenKind::EndIf)
            || (self.check(&TokenKind::End) && self.check_ahead(1, &TokenKind::If))
    }

    /// Expects END IF, reporting a missing terminator against the opening IF.
    fn expect_end_if(&mut self, if_start: usize) -> Result<(), ()> {
        if self.match_token(&TokenKind::EndIf) {
            return Ok(());
        }
        if self.check_end_if() {
            self.advance();
            self.advance();
            return Ok(());
        }
        if self.is_at_end() {
            let if_span = self.token_span(if_start);
            self.errors.push(ParseError::MissingEndIf { if_span });
        } else {
            self.error_expected("END IF");
        }
        Err(())
    }

    // ==================== FOR Loops ====================

    /// Parses a FOR or FOR EACH loop.
    pub(super) fn parse_for(&mut self) -> Result<Statement, ()> {
        let start = self.current;
        self.advance(); // consume FOR

        if self.match_token(&TokenKind::Each) {
            return self.parse_for_each(start);
        }

        let counter = self
            .expect(&TokenKind::Identifier, "loop variable")?
            .text
            .clone();
        self.expect(&TokenKind::Equals, "=")?;
        let start_value = self.parse_expression()?;
        self.expect(&TokenKind::To, "TO")?;
        let end = self.parse_expression()?;

        let step = if self.match_token(&TokenKind::Step) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let body = self.parse_block(Self::check_end_for)?;
        self.expect_end_for(start)?;

        Ok(self.finish(
            StatementKind::For {
                counter,
                start: start_value,
                end,
                step,
                body,
            },
            start,
        ))
    }

    /// Parses the remainder of `for each item in target`.
    fn parse_for_each(&mut self, start: usize) -> Result<Statement, ()> {
        let item = self
            .expect(&TokenKind::Identifier, "loop variable")?
            .text
            .clone();
        self.expect(&TokenKind::In, "IN")?;
        let target = self.parse_expression()?;

        let body = self.parse_block(Self::check_end_for)?;
        self.expect_end_for(start)?;

        Ok(self.finish(StatementKind::ForEach { item, target, body }, start))
    }

    /// Checks for END FOR, ENDFOR or NEXT.
    pub(super) fn check_end_for(&self) -> bool {
        self.check(&TokenKind::EndFor)
            || self.check(&TokenKind::Next)
            || (self.check(&TokenKind::End) && self.check_ahead(1, &TokenKind::For))
    }

    /// Expects a FOR terminator. `next` may name its loop variable.
    fn expect_end_for(&mut self, for_start: usize) -> Result<(), ()> {
        if self.match_token(&TokenKind::EndFor) {
            return Ok(());
        }
        if self.match_token(&TokenKind::Next) {
            self.match_token(&TokenKind::Identifier);
            return Ok(());
        }
        if self.check_end_for() {
            self.advance();
            self.advance();
            return Ok(());
        }
        if self.is_at_end() {
            let for_span = self.token_span(for_start);
            self.errors.push(ParseError::MissingEndFor { for_span });
        } else {
            self.error_expected("END FOR");
        }
        Err(())
    }

    // ==================== WHILE Loop ====================

    /// Parses a WHILE loop.
    pub(super) fn parse_while(&mut self) -> Result<Statement, ()> {
        let start = self.current;
        self.advance(); // consume WHILE

        let condition = self.parse_expression()?;
        let body = self.parse_block(Self::check_end_while)?;

        if self.match_token(&TokenKind::EndWhile) {
            // single-word terminator
        } else if self.check_end_while() {
            self.advance();
            self.advance();
        } else {
            if self.is_at_end() {
                let while_span = self.token_span(start);
                self.errors.push(ParseError::MissingEndWhile { while_span });
            } else {
                self.error_expected("END WHILE");
            }
            return Err(());
        }

        Ok(self.finish(StatementKind::While { condition, body }, start))
    }

    /// Checks for END WHILE (handles both "END WHILE" and "ENDWHILE").
    pub(super) fn check_end_while(&self) -> bool {
        self.check(&TokenKind::EndWhile)
            || (self.check(&TokenKind::End) && self.check_ahead(1, &TokenKind::While))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::StatementKind;
    use crate::parser::{ParseError, parse_source};

    #[test]
    fn test_single_line_if_with_colons() {
        let program = parse_source("if ok then a = 1 : b = 2 else c = 3").unwrap();
        match &program.statements[0].kind {
            StatementKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                assert_eq!(then_branch.len(), 2);
                assert_eq!(else_branch.as_ref().map(Vec::len), Some(1));
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_block_if_without_then() {
        let program = parse_source("if ready\n  go()\nendif").unwrap();
        assert!(matches!(
            &program.statements[0].kind,
            StatementKind::If { then_branch, .. } if then_branch.len() == 1
        ));
    }

    #[test]
    fn test_nested_blocks() {
        let source = "for i = 1 to 3\n  while busy\n    if i = 2 then exit while\n  endwhile\nnext i";
        let program = parse_source(source).unwrap();
        match &program.statements[0].kind {
            StatementKind::For { body, .. } => {
                assert!(matches!(body[0].kind, StatementKind::While { .. }));
            }
            other => panic!("expected for, got {:?}", other),
        }
    }

    #[test]
    fn test_if_location_covers_end_if() {
        let program = parse_source("if a then\n  b()\nend if").unwrap();
        let location = program.statements[0].location;
        assert_eq!(location.start.line, 1);
        assert_eq!(location.end.line, 3);
    }

    #[test]
    fn test_missing_loop_terminators() {
        let errors = parse_source("for i = 1 to 2\n  x = i\n").unwrap_err();
        assert!(matches!(errors[0], ParseError::MissingEndFor { .. }));

        let errors = parse_source("while true\n  x = 1\n").unwrap_err();
        assert!(matches!(errors[0], ParseError::MissingEndWhile { .. }));
    }
}
