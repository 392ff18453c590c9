//! Parser for BrightScript.
//!
//! The parser transforms a stream of tokens into an Abstract Syntax Tree (AST).
//! It uses recursive descent for statements and Pratt parsing (precedence climbing)
//! for expressions.
//!
//! # Example
//!
//! ```
//! use brscov::lexer::lex;
//! use brscov::parser::Parser;
//!
//! let source = r#"
//! sub main()
//!     print "Hello, World!"
//!     x = 1 + 2
//! end sub
//! "#;
//!
//! let tokens = lex(source);
//! let mut parser = Parser::new(&tokens);
//! let program = parser.parse().expect("parse failed");
//!
//! assert_eq!(program.statements.len(), 1);
//! ```
//!
//! # Module Structure
//!
//! - [`tokens`] - Token navigation utilities (peek, advance, match, expect)
//! - [`expressions`] - Pratt parser for expressions
//! - [`statements`] - Statement dispatcher and simple statements
//! - [`control_flow`] - IF/FOR/FOR EACH/WHILE parsing
//! - [`procedures`] - FUNCTION/SUB declarations and parameter lists
//! - [`directives`] - `#if`/`#const`/`#error` conditional compilation
//! - [`error`] - Parse error types
//!
//! # Error Recovery
//!
//! The parser attempts to recover from errors and continue parsing to report
//! multiple errors at once.

mod control_flow;
mod directives;
mod error;
mod expressions;
mod procedures;
mod statements;
mod tokens;

pub use error::ParseError;

use crate::ast::Program;
use crate::lexer::{Token, TokenKind, lex};

/// Parser for BrightScript source code.
///
/// The parser consumes a slice of tokens and produces an AST.
/// Errors are collected and returned at the end rather than failing immediately.
pub struct Parser<'a> {
    /// The tokens to parse.
    tokens: &'a [Token],
    /// Current position in the token stream.
    current: usize,
    /// Collected parse errors.
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given tokens.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            current: 0,
            errors: Vec::new(),
        }
    }

    /// Parses the token stream into a program AST.
    ///
    /// Returns the program if successful, or the collected errors if parsing failed.
    pub fn parse(&mut self) -> Result<Program, Vec<ParseError>> {
        self.report_invalid_characters();
        let statements = self.parse_program();

        if self.errors.is_empty() {
            Ok(Program::new(statements))
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }

    /// Parses a complete file (sequence of statements).
    fn parse_program(&mut self) -> Vec<crate::ast::Statement> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            self.skip_separators();

            if self.is_at_end() {
                break;
            }

            match self.parse_statement() {
                Ok(stmt) => {
                    statements.push(stmt);
                    if !self.at_statement_end() {
                        self.error_expected_statement_end();
                        self.synchronize();
                    }
                }
                Err(()) => {
                    // Error already recorded; try to recover
                    self.synchronize();
                }
            }
        }

        statements
    }

    /// Records an error for every character the lexer could not match.
    fn report_invalid_characters(&mut self) {
        let invalid = self
            .tokens
            .iter()
            .filter(|token| token.kind == TokenKind::Unknown)
            .map(|token| ParseError::InvalidCharacter {
                span: token.span.clone().into(),
                text: token.text.clone(),
            });
        self.errors.extend(invalid);
    }
}

/// Lexes and parses `source` in one step.
///
/// # Example
///
/// ```
/// let program = brscov::parser::parse_source("x = 1").unwrap();
/// assert_eq!(program.statements.len(), 1);
/// ```
pub fn parse_source(source: &str) -> Result<Program, Vec<ParseError>> {
    let tokens = lex(source);
    Parser::new(&tokens).parse()
}

/// Operator precedence levels for Pratt parsing.
///
/// Higher values mean higher precedence (bind tighter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub(crate) enum Precedence {
    Lowest = 0,
    Or = 1,             // OR
    And = 2,            // AND
    Not = 3,            // NOT (handled as unary)
    Comparison = 4,     // =, <>, <, >, <=, >=
    Shift = 5,          // <<, >>
    Additive = 6,       // +, -
    Multiplicative = 7, // *, /, \, MOD
    Unary = 8,          // - (negation)
    Power = 9,          // ^
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ExprKind, StatementKind};

    fn parse(source: &str) -> Result<Program, Vec<ParseError>> {
        parse_source(source)
    }

    fn body_of(program: &Program) -> &[crate::ast::Statement] {
        match &program.statements[0].kind {
            StatementKind::Function { func, .. } => &func.body,
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_character_is_an_error() {
        let errors = parse("x = `y`").unwrap_err();
        match &errors[0] {
            ParseError::InvalidCharacter { span, text } => {
                assert_eq!(text, "`");
                assert_eq!(span.start, 4);
            }
            other => panic!("expected invalid character, got {:?}", other),
        }
        // the error must not hide behind an otherwise valid statement
        assert!(parse("print 1 `").is_err());
    }

    #[test]
    fn test_parse_assignment() {
        let program = parse("x = 5").unwrap();
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(
            program.statements[0].kind,
            StatementKind::Assignment { .. }
        ));
    }

    #[test]
    fn test_parse_function_declaration() {
        let program = parse(
            r#"
function add(a as integer, b = 2 as integer) as integer
    return a + b
end function
"#,
        )
        .unwrap();
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0].kind {
            StatementKind::Function { name, func } => {
                assert_eq!(name, "add");
                assert_eq!(func.params.len(), 2);
                assert!(func.params[1].default.is_some());
                assert_eq!(func.return_type.as_deref(), Some("integer"));
                assert_eq!(func.body.len(), 1);
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_if_single_line() {
        let program = parse("if x > 0 then print x else print -x").unwrap();
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0].kind {
            StatementKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                assert_eq!(then_branch.len(), 1);
                assert_eq!(else_branch.as_ref().map(Vec::len), Some(1));
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_block_if_with_else_ifs() {
        let program = parse(
            r#"sub main()
    if a = 1 then
        x = 1
    else if a = 2 then
        x = 2
    elseif a = 3
        x = 3
    else
        x = 4
    end if
end sub
"#,
        )
        .unwrap();
        match &body_of(&program)[0].kind {
            StatementKind::If {
                else_ifs,
                else_branch,
                ..
            } => {
                assert_eq!(else_ifs.len(), 2);
                let first = else_ifs[0].keyword_location.unwrap();
                assert_eq!(first.start.line, 4);
                assert_eq!(first.start.column, 4);
                let second = else_ifs[1].keyword_location.unwrap();
                assert_eq!(second.start.line, 6);
                assert!(else_branch.is_some());
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_condition_columns() {
        let program = parse("if x > 1 then\n  y = 2\nend if").unwrap();
        match &program.statements[0].kind {
            StatementKind::If { condition, .. } => {
                assert_eq!(condition.location.start.column, 3);
                assert_eq!(condition.location.end.column, 8);
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_loops() {
        let program = parse(
            r#"sub main()
    for i = 0 to 10 step 2
        print i
    end for
    for each item in m.items
        print item
    next
    while x < 5
        x++
    end while
end sub
"#,
        )
        .unwrap();
        let body = body_of(&program);
        assert!(matches!(body[0].kind, StatementKind::For { .. }));
        assert!(matches!(body[1].kind, StatementKind::ForEach { .. }));
        assert!(matches!(body[2].kind, StatementKind::While { .. }));
    }

    #[test]
    fn test_parse_member_and_indexed_assignment() {
        let program = parse("m.top.visible = true\nitems[0] += 1\nm.list[2].title = \"x\"").unwrap();
        assert!(matches!(
            program.statements[0].kind,
            StatementKind::DottedSet { .. }
        ));
        assert!(matches!(
            program.statements[1].kind,
            StatementKind::IndexedSet { .. }
        ));
        assert!(matches!(
            program.statements[2].kind,
            StatementKind::DottedSet { .. }
        ));
    }

    #[test]
    fn test_parse_call_statement() {
        let program = parse("m.top.setFocus(true)").unwrap();
        match &program.statements[0].kind {
            StatementKind::Expression(expr) => {
                assert!(matches!(expr.kind, ExprKind::Call { .. }));
            }
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_colon_separated_statements() {
        let program = parse("a = 1 : b = 2 : print a").unwrap();
        assert_eq!(program.statements.len(), 3);
    }

    #[test]
    fn test_parse_multiline_literals() {
        let program = parse(
            r#"config = {
    name: "test"
    "size": [1, 2,
        3]
    callback: function(x)
        return x * 2
    end function
}
"#,
        )
        .unwrap();
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0].kind {
            StatementKind::Assignment { value, .. } => match &value.kind {
                ExprKind::AssocArrayLiteral(entries) => assert_eq!(entries.len(), 3),
                other => panic!("expected assoc array, got {:?}", other),
            },
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_end_if() {
        let result = parse("if x then\n  y = 1\n");
        let errors = result.unwrap_err();
        assert!(matches!(errors[0], ParseError::MissingEndIf { .. }));
    }

    #[test]
    fn test_parse_unterminated_string() {
        let result = parse(r#"print "Hello"#);
        let errors = result.unwrap_err();
        assert!(matches!(errors[0], ParseError::UnterminatedString { .. }));
    }

    #[test]
    fn test_parse_rejects_bare_expression() {
        assert!(parse("x + 1").is_err());
    }

    #[test]
    fn test_parse_rejects_trailing_tokens() {
        assert!(parse("x = 1 y = 2").is_err());
    }
}
