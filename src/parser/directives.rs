//! Conditional-compilation directive parsing.
//!
//! This module handles BrightScript's `#` directives:
//! - `#if` / `#else if` / `#elseif` / `#else` / `#end if` / `#endif`
//! - `#const NAME = value`
//! - `#error message`
//!
//! The lexer captures each directive line as one [`TokenKind::Directive`]
//! token. Directives are parsed as part of the regular AST: a `#if` block
//! becomes one statement holding every branch, each parsed as ordinary
//! statements.

use crate::ast::{Statement, StatementKind};
use crate::lexer::TokenKind;

use super::{ParseError, Parser};

/// The directive named by a `#` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirectiveKind {
    If,
    ElseIf,
    Else,
    EndIf,
    Const,
    Error,
}

impl<'a> Parser<'a> {
    // ==================== Dispatch ====================

    /// Parses the directive at the current token.
    pub(super) fn parse_directive(&mut self) -> Result<Statement, ()> {
        let start = self.current;
        let span = self.token_span(start);
        let text = self.advance().expect("directive token").text.clone();
        let (kind, name, args) = split_directive(&text);

        match kind {
            Some(DirectiveKind::If) => self.parse_conditional_compile(start, args),
            Some(DirectiveKind::Const | DirectiveKind::Error) => Ok(self.finish(
                StatementKind::Directive {
                    name: name.to_ascii_lowercase(),
                    args,
                },
                start,
            )),
            Some(DirectiveKind::ElseIf | DirectiveKind::Else | DirectiveKind::EndIf) => {
                self.errors.push(ParseError::syntax(
                    format!("`#{}` without a matching `#if`", name.to_ascii_lowercase()),
                    span,
                ));
                Err(())
            }
            None => {
                self.errors.push(ParseError::InvalidStatement {
                    span,
                    message: format!("unknown directive `#{}`", name),
                });
                Err(())
            }
        }
    }

    // ==================== #if Blocks ====================

    /// Parses the branches of a `#if` block whose opening line is consumed.
    fn parse_conditional_compile(&mut self, start: usize, condition: String) -> Result<Statement, ()> {
        let then_branch = self.parse_block(Self::at_directive_branch_end)?;
        let mut else_ifs = Vec::new();
        let mut else_branch = None;

        loop {
            match self.peek_directive() {
                Some(DirectiveKind::ElseIf) if else_branch.is_none() => {
                    let (_, condition) = self.advance_directive();
                    let body = self.parse_block(Self::at_directive_branch_end)?;
                    else_ifs.push((condition, body));
                }
                Some(DirectiveKind::Else) if else_branch.is_none() => {
                    self.advance();
                    else_branch = Some(self.parse_block(Self::at_directive_branch_end)?);
                }
                Some(DirectiveKind::EndIf) => {
                    self.advance();
                    break;
                }
                Some(_) => {
                    self.error_expected("#end if");
                    return Err(());
                }
                None => {
                    let if_span = self.token_span(start);
                    self.errors.push(ParseError::MissingEndDirective { if_span });
                    return Err(());
                }
            }
        }

        Ok(self.finish(
            StatementKind::ConditionalCompile {
                condition,
                then_branch,
                else_ifs,
                else_branch,
            },
            start,
        ))
    }

    /// Returns true at `#else if`, `#else` or `#end if`.
    fn at_directive_branch_end(&self) -> bool {
        matches!(
            self.peek_directive(),
            Some(DirectiveKind::ElseIf | DirectiveKind::Else | DirectiveKind::EndIf)
        )
    }

    /// The kind of the directive at the current token, if it is one.
    fn peek_directive(&self) -> Option<DirectiveKind> {
        self.peek()
            .filter(|token| token.kind == TokenKind::Directive)
            .and_then(|token| split_directive(&token.text).0)
    }

    /// Consumes a directive token, returning its kind and arguments.
    fn advance_directive(&mut self) -> (Option<DirectiveKind>, String) {
        let text = self.advance().expect("directive token").text.clone();
        let (kind, _, args) = split_directive(&text);
        (kind, args)
    }
}

/// Splits a directive line into its kind, its name as written and its
/// trimmed arguments.
///
/// `#else if` and `#end if` may be written with or without the space.
fn split_directive(text: &str) -> (Option<DirectiveKind>, &str, String) {
    let body = text.trim_start_matches('#').trim_start();
    let name_len = body
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(body.len());
    let (name, rest) = body.split_at(name_len);

    let kind = match name.to_ascii_lowercase().as_str() {
        "if" => Some(DirectiveKind::If),
        "elseif" => Some(DirectiveKind::ElseIf),
        "endif" => Some(DirectiveKind::EndIf),
        "const" => Some(DirectiveKind::Const),
        "error" => Some(DirectiveKind::Error),
        "else" => match strip_if(rest) {
            Some(after) => return (Some(DirectiveKind::ElseIf), name, after.trim().to_string()),
            None => Some(DirectiveKind::Else),
        },
        "end" => match strip_if(rest) {
            Some(after) => return (Some(DirectiveKind::EndIf), name, after.trim().to_string()),
            None => None,
        },
        _ => None,
    };

    (kind, name, rest.trim().to_string())
}

/// Strips a leading ` if` word from `rest`.
fn strip_if(rest: &str) -> Option<&str> {
    let rest = rest.trim_start();
    let word = rest.get(..2)?;
    let after = &rest[2..];
    let ends_word = after
        .chars()
        .next()
        .is_none_or(|c| !c.is_ascii_alphanumeric() && c != '_');
    (word.eq_ignore_ascii_case("if") && ends_word).then_some(after)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    #[test]
    fn test_split_directive() {
        assert_eq!(
            split_directive("#if DEBUG"),
            (Some(DirectiveKind::If), "if", "DEBUG".to_string())
        );
        assert_eq!(split_directive("#Else If not DEBUG\r").0, Some(DirectiveKind::ElseIf));
        assert_eq!(split_directive("#Else If not DEBUG\r").2, "not DEBUG");
        assert_eq!(split_directive("#elseif X").0, Some(DirectiveKind::ElseIf));
        assert_eq!(split_directive("#else").0, Some(DirectiveKind::Else));
        assert_eq!(split_directive("# end if").0, Some(DirectiveKind::EndIf));
        assert_eq!(split_directive("#ENDIF").0, Some(DirectiveKind::EndIf));
        assert_eq!(split_directive("#end iffy").0, None);
        assert_eq!(
            split_directive("#const DEBUG = true"),
            (Some(DirectiveKind::Const), "const", "DEBUG = true".to_string())
        );
        assert_eq!(split_directive("#pragma once").0, None);
    }

    #[test]
    fn test_conditional_compile_block() {
        let source = "\
sub main()
#if DEBUG
  print 1
#else if STAGING
  print 2
#else
  print 3
#end if
end sub";
        let program = parse_source(source).unwrap();
        let StatementKind::Function { func, .. } = &program.statements[0].kind else {
            panic!("expected sub");
        };
        match &func.body[0].kind {
            StatementKind::ConditionalCompile {
                condition,
                then_branch,
                else_ifs,
                else_branch,
            } => {
                assert_eq!(condition, "DEBUG");
                assert_eq!(then_branch.len(), 1);
                assert_eq!(else_ifs.len(), 1);
                assert_eq!(else_ifs[0].0, "STAGING");
                assert_eq!(else_branch.as_ref().map(Vec::len), Some(1));
            }
            other => panic!("expected #if block, got {:?}", other),
        }
        assert_eq!(func.body[0].location.start.line, 2);
        assert_eq!(func.body[0].location.end.line, 8);
    }

    #[test]
    fn test_const_and_error() {
        let program = parse_source("#const DEBUG = true\n#error no\n").unwrap();
        assert!(matches!(
            &program.statements[0].kind,
            StatementKind::Directive { name, args } if name == "const" && args == "DEBUG = true"
        ));
        assert!(matches!(
            &program.statements[1].kind,
            StatementKind::Directive { name, .. } if name == "error"
        ));
    }

    #[test]
    fn test_missing_end_directive() {
        let errors = parse_source("#if DEBUG\nprint 1\n").unwrap_err();
        assert!(matches!(errors[0], ParseError::MissingEndDirective { .. }));
    }

    #[test]
    fn test_stray_and_unknown_directives() {
        let errors = parse_source("#end if\n").unwrap_err();
        assert!(matches!(errors[0], ParseError::SyntaxError { .. }));

        let errors = parse_source("#pragma once\n").unwrap_err();
        assert!(matches!(errors[0], ParseError::InvalidStatement { .. }));
    }
}
