//! Parser error types.
//!
//! Parse errors capture what went wrong and where, enabling good error messages.
//! The parser collects multiple errors rather than stopping at the first one.

use crate::ast::Span;
use thiserror::Error;

/// A parse error with location and description.
#[derive(Debug, Error, Clone)]
pub enum ParseError {
    /// Expected a specific token but found something else.
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        /// What we expected to find.
        expected: String,
        /// What we actually found.
        found: String,
        /// Location of the unexpected token.
        span: Span,
    },

    /// Reached end of input unexpectedly.
    #[error("unexpected end of file, expected {expected}")]
    UnexpectedEof {
        /// What we expected to find.
        expected: String,
    },

    /// Invalid expression.
    #[error("invalid expression: {message}")]
    InvalidExpression {
        /// Location of the invalid expression.
        span: Span,
        /// Additional context about what went wrong.
        message: String,
    },

    /// Invalid statement.
    #[error("invalid statement: {message}")]
    InvalidStatement {
        /// Location of the invalid statement.
        span: Span,
        /// Description of the problem.
        message: String,
    },

    /// Invalid number literal.
    #[error("invalid number: {message}")]
    InvalidNumber {
        /// Location of the invalid number.
        span: Span,
        /// Description of the problem.
        message: String,
    },

    /// Unterminated string literal.
    #[error("unterminated string literal")]
    UnterminatedString {
        /// Location where the string started.
        span: Span,
    },

    /// A character that starts no BrightScript token.
    #[error("invalid character `{text}`")]
    InvalidCharacter {
        /// Location of the character.
        span: Span,
        /// The offending text.
        text: String,
    },

    /// Missing `#end if` for a `#if` block.
    #[error("missing #END IF")]
    MissingEndDirective {
        /// Location of the `#if` that's missing its `#end if`.
        if_span: Span,
    },

    /// Missing END IF for block IF.
    #[error("missing END IF")]
    MissingEndIf {
        /// Location of the IF that's missing its END IF.
        if_span: Span,
    },

    /// Missing END FOR / NEXT for a FOR or FOR EACH loop.
    #[error("missing END FOR for FOR loop")]
    MissingEndFor {
        /// Location of the FOR that's missing its terminator.
        for_span: Span,
    },

    /// Missing END WHILE for WHILE loop.
    #[error("missing END WHILE for WHILE loop")]
    MissingEndWhile {
        /// Location of the WHILE that's missing its END WHILE.
        while_span: Span,
    },

    /// Missing END FUNCTION / END SUB.
    #[error("missing END {keyword}")]
    MissingEndFunction {
        /// `FUNCTION` or `SUB`.
        keyword: &'static str,
        /// Location of the declaration that's missing its terminator.
        function_span: Span,
    },

    /// General syntax error.
    #[error("{message}")]
    SyntaxError {
        /// Location of the error.
        span: Span,
        /// Description of the problem.
        message: String,
    },
}

impl ParseError {
    /// Returns the span of this error, if available.
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::UnexpectedToken { span, .. } => Some(*span),
            ParseError::UnexpectedEof { .. } => None,
            ParseError::InvalidExpression { span, .. } => Some(*span),
            ParseError::InvalidStatement { span, .. } => Some(*span),
            ParseError::InvalidNumber { span, .. } => Some(*span),
            ParseError::UnterminatedString { span } => Some(*span),
            ParseError::InvalidCharacter { span, .. } => Some(*span),
            ParseError::MissingEndDirective { if_span } => Some(*if_span),
            ParseError::MissingEndIf { if_span } => Some(*if_span),
            ParseError::MissingEndFor { for_span } => Some(*for_span),
            ParseError::MissingEndWhile { while_span } => Some(*while_span),
            ParseError::MissingEndFunction { function_span, .. } => Some(*function_span),
            ParseError::SyntaxError { span, .. } => Some(*span),
        }
    }

    /// Creates an "unexpected token" error.
    pub fn unexpected(expected: impl Into<String>, found: impl Into<String>, span: Span) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            span,
        }
    }

    /// Creates an "unexpected EOF" error.
    pub fn eof(expected: impl Into<String>) -> Self {
        ParseError::UnexpectedEof {
            expected: expected.into(),
        }
    }

    /// Creates a syntax error with a message.
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        ParseError::SyntaxError {
            span,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_span() {
        let err = ParseError::unexpected("then", "`else`", Span::new(10, 14));
        assert_eq!(err.span(), Some(Span::new(10, 14)));
    }

    #[test]
    fn test_eof_error() {
        let err = ParseError::eof("expression");
        assert_eq!(err.span(), None);
        assert!(err.to_string().contains("end of file"));
    }

    #[test]
    fn test_missing_end_function_message() {
        let err = ParseError::MissingEndFunction {
            keyword: "SUB",
            function_span: Span::new(0, 3),
        };
        assert_eq!(err.to_string(), "missing END SUB");
    }
}
