//! Run-level error types.
//!
//! Any error aborts the run. Parse errors are wrapped with the file they came
//! from and the line/column of each diagnostic, so the binary can print them
//! without re-reading the source.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::ast::{LineIndex, Position};
use crate::parser::ParseError;

/// Result alias used throughout the crate.
pub type Result<T, E = CoverageError> = std::result::Result<T, E>;

/// An error that aborts an instrumentation run.
#[derive(Debug, Error)]
pub enum CoverageError {
    /// Reading or writing a file failed.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file did not parse.
    #[error("{path}: {} parse error(s)", .errors.len())]
    Parse {
        path: String,
        errors: Vec<ParseDiagnostic>,
    },

    /// A source file pattern is not a valid glob.
    #[error("invalid file pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A path matched by a pattern could not be read during discovery.
    #[error(transparent)]
    Glob(#[from] glob::GlobError),

    /// A template was needed but never loaded.
    #[error("template `{0}` is not available")]
    MissingTemplate(String),

    /// A coverage map could not be serialized.
    #[error("failed to serialize coverage data: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The configuration file is unreadable or invalid.
    #[error("invalid configuration {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl CoverageError {
    /// Wraps an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoverageError::Io {
            path: path.into(),
            source,
        }
    }

    /// Wraps the parse errors of `source` (logical path `path`).
    pub fn parse(path: impl Into<String>, source: &str, errors: Vec<ParseError>) -> Self {
        let index = LineIndex::new(source);
        let errors = errors
            .into_iter()
            .map(|error| ParseDiagnostic {
                position: error.span().map(|span| index.position(span.start)),
                error,
            })
            .collect();
        CoverageError::Parse {
            path: path.into(),
            errors,
        }
    }
}

/// A parse error with its resolved line/column.
#[derive(Debug, Clone)]
pub struct ParseDiagnostic {
    /// Where the error starts, when the error carries a span.
    pub position: Option<Position>,
    /// The underlying error.
    pub error: ParseError,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(position) => write!(f, "{}: {}", position, self.error),
            None => write!(f, "{}", self.error),
        }
    }
}
