//! Abstract Syntax Tree (AST) definitions for BrightScript.
//!
//! The AST represents the hierarchical structure of a BrightScript file after
//! parsing. Each node in the tree corresponds to a syntactic construct in the
//! source code.
//!
//! # Structure
//!
//! ```text
//! Program
//! └── Vec<Statement>
//!     ├── Function { name, func: FunctionDecl { body, .. } }
//!     ├── If { condition: Expr, then_branch, else_ifs, else_branch }
//!     ├── Assignment { name, operator, value: Expr }
//!     └── ...
//! ```
//!
//! # Design Decisions
//!
//! - **Owned nodes**: AST nodes own their children (no lifetimes), so the tree
//!   can outlive the token stream.
//! - **Span and Location on every node**: byte spans for slicing, line/column
//!   locations for the coverage engine, which works on physical lines.

mod expr;
mod stmt;

pub use expr::*;
pub use stmt::*;

/// A span representing a range in the source text.
///
/// Spans are byte offsets from the start of the source, matching the lexer's spans.
///
/// # Example
///
/// ```
/// use brscov::ast::Span;
///
/// let span = Span::new(0, 5);
/// assert_eq!(span.start, 0);
/// assert_eq!(span.end, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the start of the span (inclusive).
    pub start: usize,
    /// Byte offset of the end of the span (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span from start to end byte offsets.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Creates a span that covers both `self` and `other`.
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

/// A line/column position in the source text.
///
/// Lines are 1-based, columns are 0-based byte offsets into the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The zero-based physical line index of this position.
    pub fn line_index(&self) -> usize {
        self.line.saturating_sub(1)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column + 1)
    }
}

/// Start and (exclusive) end position of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

impl Location {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Creates a location that covers both `self` and `other`.
    pub fn merge(&self, other: &Location) -> Location {
        Location {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Returns true if the node starts and ends on the same physical line.
    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

/// Maps byte offsets to line/column positions.
///
/// Built once per source text; lookups are a binary search over line starts.
///
/// # Example
///
/// ```
/// use brscov::ast::{LineIndex, Position};
///
/// let index = LineIndex::new("a = 1\nb = 2");
/// assert_eq!(index.position(6), Position::new(2, 0));
/// ```
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset at which each line starts. Always contains 0.
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    /// Converts a byte offset into a position.
    pub fn position(&self, offset: usize) -> Position {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        Position::new(line, offset - line_start)
    }

    /// Number of lines in the source (a trailing newline starts an empty line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// A complete BrightScript file.
#[derive(Debug, Clone)]
pub struct Program {
    /// The top-level statements (usually function and sub declarations).
    pub statements: Vec<Statement>,
}

impl Program {
    /// Creates a new program with the given statements.
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}
