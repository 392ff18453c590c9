//! Injects reporting calls into source lines.
//!
//! Each line is rewritten from its original text according to its owner:
//!
//! | Owner            | Kind      | Rewritten line                                   |
//! |------------------|-----------|--------------------------------------------------|
//! | none             | NoCode    | unchanged                                        |
//! | `if` statement   | Condition | `<before> <call> and (<condition>) <after>`      |
//! | `else if` header | Condition | unchanged                                        |
//! | other statement  | Code      | `<call>: <line>`                                 |
//!
//! Conjoining the call with the condition keeps the branch outcome intact,
//! since the call always returns true.

use log::{debug, warn};

use crate::ast::{Expr, StatementKind};

use super::{CoverageLineKind, FileCoverageMap, FileId, VisitableLine, VisitableLineMap};

/// Result of rewriting one file.
#[derive(Debug, Clone)]
pub struct RewrittenSource {
    /// Rewritten text; every line ends with exactly one `\n`.
    pub text: String,
    /// Kind of every Code or Condition line.
    pub coverage: FileCoverageMap,
}

/// Rewrites the lines of one file.
#[derive(Debug, Clone)]
pub struct LineRewriter {
    file_id: FileId,
    prefix: String,
}

impl LineRewriter {
    pub fn new(file_id: FileId, prefix: impl Into<String>) -> Self {
        Self {
            file_id,
            prefix: prefix.into(),
        }
    }

    /// The reporting call for `line`: `<prefix>_<fileId>_reportLine(<line>, <kindCode>)`.
    pub fn report_call(&self, line: usize, kind: CoverageLineKind) -> String {
        format!(
            "{}_{}_reportLine({}, {})",
            self.prefix,
            self.file_id,
            line,
            kind.code()
        )
    }

    /// Rewrites `source` using the line owners in `lines`.
    pub fn rewrite(&self, source: &str, lines: &VisitableLineMap<'_>) -> RewrittenSource {
        let mut text = String::with_capacity(source.len() * 2);
        let mut coverage = FileCoverageMap::default();

        for (number, line) in split_lines(source).enumerate() {
            let (kind, rewritten) = match lines.get(number) {
                None => (CoverageLineKind::NoCode, None),
                Some(VisitableLine::ElseIfHeader(_)) => {
                    debug!("line {}: else-if header recorded without instrumentation", number);
                    (CoverageLineKind::Condition, None)
                }
                Some(VisitableLine::Statement(statement)) => match &statement.kind {
                    StatementKind::If { condition, .. } => (
                        CoverageLineKind::Condition,
                        self.instrument_condition(number, line, condition),
                    ),
                    _ => {
                        let call = self.report_call(number, CoverageLineKind::Code);
                        (CoverageLineKind::Code, Some(format!("{}: {}", call, line)))
                    }
                },
            };

            text.push_str(rewritten.as_deref().unwrap_or(line));
            text.push('\n');
            coverage.insert(number, kind);
        }

        RewrittenSource { text, coverage }
    }

    /// Conjoins the reporting call with the condition on `line`.
    ///
    /// Returns `None` when the condition does not sit entirely on this line.
    fn instrument_condition(&self, number: usize, line: &str, condition: &Expr) -> Option<String> {
        let location = condition.location;
        if !location.is_single_line() || location.start.line_index() != number {
            warn!(
                "line {}: condition spans lines {}-{}, recorded but not instrumented",
                number, location.start.line, location.end.line
            );
            return None;
        }

        let start = location.start.column.min(line.len());
        let end = location.end.column.min(line.len());
        let (Some(before), Some(condition_text), Some(after)) =
            (line.get(..start), line.get(start..end), line.get(end..))
        else {
            warn!("line {}: condition columns {}..{} are not valid", number, start, end);
            return None;
        };

        let call = self.report_call(number, CoverageLineKind::Condition);
        Some(format!("{} {} and ({}) {}", before, call, condition_text, after))
    }
}

/// Splits text into physical lines on `\n` or `\r\n`.
///
/// A trailing line break yields a final empty line.
pub fn split_lines(source: &str) -> impl Iterator<Item = &str> {
    source
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}
