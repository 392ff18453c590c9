//! Maps physical lines to the statements that own them.
//!
//! Statements are visited in document order and each claims the line it
//! starts on. A line keeps its first claimant, so when several statements
//! start on one line the outermost, earliest one owns it: in
//! `for each x in xs : print x : end for` the loop wins the line.
//!
//! Function declarations never claim a line; their bodies do. An `else if`
//! clause claims its keyword line with [`VisitableLine::ElseIfHeader`].

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use log::debug;

use crate::ast::{ElseIfClause, Statement, StatementKind};

/// The owner of a visitable line.
#[derive(Debug, Clone, Copy)]
pub enum VisitableLine<'a> {
    /// A statement starting on the line.
    Statement(&'a Statement),
    /// The `else if` / `elseif` keyword line of an if statement's clause.
    ElseIfHeader(&'a ElseIfClause),
}

/// Zero-based line number → owning node.
#[derive(Debug, Clone, Default)]
pub struct VisitableLineMap<'a> {
    lines: BTreeMap<usize, VisitableLine<'a>>,
}

impl<'a> VisitableLineMap<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `node` as the owner of `line` unless the line is already owned.
    ///
    /// Returns true if the claim succeeded.
    pub fn claim(&mut self, line: usize, node: VisitableLine<'a>) -> bool {
        match self.lines.entry(line) {
            Entry::Vacant(entry) => {
                entry.insert(node);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, line: usize) -> Option<&VisitableLine<'a>> {
        self.lines.get(&line)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Claimed lines in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &VisitableLine<'a>)> {
        self.lines.iter().map(|(line, node)| (*line, node))
    }
}

/// Classifies every line of a parsed file.
pub fn classify(statements: &[Statement]) -> VisitableLineMap<'_> {
    let mut lines = VisitableLineMap::new();
    visit(statements, &mut lines);
    lines
}

fn visit<'a>(statements: &'a [Statement], lines: &mut VisitableLineMap<'a>) {
    for statement in statements {
        let line = statement.location.start.line_index();

        match &statement.kind {
            StatementKind::Function { func, .. } => visit(&func.body, lines),

            StatementKind::If {
                then_branch,
                else_ifs,
                else_branch,
                ..
            } => {
                lines.claim(line, VisitableLine::Statement(statement));
                visit(then_branch, lines);

                for clause in else_ifs {
                    visit(&clause.then_branch, lines);
                    if let Some(keyword) = clause.keyword_location {
                        lines.claim(
                            keyword.start.line_index(),
                            VisitableLine::ElseIfHeader(clause),
                        );
                    }
                }

                if let Some(else_branch) = else_branch {
                    visit(else_branch, lines);
                }
            }

            StatementKind::For { body, .. }
            | StatementKind::ForEach { body, .. }
            | StatementKind::While { body, .. } => {
                lines.claim(line, VisitableLine::Statement(statement));
                visit(body, lines);
            }

            StatementKind::Expression(_)
            | StatementKind::Assignment { .. }
            | StatementKind::DottedSet { .. }
            | StatementKind::IndexedSet { .. }
            | StatementKind::Print { .. }
            | StatementKind::Return { .. } => {
                lines.claim(line, VisitableLine::Statement(statement));
            }

            StatementKind::ConditionalCompile {
                then_branch,
                else_ifs,
                else_branch,
                ..
            } => {
                visit(then_branch, lines);
                for (_, body) in else_ifs {
                    visit(body, lines);
                }
                if let Some(else_branch) = else_branch {
                    visit(else_branch, lines);
                }
            }

            StatementKind::Increment { .. }
            | StatementKind::Directive { .. }
            | StatementKind::Dim { .. }
            | StatementKind::Goto { .. }
            | StatementKind::Label { .. }
            | StatementKind::Exit { .. }
            | StatementKind::End
            | StatementKind::Stop
            | StatementKind::Library { .. } => {
                debug!(
                    "line {}: `{}` statement is not instrumented",
                    line,
                    statement.kind.name()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    fn kind_name(node: &VisitableLine<'_>) -> &'static str {
        match node {
            VisitableLine::ElseIfHeader(_) => "else-if",
            VisitableLine::Statement(stmt) => match stmt.kind {
                StatementKind::If { .. } => "if",
                StatementKind::For { .. } | StatementKind::ForEach { .. } => "for",
                StatementKind::While { .. } => "while",
                _ => "code",
            },
        }
    }

    fn classified(source: &str) -> Vec<(usize, &'static str)> {
        let program = parse_source(source).unwrap();
        let lines = classify(&program.statements);
        let owners: Vec<_> = lines
            .iter()
            .map(|(line, node)| (line, kind_name(node)))
            .collect();
        owners
    }

    #[test]
    fn test_function_body_lines() {
        let lines = classified("sub main()\n  x = 1\n  print x\nend sub");
        assert_eq!(lines, vec![(1, "code"), (2, "code")]);
    }

    #[test]
    fn test_if_else_if_else() {
        let source = "\
if a = 1 then
  x = 1
else if a = 2 then
  x = 2
else
  x = 3
end if";
        let lines = classified(source);
        assert_eq!(
            lines,
            vec![
                (0, "if"),
                (1, "code"),
                (2, "else-if"),
                (3, "code"),
                (5, "code"),
            ]
        );
    }

    #[test]
    fn test_one_line_loop_claims_its_line() {
        let lines = classified("for each x in xs : print x : end for");
        assert_eq!(lines, vec![(0, "for")]);
    }

    #[test]
    fn test_single_line_if_wins_over_branch() {
        let lines = classified("if ok then go() else stop");
        assert_eq!(lines, vec![(0, "if")]);
    }

    #[test]
    fn test_unsupported_statements_are_no_code() {
        let lines = classified("sub main()\n  i++\n  dim a[2]\n  exit while\n  stop\nend sub");
        assert!(lines.is_empty());
    }

    #[test]
    fn test_directive_lines_are_no_code() {
        let source = "\
#const DEBUG = true
sub main()
#if DEBUG
  print 1
#else
  print 2
#end if
end sub";
        assert_eq!(classified(source), vec![(3, "code"), (5, "code")]);
    }

    #[test]
    fn test_first_claim_wins() {
        let program = parse_source("x = 1").unwrap();
        let mut lines = VisitableLineMap::new();
        let stmt = &program.statements[0];
        assert!(lines.claim(0, VisitableLine::Statement(stmt)));
        assert!(!lines.claim(0, VisitableLine::Statement(stmt)));
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let source = "function f(a)\n  if a then\n    return 1\n  end if\n  return 0\nend function";
        assert_eq!(classified(source), classified(source));
    }
}
