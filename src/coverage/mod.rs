//! Line and branch coverage instrumentation.
//!
//! The engine works on physical source lines:
//!
//! ```text
//! &[Statement] → classify → VisitableLineMap
//!                                  ↓
//!           source text → LineRewriter → RewrittenSource { text, coverage }
//!                                  ↓
//!                         CoverageRegistry → GlueEmitter → runtime component
//! ```
//!
//! - [`classifier`] decides which line belongs to which statement
//! - [`rewriter`] injects reporting calls and builds the per-file coverage map
//! - [`registry`] accumulates per-file maps and logical paths for a run
//! - [`glue`] renders the per-file footer and the runtime component
//! - [`template`] is the `#NAME#` placeholder renderer the glue uses
//!
//! # Example
//!
//! ```
//! use brscov::coverage::{classify, CoverageLineKind, FileId, LineRewriter};
//! use brscov::parser::parse_source;
//!
//! let source = "x = 1";
//! let program = parse_source(source).unwrap();
//! let lines = classify(&program.statements);
//!
//! let rewritten = LineRewriter::new(FileId::FIRST, "RBS_CC").rewrite(source, &lines);
//! assert_eq!(rewritten.text, "RBS_CC_1_reportLine(0, 1): x = 1\n");
//! assert_eq!(rewritten.coverage.get(0), Some(CoverageLineKind::Code));
//! ```

mod classifier;
mod glue;
mod registry;
mod rewriter;
mod template;

pub use classifier::{VisitableLine, VisitableLineMap, classify};
pub use glue::{
    COMPONENT_BRS, COMPONENT_DIR, COMPONENT_XML, FOOTER_TEMPLATE, GeneratedFile, GlueEmitter,
    SceneGraphGlue,
};
pub use registry::CoverageRegistry;
pub use rewriter::{LineRewriter, RewrittenSource, split_lines};
pub use template::Template;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// Prefix of generated reporting-call names unless configured otherwise.
pub const DEFAULT_REPORT_PREFIX: &str = "RBS_CC";

/// How a physical line is covered.
///
/// The numeric codes are passed to reporting calls at runtime and appear as
/// values in the serialized expected-coverage map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum CoverageLineKind {
    /// Nothing on the line can be instrumented.
    NoCode = 0,
    /// Plain statement.
    Code = 1,
    /// Branch condition.
    Condition = 2,
}

impl CoverageLineKind {
    /// The code passed as `kindCode` to reporting calls.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for CoverageLineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CoverageLineKind::NoCode => "no code",
            CoverageLineKind::Code => "code",
            CoverageLineKind::Condition => "condition",
        };
        f.write_str(name)
    }
}

impl Serialize for CoverageLineKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Sequential identifier of an instrumented file within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FileId(u32);

impl FileId {
    /// The identifier of the first file of a run.
    pub const FIRST: FileId = FileId(1);

    /// The identifier following this one.
    pub fn next(self) -> FileId {
        FileId(self.0 + 1)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Line → kind for every Code or Condition line of one file.
///
/// Lines are zero-based. NoCode lines never appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FileCoverageMap(BTreeMap<usize, CoverageLineKind>);

impl FileCoverageMap {
    pub(crate) fn insert(&mut self, line: usize, kind: CoverageLineKind) {
        if kind != CoverageLineKind::NoCode {
            self.0.insert(line, kind);
        }
    }

    /// The kind recorded for `line`, if it is visitable.
    pub fn get(&self, line: usize) -> Option<CoverageLineKind> {
        self.0.get(&line).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in ascending line order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, CoverageLineKind)> + '_ {
        self.0.iter().map(|(line, kind)| (*line, *kind))
    }

    /// Number of lines of the given kind.
    pub fn count(&self, kind: CoverageLineKind) -> usize {
        self.0.values().filter(|k| **k == kind).count()
    }
}

impl FromIterator<(usize, CoverageLineKind)> for FileCoverageMap {
    fn from_iter<I: IntoIterator<Item = (usize, CoverageLineKind)>>(iter: I) -> Self {
        let mut map = FileCoverageMap::default();
        for (line, kind) in iter {
            map.insert(line, kind);
        }
        map
    }
}
