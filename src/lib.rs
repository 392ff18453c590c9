//! # brscov
//!
//! Line and branch coverage instrumentation for BrightScript projects.
//!
//! ## Architecture
//!
//! Every source file of a project goes through the same pipeline:
//!
//! ```text
//! Source (.brs) → Lexer → Parser → AST → Classifier → Rewriter → Instrumented source
//!                                                         ↓
//!                                              Registry → Runtime component
//! ```
//!
//! - [`lexer`] - Tokenizes BrightScript source
//! - [`parser`] - Builds a statement tree carrying line/column locations
//! - [`ast`] - AST type definitions
//! - [`coverage`] - Line classification, rewriting, registry and runtime glue
//! - [`processor`] - Runs the pipeline over a whole project
//! - [`config`] - Run configuration
//!
//! ## Example
//!
//! ```
//! use brscov::coverage::{classify, CoverageLineKind, FileId, LineRewriter};
//! use brscov::parser::parse_source;
//!
//! let source = "if x > 1 then\n  y = 2\nend if\n";
//! let program = parse_source(source).expect("parse error");
//!
//! let lines = classify(&program.statements);
//! let rewritten = LineRewriter::new(FileId::FIRST, "RBS_CC").rewrite(source, &lines);
//!
//! assert_eq!(rewritten.coverage.get(0), Some(CoverageLineKind::Condition));
//! assert_eq!(rewritten.coverage.get(1), Some(CoverageLineKind::Code));
//! assert_eq!(rewritten.coverage.get(2), None);
//! ```

pub mod ast;
pub mod config;
pub mod coverage;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod processor;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::ast::{Expr, ExprKind, Program, Span, Statement, StatementKind};
    pub use crate::config::ProcessorConfig;
    pub use crate::coverage::{
        CoverageLineKind, CoverageRegistry, FileCoverageMap, FileId, GlueEmitter, LineRewriter,
        SceneGraphGlue, classify,
    };
    pub use crate::error::{CoverageError, Result};
    pub use crate::lexer::{Lexer, Token, TokenKind};
    pub use crate::parser::{ParseError, Parser};
    pub use crate::processor::{CoverageProcessor, ProcessSummary, SourceFile};
}
