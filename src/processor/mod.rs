//! Run orchestration.
//!
//! A [`CoverageProcessor`] owns everything that lives for one run: the
//! file-id counter, the [`CoverageRegistry`] and the glue emitter. Each
//! discovered file goes through the same pipeline:
//!
//! ```text
//! load → parse → allocate id → classify → rewrite → append footer → save → record
//! ```
//!
//! After the last file the emitter renders the runtime component from the
//! registry. Any failure aborts the run.

mod discovery;
mod source_file;

pub use discovery::{discover, is_brs};
pub use source_file::{SourceFile, pkg_uri, write_file};

use std::fmt;
use std::path::PathBuf;

use log::{debug, info};

use crate::config::ProcessorConfig;
use crate::coverage::{
    CoverageLineKind, CoverageRegistry, FileId, GlueEmitter, LineRewriter, SceneGraphGlue, classify,
};
use crate::error::Result;

/// Instruments every source file of one project.
pub struct CoverageProcessor {
    config: ProcessorConfig,
    dry_run: bool,
    next_id: FileId,
    registry: CoverageRegistry,
    glue: Box<dyn GlueEmitter>,
}

impl CoverageProcessor {
    /// Creates a processor using SceneGraph glue, with templates from
    /// `config.template_dir` when set.
    pub fn new(config: ProcessorConfig) -> Self {
        let glue = match &config.template_dir {
            Some(dir) => SceneGraphGlue::from_dir(config.report_prefix.as_str(), dir),
            None => SceneGraphGlue::new(config.report_prefix.as_str()),
        };
        Self::with_emitter(config, Box::new(glue))
    }

    pub fn with_emitter(config: ProcessorConfig, glue: Box<dyn GlueEmitter>) -> Self {
        Self {
            config,
            dry_run: false,
            next_id: FileId::FIRST,
            registry: CoverageRegistry::new(),
            glue,
        }
    }

    /// When set, the whole pipeline runs but nothing is written.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn registry(&self) -> &CoverageRegistry {
        &self.registry
    }

    /// Instruments all discovered files and writes the runtime component.
    pub fn process(&mut self) -> Result<ProcessSummary> {
        let root = self.config.project_path.clone();
        info!(
            "Instrumenting {} with {} glue (prefix {})",
            root.display(),
            self.glue.emitter_name(),
            self.config.report_prefix
        );

        let files = discover(&root, &self.config.source_file_patterns)?;
        debug!("discovered {} source file(s)", files.len());

        for relative in &files {
            let mut file = SourceFile::load(&root, relative)?;
            let id = self.process_file(&mut file)?;
            debug!("instrumented {} as file {}", file.logical_path(), id);
            if !self.dry_run {
                file.save()?;
            }
        }

        let mut outputs = Vec::new();
        for generated in self.glue.emit(&self.registry)? {
            if !self.dry_run {
                write_file(&root.join(&generated.relative_path), &generated.contents)?;
            }
            outputs.push(generated.relative_path);
        }

        let summary = self.summary(outputs);
        info!("{}", summary);
        Ok(summary)
    }

    /// Instruments one file in memory and records its coverage.
    ///
    /// The file's text is replaced by the rewritten text with the footer
    /// appended. A parse failure leaves the file and the registry untouched
    /// and consumes no file id.
    pub fn process_file(&mut self, file: &mut SourceFile) -> Result<FileId> {
        let program = file.parse()?;

        let id = self.next_id;
        let lines = classify(&program.statements);
        let rewritten =
            LineRewriter::new(id, self.config.report_prefix.as_str()).rewrite(file.text(), &lines);
        let footer = self.glue.file_footer(id)?;
        self.next_id = id.next();

        let mut text = rewritten.text;
        text.push_str(&footer);
        file.set_text(text);

        self.registry.record(id, rewritten.coverage, file.logical_path());
        Ok(id)
    }

    fn summary(&self, outputs: Vec<PathBuf>) -> ProcessSummary {
        let count = |kind: CoverageLineKind| {
            self.registry
                .expected_coverage()
                .values()
                .map(|map| map.count(kind))
                .sum::<usize>()
        };
        ProcessSummary {
            files: self.registry.len(),
            code_lines: count(CoverageLineKind::Code),
            condition_lines: count(CoverageLineKind::Condition),
            outputs,
            dry_run: self.dry_run,
        }
    }
}

/// What one run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSummary {
    pub files: usize,
    pub code_lines: usize,
    pub condition_lines: usize,
    /// Generated runtime files, relative to the project root.
    pub outputs: Vec<PathBuf>,
    pub dry_run: bool,
}

impl fmt::Display for ProcessSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s), {} code line(s), {} condition line(s)",
            self.files, self.code_lines, self.condition_lines
        )?;
        if self.dry_run {
            write!(f, " (dry run, nothing written)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::GeneratedFile;
    use crate::error::CoverageError;
    use std::path::Path;

    fn source(relative: &str, text: &str) -> SourceFile {
        SourceFile::new(Path::new("/project"), Path::new(relative), text)
    }

    #[test]
    fn test_process_file_rewrites_and_records() {
        let mut processor = CoverageProcessor::new(ProcessorConfig::default());
        let mut file = source("source/main.brs", "x = 1");

        let id = processor.process_file(&mut file).unwrap();
        assert_eq!(id, FileId::FIRST);
        assert!(file.text().starts_with("RBS_CC_1_reportLine(0, 1): x = 1\n"));
        assert!(file.text().contains("function RBS_CC_1_reportLine("));

        let coverage = processor.registry().coverage_for(id).unwrap();
        assert_eq!(coverage.get(0), Some(CoverageLineKind::Code));
        assert_eq!(processor.registry().path_for(id), Some("pkg:/source/main.brs"));
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut processor = CoverageProcessor::new(ProcessorConfig::default());
        let mut a = source("source/a.brs", "a = 1\n");
        let mut b = source("source/b.brs", "b = 2\n");

        assert_eq!(processor.process_file(&mut a).unwrap().get(), 1);
        assert_eq!(processor.process_file(&mut b).unwrap().get(), 2);
        assert!(b.text().starts_with("RBS_CC_2_reportLine(0, 1): b = 2\n"));
    }

    #[test]
    fn test_parse_failure_consumes_no_id() {
        let mut processor = CoverageProcessor::new(ProcessorConfig::default());
        let mut bad = source("source/bad.brs", "if x then\n");
        let err = processor.process_file(&mut bad).unwrap_err();
        assert!(matches!(err, CoverageError::Parse { .. }));
        assert_eq!(bad.text(), "if x then\n");
        assert!(processor.registry().is_empty());

        let mut good = source("source/good.brs", "y = 2\n");
        assert_eq!(processor.process_file(&mut good).unwrap(), FileId::FIRST);
    }

    #[test]
    fn test_custom_prefix() {
        let mut config = ProcessorConfig::default();
        config.report_prefix = "COV".to_string();
        let mut processor = CoverageProcessor::new(config);
        let mut file = source("source/main.brs", "if x > 1 then\n  y = 2\nend if\n");

        processor.process_file(&mut file).unwrap();
        let mut lines = file.text().lines();
        assert_eq!(lines.next(), Some("if  COV_1_reportLine(0, 2) and (x > 1)  then"));
        assert_eq!(lines.next(), Some("COV_1_reportLine(1, 1):   y = 2"));
        assert_eq!(lines.next(), Some("end if"));
        assert!(file.text().contains("function COV_1_reportLine("));
    }

    struct NullGlue;

    impl GlueEmitter for NullGlue {
        fn file_footer(&self, id: FileId) -> Result<String> {
            Ok(format!("' footer {}\n", id))
        }

        fn emit(&self, registry: &CoverageRegistry) -> Result<Vec<GeneratedFile>> {
            Ok(vec![GeneratedFile {
                relative_path: PathBuf::from("coverage.json"),
                contents: registry.expected_map_json()?,
            }])
        }

        fn emitter_name(&self) -> &str {
            "null"
        }
    }

    #[test]
    fn test_custom_emitter() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir.path().join("source/main.brs"), "print 1\n").unwrap();

        let mut processor =
            CoverageProcessor::with_emitter(ProcessorConfig::new(dir.path()), Box::new(NullGlue));
        let summary = processor.process().unwrap();
        assert_eq!(summary.outputs, vec![PathBuf::from("coverage.json")]);

        let main = std::fs::read_to_string(dir.path().join("source/main.brs")).unwrap();
        assert_eq!(main, "RBS_CC_1_reportLine(0, 1): print 1\n\n' footer 1\n");
        let json = std::fs::read_to_string(dir.path().join("coverage.json")).unwrap();
        assert_eq!(json, r#"{"1":{"0":1}}"#);
    }

    #[test]
    fn test_summary_display() {
        let summary = ProcessSummary {
            files: 2,
            code_lines: 5,
            condition_lines: 1,
            outputs: Vec::new(),
            dry_run: true,
        };
        assert_eq!(
            summary.to_string(),
            "2 file(s), 5 code line(s), 1 condition line(s) (dry run, nothing written)"
        );
    }
}
