//! Run configuration.
//!
//! A configuration can come from defaults, from a JSON file, or from both
//! with command-line flags layered on top. The file uses camelCase keys:
//!
//! ```json
//! {
//!   "projectPath": "../my-channel",
//!   "sourceFilePatterns": ["source/**/*.brs", "!source/vendor/**"],
//!   "reportPrefix": "RBS_CC",
//!   "templateDir": "coverage-templates"
//! }
//! ```
//!
//! Relative paths in a file are resolved against the file's directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::coverage::{COMPONENT_BRS, COMPONENT_DIR, DEFAULT_REPORT_PREFIX};
use crate::error::{CoverageError, Result};

/// Settings for one instrumentation run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ProcessorConfig {
    /// Project root; files are discovered and written beneath it.
    pub project_path: PathBuf,
    /// Glob patterns relative to the project root. A leading `!` excludes.
    pub source_file_patterns: Vec<String>,
    /// Prefix of generated reporting-call names.
    pub report_prefix: String,
    /// Directory overriding the built-in runtime templates.
    pub template_dir: Option<PathBuf>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            project_path: PathBuf::from("."),
            source_file_patterns: default_patterns(),
            report_prefix: DEFAULT_REPORT_PREFIX.to_string(),
            template_dir: None,
        }
    }
}

impl ProcessorConfig {
    /// Default configuration rooted at `project_path`.
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        Self {
            project_path: project_path.into(),
            ..Self::default()
        }
    }

    /// Reads a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| CoverageError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut config: ProcessorConfig =
            serde_json::from_str(&text).map_err(|e| CoverageError::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if let Some(base) = path.parent() {
            config.project_path = base.join(&config.project_path);
            config.template_dir = config.template_dir.map(|dir| base.join(dir));
        }

        Ok(config)
    }
}

/// `source/**/*.brs` and `components/**/*.brs`, minus the generated component.
pub fn default_patterns() -> Vec<String> {
    vec![
        "source/**/*.brs".to_string(),
        "components/**/*.brs".to_string(),
        format!("!{}/{}", COMPONENT_DIR, COMPONENT_BRS),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProcessorConfig::default();
        assert_eq!(config.report_prefix, "RBS_CC");
        assert_eq!(
            config.source_file_patterns,
            vec![
                "source/**/*.brs",
                "components/**/*.brs",
                "!components/CodeCoverage.brs"
            ]
        );
        assert!(config.template_dir.is_none());
    }

    #[test]
    fn test_from_file_resolves_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brscov.json");
        fs::write(
            &path,
            r#"{ "projectPath": "app", "reportPrefix": "COV", "templateDir": "tpl" }"#,
        )
        .unwrap();

        let config = ProcessorConfig::from_file(&path).unwrap();
        assert_eq!(config.project_path, dir.path().join("app"));
        assert_eq!(config.template_dir, Some(dir.path().join("tpl")));
        assert_eq!(config.report_prefix, "COV");
        // unspecified fields keep their defaults
        assert_eq!(config.source_file_patterns, default_patterns());
    }

    #[test]
    fn test_from_file_rejects_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brscov.json");
        fs::write(&path, r#"{ "sourceFilePattern": "source/*.brs" }"#).unwrap();

        let err = ProcessorConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CoverageError::Config { .. }));
    }

    #[test]
    fn test_from_missing_file() {
        let err = ProcessorConfig::from_file(Path::new("/nonexistent/brscov.json")).unwrap_err();
        assert!(matches!(err, CoverageError::Config { .. }));
    }
}
