//! Source files on disk.

use std::fs;
use std::path::{Component, Path, PathBuf};

use log::debug;

use crate::ast::Program;
use crate::error::{CoverageError, Result};
use crate::parser::parse_source;

/// A discovered source file.
///
/// The text is replaced once by its instrumented version and then saved
/// back to the same path.
#[derive(Debug, Clone)]
pub struct SourceFile {
    logical_path: String,
    path: PathBuf,
    text: String,
}

impl SourceFile {
    /// Creates a file from already-loaded text.
    pub fn new(root: &Path, relative: &Path, text: impl Into<String>) -> Self {
        Self {
            logical_path: pkg_uri(relative),
            path: root.join(relative),
            text: text.into(),
        }
    }

    /// Reads `relative` beneath `root`.
    pub fn load(root: &Path, relative: &Path) -> Result<Self> {
        let path = root.join(relative);
        let text = fs::read_to_string(&path).map_err(|e| CoverageError::io(&path, e))?;
        Ok(Self::new(root, relative, text))
    }

    /// Device path, e.g. `pkg:/source/main.brs`.
    pub fn logical_path(&self) -> &str {
        &self.logical_path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    /// Parses the current text.
    pub fn parse(&self) -> Result<Program> {
        parse_source(&self.text)
            .map_err(|errors| CoverageError::parse(self.logical_path.as_str(), &self.text, errors))
    }

    /// Writes the current text back to [`SourceFile::path`].
    pub fn save(&self) -> Result<()> {
        write_file(&self.path, &self.text)
    }
}

/// Writes `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CoverageError::io(parent, e))?;
    }
    debug!("Writing to {}", path.display());
    fs::write(path, contents).map_err(|e| CoverageError::io(path, e))
}

/// Logical device path of a project-relative path.
pub fn pkg_uri(relative: &Path) -> String {
    let parts: Vec<_> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    format!("pkg:/{}", parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pkg_uri() {
        assert_eq!(pkg_uri(Path::new("source/main.brs")), "pkg:/source/main.brs");
        assert_eq!(
            pkg_uri(&Path::new("components").join("screens").join("Home.brs")),
            "pkg:/components/screens/Home.brs"
        );
        assert_eq!(pkg_uri(Path::new("./source/a.brs")), "pkg:/source/a.brs");
    }

    #[test]
    fn test_load_parse_save() {
        let dir = tempfile::tempdir().unwrap();
        let relative = Path::new("source/main.brs");
        write_file(&dir.path().join(relative), "sub main()\nend sub\n").unwrap();

        let mut file = SourceFile::load(dir.path(), relative).unwrap();
        assert_eq!(file.logical_path(), "pkg:/source/main.brs");
        assert_eq!(file.parse().unwrap().statements.len(), 1);

        file.set_text("' replaced\n".to_string());
        file.save().unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join(relative)).unwrap(),
            "' replaced\n"
        );
    }

    #[test]
    fn test_parse_error_names_logical_path() {
        let file = SourceFile::new(Path::new("."), Path::new("source/bad.brs"), "if x then\n");
        match file.parse().unwrap_err() {
            CoverageError::Parse { path, errors } => {
                assert_eq!(path, "pkg:/source/bad.brs");
                assert!(!errors.is_empty());
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SourceFile::load(dir.path(), Path::new("source/none.brs")).unwrap_err();
        assert!(matches!(err, CoverageError::Io { .. }));
    }
}
