//! Source file discovery.
//!
//! Patterns are globs relative to the project root. Patterns starting with
//! `!` remove matches of the other patterns. Only `.brs` files are kept
//! (case-insensitive), each once, in the order the patterns first match them.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use log::debug;

use crate::error::{CoverageError, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Returns the project-relative paths of all source files matched by `patterns`.
pub fn discover(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let (excludes, includes): (Vec<&str>, Vec<&str>) = patterns
        .iter()
        .map(String::as_str)
        .partition(|pattern| pattern.starts_with('!'));

    let excludes = excludes
        .into_iter()
        .map(|pattern| compile(&pattern[1..]))
        .collect::<Result<Vec<_>>>()?;

    let root = std::path::absolute(root).map_err(|e| CoverageError::io(root, e))?;
    let escaped_root = Pattern::escape(&root.to_string_lossy());
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in includes {
        let full = Path::new(&escaped_root).join(pattern);
        let full = full.to_string_lossy();
        debug!("processing files at path {} with pattern {}", root.display(), pattern);

        let entries = glob::glob_with(&full, MATCH_OPTIONS).map_err(|source| {
            CoverageError::Pattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        for entry in entries {
            let path = entry?;
            if !path.is_file() || !is_brs(&path) {
                continue;
            }

            let Ok(relative) = path.strip_prefix(&root) else {
                continue;
            };
            if excludes
                .iter()
                .any(|exclude| exclude.matches_path_with(relative, MATCH_OPTIONS))
            {
                debug!("excluded {}", relative.display());
                continue;
            }

            if seen.insert(relative.to_path_buf()) {
                debug!("found {}", relative.display());
                files.push(relative.to_path_buf());
            }
        }
    }

    Ok(files)
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|source| CoverageError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Returns true for `.brs` files, ignoring case.
pub fn is_brs(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("brs"))
}
