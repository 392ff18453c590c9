//! Per-run accumulation of coverage maps and logical paths.

use std::collections::BTreeMap;

use log::warn;

use super::{FileCoverageMap, FileId};
use crate::error::Result;

/// Expected coverage and logical path of every instrumented file, keyed by
/// file id.
///
/// Both maps serialize to JSON objects keyed by the decimal id, in ascending
/// id order:
///
/// ```text
/// expected:   {"1":{"0":1,"3":2},"2":{"1":1}}
/// file paths: {"1":"pkg:/source/main.brs","2":"pkg:/components/Foo.brs"}
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoverageRegistry {
    expected: BTreeMap<FileId, FileCoverageMap>,
    file_paths: BTreeMap<FileId, String>,
}

impl CoverageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the coverage map and logical path of one file.
    pub fn record(&mut self, id: FileId, coverage: FileCoverageMap, logical_path: impl Into<String>) {
        if self.expected.insert(id, coverage).is_some() {
            warn!("file id {} recorded twice; keeping the latest map", id);
        }
        self.file_paths.insert(id, logical_path.into());
    }

    pub fn expected_coverage(&self) -> &BTreeMap<FileId, FileCoverageMap> {
        &self.expected
    }

    pub fn file_paths(&self) -> &BTreeMap<FileId, String> {
        &self.file_paths
    }

    pub fn coverage_for(&self, id: FileId) -> Option<&FileCoverageMap> {
        self.expected.get(&id)
    }

    pub fn path_for(&self, id: FileId) -> Option<&str> {
        self.file_paths.get(&id).map(String::as_str)
    }

    /// Number of recorded files.
    pub fn len(&self) -> usize {
        self.expected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }

    /// Total number of visitable lines across all files.
    pub fn line_count(&self) -> usize {
        self.expected.values().map(FileCoverageMap::len).sum()
    }

    pub fn expected_map_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.expected)?)
    }

    pub fn file_path_map_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.file_paths)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::CoverageLineKind;

    fn map(entries: &[(usize, CoverageLineKind)]) -> FileCoverageMap {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_record_and_serialize() {
        let mut registry = CoverageRegistry::new();
        let first = FileId::FIRST;
        let second = first.next();

        registry.record(
            second,
            map(&[(1, CoverageLineKind::Code)]),
            "pkg:/components/Foo.brs",
        );
        registry.record(
            first,
            map(&[(3, CoverageLineKind::Condition), (0, CoverageLineKind::Code)]),
            "pkg:/source/main.brs",
        );

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.line_count(), 3);
        assert_eq!(registry.path_for(first), Some("pkg:/source/main.brs"));
        assert_eq!(
            registry.expected_map_json().unwrap(),
            r#"{"1":{"0":1,"3":2},"2":{"1":1}}"#
        );
        assert_eq!(
            registry.file_path_map_json().unwrap(),
            r#"{"1":"pkg:/source/main.brs","2":"pkg:/components/Foo.brs"}"#
        );
    }

    #[test]
    fn test_empty_registry_serializes_to_empty_objects() {
        let registry = CoverageRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.expected_map_json().unwrap(), "{}");
        assert_eq!(registry.file_path_map_json().unwrap(), "{}");
    }

    #[test]
    fn test_empty_file_map_kept() {
        let mut registry = CoverageRegistry::new();
        registry.record(FileId::FIRST, FileCoverageMap::default(), "pkg:/source/empty.brs");
        assert_eq!(registry.expected_map_json().unwrap(), r#"{"1":{}}"#);
        assert!(registry.coverage_for(FileId::FIRST).is_some());
    }
}
