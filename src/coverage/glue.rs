//! Runtime glue: the per-file footer and the coverage component.
//!
//! Instrumented files call `<prefix>_<id>_reportLine`, which each file defines
//! in its footer. The footer forwards hits to a `CodeCoverage` SceneGraph
//! node, described by `components/CodeCoverage.xml` and implemented by
//! `components/CodeCoverage.brs`. The implementation carries the expected
//! coverage and file-path maps of the whole run.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, warn};

use super::{CoverageRegistry, FileId, Template};
use crate::error::{CoverageError, Result};

/// Directory, relative to the project root, that receives the component.
pub const COMPONENT_DIR: &str = "components";
/// Component descriptor file name.
pub const COMPONENT_XML: &str = "CodeCoverage.xml";
/// Component implementation file name.
pub const COMPONENT_BRS: &str = "CodeCoverage.brs";
/// Per-file footer template name.
pub const FOOTER_TEMPLATE: &str = "CodeCoverageTemplate.brs";

const DEFAULT_FOOTER: &str = include_str!("../../templates/CodeCoverageTemplate.brs");
const DEFAULT_COMPONENT_XML: &str = include_str!("../../templates/CodeCoverage.xml");
const DEFAULT_COMPONENT_BRS: &str = include_str!("../../templates/CodeCoverage.brs");

/// A file produced by a [`GlueEmitter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the project root.
    pub relative_path: PathBuf,
    /// Full file contents.
    pub contents: String,
}

/// Produces the runtime side of coverage collection.
///
/// Implementations render the footer appended to every instrumented file
/// and the component files written once per run.
pub trait GlueEmitter {
    /// Footer appended to the rewritten text of file `id`.
    fn file_footer(&self, id: FileId) -> Result<String>;

    /// Runtime component files for every file recorded in `registry`.
    fn emit(&self, registry: &CoverageRegistry) -> Result<Vec<GeneratedFile>>;

    /// Returns the name of this emitter for diagnostics.
    fn emitter_name(&self) -> &str;
}

/// Glue for Roku SceneGraph applications.
#[derive(Debug, Clone)]
pub struct SceneGraphGlue {
    prefix: String,
    footer: Option<Template>,
    component_xml: Option<Template>,
    component_brs: Option<Template>,
}

impl SceneGraphGlue {
    /// Glue using the built-in templates.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            footer: Some(Template::new(FOOTER_TEMPLATE, DEFAULT_FOOTER)),
            component_xml: Some(Template::new(COMPONENT_XML, DEFAULT_COMPONENT_XML)),
            component_brs: Some(Template::new(COMPONENT_BRS, DEFAULT_COMPONENT_BRS)),
        }
    }

    /// Glue using the templates found in `dir`.
    ///
    /// A template that cannot be read is logged and left missing; the
    /// operation that needs it later fails with
    /// [`CoverageError::MissingTemplate`].
    pub fn from_dir(prefix: impl Into<String>, dir: &Path) -> Self {
        let footer = load_template(dir, FOOTER_TEMPLATE);
        if let Some(footer) = &footer
            && !footer.has_placeholder("ID")
        {
            warn!("{} has no #ID# placeholder; report functions will collide", footer.name());
        }

        Self {
            prefix: prefix.into(),
            footer,
            component_xml: load_template(dir, COMPONENT_XML),
            component_brs: load_template(dir, COMPONENT_BRS),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl GlueEmitter for SceneGraphGlue {
    fn file_footer(&self, id: FileId) -> Result<String> {
        let template = require(&self.footer, FOOTER_TEMPLATE)?;
        let id = id.to_string();
        Ok(template.render(&[("ID", id.as_str()), ("PREFIX", self.prefix.as_str())]))
    }

    fn emit(&self, registry: &CoverageRegistry) -> Result<Vec<GeneratedFile>> {
        let xml = require(&self.component_xml, COMPONENT_XML)?;
        let brs = require(&self.component_brs, COMPONENT_BRS)?;

        let expected = registry.expected_map_json()?;
        let file_paths = registry.file_path_map_json()?;

        let dir = Path::new(COMPONENT_DIR);
        Ok(vec![
            GeneratedFile {
                relative_path: dir.join(COMPONENT_XML),
                contents: xml.text().to_string(),
            },
            GeneratedFile {
                relative_path: dir.join(COMPONENT_BRS),
                contents: brs.render(&[
                    ("EXPECTED_MAP", expected.as_str()),
                    ("FILE_PATH_MAP", file_paths.as_str()),
                ]),
            },
        ])
    }

    fn emitter_name(&self) -> &str {
        "SceneGraph"
    }
}

fn load_template(dir: &Path, name: &str) -> Option<Template> {
    let path = dir.join(name);
    match fs::read_to_string(&path) {
        Ok(text) => {
            debug!("loaded template {}", path.display());
            Some(Template::new(name, text))
        }
        Err(e) => {
            error!("failed to load template {}: {}", path.display(), e);
            None
        }
    }
}

fn require<'t>(template: &'t Option<Template>, name: &str) -> Result<&'t Template> {
    template
        .as_ref()
        .ok_or_else(|| CoverageError::MissingTemplate(name.to_string()))
}
