//! Build manifest: the JSON file a bundler step writes for `linkhint`.
//!
//! ```json
//! {
//!   "public_path": "/",
//!   "outputs": [
//!     { "file": "bundle.js", "bundle": "main", "async": false },
//!     { "file": "chunk.abc123.js", "bundle": "home", "async": true },
//!     { "file": "logo.png", "origin": "asset" }
//!   ],
//!   "bundles": { "main": { "sync": [], "async": ["home"] } },
//!   "documents": [
//!     { "name": "index.html", "path": "dist/index.html", "bundles": ["main"] }
//!   ]
//! }
//! ```
//!
//! Document paths are relative to the manifest's directory.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hint::{BuildOutput, BundleDeps, BundleGraph, HtmlDocument, OutputOrigin, RunReport};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("IO error when accessing `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Manifest parsing error in `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("Manifest validation error: {0}")]
    Validation(String),
}

/// One emitted file as written by the bundler step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputEntry {
    /// Path relative to `public_path`.
    pub file: String,
    #[serde(default)]
    pub bundle: String,
    #[serde(rename = "async", default)]
    pub async_: bool,
    #[serde(default)]
    pub origin: OutputOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub name: String,
    pub path: PathBuf,
    /// Entry bundles of the page. Empty means every bundle.
    #[serde(default)]
    pub bundles: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Directory document paths are resolved against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    pub public_path: String,
    pub outputs: Vec<OutputEntry>,
    pub bundles: FxHashMap<String, BundleDeps>,
    pub documents: Vec<DocumentEntry>,
}

impl Manifest {
    /// Read, parse and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content =
            fs::read_to_string(path).map_err(|err| ManifestError::Io(path.to_path_buf(), err))?;
        let mut manifest: Self = serde_json::from_str(&content)
            .map_err(|err| ManifestError::Json(path.to_path_buf(), err))?;

        manifest.root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<(), ManifestError> {
        let mut known: FxHashSet<&str> = self.bundles.keys().map(String::as_str).collect();
        for output in &self.outputs {
            if output.file.is_empty() {
                return Err(ManifestError::Validation("output with empty `file`".into()));
            }
            if output.origin == OutputOrigin::Chunk && output.bundle.is_empty() {
                return Err(ManifestError::Validation(format!(
                    "chunk `{}` has no bundle",
                    output.file
                )));
            }
            if !output.bundle.is_empty() {
                known.insert(output.bundle.as_str());
            }
        }

        for (from, deps) in &self.bundles {
            if let Some(to) = deps.sync.iter().chain(&deps.async_).find(|b| !known.contains(b.as_str())) {
                return Err(ManifestError::Validation(format!(
                    "bundle `{from}` depends on unknown bundle `{to}`"
                )));
            }
        }

        let mut names = FxHashSet::default();
        for doc in &self.documents {
            if !names.insert(doc.name.as_str()) {
                return Err(ManifestError::Validation(format!(
                    "duplicate document `{}`",
                    doc.name
                )));
            }
            if let Some(bundle) = doc.bundles.iter().find(|b| !known.contains(b.as_str())) {
                return Err(ManifestError::Validation(format!(
                    "document `{}` references unknown bundle `{bundle}`",
                    doc.name
                )));
            }
        }
        Ok(())
    }

    /// Outputs in emission order, `public_path` prepended.
    pub fn outputs(&self) -> Vec<BuildOutput> {
        self.outputs
            .iter()
            .map(|entry| BuildOutput {
                public_path: format!("{}{}", self.public_path, entry.file),
                bundle_name: entry.bundle.clone(),
                is_async_chunk: entry.async_,
                origin: entry.origin,
            })
            .collect()
    }

    pub fn graph(&self) -> BundleGraph {
        BundleGraph::from(self.bundles.clone())
    }

    /// Absolute (or cwd-relative) location of a document.
    pub fn document_path(&self, entry: &DocumentEntry) -> PathBuf {
        self.root.join(&entry.path)
    }

    /// Read every document's markup, in manifest order.
    pub fn load_documents(&self) -> Result<Vec<HtmlDocument>, ManifestError> {
        self.documents
            .par_iter()
            .map(|entry| {
                let path = self.document_path(entry);
                let markup =
                    fs::read_to_string(&path).map_err(|err| ManifestError::Io(path, err))?;
                Ok(HtmlDocument::new(&entry.name, markup).with_bundles(&entry.bundles))
            })
            .collect()
    }

    /// Write back documents that received hints. Returns how many were written.
    ///
    /// `documents` and `report` must come from the same run over
    /// [`load_documents`](Self::load_documents).
    pub fn write_documents(
        &self,
        documents: &[HtmlDocument],
        report: &RunReport,
    ) -> Result<usize, ManifestError> {
        let changed: Vec<_> = self
            .documents
            .iter()
            .zip(documents)
            .zip(&report.documents)
            .filter(|(_, doc_report)| doc_report.hints > 0)
            .map(|((entry, doc), _)| (self.document_path(entry), doc))
            .collect();

        changed.par_iter().try_for_each(|(path, doc)| {
            fs::write(path, &doc.markup).map_err(|err| ManifestError::Io(path.clone(), err))
        })?;
        Ok(changed.len())
    }
}
