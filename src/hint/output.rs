//! Build pipeline inputs: emitted files, the bundle graph and documents.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Where an emitted file came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputOrigin {
    /// File belongs to a bundle's chunk.
    #[default]
    Chunk,
    /// File emitted outside chunk bookkeeping (copied, extracted, ...).
    Asset,
}

/// One emitted file. Identity is `public_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    /// URL the browser fetches, public path prefix included.
    pub public_path: String,
    /// Bundle that produced the file. Empty for loose assets.
    pub bundle_name: String,
    /// Loaded on demand rather than on page load.
    pub is_async_chunk: bool,
    pub origin: OutputOrigin,
}

impl BuildOutput {
    /// A chunk file of `bundle`.
    pub fn chunk(public_path: impl Into<String>, bundle: impl Into<String>, is_async: bool) -> Self {
        Self {
            public_path: public_path.into(),
            bundle_name: bundle.into(),
            is_async_chunk: is_async,
            origin: OutputOrigin::Chunk,
        }
    }

    /// A loose asset that belongs to no bundle.
    pub fn asset(public_path: impl Into<String>) -> Self {
        Self {
            public_path: public_path.into(),
            bundle_name: String::new(),
            is_async_chunk: false,
            origin: OutputOrigin::Asset,
        }
    }

    #[inline]
    pub fn is_chunk(&self) -> bool {
        self.origin == OutputOrigin::Chunk
    }
}

/// Dependency edges of one bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleDeps {
    /// Loaded together with the bundle.
    pub sync: Vec<String>,
    /// Split points loaded on demand.
    #[serde(rename = "async")]
    pub async_: Vec<String>,
}

/// Bundle name → dependencies.
#[derive(Debug, Clone, Default)]
pub struct BundleGraph {
    edges: FxHashMap<String, BundleDeps>,
}

impl BundleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sync edge `from → to`.
    pub fn add_sync(&mut self, from: &str, to: &str) {
        self.edges.entry(from.to_string()).or_default().sync.push(to.to_string());
    }

    /// Add an async edge `from → to`.
    pub fn add_async(&mut self, from: &str, to: &str) {
        self.edges.entry(from.to_string()).or_default().async_.push(to.to_string());
    }

    /// Transitive closure over sync and async edges, roots included.
    ///
    /// Cycles are fine: each bundle is visited once.
    pub fn reachable<S: AsRef<str>>(&self, roots: &[S]) -> FxHashSet<String> {
        let mut seen = FxHashSet::default();
        let mut stack: Vec<&str> = roots.iter().map(|s| s.as_ref()).collect();

        while let Some(name) = stack.pop() {
            if !seen.insert(name.to_string()) {
                continue;
            }
            if let Some(deps) = self.edges.get(name) {
                stack.extend(deps.sync.iter().map(String::as_str));
                stack.extend(deps.async_.iter().map(String::as_str));
            }
        }

        seen
    }
}

impl From<FxHashMap<String, BundleDeps>> for BundleGraph {
    fn from(edges: FxHashMap<String, BundleDeps>) -> Self {
        Self { edges }
    }
}

/// One generated page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlDocument {
    /// Output file name, e.g. `index.html`.
    pub name: String,
    /// Entry bundles the page loads. Empty means every bundle.
    pub owned_bundles: Vec<String>,
    pub markup: String,
}

impl HtmlDocument {
    pub fn new(name: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owned_bundles: Vec::new(),
            markup: markup.into(),
        }
    }

    pub fn with_bundles<I, S>(mut self, bundles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.owned_bundles = bundles.into_iter().map(Into::into).collect();
        self
    }
}
