//! Resource hint engine.
//!
//! Decides which build outputs get a `<link rel="preload">` or
//! `<link rel="prefetch">` tag in which document, and splices the tags in.
//!
//! # Flow
//!
//! ```text
//! outputs ──▶ select (once) ──▶ scope (per document)
//!                                  │
//!                                  ▼
//!                           resolve (per file) ──▶ inject ──▶ markup
//! ```
//!
//! | Module    | Purpose                                          |
//! |-----------|--------------------------------------------------|
//! | `kind`    | File name → `as` category                        |
//! | `output`  | Build outputs, bundle graph, documents           |
//! | `select`  | Include policy + blacklist filtering             |
//! | `resolve` | `rel` / `as` / `crossorigin` per (document, file)|
//! | `scope`   | Per-document narrowing and exclusion             |
//! | `inject`  | `<link>` rendering and insertion                 |
//! | `spec`    | Run configuration                                |
//!
//! Documents are independent of each other and are processed in parallel.

pub mod inject;
pub mod kind;
pub mod output;
pub mod resolve;
pub mod scope;
pub mod select;
pub mod spec;

pub use inject::Injection;
pub use kind::{HintKind, classify};
pub use output::{BuildOutput, BundleDeps, BundleGraph, HtmlDocument, OutputOrigin};
pub use resolve::{AsValue, HintValue, RelParams, RelValue, ResolvedHint};
pub use scope::DocumentScope;
pub use select::IncludePolicy;
pub use spec::HintSpec;

use rayon::prelude::*;
use serde::Serialize;
use std::fmt;

use crate::debug;

// ============================================================================
// Report types
// ============================================================================

/// Recoverable problem with one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HintWarning {
    /// No `</head>` to insert before; the document was left unmodified.
    MissingHead { document: String },
}

impl fmt::Display for HintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHead { document } => {
                write!(f, "{document}: no </head> found, document left unmodified")
            }
        }
    }
}

/// Outcome for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub name: String,
    /// Number of tags inserted.
    pub hints: usize,
    /// Excluded by name.
    pub skipped: bool,
}

/// Outcome of a whole run. Documents are listed in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub documents: Vec<DocumentReport>,
    pub warnings: Vec<HintWarning>,
}

impl RunReport {
    /// Total tags inserted across all documents.
    pub fn total_hints(&self) -> usize {
        self.documents.iter().map(|d| d.hints).sum()
    }

    /// Documents that received at least one tag.
    pub fn changed(&self) -> impl Iterator<Item = &DocumentReport> {
        self.documents.iter().filter(|d| d.hints > 0)
    }
}

/// Resolved hints for one document, without touching its markup.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentPlan<'a> {
    pub document: String,
    pub skipped: bool,
    pub hints: Vec<ResolvedHint<'a>>,
}

// ============================================================================
// Engine
// ============================================================================

/// Runs selection, scoping, resolution and injection for a build pass.
#[derive(Debug, Clone, Default)]
pub struct HintEngine {
    spec: HintSpec,
}

impl HintEngine {
    pub fn new(spec: HintSpec) -> Self {
        Self { spec }
    }

    /// Hint every document in place.
    ///
    /// Candidates are selected once from `outputs` (emission order), then
    /// each document is scoped, resolved and injected independently.
    pub fn run(
        &self,
        outputs: &[BuildOutput],
        graph: &BundleGraph,
        documents: &mut [HtmlDocument],
    ) -> RunReport {
        let candidates = self.candidates(outputs, graph);
        debug!("hint"; "{} candidate(s) under `{}`", candidates.len(), self.spec.include);

        let results: Vec<_> = documents
            .par_iter_mut()
            .map(|doc| self.process(doc, &candidates, graph))
            .collect();

        let mut report = RunReport::default();
        for (doc, warning) in results {
            report.documents.push(doc);
            report.warnings.extend(warning);
        }
        report
    }

    /// Resolve hints for every document without mutating anything.
    pub fn plan<'a>(
        &self,
        outputs: &'a [BuildOutput],
        graph: &BundleGraph,
        documents: &[HtmlDocument],
    ) -> Vec<DocumentPlan<'a>> {
        let candidates = self.candidates(outputs, graph);

        documents
            .par_iter()
            .map(|doc| {
                let scoped = scope::scope(doc, &candidates, graph, &self.spec);
                DocumentPlan {
                    document: doc.name.clone(),
                    skipped: scoped.is_skip(),
                    hints: self.resolve_all(&doc.name, scoped.files()),
                }
            })
            .collect()
    }

    fn candidates<'a>(&self, outputs: &'a [BuildOutput], graph: &BundleGraph) -> Vec<&'a BuildOutput> {
        select::select_candidates(
            outputs,
            &self.spec.include,
            &self.spec.file_blacklist,
            graph,
        )
    }

    fn resolve_all<'a>(&self, document: &str, files: &[&'a BuildOutput]) -> Vec<ResolvedHint<'a>> {
        files
            .iter()
            .map(|file| resolve::resolve(file, document, &self.spec))
            .collect()
    }

    fn process(
        &self,
        doc: &mut HtmlDocument,
        candidates: &[&BuildOutput],
        graph: &BundleGraph,
    ) -> (DocumentReport, Option<HintWarning>) {
        let mut report = DocumentReport {
            name: doc.name.clone(),
            hints: 0,
            skipped: false,
        };

        let scoped = scope::scope(doc, candidates, graph, &self.spec);
        if scoped.is_skip() {
            debug!("hint"; "{}: excluded", doc.name);
            report.skipped = true;
            return (report, None);
        }

        let hints = self.resolve_all(&doc.name, scoped.files());
        match inject::inject(&doc.markup, &hints) {
            Injection::Injected(markup, added) => {
                debug!("hint"; "{}: {} tag(s)", doc.name, added);
                doc.markup = markup;
                report.hints = added;
                (report, None)
            }
            Injection::Unchanged => (report, None),
            Injection::MissingHead => {
                let warning = HintWarning::MissingHead {
                    document: doc.name.clone(),
                };
                (report, Some(warning))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
