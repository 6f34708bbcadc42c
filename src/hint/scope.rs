//! Per-document narrowing of the candidate list.

use super::output::{BuildOutput, BundleGraph, HtmlDocument};
use super::select::IncludePolicy;
use super::spec::HintSpec;

/// What a document gets from the candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentScope<'a> {
    /// Excluded by name: leave the markup untouched.
    Skip,
    /// Files to hint, in selection order.
    Hints(Vec<&'a BuildOutput>),
}

impl<'a> DocumentScope<'a> {
    pub const fn is_skip(&self) -> bool {
        matches!(self, Self::Skip)
    }

    /// The scoped files. Empty for skipped documents.
    pub fn files(&self) -> &[&'a BuildOutput] {
        match self {
            Self::Skip => &[],
            Self::Hints(files) => files,
        }
    }
}

/// Restrict `candidates` to the files `document` can reach.
///
/// Bundle-list policies only keep files whose bundle is reachable from the
/// document's entries. `asyncChunks` and `allChunks` apply to every document
/// uniformly unless `scope_to_document` is set. `allAssets` is never
/// narrowed since loose assets belong to no bundle.
pub fn scope<'a>(
    document: &HtmlDocument,
    candidates: &[&'a BuildOutput],
    graph: &BundleGraph,
    spec: &HintSpec,
) -> DocumentScope<'a> {
    if spec.is_excluded(&document.name) {
        return DocumentScope::Skip;
    }

    let narrow = match spec.include {
        IncludePolicy::Bundles(_) => true,
        IncludePolicy::AsyncChunks | IncludePolicy::AllChunks => spec.scope_to_document,
        IncludePolicy::AllAssets => false,
    };

    // No owned bundles means the page loads all of them.
    if !narrow || document.owned_bundles.is_empty() {
        return DocumentScope::Hints(candidates.to_vec());
    }

    let reachable = graph.reachable(&document.owned_bundles);
    DocumentScope::Hints(
        candidates
            .iter()
            .copied()
            .filter(|file| reachable.contains(&file.bundle_name))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> BundleGraph {
        let mut graph = BundleGraph::new();
        graph.add_async("js", "chunk");
        graph.add_sync("moduleA", "shared");
        graph
    }

    fn outputs() -> Vec<BuildOutput> {
        vec![
            BuildOutput::chunk("/js.js", "js", false),
            BuildOutput::chunk("/moduleA.js", "moduleA", false),
            BuildOutput::chunk("/chunk.1.js", "chunk", true),
            BuildOutput::chunk("/shared.js", "shared", false),
        ]
    }

    fn paths(scope: &DocumentScope<'_>) -> Vec<String> {
        scope.files().iter().map(|f| f.public_path.clone()).collect()
    }

    #[test]
    fn test_excluded_document_skips() {
        let outputs = outputs();
        let candidates: Vec<_> = outputs.iter().collect();
        let spec = HintSpec::default().exclude_html(["index.html"]);
        let doc = HtmlDocument::new("index.html", "<head></head>");

        let scope = scope(&doc, &candidates, &graph(), &spec);
        assert!(scope.is_skip());
        assert!(scope.files().is_empty());
    }

    #[test]
    fn test_async_chunks_not_narrowed_by_default() {
        let outputs = outputs();
        let candidates = vec![&outputs[2]];
        let spec = HintSpec::default();
        let home = HtmlDocument::new("home.html", "").with_bundles(["moduleA"]);

        assert_eq!(paths(&scope(&home, &candidates, &graph(), &spec)), vec!["/chunk.1.js"]);
    }

    #[test]
    fn test_async_chunks_narrowed_when_scoped() {
        let outputs = outputs();
        let candidates = vec![&outputs[2]];
        let spec = HintSpec::default().scoped_to_document(true);
        let index = HtmlDocument::new("index.html", "").with_bundles(["js"]);
        let home = HtmlDocument::new("home.html", "").with_bundles(["moduleA"]);

        assert_eq!(paths(&scope(&index, &candidates, &graph(), &spec)), vec!["/chunk.1.js"]);
        assert!(paths(&scope(&home, &candidates, &graph(), &spec)).is_empty());
    }

    #[test]
    fn test_bundle_list_uses_document_reachability() {
        let outputs = outputs();
        let candidates: Vec<_> = outputs.iter().collect();
        let spec = HintSpec::default()
            .with_include(IncludePolicy::Bundles(vec!["chunk".into(), "shared".into()]));
        let index = HtmlDocument::new("index.html", "").with_bundles(["js"]);
        let home = HtmlDocument::new("home.html", "").with_bundles(["moduleA"]);

        assert_eq!(
            paths(&scope(&index, &candidates, &graph(), &spec)),
            vec!["/js.js", "/chunk.1.js"]
        );
        assert_eq!(
            paths(&scope(&home, &candidates, &graph(), &spec)),
            vec!["/moduleA.js", "/shared.js"]
        );
    }

    #[test]
    fn test_document_without_bundles_gets_everything() {
        let outputs = outputs();
        let candidates: Vec<_> = outputs.iter().collect();
        let spec = HintSpec::default().with_include(IncludePolicy::Bundles(vec!["js".into()]));
        let doc = HtmlDocument::new("index.html", "");

        assert_eq!(scope(&doc, &candidates, &graph(), &spec).files().len(), 4);
    }

    #[test]
    fn test_all_assets_never_narrowed() {
        let outputs = vec![BuildOutput::asset("/logo.png")];
        let candidates: Vec<_> = outputs.iter().collect();
        let spec = HintSpec::default()
            .with_include(IncludePolicy::AllAssets)
            .scoped_to_document(true);
        let doc = HtmlDocument::new("index.html", "").with_bundles(["js"]);

        assert_eq!(paths(&scope(&doc, &candidates, &graph(), &spec)), vec!["/logo.png"]);
    }
}
