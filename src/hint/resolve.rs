//! Attribute resolution for a single (document, file) pair.
//!
//! `rel` and `as` come either from a literal or from a callback. The
//! callback is invoked for every pair, never cached, because its answer may
//! depend on the document.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::kind::classify;
use super::output::BuildOutput;
use super::spec::HintSpec;

pub const PRELOAD: &str = "preload";
pub const PREFETCH: &str = "prefetch";

/// Default `as` for preloads nothing else could classify.
const FALLBACK_AS: &str = "script";

/// Arguments handed to a computed `rel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelParams<'a> {
    /// Document name, e.g. `index.html`.
    pub filename: &'a str,
    /// Public path of the hinted file.
    pub entry: &'a str,
}

pub type RelFn = dyn Fn(&RelParams<'_>) -> String + Send + Sync;
pub type AsFn = dyn Fn(&str) -> String + Send + Sync;

/// A configuration value given either literally or as a callback.
pub enum HintValue<F: ?Sized> {
    Literal(String),
    Computed(Arc<F>),
}

pub type RelValue = HintValue<RelFn>;
pub type AsValue = HintValue<AsFn>;

impl<F: ?Sized> Clone for HintValue<F> {
    fn clone(&self) -> Self {
        match self {
            Self::Literal(s) => Self::Literal(s.clone()),
            Self::Computed(f) => Self::Computed(Arc::clone(f)),
        }
    }
}

impl<F: ?Sized> fmt::Debug for HintValue<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) => f.debug_tuple("Literal").field(s).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<F: ?Sized> HintValue<F> {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// The literal value, if this is not a callback.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(s) => Some(s),
            Self::Computed(_) => None,
        }
    }
}

impl RelValue {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&RelParams<'_>) -> String + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    fn eval(&self, params: &RelParams<'_>) -> String {
        match self {
            Self::Literal(s) => s.clone(),
            Self::Computed(f) => (**f)(params),
        }
    }
}

impl AsValue {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    fn eval(&self, entry: &str) -> String {
        match self {
            Self::Literal(s) => s.clone(),
            Self::Computed(f) => (**f)(entry),
        }
    }
}

impl Default for RelValue {
    fn default() -> Self {
        Self::literal(PRELOAD)
    }
}

/// Concrete attributes for one `<link>` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedHint<'a> {
    #[serde(rename = "href", serialize_with = "serialize_href")]
    pub file: &'a BuildOutput,
    pub rel: String,
    #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
    pub as_: Option<String>,
    pub crossorigin: bool,
}

fn serialize_href<S: serde::Serializer>(file: &&BuildOutput, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&file.public_path)
}

/// Resolve `rel`, `as` and `crossorigin` for `file` in document `document`.
pub fn resolve<'a>(file: &'a BuildOutput, document: &str, spec: &HintSpec) -> ResolvedHint<'a> {
    let rel = spec.rel.eval(&RelParams {
        filename: document,
        entry: &file.public_path,
    });

    let kind = classify(&file.public_path);

    let as_ = if rel.eq_ignore_ascii_case(PREFETCH) {
        None
    } else {
        let value = match &spec.as_ {
            Some(value) => Some(value.eval(&file.public_path)),
            None => kind.map(|k| k.as_str().to_string()),
        };
        match value {
            None if rel.eq_ignore_ascii_case(PRELOAD) => Some(FALLBACK_AS.to_string()),
            value => value,
        }
    };

    ResolvedHint {
        file,
        rel,
        as_,
        crossorigin: kind.is_some_and(|k| k.requires_cors()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(path: &str) -> BuildOutput {
        BuildOutput::chunk(path, "home", true)
    }

    #[test]
    fn test_preload_derives_as() {
        let spec = HintSpec::default();
        let file = chunk("/chunk.abc123.js");
        let hint = resolve(&file, "index.html", &spec);
        assert_eq!(hint.rel, "preload");
        assert_eq!(hint.as_.as_deref(), Some("script"));
        assert!(!hint.crossorigin);

        let css = chunk("/chunk.abc123.css");
        assert_eq!(resolve(&css, "index.html", &spec).as_.as_deref(), Some("style"));
    }

    #[test]
    fn test_preload_unknown_defaults_to_script() {
        let spec = HintSpec::default();
        let file = chunk("/0");
        assert_eq!(resolve(&file, "index.html", &spec).as_.as_deref(), Some("script"));
    }

    #[test]
    fn test_prefetch_never_carries_as() {
        let spec = HintSpec {
            rel: RelValue::literal("prefetch"),
            as_: Some(AsValue::literal("script")),
            ..HintSpec::default()
        };
        let file = chunk("/chunk.js");
        let hint = resolve(&file, "index.html", &spec);
        assert_eq!(hint.rel, "prefetch");
        assert_eq!(hint.as_, None);
    }

    #[test]
    fn test_rel_keywords_ignore_case() {
        let file = chunk("/blob");
        let prefetch = HintSpec {
            rel: RelValue::literal("Prefetch"),
            ..HintSpec::default()
        };
        let hint = resolve(&file, "index.html", &prefetch);
        assert_eq!(hint.rel, "Prefetch");
        assert_eq!(hint.as_, None);

        let preload = HintSpec::default().with_rel(RelValue::literal("PRELOAD"));
        assert_eq!(
            resolve(&file, "index.html", &preload).as_.as_deref(),
            Some("script")
        );
    }

    #[test]
    fn test_font_crossorigin() {
        let spec = HintSpec::default();
        let file = chunk("/font.woff2");
        let hint = resolve(&file, "index.html", &spec);
        assert_eq!(hint.as_.as_deref(), Some("font"));
        assert!(hint.crossorigin);
    }

    #[test]
    fn test_font_crossorigin_survives_as_override() {
        let spec = HintSpec {
            as_: Some(AsValue::literal("fetch")),
            ..HintSpec::default()
        };
        let file = chunk("/font.ttf");
        let hint = resolve(&file, "index.html", &spec);
        assert_eq!(hint.as_.as_deref(), Some("fetch"));
        assert!(hint.crossorigin);
    }

    #[test]
    fn test_literal_as_overrides_classifier() {
        let spec = HintSpec {
            as_: Some(AsValue::literal("script")),
            ..HintSpec::default()
        };
        let file = chunk("/chunk.css");
        assert_eq!(resolve(&file, "index.html", &spec).as_.as_deref(), Some("script"));
    }

    #[test]
    fn test_computed_as_receives_public_path() {
        let spec = HintSpec {
            as_: Some(AsValue::computed(|entry| {
                let kind = if entry.starts_with("/chunk") { "style" } else { "script" };
                kind.to_string()
            })),
            ..HintSpec::default()
        };
        let chunk_file = chunk("/chunk.1.css");
        let bundle = chunk("/bundle.js");
        assert_eq!(resolve(&chunk_file, "index.html", &spec).as_.as_deref(), Some("style"));
        assert_eq!(resolve(&bundle, "index.html", &spec).as_.as_deref(), Some("script"));
    }

    #[test]
    fn test_computed_rel_sees_document_and_entry() {
        let spec = HintSpec {
            rel: RelValue::computed(|params| {
                assert_eq!(params.entry, "/chunk.js");
                let rel = if params.filename == "index.html" { "prefetch" } else { "preload" };
                rel.to_string()
            }),
            ..HintSpec::default()
        };
        let file = chunk("/chunk.js");

        let index = resolve(&file, "index.html", &spec);
        assert_eq!(index.rel, "prefetch");
        assert_eq!(index.as_, None);

        let home = resolve(&file, "home.html", &spec);
        assert_eq!(home.rel, "preload");
        assert_eq!(home.as_.as_deref(), Some("script"));
    }

    #[test]
    fn test_other_rel_keeps_derived_as_only() {
        let spec = HintSpec {
            rel: RelValue::literal("modulepreload"),
            ..HintSpec::default()
        };
        let js = chunk("/a.js");
        let unknown = chunk("/a.wasm");
        assert_eq!(resolve(&js, "index.html", &spec).as_.as_deref(), Some("script"));
        assert_eq!(resolve(&unknown, "index.html", &spec).as_, None);
    }
}
