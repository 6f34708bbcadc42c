//! Resolved hint configuration for one run.

use regex::Regex;
use rustc_hash::FxHashSet;

use super::resolve::{AsValue, RelValue};
use super::select::{IncludePolicy, default_blacklist};

/// Everything the engine needs to decide which tags to emit.
///
/// Built once (from `linkhint.toml` or by hand) and never mutated while
/// documents are processed.
#[derive(Debug, Clone)]
pub struct HintSpec {
    pub rel: RelValue,
    /// `None` derives `as` from the file extension.
    pub as_: Option<AsValue>,
    pub include: IncludePolicy,
    /// Public paths matching any pattern are never hinted.
    pub file_blacklist: Vec<Regex>,
    /// Documents that receive no hints at all.
    pub exclude_html_names: FxHashSet<String>,
    /// Narrow chunk policies to what each document's entries can load.
    pub scope_to_document: bool,
}

impl Default for HintSpec {
    fn default() -> Self {
        Self {
            rel: RelValue::default(),
            as_: None,
            include: IncludePolicy::default(),
            file_blacklist: vec![default_blacklist()],
            exclude_html_names: FxHashSet::default(),
            scope_to_document: false,
        }
    }
}

impl HintSpec {
    pub fn with_rel(mut self, rel: RelValue) -> Self {
        self.rel = rel;
        self
    }

    pub fn with_as(mut self, as_: AsValue) -> Self {
        self.as_ = Some(as_);
        self
    }

    pub fn with_include(mut self, include: IncludePolicy) -> Self {
        self.include = include;
        self
    }

    pub fn with_blacklist(mut self, patterns: Vec<Regex>) -> Self {
        self.file_blacklist = patterns;
        self
    }

    pub fn exclude_html<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_html_names
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn scoped_to_document(mut self, scope: bool) -> Self {
        self.scope_to_document = scope;
        self
    }

    #[inline]
    pub fn is_excluded(&self, document: &str) -> bool {
        self.exclude_html_names.contains(document)
    }
}
