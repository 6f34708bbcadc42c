//! `[hints]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [hints]
//! rel = "preload"                 # any rel token
//! as = "script"                   # omit to derive from the file extension
//! include = "asyncChunks"         # asyncChunks | allChunks | all | allAssets | ["bundle", ...]
//! file_blacklist = ['\.map$']     # regex patterns, [] disables
//! exclude_html_names = ["404.html"]
//! scope_to_document = false       # narrow chunk policies per page
//!
//! [[hints.rel_rules]]             # first match wins, else `rel`
//! entry = '^/vendor'              # regex on the public path
//! document = "index.html"         # exact document name
//! rel = "prefetch"
//!
//! [[hints.as_rules]]              # first match wins, else `as` / derived
//! entry = '\.css$'
//! as = "style"
//! ```

use regex::Regex;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, ConfigError, FieldPath};
use crate::hint::select::DEFAULT_BLACKLIST;
use crate::hint::{AsValue, HintSpec, IncludePolicy, RelValue, classify};

/// Field paths of the `[hints]` section.
pub struct HintsFields {
    pub rel: FieldPath,
    pub as_: FieldPath,
    pub include: FieldPath,
    pub file_blacklist: FieldPath,
    pub exclude_html_names: FieldPath,
    pub scope_to_document: FieldPath,
    pub rel_rules: FieldPath,
    pub as_rules: FieldPath,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HintsConfig {
    /// `rel` token for every tag unless a rule says otherwise.
    pub rel: String,

    /// Fixed `as` token. `None` derives it from the file extension.
    #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
    pub as_: Option<String>,

    /// Which outputs are eligible.
    pub include: IncludeSetting,

    /// Public path patterns never hinted.
    pub file_blacklist: Vec<String>,

    /// Documents left untouched.
    pub exclude_html_names: Vec<String>,

    /// Narrow `asyncChunks`/`allChunks` to each page's own entries.
    pub scope_to_document: bool,

    pub rel_rules: Vec<RelRule>,

    pub as_rules: Vec<AsRule>,
}

impl Default for HintsConfig {
    fn default() -> Self {
        Self {
            rel: "preload".to_string(),
            as_: None,
            include: IncludeSetting::default(),
            file_blacklist: vec![DEFAULT_BLACKLIST.to_string()],
            exclude_html_names: Vec::new(),
            scope_to_document: false,
            rel_rules: Vec::new(),
            as_rules: Vec::new(),
        }
    }
}

/// `include = "keyword"` or `include = ["bundle", ...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IncludeSetting {
    Keyword(String),
    Bundles(Vec<String>),
}

impl Default for IncludeSetting {
    fn default() -> Self {
        Self::Keyword("asyncChunks".to_string())
    }
}

impl IncludeSetting {
    /// Parse a CLI value: a policy keyword or a comma-separated bundle list.
    pub fn from_cli(value: &str) -> Self {
        if IncludePolicy::from_keyword(value).is_some() {
            Self::Keyword(value.to_string())
        } else {
            Self::Bundles(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            )
        }
    }
}

/// Computed `rel`: applies when every given matcher matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelRule {
    /// Regex matched against the public path.
    #[serde(default)]
    pub entry: Option<String>,
    /// Exact document name.
    #[serde(default)]
    pub document: Option<String>,
    pub rel: String,
}

/// Computed `as`: applies when `entry` matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsRule {
    #[serde(default)]
    pub entry: Option<String>,
    #[serde(rename = "as")]
    pub as_: String,
}

struct CompiledRelRule {
    entry: Option<Regex>,
    document: Option<String>,
    rel: String,
}

struct CompiledAsRule {
    entry: Option<Regex>,
    as_: String,
}

impl HintsConfig {
    pub const FIELDS: HintsFields = HintsFields {
        rel: FieldPath::new("hints.rel"),
        as_: FieldPath::new("hints.as"),
        include: FieldPath::new("hints.include"),
        file_blacklist: FieldPath::new("hints.file_blacklist"),
        exclude_html_names: FieldPath::new("hints.exclude_html_names"),
        scope_to_document: FieldPath::new("hints.scope_to_document"),
        rel_rules: FieldPath::new("hints.rel_rules"),
        as_rules: FieldPath::new("hints.as_rules"),
    };

    /// Validate and convert into the engine's run configuration.
    ///
    /// Every problem is collected before failing so users see them all at once.
    pub fn to_spec(&self) -> Result<HintSpec, ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        check_token(&self.rel, Self::FIELDS.rel, &mut diag);
        if let Some(as_) = &self.as_ {
            check_token(as_, Self::FIELDS.as_, &mut diag);
        }

        let include = self.include_policy(&mut diag);
        let file_blacklist: Vec<Regex> = self
            .file_blacklist
            .iter()
            .filter_map(|p| compile(p, Self::FIELDS.file_blacklist, &mut diag))
            .collect();
        let rel_rules = self.compile_rel_rules(&mut diag);
        let as_rules = self.compile_as_rules(&mut diag);

        if self.scope_to_document && include == Some(IncludePolicy::AllAssets) {
            diag.warn(
                Self::FIELDS.scope_to_document,
                "has no effect with `allAssets`",
            );
        }

        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)?;

        Ok(HintSpec {
            rel: rel_value(&self.rel, rel_rules),
            as_: as_value(self.as_.as_deref(), as_rules),
            include: include.unwrap_or_default(),
            file_blacklist,
            exclude_html_names: self.exclude_html_names.iter().cloned().collect::<FxHashSet<_>>(),
            scope_to_document: self.scope_to_document,
        })
    }

    fn include_policy(&self, diag: &mut ConfigDiagnostics) -> Option<IncludePolicy> {
        match &self.include {
            IncludeSetting::Keyword(word) => {
                let policy = IncludePolicy::from_keyword(word);
                if policy.is_none() {
                    diag.error_with_hint(
                        Self::FIELDS.include,
                        format!("unknown include policy `{word}`"),
                        "use asyncChunks, allChunks, allAssets or a list of bundle names",
                    );
                }
                policy
            }
            IncludeSetting::Bundles(names) => {
                if names.is_empty() {
                    diag.warn(Self::FIELDS.include, "empty bundle list, nothing will be hinted");
                }
                Some(IncludePolicy::Bundles(names.clone()))
            }
        }
    }

    fn compile_rel_rules(&self, diag: &mut ConfigDiagnostics) -> Vec<CompiledRelRule> {
        let field = Self::FIELDS.rel_rules;
        self.rel_rules
            .iter()
            .filter_map(|rule| {
                check_token(&rule.rel, field, diag);
                let entry = match &rule.entry {
                    Some(p) => Some(compile(p, field, diag)?),
                    None => None,
                };
                Some(CompiledRelRule {
                    entry,
                    document: rule.document.clone(),
                    rel: rule.rel.clone(),
                })
            })
            .collect()
    }

    fn compile_as_rules(&self, diag: &mut ConfigDiagnostics) -> Vec<CompiledAsRule> {
        let field = Self::FIELDS.as_rules;
        self.as_rules
            .iter()
            .filter_map(|rule| {
                check_token(&rule.as_, field, diag);
                let entry = match &rule.entry {
                    Some(p) => Some(compile(p, field, diag)?),
                    None => None,
                };
                Some(CompiledAsRule {
                    entry,
                    as_: rule.as_.clone(),
                })
            })
            .collect()
    }
}

// ============================================================================
// Value construction
// ============================================================================

fn rel_value(base: &str, rules: Vec<CompiledRelRule>) -> RelValue {
    if rules.is_empty() {
        return RelValue::literal(base);
    }

    let base = base.to_string();
    RelValue::computed(move |params| {
        rules
            .iter()
            .find(|rule| {
                rule.document.as_deref().is_none_or(|d| d == params.filename)
                    && rule.entry.as_ref().is_none_or(|re| re.is_match(params.entry))
            })
            .map_or_else(|| base.clone(), |rule| rule.rel.clone())
    })
}

/// With rules and no fixed `as`, unmatched files fall back to the
/// extension-derived category, then `script`.
fn as_value(base: Option<&str>, rules: Vec<CompiledAsRule>) -> Option<AsValue> {
    if rules.is_empty() {
        return base.map(AsValue::literal);
    }

    let base = base.map(str::to_string);
    Some(AsValue::computed(move |entry| {
        rules
            .iter()
            .find(|rule| rule.entry.as_ref().is_none_or(|re| re.is_match(entry)))
            .map(|rule| rule.as_.clone())
            .or_else(|| base.clone())
            .unwrap_or_else(|| {
                classify(entry).map_or("script", |k| k.as_str()).to_string()
            })
    }))
}

// ============================================================================
// Checks
// ============================================================================

/// `rel`/`as` tokens end up inside a quoted attribute.
fn check_token(token: &str, field: FieldPath, diag: &mut ConfigDiagnostics) {
    if token.trim().is_empty() {
        diag.error(field, "must not be empty");
    } else if token.chars().any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>')) {
        diag.error(field, format!("`{token}` is not a valid attribute token"));
    }
}

fn compile(pattern: &str, field: FieldPath, diag: &mut ConfigDiagnostics) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            diag.error(field, format!("invalid pattern `{pattern}`: {e}"));
            None
        }
    }
}
