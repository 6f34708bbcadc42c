//! Candidate selection by include policy and blacklist.

use regex::Regex;
use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::LazyLock;

use super::output::{BuildOutput, BundleGraph};

/// Pattern matched against public paths to skip source maps.
pub const DEFAULT_BLACKLIST: &str = r"\.map$";

static SOURCE_MAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(DEFAULT_BLACKLIST).unwrap());

/// The blacklist used when none is configured.
pub fn default_blacklist() -> Regex {
    SOURCE_MAP.clone()
}

/// Which build outputs are eligible for hinting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IncludePolicy {
    /// Chunks loaded on demand.
    #[default]
    AsyncChunks,
    /// Every chunk, sync or async.
    AllChunks,
    /// Every emitted file, loose assets included.
    AllAssets,
    /// Chunks of the named bundles and everything they pull in.
    Bundles(Vec<String>),
}

impl IncludePolicy {
    /// Parse a policy keyword. `all` is the older spelling of `allChunks`.
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "asyncChunks" => Some(Self::AsyncChunks),
            "allChunks" | "all" => Some(Self::AllChunks),
            "allAssets" => Some(Self::AllAssets),
            _ => None,
        }
    }

}

impl fmt::Display for IncludePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AsyncChunks => f.write_str("asyncChunks"),
            Self::AllChunks => f.write_str("allChunks"),
            Self::AllAssets => f.write_str("allAssets"),
            Self::Bundles(names) => write!(f, "[{}]", names.join(", ")),
        }
    }
}

/// Select hint candidates in emission order.
///
/// Policy filtering happens first, then blacklisted paths are dropped and
/// duplicate public paths collapse onto their first occurrence.
pub fn select_candidates<'a>(
    outputs: &'a [BuildOutput],
    include: &IncludePolicy,
    blacklist: &[Regex],
    graph: &BundleGraph,
) -> Vec<&'a BuildOutput> {
    let listed = match include {
        IncludePolicy::Bundles(names) => Some(graph.reachable(names)),
        _ => None,
    };

    let mut seen = FxHashSet::default();
    outputs
        .iter()
        .filter(|output| match include {
            IncludePolicy::AsyncChunks => output.is_chunk() && output.is_async_chunk,
            IncludePolicy::AllChunks => output.is_chunk(),
            IncludePolicy::AllAssets => true,
            IncludePolicy::Bundles(_) => {
                !output.bundle_name.is_empty()
                    && listed
                        .as_ref()
                        .is_some_and(|set| set.contains(&output.bundle_name))
            }
        })
        .filter(|output| !is_blacklisted(&output.public_path, blacklist))
        .filter(|output| seen.insert(output.public_path.as_str()))
        .collect()
}

#[inline]
fn is_blacklisted(path: &str, blacklist: &[Regex]) -> bool {
    blacklist.iter().any(|re| re.is_match(path))
}
