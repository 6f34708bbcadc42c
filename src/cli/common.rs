//! Shared setup for the `inject` and `plan` commands.

use std::path::Path;

use anyhow::{Context, Result};

use super::Cli;
use crate::config::LinkhintConfig;
use crate::hint::{BuildOutput, BundleGraph, HintEngine, HtmlDocument};
use crate::manifest::Manifest;
use crate::{debug, logger};

/// Everything a command needs for one build pass.
pub struct Session {
    pub engine: HintEngine,
    pub manifest: Manifest,
    pub outputs: Vec<BuildOutput>,
    pub graph: BundleGraph,
    pub documents: Vec<HtmlDocument>,
}

/// Load config and manifest, apply CLI overrides and read every document.
///
/// Nothing is written here; any error aborts before a document is touched.
pub fn prepare(cli: &Cli) -> Result<Session> {
    let args = cli.hint_args();
    logger::set_verbose(args.verbose);

    let manifest_path = cli.manifest();
    let manifest = Manifest::load(manifest_path)
        .with_context(|| format!("failed to load manifest `{}`", manifest_path.display()))?;

    let mut config = LinkhintConfig::load(&cli.config, config_search_dir(&manifest.root))?;
    config.apply_hint_args(args);
    if let Some(path) = &config.config_path {
        debug!("config"; "using {}", path.display());
    }
    let spec = config.hint_spec()?;

    let documents = manifest.load_documents()?;
    debug!(
        "manifest";
        "{} output(s), {} document(s)",
        manifest.outputs.len(),
        documents.len()
    );

    Ok(Session {
        engine: HintEngine::new(spec),
        outputs: manifest.outputs(),
        graph: manifest.graph(),
        documents,
        manifest,
    })
}

/// A bare `manifest.json` has an empty parent.
fn config_search_dir(manifest_root: &Path) -> &Path {
    if manifest_root.as_os_str().is_empty() {
        Path::new(".")
    } else {
        manifest_root
    }
}
