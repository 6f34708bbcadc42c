//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Inject preload/prefetch resource hints into built HTML documents
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the manifest directory
    #[arg(short = 'C', long, global = true, default_value = "linkhint.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Insert hint tags into every document listed in the manifest
    #[command(visible_alias = "i")]
    Inject {
        /// Build manifest (JSON)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        manifest: PathBuf,

        /// Report what would change without writing any document
        #[arg(short = 'n', long)]
        dry_run: bool,

        #[command(flatten)]
        hint_args: HintArgs,
    },

    /// Print the resolved hints per document as JSON
    #[command(visible_alias = "p")]
    Plan {
        /// Build manifest (JSON)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        manifest: PathBuf,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,

        #[command(flatten)]
        hint_args: HintArgs,
    },
}

/// Shared hint arguments, overriding `[hints]` in the config file
#[derive(clap::Args, Debug, Clone, Default)]
pub struct HintArgs {
    /// `rel` token for every tag (e.g. preload, prefetch)
    #[arg(short, long)]
    pub rel: Option<String>,

    /// Include policy (asyncChunks, allChunks, allAssets) or comma-separated bundle names
    #[arg(short, long)]
    pub include: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    /// Manifest path of the active command.
    pub fn manifest(&self) -> &PathBuf {
        match &self.command {
            Commands::Inject { manifest, .. } | Commands::Plan { manifest, .. } => manifest,
        }
    }

    pub fn hint_args(&self) -> &HintArgs {
        match &self.command {
            Commands::Inject { hint_args, .. } | Commands::Plan { hint_args, .. } => hint_args,
        }
    }
}
