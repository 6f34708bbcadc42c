//! linkhint - inject preload/prefetch hints into built HTML documents.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use linkhint::cli::{Cli, Commands, inject::run_inject, plan::run_plan};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    match &cli.command {
        Commands::Inject { dry_run, .. } => run_inject(&cli, *dry_run),
        Commands::Plan { pretty, .. } => run_plan(&cli, *pretty),
    }
}
