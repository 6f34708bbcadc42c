//! Plan command implementation.
//!
//! Prints the hints each document would receive, without touching any file.

use std::io::Write;

use anyhow::Result;

use super::Cli;
use super::common::{Session, prepare};
use crate::hint::DocumentPlan;
use crate::log;

/// Execute plan command
pub fn run_plan(cli: &Cli, pretty: bool) -> Result<()> {
    let Session {
        engine,
        outputs,
        graph,
        documents,
        ..
    } = prepare(cli)?;

    let plans = engine.plan(&outputs, &graph, &documents);
    let json = render_plan(&plans, pretty)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;

    let total: usize = plans.iter().map(|p| p.hints.len()).sum();
    log!("plan"; "{} hint(s) across {} document(s)", total, plans.len());
    Ok(())
}

fn render_plan(plans: &[DocumentPlan<'_>], pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(plans)?
    } else {
        serde_json::to_string(plans)?
    };
    Ok(json)
}
