//! Inject command implementation.

use anyhow::Result;

use super::Cli;
use super::common::{Session, prepare};
use crate::hint::RunReport;
use crate::log;

/// Execute inject command
pub fn run_inject(cli: &Cli, dry_run: bool) -> Result<()> {
    let Session {
        engine,
        manifest,
        outputs,
        graph,
        mut documents,
    } = prepare(cli)?;

    let report = engine.run(&outputs, &graph, &mut documents);
    for warning in &report.warnings {
        log!("warning"; "{}", warning);
    }

    if dry_run {
        for doc in report.changed() {
            log!("inject"; "{}: {} hint(s) (dry run)", doc.name, doc.hints);
        }
        log!("inject"; "{}", summary(&report));
        return Ok(());
    }

    let written = manifest.write_documents(&documents, &report)?;
    log!("inject"; "{}, {} file(s) written", summary(&report), written);
    Ok(())
}

fn summary(report: &RunReport) -> String {
    let skipped = report.documents.iter().filter(|d| d.skipped).count();
    format!(
        "{} hint(s) in {} of {} document(s), {} excluded",
        report.total_hints(),
        report.changed().count(),
        report.documents.len(),
        skipped
    )
}
