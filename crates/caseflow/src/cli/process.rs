//! `caseflow process` — run the pipeline over one case folder.

use crate::config::CaseflowConfig;
use crate::runner::{process_case, LogSink};
use anyhow::Context;
use caseflow_model::CancelToken;
use caseflow_output::OverwritePolicy;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Table};
use std::path::Path;
use tracing::warn;

pub fn run(
    case_folder: &Path,
    output: &Path,
    policy: OverwritePolicy,
    config: CaseflowConfig,
) -> anyhow::Result<()> {
    anyhow::ensure!(
        case_folder.is_dir(),
        "case folder does not exist: {}",
        case_folder.display()
    );

    // Ctrl-C requests a graceful stop: the consolidator finishes its
    // current step and returns a partial record
    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        warn!("could not install Ctrl-C handler: {e}");
    }

    let outcome = process_case(
        case_folder,
        output,
        config.firm,
        policy,
        &LogSink,
        &cancel,
    )
    .with_context(|| format!("failed to process {}", case_folder.display()))?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Case".to_string(), outcome.case_name.clone()]);
    table.add_row(vec![
        "Documents".to_string(),
        format!(
            "{} processed, {} failed",
            outcome.documents_processed, outcome.documents_failed
        ),
    ]);
    table.add_row(vec![
        "Extraction confidence".to_string(),
        format!("{:.1}%", outcome.case.extraction_confidence),
    ]);
    table.add_row(vec![
        "Timeline confidence".to_string(),
        format!("{:.0}%", outcome.case.case_timeline.timeline_confidence),
    ]);
    table.add_row(vec![
        "Defendants".to_string(),
        outcome
            .case
            .defendants
            .iter()
            .map(|d| d.short_name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    ]);
    table.add_row(vec![
        "Legally sufficient".to_string(),
        outcome.report.is_valid.to_string(),
    ]);
    table.add_row(vec![
        "Hydrated JSON".to_string(),
        outcome.hydrated_path.display().to_string(),
    ]);
    println!("{table}");

    if !outcome.case.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &outcome.case.warnings {
            println!("  - {warning}");
        }
    }
    let issues = outcome.report.all_issues();
    if !issues.is_empty() {
        println!("\nValidation issues:");
        for issue in issues {
            println!("  - {issue}");
        }
    }

    Ok(())
}
