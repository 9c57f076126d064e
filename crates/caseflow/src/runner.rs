//! Pipeline runner: one case folder in, one output tree out.
//!
//! Scans the folder for processable files, runs the document processor
//! over each, consolidates, validates, and persists every artifact.
//! Extraction order is lexicographic by filename so repeated runs are
//! deterministic.

use caseflow_consolidate::{CaseConsolidator, FirmSettings};
use caseflow_events::{EventBroadcaster, EventSink, ProcessingEvent};
use caseflow_extract::{DecoderRegistry, DocumentProcessor};
use caseflow_model::{CancelToken, ConsolidatedCase, ExtractionResult};
use caseflow_output::{case_folder_name, OutputManager, OverwritePolicy};
use caseflow_schema::{build_hydrated_case, write_hydrated_json};
use caseflow_validate::{validate_case, ValidationReport};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Outcome of one case run, for display and exit-code decisions.
pub struct CaseOutcome {
    pub case_name: String,
    pub case: ConsolidatedCase,
    pub report: ValidationReport,
    pub hydrated_path: PathBuf,
    pub documents_processed: usize,
    pub documents_failed: usize,
}

/// Sink that forwards events to the tracing subscriber.
pub struct LogSink;

impl EventSink for LogSink {
    fn publish(&self, event: &ProcessingEvent) {
        match serde_json::to_string(event) {
            Ok(json) => debug!(target: "caseflow::events", "{json}"),
            Err(e) => warn!("failed to serialize event: {e}"),
        }
    }
}

/// Process one case folder end to end.
pub fn process_case(
    folder: &Path,
    output_root: &Path,
    settings: FirmSettings,
    policy: OverwritePolicy,
    sink: &dyn EventSink,
    cancel: &CancelToken,
) -> anyhow::Result<CaseOutcome> {
    let case_id = folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| folder.display().to_string());
    let events = EventBroadcaster::new(sink, &case_id);
    events.case_start(format!("processing {}", folder.display()));

    // Scan for processable files
    let registry = DecoderRegistry::standard();
    let supported = registry.supported_extensions();
    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .map(|e| supported.contains(&e.to_string_lossy().to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    info!("found {} processable files in {}", files.len(), folder.display());

    // Extract each document
    let processor = DocumentProcessor::new();
    let results: Vec<ExtractionResult> = files
        .iter()
        .map(|path| processor.process(path, &events))
        .collect();
    let failed = results.iter().filter(|r| !r.success).count();

    // Consolidate
    let consolidator = CaseConsolidator::new(settings);
    let mut case = consolidator.consolidate(folder, &results, sink, cancel);

    // Hydrate and validate
    let case_name = case_folder_name(&case);
    let hydrated = build_hydrated_case(&case);
    let report = validate_case(&hydrated);
    for issue in report.all_issues() {
        debug!("validation issue: {issue}");
    }

    // Persist the output tree
    let output = OutputManager::new(output_root, policy);
    let dirs = output.create_case_dirs(&case_name)?;
    for result in results.iter().filter(|r| r.success) {
        output.save_document(&dirs, result)?;
    }
    let hydrated_path =
        write_hydrated_json(&hydrated, &case_name, &dirs.case_root, &mut case.warnings)?;
    output.save_case_artifacts(&dirs, &case)?;

    Ok(CaseOutcome {
        case_name,
        case,
        report,
        hydrated_path,
        documents_processed: results.len() - failed,
        documents_failed: failed,
    })
}
