//! Case output tree.
//!
//! Lays out `<output_root>/cases/<case_name>/{processed,raw_text,metadata}/`
//! on demand and persists per-document and case-level artifacts under
//! the documented naming convention (case base name plus original
//! extension; no timestamps in filenames). The overwrite policy is
//! caller-supplied.

pub mod formatters;
pub mod naming;

pub use naming::case_folder_name;

use caseflow_model::{ConsolidatedCase, ExtractionResult};
use formatters::{Formatter, JsonFormatter, MarkdownFormatter, TextFormatter};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// What to do when a target file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// Append `_vN` with the smallest unused N
    #[default]
    Version,
    /// Replace the existing file
    Overwrite,
    /// Refuse to write
    Error,
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Refusing to overwrite existing file: {0}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Paths of one case's output directories.
#[derive(Debug, Clone)]
pub struct CaseDirs {
    pub case_root: PathBuf,
    pub processed: PathBuf,
    pub raw_text: PathBuf,
    pub metadata: PathBuf,
}

/// Writes and organizes all on-disk case artifacts.
pub struct OutputManager {
    output_root: PathBuf,
    policy: OverwritePolicy,
}

impl OutputManager {
    pub fn new(output_root: impl Into<PathBuf>, policy: OverwritePolicy) -> Self {
        Self {
            output_root: output_root.into(),
            policy,
        }
    }

    /// Create (idempotently) the directory tree for `case_name`.
    pub fn create_case_dirs(&self, case_name: &str) -> Result<CaseDirs, OutputError> {
        let case_root = self.output_root.join("cases").join(case_name);
        let dirs = CaseDirs {
            processed: case_root.join("processed"),
            raw_text: case_root.join("raw_text"),
            metadata: case_root.join("metadata"),
            case_root,
        };
        for dir in [&dirs.case_root, &dirs.processed, &dirs.raw_text, &dirs.metadata] {
            std::fs::create_dir_all(dir)?;
        }
        debug!("created case directory structure at {}", dirs.case_root.display());
        Ok(dirs)
    }

    /// Persist one successful extraction: formatted renderings in
    /// `processed/`, raw text in `raw_text/`, a metadata record in
    /// `metadata/`. Returns the written paths keyed by artifact kind.
    pub fn save_document(
        &self,
        dirs: &CaseDirs,
        result: &ExtractionResult,
    ) -> Result<BTreeMap<String, PathBuf>, OutputError> {
        let base = file_stem(&result.file_name);
        let mut saved = BTreeMap::new();

        let formatters: [&dyn Formatter; 3] =
            [&TextFormatter, &JsonFormatter, &MarkdownFormatter];
        for formatter in formatters {
            let target = self.resolve(
                dirs.processed
                    .join(format!("{base}.{}", formatter.extension())),
            )?;
            std::fs::write(&target, formatter.format(result))?;
            saved.insert(formatter.extension().to_string(), target);
        }

        if result.success && !result.extracted_text.is_empty() {
            let raw_target = self.resolve(dirs.raw_text.join(format!("{base}_raw.txt")))?;
            std::fs::write(&raw_target, &result.extracted_text)?;
            saved.insert("raw_text".to_string(), raw_target);
        }

        let metadata = json!({
            "file_info": {
                "original_path": result.file_path,
                "file_name": result.file_name,
            },
            "processing_result": {
                "success": result.success,
                "engine_used": result.engine_name,
                "processing_time_ms": result.processing_time_ms,
                "error": result.error,
            },
            "quality_metrics": result.quality_metrics,
            "extraction_metadata": result.metadata,
        });
        let metadata_target =
            self.resolve(dirs.metadata.join(format!("{base}_metadata.json")))?;
        std::fs::write(&metadata_target, serde_json::to_string_pretty(&metadata)?)?;
        saved.insert("metadata".to_string(), metadata_target);

        info!("saved {} artifacts for {}", saved.len(), result.file_name);
        Ok(saved)
    }

    /// Persist the case-level artifacts: `case_info.json`,
    /// `complaint.json` and `case_summary.md` at the case root.
    pub fn save_case_artifacts(
        &self,
        dirs: &CaseDirs,
        case: &ConsolidatedCase,
    ) -> Result<BTreeMap<String, PathBuf>, OutputError> {
        let mut saved = BTreeMap::new();

        let case_info = json!({
            "case_id": case.case_id,
            "case_information": case.case_information,
            "extraction_confidence": case.extraction_confidence,
            "source_documents": case.source_documents,
            "consolidation_timestamp": case.consolidation_timestamp,
            "warnings": case.warnings,
        });
        let info_target = self.resolve(dirs.case_root.join("case_info.json"))?;
        std::fs::write(&info_target, serde_json::to_string_pretty(&case_info)?)?;
        saved.insert("case_info".to_string(), info_target);

        let complaint_target = self.resolve(dirs.case_root.join("complaint.json"))?;
        std::fs::write(&complaint_target, serde_json::to_string_pretty(case)?)?;
        saved.insert("complaint".to_string(), complaint_target);

        let summary_target = self.resolve(dirs.case_root.join("case_summary.md"))?;
        std::fs::write(&summary_target, case_summary_markdown(case))?;
        saved.insert("summary".to_string(), summary_target);

        Ok(saved)
    }

    /// The case root for hydrated-JSON placement by the schema writer.
    pub fn case_root(&self, case_name: &str) -> PathBuf {
        self.output_root.join("cases").join(case_name)
    }

    /// Apply the overwrite policy to a target path.
    fn resolve(&self, path: PathBuf) -> Result<PathBuf, OutputError> {
        if !path.exists() {
            return Ok(path);
        }
        match self.policy {
            OverwritePolicy::Overwrite => Ok(path),
            OverwritePolicy::Error => Err(OutputError::AlreadyExists(path)),
            OverwritePolicy::Version => Ok(versioned_path(&path)),
        }
    }
}

/// Smallest-unused `_vN` variant of `path`.
fn versioned_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    let mut version = 1;
    loop {
        let candidate = parent.join(format!("{stem}_v{version}{extension}"));
        if !candidate.exists() {
            return candidate;
        }
        version += 1;
    }
}

fn file_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}

/// Human-readable case summary for counsel review.
fn case_summary_markdown(case: &ConsolidatedCase) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Case Summary: {}\n\n", case.case_id));
    out.push_str(&format!(
        "**Extraction confidence:** {:.1}%\n\n",
        case.extraction_confidence
    ));

    if let Some(plaintiff) = &case.plaintiff {
        out.push_str(&format!("**Plaintiff:** {}\n\n", plaintiff.name));
    }
    if !case.defendants.is_empty() {
        out.push_str("## Defendants\n\n");
        for defendant in &case.defendants {
            out.push_str(&format!(
                "- {} ({})\n",
                defendant.name, defendant.defendant_type
            ));
        }
        out.push('\n');
    }

    out.push_str("## Timeline\n\n");
    for (label, value) in [
        ("Discovery", &case.case_timeline.discovery_date),
        ("Dispute", &case.case_timeline.dispute_date),
        ("Filing", &case.case_timeline.filing_date),
    ] {
        out.push_str(&format!(
            "- {label}: {}\n",
            value.as_deref().unwrap_or("unknown")
        ));
    }
    let validation = &case.case_timeline.chronological_validation;
    out.push_str(&format!(
        "- Chronology valid: {} ({} errors, {} warnings)\n\n",
        validation.is_valid,
        validation.errors.len(),
        validation.warnings.len()
    ));

    if !case.warnings.is_empty() {
        out.push_str("## Warnings\n\n");
        for warning in &case.warnings {
            out.push_str(&format!("- {warning}\n"));
        }
    }
    out
}
