//! Per-document extraction results.
//!
//! An [`ExtractionResult`] is produced once per input file by the
//! document processor and is immutable from then on. The consolidator
//! consumes a slice of them and never mutates the originals.

use crate::dates::ExtractedDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Quality metrics for one extracted document.
///
/// `quality_score` is a 0-100 composite of text volume, line structure
/// and legal-content indicators; the remaining fields are the raw
/// measurements it was derived from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Composite score, 0-100
    pub quality_score: f64,
    /// Characters of extracted text
    pub text_length: usize,
    /// Non-empty lines in the extracted text
    pub line_count: usize,
    /// Ratio of printable (non-control) characters, 0.0-1.0
    pub printable_ratio: f64,
    /// Count of canonical legal-document markers found in the text
    pub legal_indicators: usize,
}

/// Output of processing a single input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Original path of the source file
    pub file_path: String,
    /// Base name of the source file
    pub file_name: String,
    /// Whether extraction succeeded
    pub success: bool,
    /// Extracted plain text (empty on failure)
    pub extracted_text: String,
    /// Error message when `success` is false
    pub error: Option<String>,
    /// Decoder-specific metadata (page count, author, ...)
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Quality metrics for the extracted text
    #[serde(default)]
    pub quality_metrics: QualityMetrics,
    /// Dates recognized in the text, with provenance
    #[serde(default)]
    pub extracted_dates: Vec<ExtractedDate>,
    /// Wall-clock processing time in milliseconds
    pub processing_time_ms: u64,
    /// Name of the decoder that produced the text
    pub engine_name: String,
}

impl ExtractionResult {
    /// Create a successful result for `path` with the given text.
    pub fn success(path: &Path, engine_name: &str, text: String) -> Self {
        Self {
            file_path: path.display().to_string(),
            file_name: file_name_of(path),
            success: true,
            extracted_text: text,
            error: None,
            metadata: BTreeMap::new(),
            quality_metrics: QualityMetrics::default(),
            extracted_dates: Vec::new(),
            processing_time_ms: 0,
            engine_name: engine_name.to_string(),
        }
    }

    /// Create a failed result for `path` with an error message.
    pub fn failure(path: &Path, engine_name: &str, error: impl Into<String>) -> Self {
        Self {
            file_path: path.display().to_string(),
            file_name: file_name_of(path),
            success: false,
            extracted_text: String::new(),
            error: Some(error.into()),
            metadata: BTreeMap::new(),
            quality_metrics: QualityMetrics::default(),
            extracted_dates: Vec::new(),
            processing_time_ms: 0,
            engine_name: engine_name.to_string(),
        }
    }

    /// Lowercased base name, used for filename-driven routing.
    pub fn file_name_lower(&self) -> String {
        self.file_name.to_lowercase()
    }

    /// Whether this result names the attorney-notes document.
    pub fn is_attorney_notes(&self) -> bool {
        self.file_name_lower().contains("atty_notes")
    }

    /// Whether this result names a summons document.
    pub fn is_summons(&self) -> bool {
        self.file_name_lower().contains("summons")
    }

    /// Whether this result looks like a denial / adverse-action letter.
    pub fn is_denial_letter(&self) -> bool {
        let name = self.file_name_lower();
        ["denial", "adverse", "rejection"]
            .iter()
            .any(|kw| name.contains(kw))
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_success_result_fields() {
        let path = PathBuf::from("/cases/youssef/Atty_Notes.txt");
        let result = ExtractionResult::success(&path, "text", "NAME: Eman".into());
        assert!(result.success);
        assert_eq!(result.file_name, "Atty_Notes.txt");
        assert!(result.is_attorney_notes());
        assert!(!result.is_summons());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_failure_result_fields() {
        let path = PathBuf::from("broken.pdf");
        let result = ExtractionResult::failure(&path, "pdf", "tool crashed");
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("tool crashed"));
        assert!(result.extracted_text.is_empty());
    }

    #[test]
    fn test_denial_letter_detection() {
        let path = PathBuf::from("Equifax_Denial_Letter.pdf");
        let result = ExtractionResult::success(&path, "pdf", String::new());
        assert!(result.is_denial_letter());
    }
}
