//! Per-file document processor.
//!
//! Routes a file to the decoder claiming its extension, runs the date
//! recognizer over the decoded text, scores extraction quality, and
//! emits `document_start` / `document_complete` / `document_error`
//! events. Processing never panics: every failure becomes a
//! `success == false` result.

use crate::dates::DateRecognizer;
use crate::decoder::DecoderRegistry;
use crate::entity::EntityRecognizer;
use caseflow_events::EventBroadcaster;
use caseflow_model::{ExtractionResult, QualityMetrics};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Processes one file into an [`ExtractionResult`].
pub struct DocumentProcessor {
    decoders: DecoderRegistry,
    date_recognizer: DateRecognizer,
    entity_recognizer: EntityRecognizer,
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentProcessor {
    pub fn new() -> Self {
        Self {
            decoders: DecoderRegistry::standard(),
            date_recognizer: DateRecognizer::new(),
            entity_recognizer: EntityRecognizer::new(),
        }
    }

    /// Processor with a custom decoder set.
    pub fn with_decoders(decoders: DecoderRegistry) -> Self {
        Self {
            decoders,
            date_recognizer: DateRecognizer::new(),
            entity_recognizer: EntityRecognizer::new(),
        }
    }

    /// Process `path`, reporting progress through `events`.
    pub fn process(&self, path: &Path, events: &EventBroadcaster<'_>) -> ExtractionResult {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        events.document_start(&file_name);
        let start = Instant::now();

        let mut result = match self.decoders.decode(path) {
            Ok((document, engine_name)) => {
                let mut result = ExtractionResult::success(path, engine_name, document.text);
                result.metadata = document.metadata;
                result
            }
            Err(error) => {
                warn!("extraction failed for {}: {error}", path.display());
                let result = ExtractionResult::failure(path, "none", error.to_string());
                events.document_error(&file_name, error.to_string());
                return finish(result, start);
            }
        };

        let document_type = document_type_from_filename(&file_name);
        result.extracted_dates = self
            .date_recognizer
            .extract_dates(&result.extracted_text, document_type);
        result.quality_metrics = self.score_quality(&result.extracted_text);

        info!(
            "processed {} via {}: quality {:.0}/100, {} dates",
            file_name,
            result.engine_name,
            result.quality_metrics.quality_score,
            result.extracted_dates.len()
        );
        events.document_complete(
            &file_name,
            format!("quality {:.0}/100", result.quality_metrics.quality_score),
        );
        finish(result, start)
    }

    /// Quality metrics over the extracted text, 0-100 composite.
    ///
    /// Volume (up to 40), line structure (up to 20), printable ratio
    /// (up to 10), legal-content indicators via the document-structure
    /// score (up to 30).
    fn score_quality(&self, text: &str) -> QualityMetrics {
        let text_length = text.chars().count();
        let line_count = text.lines().filter(|l| !l.trim().is_empty()).count();
        let printable = text
            .chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .count();
        let printable_ratio = if text_length == 0 {
            0.0
        } else {
            printable as f64 / text_length as f64
        };

        let structure = self.entity_recognizer.structure_score(text);
        let legal_indicators = (structure / 5.0).round() as usize;

        let volume_score = ((text_length as f64 / 2000.0) * 40.0).min(40.0);
        let line_score = ((line_count as f64 / 30.0) * 20.0).min(20.0);
        let printable_score = printable_ratio * 10.0;
        let structure_component = (structure / 100.0) * 30.0;

        QualityMetrics {
            quality_score: (volume_score + line_score + printable_score + structure_component)
                .min(100.0),
            text_length,
            line_count,
            printable_ratio,
            legal_indicators,
        }
    }
}

fn finish(mut result: ExtractionResult, start: Instant) -> ExtractionResult {
    result.processing_time_ms = start.elapsed().as_millis() as u64;
    result
}

/// Document type inferred from the filename, used to sharpen date
/// context classification downstream.
pub fn document_type_from_filename(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();
    if ["denial", "adverse_action", "adverse-action"]
        .iter()
        .any(|t| lower.contains(t))
    {
        "denial_letter"
    } else if lower.contains("dispute") || lower.contains("challenge") {
        "dispute_correspondence"
    } else if lower.contains("notice") || lower.contains("notification") {
        "notice_letter"
    } else if lower.contains("application") || lower.contains("request") {
        "application_document"
    } else if lower.contains("summons") || lower.contains("complaint") {
        "legal_filing"
    } else if lower.contains("statement") || lower.contains("account") {
        "account_statement"
    } else if lower.contains("atty_notes") || lower.contains("attorney_notes") {
        "attorney_notes"
    } else if lower.contains("correspondence") || lower.contains("letter") {
        "correspondence"
    } else {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseflow_events::{EventKind, MemorySink};
    use tempfile::TempDir;

    #[test]
    fn test_process_text_file_emits_events() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Atty_Notes.txt");
        std::fs::write(
            &path,
            "CASE_NUMBER: 1:25-cv-01987\nDISPUTE_DATE: 2024-12-09\nPlaintiff disputed the account.\n",
        )
        .unwrap();

        let sink = MemorySink::new();
        let broadcaster = EventBroadcaster::new(&sink, "case");
        let processor = DocumentProcessor::new();
        let result = processor.process(&path, &broadcaster);

        assert!(result.success);
        assert_eq!(result.engine_name, "text");
        assert!(!result.extracted_dates.is_empty());
        assert!(result.quality_metrics.quality_score > 0.0);

        let kinds: Vec<EventKind> = sink.events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::DocumentStart, EventKind::DocumentComplete]);
    }

    #[test]
    fn test_process_unsupported_file_emits_error_event() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::write(&path, b"not a document").unwrap();

        let sink = MemorySink::new();
        let broadcaster = EventBroadcaster::new(&sink, "case");
        let result = DocumentProcessor::new().process(&path, &broadcaster);

        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("Unsupported"));
        let kinds: Vec<EventKind> = sink.events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::DocumentStart, EventKind::DocumentError]);
    }

    #[test]
    fn test_document_type_from_filename() {
        assert_eq!(
            document_type_from_filename("Equifax_Denial_Letter.pdf"),
            "denial_letter"
        );
        assert_eq!(document_type_from_filename("Atty_Notes.txt"), "attorney_notes");
        assert_eq!(document_type_from_filename("Summons_TransUnion.pdf"), "legal_filing");
        assert_eq!(document_type_from_filename("random.txt"), "unknown");
    }

    #[test]
    fn test_quality_score_scales_with_content() {
        let processor = DocumentProcessor::new();
        let thin = processor.score_quality("short text here");
        let rich = processor.score_quality(&format!(
            "UNITED STATES DISTRICT COURT\nCase No. 1:25-cv-01987\nCOMPLAINT\n{}",
            "Plaintiff alleges the following facts in support of the claims.\n".repeat(40)
        ));
        assert!(rich.quality_score > thin.quality_score);
        assert!(rich.legal_indicators > 0);
    }
}
