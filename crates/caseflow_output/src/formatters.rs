//! Per-document output formatters.
//!
//! Each successful extraction is persisted in three renderings: a
//! human-readable text report, the raw JSON record, and a Markdown
//! summary for review in the dashboard repo viewer.

use caseflow_model::ExtractionResult;

/// Renders one extraction result to a string.
pub trait Formatter {
    fn extension(&self) -> &'static str;
    fn format(&self, result: &ExtractionResult) -> String;
}

/// Plain-text report.
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn format(&self, result: &ExtractionResult) -> String {
        let mut out = String::new();
        out.push_str(&format!("Document: {}\n", result.file_name));
        out.push_str(&format!("Engine: {}\n", result.engine_name));
        out.push_str(&format!("Success: {}\n", result.success));
        if let Some(error) = &result.error {
            out.push_str(&format!("Error: {error}\n"));
        }
        out.push_str(&format!(
            "Quality: {:.0}/100 ({} chars, {} lines)\n",
            result.quality_metrics.quality_score,
            result.quality_metrics.text_length,
            result.quality_metrics.line_count
        ));
        out.push_str(&format!(
            "Processing time: {} ms\n\n",
            result.processing_time_ms
        ));
        out.push_str(&result.extracted_text);
        out
    }
}

/// Raw JSON record of the extraction result.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn format(&self, result: &ExtractionResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|e| {
            format!("{{\"error\": \"failed to serialize extraction result: {e}\"}}")
        })
    }
}

/// Markdown summary with extraction details up front.
pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn format(&self, result: &ExtractionResult) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", result.file_name));
        out.push_str(&format!(
            "- **Engine:** {}\n- **Success:** {}\n- **Quality:** {:.0}/100\n- **Dates found:** {}\n",
            result.engine_name,
            result.success,
            result.quality_metrics.quality_score,
            result.extracted_dates.len()
        ));
        if let Some(error) = &result.error {
            out.push_str(&format!("- **Error:** {error}\n"));
        }
        if !result.metadata.is_empty() {
            out.push_str("\n## Metadata\n\n");
            for (key, value) in &result.metadata {
                out.push_str(&format!("- {key}: {value}\n"));
            }
        }
        out.push_str("\n## Extracted Text\n\n```\n");
        out.push_str(&result.extracted_text);
        out.push_str("\n```\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample() -> ExtractionResult {
        let mut result = ExtractionResult::success(
            &PathBuf::from("Atty_Notes.txt"),
            "text",
            "NAME: Eman Youssef".to_string(),
        );
        result.quality_metrics.quality_score = 72.0;
        result
    }

    #[test]
    fn test_text_format_includes_body() {
        let formatted = TextFormatter.format(&sample());
        assert!(formatted.contains("Document: Atty_Notes.txt"));
        assert!(formatted.contains("NAME: Eman Youssef"));
        assert_eq!(TextFormatter.extension(), "txt");
    }

    #[test]
    fn test_json_format_parses_back() {
        let formatted = JsonFormatter.format(&sample());
        let parsed: ExtractionResult = serde_json::from_str(&formatted).unwrap();
        assert_eq!(parsed.file_name, "Atty_Notes.txt");
    }

    #[test]
    fn test_markdown_format_has_heading() {
        let formatted = MarkdownFormatter.format(&sample());
        assert!(formatted.starts_with("# Atty_Notes.txt"));
        assert!(formatted.contains("**Quality:** 72/100"));
    }
}
