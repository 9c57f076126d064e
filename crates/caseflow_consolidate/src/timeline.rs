//! Case timeline construction and chronological validation.
//!
//! Dates from every document are aggregated with provenance, key
//! timeline dates are chosen (attorney-notes labels win, otherwise the
//! highest-confidence date of matching context), denial-letter dates
//! are cross-referenced into damage events, and the chronology business
//! rules are checked. Key dates keep their source representation; the
//! permissive parser is used only for comparisons.

use caseflow_extract::processor::document_type_from_filename;
use caseflow_extract::DateRecognizer;
use caseflow_model::{
    parse_flexible_date, CaseTimeline, DamageEvent, DateContext, ExtractedDate,
    ExtractionResult,
};
use chrono::{Datelike, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Minimum confidence for a document date to drive a key timeline date.
const KEY_DATE_MIN_CONFIDENCE: f64 = 0.6;

/// Build the case timeline from document dates and attorney-notes key
/// dates.
pub fn build_timeline(
    results: &[ExtractionResult],
    notes_dates: &BTreeMap<String, String>,
    recognizer: &DateRecognizer,
) -> CaseTimeline {
    let mut timeline = CaseTimeline::default();

    // 1. Aggregate dates from every successful document, with source
    let mut all_dates: Vec<ExtractedDate> = Vec::new();
    for result in results.iter().filter(|r| r.success) {
        let document_type = document_type_from_filename(&result.file_name);
        let dates = if result.extracted_dates.is_empty() {
            // Result arrived without pre-computed findings; recognize here
            recognizer.extract_dates(&result.extracted_text, document_type)
        } else {
            result.extracted_dates.clone()
        };
        for mut date in dates {
            date.source_document = Some(result.file_path.clone());
            all_dates.push(date);
        }
    }
    debug!("aggregated {} document dates", all_dates.len());

    // 2-3. Key dates: notes labels win, documents fall back
    timeline.discovery_date = notes_dates
        .get("discovery_date")
        .cloned()
        .or_else(|| best_document_date(&all_dates, DateContext::DiscoveryDate));
    timeline.dispute_date = notes_dates
        .get("dispute_date")
        .cloned()
        .or_else(|| best_document_date(&all_dates, DateContext::DisputeDate));
    timeline.filing_date = notes_dates
        .get("filing_date")
        .cloned()
        .or_else(|| best_document_date(&all_dates, DateContext::FilingDate));

    // Damage events from explicitly classified damage dates
    for date in all_dates
        .iter()
        .filter(|d| d.context == DateContext::DamageEventDate)
    {
        timeline.damage_events.push(DamageEvent {
            date: date.parsed_date.map(|d| d.to_string()),
            description: format!(
                "Damage event from {}",
                base_name(date.source_document.as_deref().unwrap_or(""))
            ),
            source: date.source_document.clone().unwrap_or_default(),
            confidence: date.confidence,
            evidence_type: None,
        });
    }

    // 4. Cross-reference: denial-letter denial/adverse dates are damage
    //    events backed by the letter itself
    for date in &all_dates {
        let source = date.source_document.as_deref().unwrap_or("");
        if document_type_from_filename(&base_name(source)) != "denial_letter" {
            continue;
        }
        if matches!(
            date.context,
            DateContext::DenialDate | DateContext::AdverseActionDate
        ) {
            timeline.damage_events.push(DamageEvent {
                date: date.parsed_date.map(|d| d.to_string()),
                description: "Credit denial/adverse action".to_string(),
                source: source.to_string(),
                confidence: date.confidence,
                evidence_type: Some("denial_letter".to_string()),
            });
        }
    }

    timeline.document_dates = all_dates;

    // 5-6. Validate and score
    validate_chronology(&mut timeline, notes_dates);
    timeline.timeline_confidence = timeline_confidence(&timeline);

    info!(
        "timeline built: {} dates, {} damage events, confidence {:.0}",
        timeline.document_dates.len(),
        timeline.damage_events.len(),
        timeline.timeline_confidence
    );
    timeline
}

fn best_document_date(dates: &[ExtractedDate], context: DateContext) -> Option<String> {
    dates
        .iter()
        .filter(|d| d.context == context && d.confidence > KEY_DATE_MIN_CONFIDENCE)
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
        .and_then(|d| d.parsed_date)
        .map(|d| d.to_string())
}

/// Chronology business rules. Errors flip `is_valid`; warnings do not.
fn validate_chronology(timeline: &mut CaseTimeline, notes_dates: &BTreeMap<String, String>) {
    let mut validation = std::mem::take(&mut timeline.chronological_validation);
    let today = Utc::now().date_naive();

    let discovery = parse_key_date(timeline.discovery_date.as_deref(), "discovery", &mut validation);
    let dispute = parse_key_date(timeline.dispute_date.as_deref(), "dispute", &mut validation);
    let filing = parse_key_date(timeline.filing_date.as_deref(), "filing", &mut validation);

    // R1: discovery precedes dispute
    if let (Some(discovery), Some(dispute)) = (discovery, dispute) {
        if discovery > dispute {
            validation.error(format!(
                "Discovery date ({}) is after dispute date ({})",
                timeline.discovery_date.as_deref().unwrap_or(""),
                timeline.dispute_date.as_deref().unwrap_or("")
            ));
        }
    }

    // R2: dispute precedes filing
    if let (Some(dispute), Some(filing)) = (dispute, filing) {
        if dispute > filing {
            validation.error(format!(
                "Dispute date ({}) is after filing date ({})",
                timeline.dispute_date.as_deref().unwrap_or(""),
                timeline.filing_date.as_deref().unwrap_or("")
            ));
        }
    }

    // R3: damage events precede filing
    if let Some(filing) = filing {
        for event in &timeline.damage_events {
            if let Some(event_date) = event.date.as_deref().and_then(parse_flexible_date) {
                if event_date > filing {
                    validation.warning(format!(
                        "Damage event ({}) is after filing date ({})",
                        event.date.as_deref().unwrap_or(""),
                        timeline.filing_date.as_deref().unwrap_or("")
                    ));
                }
            }
        }
    }

    // R4: no document date in the future
    for date in &timeline.document_dates {
        if let Some(parsed) = date.parsed_date {
            if parsed > today {
                validation.warning(format!(
                    "Future date found: {} in {}",
                    parsed,
                    base_name(date.source_document.as_deref().unwrap_or(""))
                ));
            }
        }
    }

    // R5: application precedes denial within the same document
    let mut by_document: BTreeMap<&str, Vec<&ExtractedDate>> = BTreeMap::new();
    for date in &timeline.document_dates {
        by_document
            .entry(date.source_document.as_deref().unwrap_or(""))
            .or_default()
            .push(date);
    }
    for dates in by_document.values() {
        let applications = dates
            .iter()
            .filter(|d| d.context == DateContext::ApplicationDate)
            .filter_map(|d| d.parsed_date);
        for application in applications {
            for denial in dates
                .iter()
                .filter(|d| d.context == DateContext::DenialDate)
                .filter_map(|d| d.parsed_date)
            {
                if application > denial {
                    validation.error(format!(
                        "Application date ({application}) is after denial date ({denial})"
                    ));
                }
            }
        }
    }

    // R6: dispute precedes the latest damage event
    if let Some(dispute) = dispute {
        let latest_damage = timeline
            .document_dates
            .iter()
            .filter(|d| {
                matches!(
                    d.context,
                    DateContext::DenialDate | DateContext::DamageEventDate
                )
            })
            .filter_map(|d| d.parsed_date)
            .max();
        if let Some(latest) = latest_damage {
            if dispute > latest {
                validation.warning(format!(
                    "Dispute date ({}) is after latest damage event ({latest})",
                    timeline.dispute_date.as_deref().unwrap_or("")
                ));
            }
        }
    }

    // R7: plausible year floor
    for date in &timeline.document_dates {
        if let Some(parsed) = date.parsed_date {
            if parsed.year() < 1990 {
                validation.warning(format!(
                    "Implausibly old date: {} in {}",
                    parsed,
                    base_name(date.source_document.as_deref().unwrap_or(""))
                ));
            }
        }
    }

    // Unparseable application/denial labels from the notes also fail
    for label in ["application_date", "denial_date"] {
        if let Some(raw) = notes_dates.get(label) {
            if parse_flexible_date(raw).is_none() {
                validation.error(format!("Unparseable {label} in attorney notes: '{raw}'"));
            }
        }
    }

    timeline.chronological_validation = validation;
}

fn parse_key_date(
    raw: Option<&str>,
    label: &str,
    validation: &mut caseflow_model::ChronologicalValidation,
) -> Option<chrono::NaiveDate> {
    let raw = raw?;
    match parse_flexible_date(raw) {
        Some(date) => Some(date),
        None => {
            validation.error(format!("Unparseable {label} date: '{raw}'"));
            None
        }
    }
}

/// Timeline confidence: 50 for a dispute date, +40 for a filing date,
/// +10 when chronology is valid (+5 when only warnings were raised).
fn timeline_confidence(timeline: &CaseTimeline) -> f64 {
    let mut score: f64 = 0.0;
    if timeline.dispute_date.is_some() {
        score += 50.0;
    }
    if timeline.filing_date.is_some() {
        score += 40.0;
    }
    if timeline.chronological_validation.is_valid {
        score += 10.0;
    } else if timeline.chronological_validation.errors.is_empty() {
        score += 5.0;
    }
    score.min(100.0)
}

fn base_name(path: &str) -> String {
    std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn notes_dates(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn denial_letter_result(name: &str, text: &str) -> ExtractionResult {
        ExtractionResult::success(&PathBuf::from(name), "text", text.to_string())
    }

    #[test]
    fn test_notes_dates_win_over_documents() {
        let recognizer = DateRecognizer::new();
        let results = vec![denial_letter_result(
            "TD_Dispute_Letter.txt",
            "Plaintiff disputed the account on 01/15/2024",
        )];
        let notes = notes_dates(&[("dispute_date", "December 9, 2024")]);
        let timeline = build_timeline(&results, &notes, &recognizer);
        assert_eq!(timeline.dispute_date.as_deref(), Some("December 9, 2024"));
    }

    #[test]
    fn test_document_fallback_for_key_dates() {
        let recognizer = DateRecognizer::new();
        let results = vec![denial_letter_result(
            "correspondence.txt",
            "Plaintiff sent a dispute to the bureau on 12/09/2024.",
        )];
        let timeline = build_timeline(&results, &BTreeMap::new(), &recognizer);
        assert_eq!(timeline.dispute_date.as_deref(), Some("2024-12-09"));
    }

    #[test]
    fn test_denial_letter_dates_become_damage_events() {
        let recognizer = DateRecognizer::new();
        let results = vec![denial_letter_result(
            "Equifax_Denial.txt",
            "Your application was denied on June 15, 2024.",
        )];
        let timeline = build_timeline(&results, &BTreeMap::new(), &recognizer);
        assert_eq!(timeline.damage_events.len(), 1);
        let event = &timeline.damage_events[0];
        assert_eq!(event.evidence_type.as_deref(), Some("denial_letter"));
        assert_eq!(event.date.as_deref(), Some("2024-06-15"));
    }

    #[test]
    fn test_r2_dispute_after_filing_is_error() {
        let recognizer = DateRecognizer::new();
        let notes = notes_dates(&[
            ("dispute_date", "2025-05-01"),
            ("filing_date", "April 5, 2025"),
        ]);
        let timeline = build_timeline(&[], &notes, &recognizer);
        assert!(!timeline.chronological_validation.is_valid);
        assert!(timeline.chronological_validation.errors[0].contains("after filing date"));
    }

    #[test]
    fn test_r1_discovery_after_dispute_is_error() {
        let recognizer = DateRecognizer::new();
        let notes = notes_dates(&[
            ("discovery_date", "2025-01-15"),
            ("dispute_date", "2024-12-09"),
        ]);
        let timeline = build_timeline(&[], &notes, &recognizer);
        assert!(!timeline.chronological_validation.is_valid);
    }

    #[test]
    fn test_r4_future_date_is_warning_only() {
        let recognizer = DateRecognizer::new();
        let results = vec![denial_letter_result(
            "Denial_Notice.txt",
            "Credit denied as of 01/01/2099 per report",
        )];
        let notes = notes_dates(&[
            ("dispute_date", "2024-12-09"),
            ("filing_date", "2025-04-05"),
        ]);
        let timeline = build_timeline(&results, &notes, &recognizer);
        assert!(timeline.chronological_validation.is_valid);
        assert!(timeline
            .chronological_validation
            .warnings
            .iter()
            .any(|w| w.contains("Future date")));
        // Retained in document_dates despite the warning
        assert!(!timeline.document_dates.is_empty());
    }

    #[test]
    fn test_r5_application_after_denial_same_document() {
        let recognizer = DateRecognizer::new();
        let results = vec![denial_letter_result(
            "CapOne_Denial.txt",
            "You applied for credit on 07/10/2024.\nYour application was denied on 06/15/2024.",
        )];
        let timeline = build_timeline(&results, &BTreeMap::new(), &recognizer);
        assert!(!timeline.chronological_validation.is_valid);
        assert!(timeline
            .chronological_validation
            .errors
            .iter()
            .any(|e| e.contains("after denial date")));
    }

    #[test]
    fn test_unparseable_key_date_is_error() {
        let recognizer = DateRecognizer::new();
        let notes = notes_dates(&[("dispute_date", "sometime in winter")]);
        let timeline = build_timeline(&[], &notes, &recognizer);
        assert!(!timeline.chronological_validation.is_valid);
    }

    #[test]
    fn test_confidence_scoring() {
        let recognizer = DateRecognizer::new();
        let notes = notes_dates(&[
            ("dispute_date", "2024-12-09"),
            ("filing_date", "2025-04-05"),
        ]);
        let timeline = build_timeline(&[], &notes, &recognizer);
        assert_eq!(timeline.timeline_confidence, 100.0);

        let dispute_only = notes_dates(&[("dispute_date", "2024-12-09")]);
        let timeline = build_timeline(&[], &dispute_only, &recognizer);
        assert_eq!(timeline.timeline_confidence, 60.0);
    }
}
