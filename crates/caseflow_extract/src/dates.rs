//! Context-aware date recognition.
//!
//! Dates are enumerated with a closed pattern set, then classified by
//! scanning the surrounding line against per-context keyword lists.
//! Confidence: base 0.5, +0.3 for a non-unknown context, +0.1 for a
//! generic date keyword nearby, +0.2 when the document type agrees with
//! the context, -0.2 when the year falls outside [1970, current+1].

use caseflow_model::{parse_flexible_date, DateContext, ExtractedDate};
use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;

/// One compiled date pattern.
struct DatePattern {
    regex: Regex,
}

/// Keyword patterns for one date context.
struct ContextRule {
    context: DateContext,
    patterns: Vec<Regex>,
}

/// Recognizes dates in document text with context classification.
pub struct DateRecognizer {
    date_patterns: Vec<DatePattern>,
    context_rules: Vec<ContextRule>,
    date_keywords: &'static [&'static str],
}

impl Default for DateRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl DateRecognizer {
    pub fn new() -> Self {
        let raw_patterns = [
            // Numeric MM/DD/YYYY and MM-DD-YYYY (four-digit year first)
            r"\b\d{1,2}[/-]\d{1,2}[/-]\d{4}\b",
            // ISO YYYY-MM-DD
            r"\b\d{4}[/-]\d{1,2}[/-]\d{1,2}\b",
            // Full month names: June 15, 2025
            r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},?\s+\d{4}\b",
            // Abbreviated month names: Jun 15, 2025
            r"\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\.?\s+\d{1,2},?\s+\d{4}\b",
            // Day-first: 15 June 2025
            r"\b\d{1,2}\s+(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{4}\b",
            // Two-digit year numeric, last so longer matches win
            r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2}\b",
        ];
        let date_patterns = raw_patterns
            .iter()
            .map(|p| DatePattern {
                regex: Regex::new(p).expect("static date pattern"),
            })
            .collect();

        let context_table: [(DateContext, &[&str]); 9] = [
            (
                DateContext::DiscoveryDate,
                &[
                    r"discover(?:ed|y)",
                    r"found out",
                    r"became aware",
                    r"notice(?:d)?.*error",
                ],
            ),
            (
                DateContext::DisputeDate,
                &[
                    r"dispute(?:d)?",
                    r"contested",
                    r"challenge(?:d)?",
                    r"sent.*dispute",
                    r"filed.*dispute",
                ],
            ),
            // Denial outranks application: letters describe the denied
            // application in the same sentence
            (
                DateContext::DenialDate,
                &[
                    r"deni(?:ed|al)",
                    r"reject(?:ed|ion)",
                    r"decline(?:d)?",
                    r"refused",
                    r"unable to approve",
                ],
            ),
            (
                DateContext::AdverseActionDate,
                &[r"adverse\s+action", r"unfavorable.*decision", r"credit.*decision"],
            ),
            (
                DateContext::ApplicationDate,
                &[
                    r"appli(?:ed|cation)",
                    r"submitted.*application",
                    r"request(?:ed)?.*credit",
                    r"sought.*loan",
                ],
            ),
            (
                DateContext::NoticeDate,
                &[r"notice.*dat(?:e|ed)", r"notification", r"letter.*dat(?:e|ed)"],
            ),
            (
                DateContext::ResponseDate,
                &[r"respond(?:ed)?", r"reply", r"response.*receiv(?:ed)?"],
            ),
            (
                DateContext::FilingDate,
                &[r"fil(?:ed|ing)", r"commenced.*action", r"submit(?:ted)?.*court"],
            ),
            (
                DateContext::DamageEventDate,
                &[r"damage.*occur(?:red)?", r"harm.*result(?:ed)?", r"loss.*incur(?:red)?"],
            ),
        ];
        let context_rules = context_table
            .iter()
            .map(|(context, patterns)| ContextRule {
                context: *context,
                patterns: patterns
                    .iter()
                    .map(|p| {
                        Regex::new(&format!("(?i){p}")).expect("static context pattern")
                    })
                    .collect(),
            })
            .collect();

        Self {
            date_patterns,
            context_rules,
            date_keywords: &[
                "date", "dated", "as of", "effective", "received", "sent", "signed",
                "issued", "processed",
            ],
        }
    }

    /// Extract every date occurrence in `text`.
    ///
    /// `document_type` is the filename-derived type ("denial_letter",
    /// "attorney_notes", ...) used for the agreement bonus; pass an
    /// empty string when unknown.
    pub fn extract_dates(&self, text: &str, document_type: &str) -> Vec<ExtractedDate> {
        let mut extracted = Vec::new();
        let mut section = None;

        for (index, line) in text.lines().enumerate() {
            let line_number = index + 1;
            if let Some(header_section) = identify_section(line) {
                section = Some(header_section);
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let mut claimed: Vec<(usize, usize)> = Vec::new();
            for pattern in &self.date_patterns {
                for found in pattern.regex.find_iter(line) {
                    // Skip spans already claimed by an earlier (longer) pattern
                    if claimed
                        .iter()
                        .any(|&(s, e)| found.start() < e && found.end() > s)
                    {
                        continue;
                    }
                    claimed.push((found.start(), found.end()));

                    let raw = found.as_str();
                    let parsed = parse_flexible_date(raw);
                    let context = self.classify_context(line);
                    let confidence =
                        self.score(line, parsed, context, document_type);

                    extracted.push(ExtractedDate {
                        raw_text: raw.to_string(),
                        parsed_date: parsed,
                        context,
                        confidence,
                        source_line: trimmed.to_string(),
                        line_number: Some(line_number),
                        document_section: section.map(str::to_string),
                        source_document: None,
                    });
                }
            }
        }

        extracted
    }

    /// Highest-confidence date matching `context`.
    pub fn best_for_context<'a>(
        &self,
        dates: &'a [ExtractedDate],
        context: DateContext,
    ) -> Option<&'a ExtractedDate> {
        dates
            .iter()
            .filter(|d| d.context == context)
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }

    fn classify_context(&self, line: &str) -> DateContext {
        for rule in &self.context_rules {
            if rule.patterns.iter().any(|p| p.is_match(line)) {
                return rule.context;
            }
        }
        DateContext::Unknown
    }

    fn score(
        &self,
        line: &str,
        parsed: Option<NaiveDate>,
        context: DateContext,
        document_type: &str,
    ) -> f64 {
        let mut confidence: f64 = 0.5;

        if context != DateContext::Unknown {
            confidence += 0.3;
        }

        let line_lower = line.to_lowercase();
        if self.date_keywords.iter().any(|kw| line_lower.contains(kw)) {
            confidence += 0.1;
        }

        if document_type_agrees(document_type, context) {
            confidence += 0.2;
        }

        if let Some(date) = parsed {
            let current_year = Utc::now().year();
            if date.year() < 1970 || date.year() > current_year + 1 {
                confidence -= 0.2;
            }
        }

        confidence.clamp(0.0, 1.0)
    }
}

fn document_type_agrees(document_type: &str, context: DateContext) -> bool {
    match context {
        DateContext::DenialDate => document_type.contains("denial"),
        DateContext::AdverseActionDate => document_type.contains("adverse"),
        DateContext::DisputeDate => document_type.contains("dispute"),
        DateContext::ApplicationDate => document_type.contains("application"),
        DateContext::FilingDate => document_type.contains("filing"),
        _ => false,
    }
}

fn identify_section(line: &str) -> Option<&'static str> {
    let lower = line.to_lowercase();
    if lower.contains("background") {
        Some("background")
    } else if lower.contains("damages") {
        Some("damages")
    } else if lower.contains("timeline") || lower.contains("chronology") {
        Some("timeline")
    } else if lower.contains("dispute") {
        Some("dispute_history")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_and_parses_month_name_date() {
        let recognizer = DateRecognizer::new();
        let dates =
            recognizer.extract_dates("The application was denied on June 15, 2024.", "");
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].raw_text, "June 15, 2024");
        assert_eq!(
            dates[0].parsed_date,
            NaiveDate::from_ymd_opt(2024, 6, 15)
        );
        assert_eq!(dates[0].context, DateContext::DenialDate);
    }

    #[test]
    fn test_context_bonus_applies() {
        let recognizer = DateRecognizer::new();
        let with_context =
            recognizer.extract_dates("Plaintiff disputed the account on 06/15/2024", "");
        let without_context = recognizer.extract_dates("Balance as shown 06/15/2024", "");
        assert!(with_context[0].confidence > without_context[0].confidence);
        assert_eq!(with_context[0].context, DateContext::DisputeDate);
    }

    #[test]
    fn test_document_type_agreement_bonus() {
        let recognizer = DateRecognizer::new();
        let line = "Your application was denied on June 15, 2024";
        let in_denial = recognizer.extract_dates(line, "denial_letter");
        let in_unknown = recognizer.extract_dates(line, "");
        assert!(in_denial[0].confidence > in_unknown[0].confidence);
    }

    #[test]
    fn test_unreasonable_year_penalized() {
        let recognizer = DateRecognizer::new();
        let future = recognizer.extract_dates("Dated 01/01/2099", "");
        let normal = recognizer.extract_dates("Dated 01/01/2024", "");
        assert!(future[0].confidence < normal[0].confidence);
    }

    #[test]
    fn test_iso_date_not_double_counted() {
        let recognizer = DateRecognizer::new();
        let dates = recognizer.extract_dates("DISPUTE_DATE: 2024-12-09", "");
        assert_eq!(dates.len(), 1);
        assert_eq!(
            dates[0].parsed_date,
            NaiveDate::from_ymd_opt(2024, 12, 9)
        );
    }

    #[test]
    fn test_best_for_context_prefers_confidence() {
        let recognizer = DateRecognizer::new();
        let text = "Balance as shown 01/05/2024\nPlaintiff disputed the charge on 02/09/2024";
        let mut dates = recognizer.extract_dates(text, "");
        // Force both into the dispute context for the selection check
        for date in &mut dates {
            date.context = DateContext::DisputeDate;
        }
        let best = recognizer
            .best_for_context(&dates, DateContext::DisputeDate)
            .unwrap();
        assert_eq!(best.raw_text, "02/09/2024");
    }

    #[test]
    fn test_section_tracking() {
        let recognizer = DateRecognizer::new();
        let text = "BACKGROUND:\nEvents began on 03/01/2024";
        let dates = recognizer.extract_dates(text, "");
        assert_eq!(dates[0].document_section.as_deref(), Some("background"));
    }
}
