//! Structured damage extraction from attorney notes.
//!
//! Consumes the `DAMAGES:` block: each bulleted line is matched against
//! a fixed pattern table keyed by damage label ("Denied Auto Loan:",
//! "Credit Limit Reduction:", ...). Unmatched lines fall through to a
//! keyword heuristic that assigns a category and a generic type.

use caseflow_model::{DamageCategory, DamageItem};
use regex::Regex;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// One labeled damage pattern: `<Label>: <entity>, <date>. <evidence>`.
struct DamagePattern {
    regex: Regex,
    category: DamageCategory,
    damage_type: &'static str,
}

/// Free-form damage pattern without the entity/date structure.
struct SpecialPattern {
    regex: Regex,
    category: DamageCategory,
    damage_type: &'static str,
}

/// Extracts structured damages from the attorney-notes DAMAGES block.
pub struct DamageRecognizer {
    section_pattern: Regex,
    patterns: Vec<DamagePattern>,
    special_patterns: Vec<SpecialPattern>,
    evidence_indicators: &'static [&'static str],
}

impl Default for DamageRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl DamageRecognizer {
    pub fn new() -> Self {
        use DamageCategory::*;
        let table: [(&str, DamageCategory, &str); 15] = [
            ("Denied Auto Loan", CreditDenial, "auto_loan"),
            ("Denied Car Loan", CreditDenial, "auto_loan"),
            ("Denied Credit Card", CreditDenial, "credit_card"),
            ("Denied Mortgage", CreditDenial, "mortgage"),
            ("Denied Personal Loan", CreditDenial, "personal_loan"),
            ("Denied Store Credit", CreditDenial, "store_credit"),
            ("Denied Loan", CreditDenial, "loan_general"),
            ("Credit Limit Reduction", ExistingCredit, "limit_reduction"),
            ("Interest Rate Increase", ExistingCredit, "rate_increase"),
            ("Account Closure", ExistingCredit, "account_closure"),
            ("Unfavorable Terms", ExistingCredit, "unfavorable_terms"),
            ("Employment Background Check", Employment, "background_check"),
            ("Job Offer Withdrawal", Employment, "job_offer_withdrawal"),
            ("Rental Application Denial", Housing, "rental_denial"),
            ("Increased Security Deposit", Housing, "increased_deposit"),
        ];
        let patterns = table
            .iter()
            .map(|(label, category, damage_type)| DamagePattern {
                regex: Regex::new(&format!(
                    r"(?i)^{}:\s*(.+?),\s*(.+?)\.\s*(.*)$",
                    regex::escape(label)
                ))
                .expect("static damage pattern"),
                category: *category,
                damage_type,
            })
            .collect();

        let special_table: [(&str, DamageCategory, &str); 3] = [
            (r"Emotional Distress:\s*(.*)", Emotional, "emotional_distress"),
            (
                r"Time and Resources:\s*(.*)",
                TimeResources,
                "time_and_resources",
            ),
            (r"(Frustration.*)", Emotional, "frustration"),
        ];
        let special_patterns = special_table
            .iter()
            .map(|(pattern, category, damage_type)| SpecialPattern {
                regex: Regex::new(&format!("(?i)^{pattern}$")).expect("static special pattern"),
                category: *category,
                damage_type,
            })
            .collect();

        Self {
            section_pattern: Regex::new(r"(?is)DAMAGES:\s*\n(.*?)(?:\n\s*\n|\z)")
                .expect("static section pattern"),
            patterns,
            special_patterns,
            evidence_indicators: &[
                "denial letter",
                "have denial letter",
                "letter attached",
                "documentation available",
                "have documentation",
                "have letter",
                "copy available",
                "denial notice",
                "written denial",
            ],
        }
    }

    /// Extract all damages from the notes text. Returns an empty list
    /// when no DAMAGES block is present.
    pub fn extract_damages(&self, notes_text: &str) -> Vec<DamageItem> {
        let Some(captures) = self.section_pattern.captures(notes_text) else {
            warn!("no DAMAGES section found in attorney notes");
            return Vec::new();
        };
        let section = captures.get(1).expect("section group").as_str();

        let mut damages = Vec::new();
        for line in section.lines() {
            let line = line.trim();
            let Some(body) = line.strip_prefix('-') else {
                continue;
            };
            let body = body.trim();
            if body.is_empty() {
                continue;
            }
            damages.push(self.parse_damage_line(body));
        }
        debug!("extracted {} damages from notes", damages.len());
        damages
    }

    fn parse_damage_line(&self, body: &str) -> DamageItem {
        for pattern in &self.patterns {
            if let Some(captures) = pattern.regex.captures(body) {
                let entity = captures.get(1).expect("entity group").as_str().trim();
                let date = captures.get(2).expect("date group").as_str().trim();
                let evidence_text = captures
                    .get(3)
                    .map(|m| m.as_str().trim())
                    .unwrap_or_default();
                return DamageItem {
                    category: pattern.category,
                    damage_type: pattern.damage_type.to_string(),
                    entity: entity.to_string(),
                    date: date.to_string(),
                    evidence_available: self.has_evidence(evidence_text),
                    description: body.to_string(),
                    selected: false,
                    amount: None,
                };
            }
        }

        for pattern in &self.special_patterns {
            if let Some(captures) = pattern.regex.captures(body) {
                let description = captures
                    .get(1)
                    .map(|m| m.as_str().trim())
                    .filter(|s| !s.is_empty())
                    .unwrap_or(body);
                return DamageItem {
                    category: pattern.category,
                    damage_type: pattern.damage_type.to_string(),
                    entity: "N/A".to_string(),
                    date: "N/A".to_string(),
                    evidence_available: false,
                    description: description.to_string(),
                    selected: false,
                    amount: None,
                };
            }
        }

        self.fallback_damage(body)
    }

    /// Keyword heuristic for lines the pattern table does not cover.
    fn fallback_damage(&self, body: &str) -> DamageItem {
        let lower = body.to_lowercase();
        let (category, damage_type) = if contains_any(&lower, &["denied", "denial", "rejected", "decline"]) {
            (DamageCategory::CreditDenial, "unspecified_denial")
        } else if contains_any(&lower, &["emotional", "distress", "stress", "anxiety", "frustration"]) {
            (DamageCategory::Emotional, "emotional_distress")
        } else if contains_any(&lower, &["time", "hours", "cost", "expense", "resource"]) {
            (DamageCategory::TimeResources, "time_and_resources")
        } else if contains_any(&lower, &["limit", "reduction", "decrease", "increase", "rate"]) {
            (DamageCategory::ExistingCredit, "credit_impact")
        } else if contains_any(&lower, &["job", "employment", "work", "background"]) {
            (DamageCategory::Employment, "employment_issue")
        } else if contains_any(&lower, &["rental", "housing", "apartment", "lease"]) {
            (DamageCategory::Housing, "housing_issue")
        } else {
            (DamageCategory::Other, "unspecified")
        };

        DamageItem {
            category,
            damage_type: damage_type.to_string(),
            entity: "Unspecified".to_string(),
            date: "Unspecified".to_string(),
            evidence_available: self.has_evidence(body),
            description: body.to_string(),
            selected: false,
            amount: None,
        }
    }

    fn has_evidence(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.evidence_indicators
            .iter()
            .any(|indicator| lower.contains(indicator))
    }

    /// Group damages for the review interface, dropping empty groups.
    pub fn categorize(&self, damages: &[DamageItem]) -> BTreeMap<String, Vec<DamageItem>> {
        let mut groups: BTreeMap<String, Vec<DamageItem>> = BTreeMap::new();
        for damage in damages {
            groups
                .entry(damage.category.group_key().to_string())
                .or_default()
                .push(damage.clone());
        }
        groups
    }

    /// Per-category counts plus evidence totals.
    pub fn summary(&self, damages: &[DamageItem]) -> BTreeMap<String, usize> {
        let mut summary = BTreeMap::new();
        for (group, items) in self.categorize(damages) {
            let with_evidence = items.iter().filter(|d| d.evidence_available).count();
            summary.insert(group.clone(), items.len());
            summary.insert(format!("{group}_with_evidence"), with_evidence);
        }
        summary.insert("total_damages".to_string(), damages.len());
        summary.insert(
            "total_with_evidence".to_string(),
            damages.iter().filter(|d| d.evidence_available).count(),
        );
        summary
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTES: &str = "\
NAME: Eman Youssef
DAMAGES:
- Denied Auto Loan: Wells Fargo, April 20, 2025. Have denial letter.
- Credit Limit Reduction: Citibank, March 15, 2025. No documentation.
- Emotional Distress: Significant stress dealing with the bureaus
- Spent many hours on hold with customer service

BACKGROUND:
Unrelated text.
";

    #[test]
    fn test_structured_damage_parsed() {
        let recognizer = DamageRecognizer::new();
        let damages = recognizer.extract_damages(NOTES);
        assert_eq!(damages.len(), 4);

        let auto_loan = &damages[0];
        assert_eq!(auto_loan.category, DamageCategory::CreditDenial);
        assert_eq!(auto_loan.damage_type, "auto_loan");
        assert_eq!(auto_loan.entity, "Wells Fargo");
        assert_eq!(auto_loan.date, "April 20, 2025");
        assert!(auto_loan.evidence_available);
        assert!(!auto_loan.selected);
    }

    #[test]
    fn test_evidence_indicator_absent() {
        let recognizer = DamageRecognizer::new();
        let damages = recognizer.extract_damages(NOTES);
        let limit = &damages[1];
        assert_eq!(limit.category, DamageCategory::ExistingCredit);
        assert!(!limit.evidence_available);
    }

    #[test]
    fn test_special_pattern_emotional() {
        let recognizer = DamageRecognizer::new();
        let damages = recognizer.extract_damages(NOTES);
        let emotional = &damages[2];
        assert_eq!(emotional.category, DamageCategory::Emotional);
        assert_eq!(emotional.entity, "N/A");
    }

    #[test]
    fn test_fallback_keyword_heuristic() {
        let recognizer = DamageRecognizer::new();
        let damages = recognizer.extract_damages(NOTES);
        let fallback = &damages[3];
        assert_eq!(fallback.category, DamageCategory::TimeResources);
        assert_eq!(fallback.entity, "Unspecified");
    }

    #[test]
    fn test_missing_section_yields_empty() {
        let recognizer = DamageRecognizer::new();
        assert!(recognizer.extract_damages("NAME: Someone\n").is_empty());
    }

    #[test]
    fn test_categorize_and_summary() {
        let recognizer = DamageRecognizer::new();
        let damages = recognizer.extract_damages(NOTES);
        let groups = recognizer.categorize(&damages);
        assert!(groups.contains_key("credit_denials"));
        assert!(groups.contains_key("existing_credit_impacts"));
        assert!(!groups.contains_key("housing_issues"));

        let summary = recognizer.summary(&damages);
        assert_eq!(summary["total_damages"], 4);
        assert_eq!(summary["credit_denials"], 1);
        assert_eq!(summary["credit_denials_with_evidence"], 1);
        assert_eq!(summary["total_with_evidence"], 1);
    }
}
