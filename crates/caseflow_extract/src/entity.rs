//! Legal entity recognition.
//!
//! Regex-based detection of case numbers, courts, districts, parties,
//! attorney blocks, addresses, phone numbers and emails, plus a
//! document-structure score used by the quality metrics. Patterns are
//! compiled once at construction.

use caseflow_model::{CaseInformation, LegalEntity, PartyRole};
use regex::Regex;
use tracing::debug;

/// Everything the entity recognizer finds in one document.
#[derive(Debug, Clone, Default)]
pub struct EntityFindings {
    pub case_information: CaseInformation,
    pub parties: Vec<LegalEntity>,
    pub attorneys: Vec<LegalEntity>,
    pub addresses: Vec<String>,
    pub phones: Vec<String>,
    pub emails: Vec<String>,
    pub document_type: Option<String>,
    /// 0-100, presence of canonical legal-document markers
    pub structure_score: f64,
}

/// Rule-based recognizer for legal entities and case header fields.
pub struct EntityRecognizer {
    case_number_patterns: Vec<Regex>,
    court_patterns: Vec<Regex>,
    district_pattern: Regex,
    plaintiff_patterns: Vec<Regex>,
    defendant_patterns: Vec<Regex>,
    attorney_block_pattern: Regex,
    address_patterns: Vec<Regex>,
    phone_pattern: Regex,
    email_pattern: Regex,
    filing_date_patterns: Vec<Regex>,
    document_types: Vec<(&'static str, Regex)>,
    structure_markers: Vec<(Regex, f64)>,
    jury_yes_pattern: Regex,
    jury_no_pattern: Regex,
    attorney_name_pattern: Regex,
    esq_pattern: Regex,
    address_line_pattern: Regex,
}

impl Default for EntityRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

fn rx(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static entity pattern")
}

impl EntityRecognizer {
    pub fn new() -> Self {
        Self {
            case_number_patterns: vec![
                // Federal format: 1:25-cv-01987
                rx(r"\b\d{1,2}:\d{2}-cv-\d{4,6}\b"),
                rx(r"(?i)Case\s+No\.?\s*:?\s*([A-Z0-9:.\-]+)"),
                rx(r"(?i)Civil\s+Action\s+No\.?\s*:?\s*([A-Z0-9:.\-]+)"),
                // State formats
                rx(r"\b\d{4}-\d{6}\b"),
                rx(r"\bBC\d{6}\b"),
            ],
            court_patterns: vec![
                rx(r"(?i)UNITED\s+STATES\s+DISTRICT\s+COURT"),
                rx(r"(?i)U\.S\.\s+DISTRICT\s+COURT"),
                rx(r"(?i)SUPERIOR\s+COURT\s+OF\s+[A-Z ]+"),
            ],
            district_pattern: rx(
                r"(?i)\b(EASTERN|WESTERN|NORTHERN|SOUTHERN|CENTRAL|MIDDLE)\s+DISTRICT\s+OF\s+([A-Z]+(?:\s+[A-Z]+)?)",
            ),
            plaintiff_patterns: vec![
                rx(r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)+),?\s*Plaintiff"),
                rx(r"Plaintiff[s]?[,:]?\s*([A-Z][a-z]+(?:\s+[A-Z][a-z]+)+)"),
                rx(r"([A-Z][A-Z ]{2,}[A-Z]),?\s*Plaintiff"),
                // Consumer correspondence addresses the plaintiff-to-be
                rx(r"(?m)^(?:Dear|Re|RE|Attn)[:,]?\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)+)"),
            ],
            defendant_patterns: vec![
                rx(r"([A-Z][A-Z ,.&\-]{4,}),?\s*Defendant"),
                rx(r"Defendant[s]?[,:]?\s*([A-Z][A-Z ,.&\-]{4,})"),
            ],
            attorney_block_pattern: rx(
                r"(?is)(?:Attorneys?\s+for|Counsel\s+for|Respectfully\s+submitted)[,:]?\s*\n(.{0,400}?)(?:\n\s*\n|\z)",
            ),
            address_patterns: vec![
                rx(r"(?i)\d+\s+[A-Za-z .]+(?:Street|St|Avenue|Ave|Boulevard|Blvd|Drive|Dr|Road|Rd|Lane|Ln|Place|Pl)\b[.,]?\s*[A-Za-z .]*,?\s*[A-Z]{2}\s*\d{5}(?:-\d{4})?"),
                rx(r"(?i)P\.O\.\s+Box\s+\d+,?\s*[A-Za-z .]*,?\s*[A-Z]{2}\s*\d{5}(?:-\d{4})?"),
            ],
            phone_pattern: rx(r"\(\d{3}\)\s*\d{3}-\d{4}|\b\d{3}-\d{3}-\d{4}\b|\b\d{3}\.\d{3}\.\d{4}\b"),
            email_pattern: rx(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"),
            filing_date_patterns: vec![
                rx(r"(?i)Filed:?\s*([A-Z][a-z]+\s+\d{1,2},\s+\d{4})"),
                rx(r"(?i)Date[d]?:?\s*([A-Z][a-z]+\s+\d{1,2},\s+\d{4})"),
                rx(r"(?i)DATE\s*(\d{1,2}/\d{1,2}/\d{2,4})"),
            ],
            document_types: vec![
                ("summons", rx(r"(?i)SUMMONS")),
                ("complaint", rx(r"(?i)COMPLAINT")),
                ("motion", rx(r"(?i)MOTION\s+(?:FOR|TO)")),
                ("order", rx(r"(?i)ORDER|JUDGMENT")),
                ("cover_sheet", rx(r"(?i)CIVIL\s+COVER\s+SHEET")),
            ],
            structure_markers: vec![
                (rx(r"(?i)UNITED STATES DISTRICT COURT"), 20.0),
                (rx(r"(?is)Plaintiff.*v\..*Defendant"), 15.0),
                (rx(r"(?i)Case\s+No\."), 10.0),
                (rx(r"(?i)COMPLAINT|SUMMONS"), 15.0),
                (rx(r"(?i)Respectfully submitted"), 10.0),
                (rx(r"(?i)Attorneys?\s+for"), 10.0),
                (rx(r"/s/"), 5.0),
                (rx(r"(?i)Date:"), 5.0),
                (rx(r"\(\d{3}\)\s*\d{3}-\d{4}"), 5.0),
                (rx(r"@[A-Za-z0-9.-]+\.[A-Za-z]{2,}"), 5.0),
            ],
            jury_yes_pattern: rx(
                r"(?i)JURY\s+TRIAL\s+DEMANDED|DEMANDS?\s+A\s+JURY\s+TRIAL|JURY\s+DEMAND:?\s*YES",
            ),
            jury_no_pattern: rx(r"(?i)JURY\s+DEMAND:?\s*NO|NO\s+JURY\s+TRIAL"),
            attorney_name_pattern: rx(r"^[A-Z][a-z]+(?:\s+[A-Z]\.?)?\s+[A-Z][a-z]+"),
            esq_pattern: rx(r",?\s*Esq\.?"),
            address_line_pattern: rx(r"\d+\s+[A-Za-z]|[A-Z]{2}\s+\d{5}"),
        }
    }

    /// Run every recognizer over `text`.
    pub fn extract(&self, text: &str) -> EntityFindings {
        let findings = EntityFindings {
            case_information: self.extract_case_information(text),
            parties: self.extract_parties(text),
            attorneys: self.extract_attorneys(text),
            addresses: self.find_all(&self.address_patterns, text),
            phones: self
                .phone_pattern
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .collect(),
            emails: self
                .email_pattern
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .collect(),
            document_type: self.classify_document(text),
            structure_score: self.structure_score(text),
        };
        debug!(
            parties = findings.parties.len(),
            attorneys = findings.attorneys.len(),
            score = findings.structure_score,
            "entity extraction complete"
        );
        findings
    }

    /// Structured case header fields only.
    pub fn extract_case_information(&self, text: &str) -> CaseInformation {
        let mut info = CaseInformation::default();

        for pattern in &self.case_number_patterns {
            if let Some(captures) = pattern.captures(text) {
                let value = captures
                    .get(1)
                    .unwrap_or_else(|| captures.get(0).expect("match exists"))
                    .as_str()
                    .trim();
                info.case_number = Some(value.to_string());
                break;
            }
        }

        for pattern in &self.court_patterns {
            if let Some(found) = pattern.find(text) {
                info.court_name = Some(found.as_str().to_uppercase());
                break;
            }
        }

        if let Some(captures) = self.district_pattern.captures(text) {
            let direction = captures.get(1).expect("direction group").as_str();
            let state = captures.get(2).expect("state group").as_str();
            info.court_district = Some(
                format!("{} DISTRICT OF {}", direction, state)
                    .to_uppercase()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" "),
            );
        }

        info.case_type = self.classify_document(text).map(|t| match t.as_str() {
            "complaint" => "Complaint".to_string(),
            "summons" => "Summons".to_string(),
            "motion" => "Motion".to_string(),
            "order" => "Order".to_string(),
            other => other.to_string(),
        });

        info.jury_demand = self.extract_jury_demand(text);

        for pattern in &self.filing_date_patterns {
            if let Some(captures) = pattern.captures(text) {
                info.filing_date = Some(captures.get(1).expect("date group").as_str().to_string());
                break;
            }
        }

        info
    }

    fn extract_jury_demand(&self, text: &str) -> Option<bool> {
        if self.jury_yes_pattern.is_match(text) {
            return Some(true);
        }
        if self.jury_no_pattern.is_match(text) {
            return Some(false);
        }
        None
    }

    /// Plaintiffs and defendants found by proximity to the role tokens.
    pub fn extract_parties(&self, text: &str) -> Vec<LegalEntity> {
        let mut parties = Vec::new();

        for pattern in &self.plaintiff_patterns {
            for captures in pattern.captures_iter(text) {
                let name = captures.get(1).expect("name group").as_str().trim();
                if name.len() > 2 {
                    parties.push(LegalEntity::party(name, PartyRole::Plaintiff, 0.8));
                }
            }
        }
        for pattern in &self.defendant_patterns {
            for captures in pattern.captures_iter(text) {
                let name = captures
                    .get(1)
                    .expect("name group")
                    .as_str()
                    .trim()
                    .trim_end_matches(',');
                if name.len() > 2 {
                    parties.push(LegalEntity::party(name, PartyRole::Defendant, 0.8));
                }
            }
        }
        parties
    }

    /// Attorney signature blocks.
    pub fn extract_attorneys(&self, text: &str) -> Vec<LegalEntity> {
        let mut attorneys = Vec::new();
        for captures in self.attorney_block_pattern.captures_iter(text) {
            let block = captures.get(1).expect("block group").as_str();
            if let Some(attorney) = self.parse_attorney_block(block) {
                attorneys.push(attorney);
            }
        }
        attorneys
    }

    fn parse_attorney_block(&self, block: &str) -> Option<LegalEntity> {
        let mut name = None;
        let mut address_parts = Vec::new();
        let mut phone = None;
        let mut email = None;

        for line in block.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if name.is_none() && self.attorney_name_pattern.is_match(line) {
                name = Some(self.esq_pattern.replace_all(line, "").trim().to_string());
            } else if phone.is_none() && self.phone_pattern.is_match(line) {
                phone = self
                    .phone_pattern
                    .find(line)
                    .map(|m| m.as_str().to_string());
            } else if email.is_none() && line.contains('@') {
                email = self
                    .email_pattern
                    .find(line)
                    .map(|m| m.as_str().to_string());
            } else if self.address_line_pattern.is_match(line) {
                address_parts.push(line.to_string());
            }
        }

        let name = name?;
        Some(LegalEntity {
            entity_type: caseflow_model::EntityType::Attorney,
            name,
            role: Some(PartyRole::Counsel),
            address: (!address_parts.is_empty()).then(|| address_parts.join(", ")),
            phone,
            email,
            confidence: 0.9,
            source_text: Some(block.trim().to_string()),
        })
    }

    fn classify_document(&self, text: &str) -> Option<String> {
        // Cover sheet first: those documents also say "COMPLAINT"
        if self
            .document_types
            .iter()
            .find(|(name, _)| *name == "cover_sheet")
            .map(|(_, p)| p.is_match(text))
            .unwrap_or(false)
        {
            return Some("cover_sheet".to_string());
        }
        self.document_types
            .iter()
            .find(|(name, pattern)| *name != "cover_sheet" && pattern.is_match(text))
            .map(|(name, _)| name.to_string())
    }

    /// Document-structure score, 0-100.
    pub fn structure_score(&self, text: &str) -> f64 {
        let score: f64 = self
            .structure_markers
            .iter()
            .filter(|(pattern, _)| pattern.is_match(text))
            .map(|(_, weight)| weight)
            .sum();
        score.min(100.0)
    }

    fn find_all(&self, patterns: &[Regex], text: &str) -> Vec<String> {
        patterns
            .iter()
            .flat_map(|p| p.find_iter(text))
            .map(|m| m.as_str().trim().to_string())
            .collect()
    }
}
