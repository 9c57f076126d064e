//! Case consolidation core.
//!
//! Ingests the per-document [`ExtractionResult`]s for one case folder
//! and produces a single [`ConsolidatedCase`]: reconciled parties,
//! deduplicated defendants, a validated chronology and a confidence
//! score. The consolidator is total — any per-step failure becomes a
//! warning on the record, never an error to the caller.

pub mod defendants;
pub mod notes;
pub mod rules;
pub mod settings;
pub mod timeline;

pub use settings::FirmSettings;

use caseflow_events::{EventBroadcaster, EventSink};
use caseflow_extract::{DamageRecognizer, DateRecognizer, EntityFindings, EntityRecognizer};
use caseflow_model::{
    Address, CancelToken, CauseOfAction, ConsolidatedCase, Counsel, DamageCategory,
    DamageItem, Defendant, DenialDetail, ExtractionResult, FactualBackground, LegalClaim,
    LegalEntity, PartyRole, Plaintiff,
};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Maximum characters in the generated factual summary.
const SUMMARY_MAX_CHARS: usize = 250;

const CONSUMER_STATUS: &str =
    "Individual 'consumer' within the meaning of both the FCRA and applicable state FCRA";

const DAMAGES_SUMMARY: &str = "The erroneous derogatory payment information wrongfully listed \
on Plaintiff's consumer reports caused damages including, but not limited to, damage to \
reputation, adverse impact on credit rating, being denied credit, in addition to emotional \
distress, expenditure of time and resources, annoyance, aggravation, and frustration.";

/// Consolidates per-document extraction results into one case record.
pub struct CaseConsolidator {
    entity_recognizer: EntityRecognizer,
    damage_recognizer: DamageRecognizer,
    date_recognizer: DateRecognizer,
    settings: FirmSettings,
}

impl Default for CaseConsolidator {
    fn default() -> Self {
        Self::new(FirmSettings::default())
    }
}

impl CaseConsolidator {
    pub fn new(settings: FirmSettings) -> Self {
        Self {
            entity_recognizer: EntityRecognizer::new(),
            damage_recognizer: DamageRecognizer::new(),
            date_recognizer: DateRecognizer::new(),
            settings,
        }
    }

    /// Consolidate a case folder. Never fails; a partial record with
    /// warnings is returned for any input.
    ///
    /// Emits `case_complete` on every path; `case_start` belongs to the
    /// pipeline coordinator, before document extraction begins.
    pub fn consolidate(
        &self,
        folder: &Path,
        results: &[ExtractionResult],
        sink: &dyn EventSink,
        cancel: &CancelToken,
    ) -> ConsolidatedCase {
        let case_id = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| folder.display().to_string());
        let events = EventBroadcaster::new(sink, &case_id);
        info!("consolidating case folder {}", folder.display());

        let mut case = ConsolidatedCase::new(&case_id);

        // Step 1: filter out failures and summons documents
        let mut usable: Vec<&ExtractionResult> = Vec::new();
        for result in results {
            if !result.success || result.is_summons() {
                case.warn(format!("Skipping file: {}", result.file_path));
                continue;
            }
            case.source_documents.push(result.file_path.clone());
            usable.push(result);
        }

        if usable.is_empty() && results.iter().filter(|r| r.is_summons()).count() == 0 {
            case.warn("no documents processed");
            events.case_complete("no documents processed");
            return case;
        }

        // Per-document entity findings for fallback reconciliation
        let findings: Vec<(&ExtractionResult, EntityFindings)> = usable
            .iter()
            .map(|r| (*r, self.entity_recognizer.extract(&r.extracted_text)))
            .collect();

        // Step 2: classify sources — notes are the preferred source
        let notes_text = usable
            .iter()
            .find(|r| r.is_attorney_notes())
            .map(|r| r.extracted_text.clone());

        // Step 3: case information
        self.consolidate_case_information(&mut case, notes_text.as_deref(), &findings);
        if self.cancelled(cancel, &mut case) {
            events.case_complete("consolidation cancelled");
            return case;
        }

        // Step 4: parties
        self.consolidate_parties(&mut case, notes_text.as_deref(), results, &findings);
        if self.cancelled(cancel, &mut case) {
            events.case_complete("consolidation cancelled");
            return case;
        }

        // Step 5: attorneys
        self.consolidate_counsel(&mut case, notes_text.as_deref());

        // Step 6: factual background
        self.consolidate_background(&mut case, notes_text.as_deref());

        // Step 7: damages
        self.consolidate_damages(&mut case, notes_text.as_deref(), &usable);
        if self.cancelled(cancel, &mut case) {
            events.case_complete("consolidation cancelled");
            return case;
        }

        // Step 8: timeline
        let notes_dates = notes_text
            .as_deref()
            .map(notes::key_dates)
            .unwrap_or_default();
        case.case_timeline = timeline::build_timeline(results, &notes_dates, &self.date_recognizer);

        // Step 9: causes of action
        case.causes_of_action =
            self.build_causes_of_action(notes_text.as_deref(), &case.defendants);

        // Step 10: confidence
        case.extraction_confidence = case_confidence(&case);

        info!(
            "case consolidation complete: confidence {:.1}%, {} warnings",
            case.extraction_confidence,
            case.warnings.len()
        );
        events.case_complete(format!(
            "confidence {:.1}%",
            case.extraction_confidence
        ));
        case
    }

    fn cancelled(&self, cancel: &CancelToken, case: &mut ConsolidatedCase) -> bool {
        if cancel.is_cancelled() {
            case.warn("consolidation cancelled; record is partial");
            true
        } else {
            false
        }
    }

    // ---- step 3: case information -------------------------------------

    fn consolidate_case_information(
        &self,
        case: &mut ConsolidatedCase,
        notes_text: Option<&str>,
        findings: &[(&ExtractionResult, EntityFindings)],
    ) {
        if let Some(text) = notes_text {
            case.case_information.case_number = notes::labeled_field(text, "CASE_NUMBER");
            case.case_information.court_name = notes::labeled_field(text, "COURT_NAME");
            case.case_information.court_district = notes::labeled_field(text, "COURT_DISTRICT");
            case.case_information.filing_date = notes::labeled_field(text, "FILING_DATE");
        }

        // Fall back to per-document extraction with majority vote
        let mut case_numbers = Vec::new();
        let mut court_names = Vec::new();
        let mut districts = Vec::new();
        let mut filing_dates = Vec::new();
        let mut jury_demands = Vec::new();
        let cover_sheet_date =
            Regex::new(r"(?i)DATE\s*(\d{1,2}/\d{1,2}/\d{2,4})").expect("static pattern");

        for (result, finding) in findings {
            let info = &finding.case_information;
            if let Some(number) = &info.case_number {
                case_numbers.push(number.to_uppercase());
            }
            if let Some(court) = &info.court_name {
                court_names.push(court.clone());
            }
            if let Some(district) = &info.court_district {
                districts.push(district.clone());
            }
            if let Some(demand) = info.jury_demand {
                jury_demands.push(demand.to_string());
            }
            if result.file_name_lower().contains("civil cover sheet") {
                if let Some(captures) = cover_sheet_date.captures(&result.extracted_text) {
                    filing_dates.push(captures[1].to_string());
                }
            }
        }

        let info = &mut case.case_information;
        if info.case_number.is_none() {
            info.case_number = majority_vote(&case_numbers);
        }
        if info.court_name.is_none() {
            info.court_name = majority_vote(&court_names);
        }
        if info.court_district.is_none() {
            info.court_district = majority_vote(&districts);
        }
        if info.filing_date.is_none() {
            info.filing_date = majority_vote(&filing_dates);
        }
        if info.jury_demand.is_none() {
            info.jury_demand = majority_vote(&jury_demands).map(|v| v == "true");
        }

        // Cross-document consistency checks
        for (label, values) in [("case numbers", &case_numbers), ("court districts", &districts)] {
            let mut distinct = values.clone();
            distinct.sort();
            distinct.dedup();
            if distinct.len() > 1 {
                case.warnings
                    .push(format!("Inconsistent {label} found: {distinct:?}"));
            }
        }
    }

    // ---- step 4: parties ----------------------------------------------

    fn consolidate_parties(
        &self,
        case: &mut ConsolidatedCase,
        notes_text: Option<&str>,
        all_results: &[ExtractionResult],
        findings: &[(&ExtractionResult, EntityFindings)],
    ) {
        // Plaintiff: notes first, then best-confidence extracted entity
        let mut plaintiffs: Vec<LegalEntity> = Vec::new();
        if let Some(text) = notes_text {
            if let Some(name) = notes::labeled_field(text, "NAME") {
                plaintiffs.push(LegalEntity::party(name, PartyRole::Plaintiff, 0.95));
            }
        }
        for (_, finding) in findings {
            plaintiffs.extend(
                finding
                    .parties
                    .iter()
                    .filter(|p| p.role == Some(PartyRole::Plaintiff))
                    .cloned(),
            );
        }

        if let Some(best) = select_best_plaintiff(&plaintiffs) {
            let address = notes_text
                .and_then(notes::address_block)
                .map(|block| Address::parse(&block))
                .unwrap_or_default();
            if address.is_empty() {
                case.warn("Missing plaintiff address");
            }
            let phone = notes_text.and_then(|t| notes::labeled_field(t, "PHONE"));
            let email = self.plaintiff_email(notes_text, findings);
            let district = case
                .case_information
                .court_district
                .clone()
                .unwrap_or_default();
            case.plaintiff = Some(Plaintiff {
                name: best.name.clone(),
                address,
                phone,
                email,
                residency: residency_from_district(&district),
                consumer_status: CONSUMER_STATUS.to_string(),
            });
        } else {
            case.warn("Missing plaintiff name");
        }

        // Defendant candidates from every documented source
        let mut candidates: Vec<String> = Vec::new();
        if let Some(text) = notes_text {
            candidates.extend(notes::defendants_list(text));
            candidates.extend(self.furnisher_banks(text));
        }
        candidates.extend(self.cra_block(findings.iter().map(|(r, _)| r.extracted_text.as_str())));
        // Denial-letter heuristic: report users, not furnishers — emits
        // nothing (the letters identify credit decision makers only)
        candidates.extend(self.summons_defendants(all_results));
        for (_, finding) in findings {
            candidates.extend(
                finding
                    .parties
                    .iter()
                    .filter(|p| p.role == Some(PartyRole::Defendant))
                    .map(|p| p.name.clone()),
            );
        }

        let forum_state = state_from_district(
            case.case_information
                .court_district
                .as_deref()
                .unwrap_or(""),
        );
        let plaintiff_name = case
            .plaintiff
            .as_ref()
            .map(|p| p.name.to_uppercase())
            .unwrap_or_default();

        let mut seen_keys: Vec<String> = Vec::new();
        for candidate in candidates {
            if !defendants::is_plausible_candidate(&candidate) {
                continue;
            }
            // The plaintiff never appears as a defendant
            if !plaintiff_name.is_empty()
                && candidate.trim().to_uppercase() == plaintiff_name
            {
                debug!("skipping defendant candidate matching plaintiff: {candidate}");
                continue;
            }
            let key = defendants::normalize_key(&candidate);
            if seen_keys.contains(&key) {
                continue;
            }
            seen_keys.push(key);
            case.defendants
                .push(defendants::build_defendant(&candidate, &forum_state));
        }
    }

    /// Furnisher heuristic over attorney notes: a bank named in dispute
    /// or fraud language furnished the disputed data.
    fn furnisher_banks(&self, notes_text: &str) -> Vec<String> {
        let bank_pattern = Regex::new(r"\b((?:[A-Z][A-Za-z&.]*\s+)*[A-Z][A-Za-z&.]*\s+Bank)\b")
            .expect("static bank pattern");
        let dispute_language =
            Regex::new(r"(?i)dispute|fraud|denied|refused|stolen").expect("static pattern");

        let mut names = Vec::new();
        for line in notes_text.lines() {
            if !dispute_language.is_match(line) {
                continue;
            }
            for captures in bank_pattern.captures_iter(line) {
                names.push(captures[1].trim().to_string());
            }
        }
        names
    }

    /// When FCRA indicators are present anywhere in the case documents,
    /// all three national credit reporting agencies join as the
    /// standard defendant block.
    fn cra_block<'a>(&self, texts: impl Iterator<Item = &'a str>) -> Vec<String> {
        let fcra_indicators = Regex::new(
            r"(?i)credit\s+report|credit\s+bureau|denied\s+credit|credit\s+decision|credit\s+card|fraudulent\s+charges|dispute|fcra|fair\s+credit\s+reporting|equifax|experian|trans\s?union",
        )
        .expect("static indicator pattern");

        for text in texts {
            if fcra_indicators.is_match(text) {
                return vec![
                    "EQUIFAX INFORMATION SERVICES, LLC".to_string(),
                    "EXPERIAN INFORMATION SOLUTIONS, INC.".to_string(),
                    "TRANS UNION LLC".to_string(),
                ];
            }
        }
        debug!("no FCRA indicators found, skipping CRA defendants");
        Vec::new()
    }

    /// Defendants named by summons documents. Summons are excluded as a
    /// source of every other consolidated field, but each summons names
    /// exactly one defendant.
    fn summons_defendants(&self, results: &[ExtractionResult]) -> Vec<String> {
        let filename_roster: &[(&str, &str)] = &[
            ("experian", "EXPERIAN INFORMATION SOLUTIONS, INC."),
            ("equifax", "EQUIFAX INFORMATION SERVICES, LLC"),
            ("trans_union", "TRANS UNION LLC"),
            ("transunion", "TRANS UNION LLC"),
            ("td_bank", "TD BANK, N.A."),
        ];
        let to_block = Regex::new(
            r"(?is)To:\s*\(Defendant\s*'?s?\s*name and address\)\s*(.+?)\s*(?:\n|lawsuit)",
        )
        .expect("static summons pattern");

        let mut names = Vec::new();
        for result in results.iter().filter(|r| r.success && r.is_summons()) {
            let file_key = result.file_name_lower().replace([' ', '-'], "_");
            if let Some((_, name)) = filename_roster
                .iter()
                .find(|(needle, _)| file_key.contains(needle))
            {
                names.push(name.to_string());
                continue;
            }
            if let Some(captures) = to_block.captures(&result.extracted_text) {
                let candidate = captures[1]
                    .lines()
                    .next()
                    .unwrap_or("")
                    .trim()
                    .to_string();
                if candidate.len() > 5 {
                    names.push(candidate);
                }
            }
        }
        names
    }

    fn plaintiff_email(
        &self,
        notes_text: Option<&str>,
        findings: &[(&ExtractionResult, EntityFindings)],
    ) -> Option<String> {
        let email_pattern =
            Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
                .expect("static email pattern");
        if let Some(text) = notes_text {
            for found in email_pattern.find_iter(text) {
                let email = found.as_str();
                // Firm inboxes are counsel contacts, not the plaintiff's
                if !email.to_lowercase().contains("firm") {
                    return Some(email.to_string());
                }
            }
        }
        findings
            .iter()
            .filter(|(result, _)| result.is_denial_letter())
            .flat_map(|(_, finding)| finding.emails.iter())
            .next()
            .cloned()
    }

    // ---- step 5: counsel ----------------------------------------------

    fn consolidate_counsel(&self, case: &mut ConsolidatedCase, notes_text: Option<&str>) {
        let attorney_name = notes_text
            .and_then(|t| notes::labeled_field(t, "PLAINTIFF_COUNSEL_NAME"))
            .unwrap_or_default();
        case.plaintiff_counsel = Some(Counsel {
            name: attorney_name,
            firm: self.settings.name.clone(),
            address: Address::parse(&self.settings.address),
            phone: self.settings.phone.clone(),
            email: self.settings.email.clone(),
        });
    }

    // ---- step 6: factual background -----------------------------------

    fn consolidate_background(&self, case: &mut ConsolidatedCase, notes_text: Option<&str>) {
        let allegations = notes_text
            .map(notes::background_allegations)
            .unwrap_or_default();
        let summary = if allegations.is_empty() {
            String::new()
        } else {
            truncate_summary(&allegations.join(" "))
        };
        case.factual_background = FactualBackground {
            summary,
            allegations,
        };
    }

    // ---- step 7: damages ----------------------------------------------

    fn consolidate_damages(
        &self,
        case: &mut ConsolidatedCase,
        notes_text: Option<&str>,
        usable: &[&ExtractionResult],
    ) {
        let mut damages = caseflow_model::DamagesInfo {
            summary: DAMAGES_SUMMARY.to_string(),
            ..Default::default()
        };

        if let Some(text) = notes_text {
            let structured = notes::structured_damages(text);
            if !structured.is_empty() {
                // North-Star subcategory layout wins over the pattern table
                for (category_key, items) in structured.categories() {
                    let converted: Vec<DamageItem> = items
                        .iter()
                        .map(|item| DamageItem {
                            category: north_star_category(category_key),
                            damage_type: "damage".to_string(),
                            entity: "plaintiff".to_string(),
                            date: "unknown".to_string(),
                            evidence_available: true,
                            description: item.clone(),
                            selected: false,
                            amount: None,
                        })
                        .collect();
                    if !converted.is_empty() {
                        damages
                            .categorized_damages
                            .insert(category_key.to_string(), converted.clone());
                        damages.structured_damages.extend(converted);
                    }
                }
                damages.damage_statistics.insert(
                    "total_damages".to_string(),
                    damages.structured_damages.len(),
                );
            } else {
                let extracted = self.damage_recognizer.extract_damages(text);
                if extracted.is_empty() {
                    case.warnings
                        .push("No structured damages found in attorney notes".to_string());
                } else {
                    damages.categorized_damages = self.damage_recognizer.categorize(&extracted);
                    damages.damage_statistics = self.damage_recognizer.summary(&extracted);
                    damages.structured_damages = extracted;
                }
            }
        }

        // Denial-letter detail, kept alongside the structured view
        for result in usable.iter().filter(|r| r.is_denial_letter()) {
            let detail = parse_denial_letter(&result.extracted_text, &result.file_name);
            if detail.is_substantive() {
                damages.denials.push(detail);
            }
        }

        case.damages = damages;
    }

    // ---- step 9: causes of action -------------------------------------

    fn build_causes_of_action(
        &self,
        notes_text: Option<&str>,
        defendants: &[Defendant],
    ) -> Vec<CauseOfAction> {
        if let Some(text) = notes_text {
            let claims = notes::legal_claims(text);
            if !claims.is_empty() {
                // The notes block is authoritative; corpus suggestions
                // are not merged in
                info!("using {} legal claims from attorney notes", claims.len());
                return claims
                    .into_iter()
                    .map(|claim| {
                        let category = if claim.claim_type.to_uppercase().contains("NY") {
                            "NY_FCRA"
                        } else {
                            "FCRA"
                        };
                        CauseOfAction {
                            count_number: claim.count,
                            title: claim.title,
                            against_defendants: claim
                                .citations
                                .iter()
                                .flat_map(|c| c.defendants_affected.iter().cloned())
                                .fold(Vec::new(), |mut names, name| {
                                    if !names.contains(&name) {
                                        names.push(name);
                                    }
                                    names
                                }),
                            legal_claims: claim
                                .citations
                                .into_iter()
                                .map(|citation| LegalClaim {
                                    citation: citation.citation,
                                    description: citation.description,
                                    selected: false,
                                    confidence: 1.0,
                                    category: category.to_string(),
                                    against_defendants: citation.defendants_affected,
                                })
                                .collect(),
                        }
                    })
                    .collect();
            }
        }
        info!("no notes claims found, using corpus suggestions");
        rules::default_causes_of_action(defendants)
    }
}

// ---- scoring and shared helpers ---------------------------------------

/// Case confidence: a weighted sum over 100 points, deterministic in
/// the record's filled fields.
pub fn case_confidence(case: &ConsolidatedCase) -> f64 {
    let mut score = 0.0;

    if case.case_information.case_number.is_some() {
        score += 10.0;
    }
    if case.case_information.court_name.is_some() {
        score += 10.0;
    }
    if case.case_information.court_district.is_some() {
        score += 10.0;
    }

    if let Some(plaintiff) = &case.plaintiff {
        if !plaintiff.name.is_empty() {
            score += 10.0;
        }
        if !plaintiff.address.is_empty() {
            score += 5.0;
        }
        if plaintiff.phone.is_some() || plaintiff.email.is_some() {
            score += 5.0;
        }
    }

    score += (case.defendants.len() as f64 * 5.0).min(20.0);

    if let Some(counsel) = &case.plaintiff_counsel {
        if !counsel.name.is_empty() {
            score += 5.0;
        }
        if !counsel.firm.is_empty() {
            score += 5.0;
        }
        if !counsel.phone.is_empty() || !counsel.email.is_empty() {
            score += 5.0;
        }
    }

    score += (case.factual_background.allegations.len() as f64 * 2.0).min(10.0);

    // Consistency bonus for a warning-free record
    if case.warnings.is_empty() {
        score += 5.0;
    }

    score.min(100.0)
}

/// Most-frequent non-empty value; ties break to first-seen.
fn majority_vote(values: &[String]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values.iter().filter(|v| !v.is_empty()) {
        *counts.entry(value).or_insert(0) += 1;
    }
    let best_count = counts.values().copied().max()?;
    values
        .iter()
        .find(|v| counts.get(v.as_str()) == Some(&best_count))
        .cloned()
}

fn select_best_plaintiff(plaintiffs: &[LegalEntity]) -> Option<&LegalEntity> {
    plaintiffs
        .iter()
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
}

fn truncate_summary(text: &str) -> String {
    if text.chars().count() <= SUMMARY_MAX_CHARS + 3 {
        return text.to_string();
    }
    let truncated: String = text.chars().take(SUMMARY_MAX_CHARS).collect();
    format!("{truncated}...")
}

/// Residency phrase from the court district.
pub fn residency_from_district(district: &str) -> String {
    let state = state_from_district(district);
    if state == "Unknown" {
        "Unknown".to_string()
    } else {
        format!("State of {state}")
    }
}

/// State name extracted from a federal district designation.
pub fn state_from_district(district: &str) -> String {
    if district.is_empty() {
        return "Unknown".to_string();
    }
    let pattern = Regex::new(r"(?i)district\s+of\s+([a-z]+(?:\s+[a-z]+)?)")
        .expect("static district pattern");
    match pattern.captures(district) {
        Some(captures) => captures[1]
            .split_whitespace()
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
        None => "Unknown".to_string(),
    }
}

fn north_star_category(key: &str) -> DamageCategory {
    match key {
        "financial_harm" => DamageCategory::CreditDenial,
        "reputational_harm" => DamageCategory::Other,
        "emotional_harm" => DamageCategory::Emotional,
        "personal_costs" => DamageCategory::TimeResources,
        _ => DamageCategory::Other,
    }
}

struct DenialPatterns {
    sincerely: Regex,
    creditor_label: Regex,
    application: Regex,
    letter_date: Regex,
    score: Regex,
    reasons_block: Regex,
}

fn denial_patterns() -> &'static DenialPatterns {
    static PATTERNS: std::sync::OnceLock<DenialPatterns> = std::sync::OnceLock::new();
    PATTERNS.get_or_init(|| DenialPatterns {
        sincerely: Regex::new(r"(?i)Sincerely,\s*\n\s*([^\n]+)").expect("static pattern"),
        creditor_label: Regex::new(r"(?i)Creditor:\s*([^\n]+)").expect("static pattern"),
        application: Regex::new(
            r"(?i)(?:Regarding Your Application for (?:the )?|we are unable to approve you for a )([^\n.]+)",
        )
        .expect("static pattern"),
        letter_date: Regex::new(r"([A-Z][a-z]+ \d{1,2}, \d{4})").expect("static pattern"),
        score: Regex::new(r"(?i)credit score[^\d]*(\d{3})").expect("static pattern"),
        reasons_block: Regex::new(r"(?is)reason\(s\)[^:]*:\s*(.+?)(?:\n\s*\n|\z)")
            .expect("static pattern"),
    })
}

/// Parse a denial letter for creditor, application type, date, score
/// and the bulleted denial reasons.
pub fn parse_denial_letter(text: &str, file_name: &str) -> DenialDetail {
    let patterns = denial_patterns();
    let mut detail = DenialDetail {
        source_document: file_name.to_string(),
        ..DenialDetail::default()
    };

    if let Some(captures) = patterns.sincerely.captures(text) {
        detail.creditor = captures[1].trim().to_string();
    } else if let Some(captures) = patterns.creditor_label.captures(text) {
        detail.creditor = captures[1].trim().to_string();
    }

    if let Some(captures) = patterns.application.captures(text) {
        detail.application_type = captures[1].trim().to_string();
    }

    if let Some(captures) = patterns.letter_date.captures(text) {
        detail.date = captures[1].to_string();
    }

    if let Some(captures) = patterns.score.captures(text) {
        detail.credit_score = captures[1].to_string();
    }

    if let Some(captures) = patterns.reasons_block.captures(text) {
        detail.reasons = captures[1]
            .split(['\u{b7}', '\n'])
            .map(str::trim)
            .map(|r| r.trim_start_matches(['-', '•', ' ']).trim())
            .filter(|r| r.len() > 10)
            .map(str::to_string)
            .collect();
    }

    detail
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_majority_vote_prefers_frequency_then_first_seen() {
        let values = vec![
            "1:25-CV-01987".to_string(),
            "2:24-CV-00001".to_string(),
            "1:25-CV-01987".to_string(),
        ];
        assert_eq!(majority_vote(&values).as_deref(), Some("1:25-CV-01987"));

        let tied = vec!["A".to_string(), "B".to_string()];
        assert_eq!(majority_vote(&tied).as_deref(), Some("A"));
        assert_eq!(majority_vote(&[]), None);
    }

    #[test]
    fn test_state_from_district() {
        assert_eq!(
            state_from_district("EASTERN DISTRICT OF NEW YORK"),
            "New York"
        );
        assert_eq!(state_from_district("District of Delaware"), "Delaware");
        assert_eq!(state_from_district(""), "Unknown");
        assert_eq!(
            residency_from_district("SOUTHERN DISTRICT OF NEW YORK"),
            "State of New York"
        );
    }

    #[test]
    fn test_truncate_summary() {
        let short = "A short summary.";
        assert_eq!(truncate_summary(short), short);
        let long = "x".repeat(400);
        let truncated = truncate_summary(&long);
        assert_eq!(truncated.chars().count(), SUMMARY_MAX_CHARS + 3);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_parse_denial_letter() {
        let text = "\
April 10, 2025

Regarding Your Application for the Quicksilver Card

Your credit score: 512

The reason(s) for our decision are:
- Serious delinquency reported by credit bureau
- Proportion of balances to credit limits is too high

Sincerely,
Capital One Application Services
";
        let detail = parse_denial_letter(text, "CapOne_Denial.txt");
        assert_eq!(detail.creditor, "Capital One Application Services");
        assert_eq!(detail.application_type, "Quicksilver Card");
        assert_eq!(detail.date, "April 10, 2025");
        assert_eq!(detail.credit_score, "512");
        assert_eq!(detail.reasons.len(), 2);
        assert!(detail.is_substantive());
    }

    #[test]
    fn test_case_confidence_is_deterministic() {
        let mut case = ConsolidatedCase::new("case");
        case.case_information.case_number = Some("1:25-cv-01987".to_string());
        case.defendants = vec![
            defendants::build_defendant("Equifax", "New York"),
            defendants::build_defendant("TD Bank", "New York"),
        ];
        let first = case_confidence(&case);
        let second = case_confidence(&case);
        assert_eq!(first, second);
        // case number 10 + defendants 10 + counsel absent + consistency 5
        assert_eq!(first, 25.0);
    }

    #[test]
    fn test_confidence_bonus_depends_on_warnings_only() {
        let mut case = ConsolidatedCase::new("case");
        case.case_information.case_number = Some("1:25-cv-01987".to_string());
        let clean = case_confidence(&case);

        // Chronology errors live on the timeline, not in warnings; the
        // bonus is unaffected
        case.case_timeline
            .chronological_validation
            .error("dispute after filing");
        assert_eq!(case_confidence(&case), clean);

        // A warning is what forfeits the bonus
        case.warn("Inconsistent case numbers found");
        assert_eq!(clean - case_confidence(&case), 5.0);
    }
}
