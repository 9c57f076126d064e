//! Legal-rules corpus and suggested claims.
//!
//! The corpus is a bundled FCRA / NY FCRA claim catalog, parsed once
//! per process. When attorney notes carry no LEGAL_CLAIMS block, the
//! consolidator populates the default causes of action from this
//! catalog with every claim unselected, leaving selection to counsel.

use caseflow_model::{CauseOfAction, Defendant, LegalClaim};
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::warn;

const CORPUS_JSON: &str = include_str!("../resources/ny_fcra.json");

/// Default confidence for suggested claims.
const SUGGESTED_CONFIDENCE: f64 = 0.5;
/// Willful-violation claims are harder to plead; suggest them at lower
/// confidence.
const WILLFUL_CONFIDENCE: f64 = 0.3;

#[derive(Debug, Deserialize)]
struct Corpus {
    #[serde(default)]
    causes_of_action: Vec<ClaimCategory>,
    #[serde(default)]
    legal_violations: Vec<ViolationSection>,
}

#[derive(Debug, Deserialize)]
struct ClaimCategory {
    #[serde(default)]
    applies_to: Vec<String>,
    #[serde(default)]
    claims: Vec<CorpusClaim>,
}

#[derive(Debug, Deserialize)]
struct CorpusClaim {
    #[serde(default)]
    title: String,
    #[serde(default)]
    statutory_basis: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ViolationSection {
    #[serde(default)]
    violations: Vec<CorpusViolation>,
}

#[derive(Debug, Deserialize)]
struct CorpusViolation {
    #[serde(default)]
    title: String,
    #[serde(default)]
    citation: String,
    #[serde(default)]
    description: String,
}

fn corpus() -> &'static Corpus {
    static CORPUS: OnceLock<Corpus> = OnceLock::new();
    CORPUS.get_or_init(|| {
        serde_json::from_str(CORPUS_JSON).unwrap_or_else(|e| {
            warn!("legal corpus failed to parse: {e}");
            Corpus {
                causes_of_action: Vec::new(),
                legal_violations: Vec::new(),
            }
        })
    })
}

fn confidence_for(title: &str) -> f64 {
    if title.to_lowercase().contains("willful") {
        WILLFUL_CONFIDENCE
    } else {
        SUGGESTED_CONFIDENCE
    }
}

/// Federal FCRA claims suggested for the given defendant roster.
///
/// CRA-category claims run against the CRA defendants, furnisher-
/// category claims against the furnisher defendants; a category with no
/// matching defendant present is skipped.
pub fn suggested_fcra_claims(defendants: &[Defendant]) -> Vec<LegalClaim> {
    let cra_names: Vec<String> = defendants
        .iter()
        .filter(|d| d.defendant_type.contains("Reporting Agency"))
        .map(|d| d.short_name.clone())
        .collect();
    let furnisher_names: Vec<String> = defendants
        .iter()
        .filter(|d| d.defendant_type.contains("Furnisher"))
        .map(|d| d.short_name.clone())
        .collect();

    let mut claims = Vec::new();
    for category in &corpus().causes_of_action {
        let against: &[String] = if category
            .applies_to
            .iter()
            .any(|t| t.contains("Reporting Agency"))
        {
            &cra_names
        } else {
            &furnisher_names
        };
        if against.is_empty() {
            continue;
        }
        for claim in &category.claims {
            claims.push(LegalClaim {
                citation: claim.statutory_basis.clone(),
                description: claim.description.clone(),
                selected: false,
                confidence: confidence_for(&claim.title),
                category: "FCRA".to_string(),
                against_defendants: against.to_vec(),
            });
        }
    }
    claims
}

/// NY FCRA claims; state credit-reporting duties reach CRAs only.
pub fn suggested_ny_fcra_claims(defendants: &[Defendant]) -> Vec<LegalClaim> {
    let cra_names: Vec<String> = defendants
        .iter()
        .filter(|d| d.defendant_type.contains("Reporting Agency"))
        .map(|d| d.short_name.clone())
        .collect();
    if cra_names.is_empty() {
        return Vec::new();
    }

    corpus()
        .legal_violations
        .iter()
        .flat_map(|section| &section.violations)
        .map(|violation| LegalClaim {
            citation: violation.citation.clone(),
            description: violation.description.clone(),
            selected: false,
            confidence: confidence_for(&violation.title),
            category: "NY_FCRA".to_string(),
            against_defendants: cra_names.clone(),
        })
        .collect()
}

/// The two default causes of action built from the corpus: federal FCRA
/// against all defendants, NY FCRA against the CRA defendants only.
pub fn default_causes_of_action(defendants: &[Defendant]) -> Vec<CauseOfAction> {
    let all_names: Vec<String> = defendants.iter().map(|d| d.short_name.clone()).collect();
    let cra_names: Vec<String> = defendants
        .iter()
        .filter(|d| d.defendant_type.contains("Reporting Agency"))
        .map(|d| d.short_name.clone())
        .collect();

    vec![
        CauseOfAction {
            count_number: 1,
            title: "FIRST CAUSE OF ACTION: Violation of the FCRA".to_string(),
            against_defendants: all_names,
            legal_claims: suggested_fcra_claims(defendants),
        },
        CauseOfAction {
            count_number: 2,
            title: "SECOND CAUSE OF ACTION: Violation of the New York Fair Credit Reporting Act"
                .to_string(),
            against_defendants: cra_names,
            legal_claims: suggested_ny_fcra_claims(defendants),
        },
    ]
}
