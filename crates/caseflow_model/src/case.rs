//! The consolidated case record.
//!
//! [`ConsolidatedCase`] is the single output of the consolidation core:
//! one hydrated, warning-annotated record per case folder. The
//! consolidator owns it during construction; the caller owns it after
//! return.

use crate::damages::{DamageItem, DenialDetail};
use crate::dates::ExtractedDate;
use crate::entities::{Address, CaseInformation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Consolidated plaintiff identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plaintiff {
    pub name: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// e.g. "State of New York"
    #[serde(default)]
    pub residency: String,
    #[serde(default)]
    pub consumer_status: String,
}

/// Plaintiff counsel: firm-level fields from settings, attorney name
/// from the case notes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Counsel {
    pub name: String,
    pub firm: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// One consolidated defendant with display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defendant {
    /// Full legal name
    pub name: String,
    /// Short display name, e.g. "TransUnion"
    pub short_name: String,
    /// Legal classification, e.g. "Consumer Reporting Agency"
    #[serde(rename = "type")]
    pub defendant_type: String,
    pub state_of_incorporation: String,
    pub business_status: String,
    #[serde(default)]
    pub address: Option<Address>,
}

/// Factual background: one allegation per non-empty notes line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactualBackground {
    pub summary: String,
    #[serde(default)]
    pub allegations: Vec<String>,
}

/// One statutory claim under a cause of action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalClaim {
    pub citation: String,
    pub description: String,
    /// False until counsel selects the claim for the complaint
    #[serde(default)]
    pub selected: bool,
    pub confidence: f64,
    /// "FCRA" or "NY_FCRA"
    pub category: String,
    /// Defendants the claim runs against, as written in the source
    #[serde(default)]
    pub against_defendants: Vec<String>,
}

/// A numbered cause of action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CauseOfAction {
    pub count_number: u32,
    pub title: String,
    #[serde(default)]
    pub against_defendants: Vec<String>,
    #[serde(default)]
    pub legal_claims: Vec<LegalClaim>,
}

/// Consolidated damages: flat and grouped views plus statistics and the
/// legacy denial-letter detail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamagesInfo {
    #[serde(default)]
    pub structured_damages: Vec<DamageItem>,
    #[serde(default)]
    pub categorized_damages: BTreeMap<String, Vec<DamageItem>>,
    #[serde(default)]
    pub damage_statistics: BTreeMap<String, usize>,
    #[serde(default)]
    pub denials: Vec<DenialDetail>,
    #[serde(default)]
    pub summary: String,
}

/// A dated damage event on the case timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    /// Date in the source representation
    pub date: Option<String>,
    pub description: String,
    pub source: String,
    pub confidence: f64,
    #[serde(default)]
    pub evidence_type: Option<String>,
}

/// Result of the chronological business-rule checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChronologicalValidation {
    pub is_valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl Default for ChronologicalValidation {
    fn default() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl ChronologicalValidation {
    /// Record an error; errors flip `is_valid`.
    pub fn error(&mut self, message: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(message.into());
    }

    /// Record a warning; warnings never flip `is_valid`.
    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Reconciled case chronology.
///
/// Key dates keep their source representation; parsing happens only at
/// comparison time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseTimeline {
    pub discovery_date: Option<String>,
    pub dispute_date: Option<String>,
    pub filing_date: Option<String>,
    #[serde(default)]
    pub damage_events: Vec<DamageEvent>,
    #[serde(default)]
    pub document_dates: Vec<ExtractedDate>,
    #[serde(default)]
    pub chronological_validation: ChronologicalValidation,
    /// 0-100
    pub timeline_confidence: f64,
}

/// The hydrated record produced by the consolidation core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedCase {
    /// Case folder basename
    pub case_id: String,
    #[serde(default)]
    pub case_information: CaseInformation,
    #[serde(default)]
    pub plaintiff: Option<Plaintiff>,
    #[serde(default)]
    pub plaintiff_counsel: Option<Counsel>,
    #[serde(default)]
    pub defendants: Vec<Defendant>,
    #[serde(default)]
    pub factual_background: FactualBackground,
    #[serde(default)]
    pub damages: DamagesInfo,
    #[serde(default)]
    pub causes_of_action: Vec<CauseOfAction>,
    #[serde(default)]
    pub case_timeline: CaseTimeline,
    #[serde(default)]
    pub source_documents: Vec<String>,
    /// 0-100, deterministic in the filled fields
    pub extraction_confidence: f64,
    pub consolidation_timestamp: String,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl ConsolidatedCase {
    /// A fresh record for `case_id` stamped with the current time.
    pub fn new(case_id: impl Into<String>) -> Self {
        Self {
            case_id: case_id.into(),
            consolidation_timestamp: chrono::Utc::now().to_rfc3339(),
            ..Self::default()
        }
    }

    /// Append a consolidation warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chronological_validation_flags() {
        let mut validation = ChronologicalValidation::default();
        assert!(validation.is_valid);
        validation.warning("future date");
        assert!(validation.is_valid);
        validation.error("dispute after filing");
        assert!(!validation.is_valid);
        assert_eq!(validation.errors.len(), 1);
        assert_eq!(validation.warnings.len(), 1);
    }

    #[test]
    fn test_new_case_is_sparse() {
        let case = ConsolidatedCase::new("Youssef_Eman_20250405");
        assert_eq!(case.case_id, "Youssef_Eman_20250405");
        assert!(case.defendants.is_empty());
        assert!(case.plaintiff.is_none());
        assert!(!case.consolidation_timestamp.is_empty());
    }

    #[test]
    fn test_defendant_type_serializes_as_type() {
        let defendant = Defendant {
            name: "TRANS UNION, LLC".into(),
            short_name: "TransUnion".into(),
            defendant_type: "Consumer Reporting Agency".into(),
            state_of_incorporation: "Delaware".into(),
            business_status: "Authorized to do business in New York".into(),
            address: None,
        };
        let json = serde_json::to_value(&defendant).unwrap();
        assert_eq!(json["type"], "Consumer Reporting Agency");
    }
}
