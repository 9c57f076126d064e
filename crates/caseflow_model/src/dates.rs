//! Date occurrences extracted from document text.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Classification of a date by the language surrounding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateContext {
    DiscoveryDate,
    DisputeDate,
    ApplicationDate,
    DenialDate,
    AdverseActionDate,
    NoticeDate,
    ResponseDate,
    TransactionDate,
    FilingDate,
    DamageEventDate,
    Unknown,
}

impl DateContext {
    /// Stable wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DateContext::DiscoveryDate => "discovery_date",
            DateContext::DisputeDate => "dispute_date",
            DateContext::ApplicationDate => "application_date",
            DateContext::DenialDate => "denial_date",
            DateContext::AdverseActionDate => "adverse_action_date",
            DateContext::NoticeDate => "notice_date",
            DateContext::ResponseDate => "response_date",
            DateContext::TransactionDate => "transaction_date",
            DateContext::FilingDate => "filing_date",
            DateContext::DamageEventDate => "damage_event_date",
            DateContext::Unknown => "unknown",
        }
    }
}

/// One date occurrence with provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDate {
    /// The substring as found in the document
    pub raw_text: String,
    /// Normalized calendar date, when parseable
    pub parsed_date: Option<NaiveDate>,
    /// Context classification from surrounding text
    pub context: DateContext,
    /// Confidence score, 0.0-1.0
    pub confidence: f64,
    /// Full line the date was found on
    pub source_line: String,
    /// 1-based line number in the document
    pub line_number: Option<usize>,
    /// Document section, when identifiable (background, damages, ...)
    pub document_section: Option<String>,
    /// Source document path, filled in during consolidation
    #[serde(default)]
    pub source_document: Option<String>,
}
