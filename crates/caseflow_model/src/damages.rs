//! Damage allegations extracted from attorney notes.

use serde::{Deserialize, Serialize};

/// Category of a damage allegation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageCategory {
    CreditDenial,
    ExistingCredit,
    Employment,
    Housing,
    Emotional,
    TimeResources,
    Other,
}

impl DamageCategory {
    /// Grouping key used in the categorized damages view.
    pub fn group_key(&self) -> &'static str {
        match self {
            DamageCategory::CreditDenial => "credit_denials",
            DamageCategory::ExistingCredit => "existing_credit_impacts",
            DamageCategory::Employment => "employment_issues",
            DamageCategory::Housing => "housing_issues",
            DamageCategory::Emotional => "emotional_distress",
            DamageCategory::TimeResources => "time_and_resources",
            DamageCategory::Other => "other",
        }
    }
}

/// One damage allegation from the attorney-notes DAMAGES block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageItem {
    pub category: DamageCategory,
    /// Subcategory, e.g. "auto_loan" or "limit_reduction"
    #[serde(rename = "type")]
    pub damage_type: String,
    /// Counterparty named in the allegation
    pub entity: String,
    /// Date as written in the notes (free text)
    pub date: String,
    /// Whether supporting documentation was mentioned
    pub evidence_available: bool,
    /// Full damage description as written
    pub description: String,
    /// Review-interface selection flag, default false
    #[serde(default)]
    pub selected: bool,
    /// Damage amount when specified
    #[serde(default)]
    pub amount: Option<String>,
}

/// Detail parsed from a credit denial / adverse-action letter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DenialDetail {
    pub source_document: String,
    pub creditor: String,
    pub application_type: String,
    pub date: String,
    pub credit_score: String,
    #[serde(default)]
    pub reasons: Vec<String>,
}

impl DenialDetail {
    /// A detail is worth keeping only when it names a creditor or
    /// carries at least one denial reason.
    pub fn is_substantive(&self) -> bool {
        !self.creditor.is_empty() || !self.reasons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_group_keys() {
        assert_eq!(DamageCategory::CreditDenial.group_key(), "credit_denials");
        assert_eq!(DamageCategory::Other.group_key(), "other");
    }

    #[test]
    fn test_damage_item_serde_field_names() {
        let item = DamageItem {
            category: DamageCategory::CreditDenial,
            damage_type: "auto_loan".into(),
            entity: "Wells Fargo".into(),
            date: "April 20, 2025".into(),
            evidence_available: true,
            description: "Denied Auto Loan: Wells Fargo, April 20, 2025.".into(),
            selected: false,
            amount: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["category"], "credit_denial");
        assert_eq!(json["type"], "auto_loan");
    }

    #[test]
    fn test_denial_detail_substantive() {
        let empty = DenialDetail::default();
        assert!(!empty.is_substantive());
        let with_creditor = DenialDetail {
            creditor: "Capital One".into(),
            ..DenialDetail::default()
        };
        assert!(with_creditor.is_substantive());
    }
}
