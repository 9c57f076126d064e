//! Hydrated schema validation.
//!
//! Shape is guaranteed by the types; this pass checks the contracts
//! the types cannot: required fields are non-empty, enumerated values
//! are in range, and cross-field expectations hold. Violations are
//! returned as human-readable warnings and never block a write.

use crate::{HydratedCase, FORMAT_VERSION};

/// Claim categories accepted by downstream document assembly.
const CLAIM_CATEGORIES: &[&str] = &["FCRA", "NY_FCRA"];

/// Defendant classifications accepted by the complaint templates.
const DEFENDANT_TYPES: &[&str] = &[
    "Consumer Reporting Agency",
    "Furnisher of Information",
    "Corporate Defendant",
    "Individual Defendant",
];

/// Validate a hydrated record. Returns one message per violation;
/// empty means the record is schema-clean.
pub fn validate_schema(case: &HydratedCase) -> Vec<String> {
    let mut issues = Vec::new();

    if case.case_information.court_name.is_empty() {
        issues.push("case_information.court_name is required".to_string());
    }
    if case.case_information.case_number.is_empty() {
        issues.push("case_information.case_number is empty".to_string());
    }
    if case.case_information.document_title != "COMPLAINT" {
        issues.push(format!(
            "case_information.document_title must be 'COMPLAINT', got '{}'",
            case.case_information.document_title
        ));
    }
    if case.case_information.document_type != "FCRA" {
        issues.push(format!(
            "case_information.document_type must be 'FCRA', got '{}'",
            case.case_information.document_type
        ));
    }

    if case.parties.plaintiff.name.is_empty() {
        issues.push("parties.plaintiff.name is required".to_string());
    }
    if case.parties.defendants.is_empty() {
        issues.push("parties.defendants is empty".to_string());
    }
    for (index, defendant) in case.parties.defendants.iter().enumerate() {
        if defendant.name.is_empty() {
            issues.push(format!("parties.defendants[{index}].name is empty"));
        }
        if !DEFENDANT_TYPES.contains(&defendant.defendant_type.as_str()) {
            issues.push(format!(
                "parties.defendants[{index}].type '{}' is not a recognized classification",
                defendant.defendant_type
            ));
        }
    }

    for cause in &case.causes_of_action {
        if cause.count_number == 0 {
            issues.push(format!("cause '{}' has count_number 0", cause.title));
        }
        for claim in &cause.legal_claims {
            if !CLAIM_CATEGORIES.contains(&claim.category.as_str()) {
                issues.push(format!(
                    "claim '{}' has unknown category '{}'",
                    claim.citation, claim.category
                ));
            }
            if !(0.0..=1.0).contains(&claim.confidence) {
                issues.push(format!(
                    "claim '{}' confidence {} outside [0, 1]",
                    claim.citation, claim.confidence
                ));
            }
        }
    }

    let confidence = case.case_timeline.timeline_confidence;
    if !(0.0..=100.0).contains(&confidence) {
        issues.push(format!(
            "case_timeline.timeline_confidence {confidence} outside [0, 100]"
        ));
    }

    if case.metadata.format_version != FORMAT_VERSION {
        issues.push(format!(
            "metadata.format_version must be '{FORMAT_VERSION}', got '{}'",
            case.metadata.format_version
        ));
    }
    if case.metadata.tiger_case_id.is_empty() {
        issues.push("metadata.tiger_case_id is required".to_string());
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_hydrated_case;
    use caseflow_model::ConsolidatedCase;

    fn hydrated_sample() -> HydratedCase {
        let mut case = ConsolidatedCase::new("Youssef_Eman_20250405");
        case.case_information.case_number = Some("1:25-cv-01987".to_string());
        case.plaintiff = Some(caseflow_model::Plaintiff {
            name: "Eman Youssef".to_string(),
            ..Default::default()
        });
        case.defendants.push(caseflow_model::Defendant {
            name: "TRANS UNION, LLC".to_string(),
            short_name: "TransUnion".to_string(),
            defendant_type: "Consumer Reporting Agency".to_string(),
            state_of_incorporation: "Delaware".to_string(),
            business_status: "Authorized to do business in New York".to_string(),
            address: None,
        });
        build_hydrated_case(&case)
    }

    #[test]
    fn test_clean_record_passes() {
        let issues = validate_schema(&hydrated_sample());
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn test_missing_required_fields_reported() {
        let mut hydrated = hydrated_sample();
        hydrated.parties.plaintiff.name.clear();
        hydrated.parties.defendants.clear();
        let issues = validate_schema(&hydrated);
        assert!(issues.iter().any(|i| i.contains("plaintiff.name")));
        assert!(issues.iter().any(|i| i.contains("defendants is empty")));
    }

    #[test]
    fn test_enumeration_violations_reported() {
        let mut hydrated = hydrated_sample();
        hydrated.case_information.document_type = "TORT".to_string();
        hydrated.metadata.format_version = "2.0".to_string();
        hydrated.parties.defendants[0].defendant_type = "Mystery".to_string();
        let issues = validate_schema(&hydrated);
        assert!(issues.iter().any(|i| i.contains("document_type")));
        assert!(issues.iter().any(|i| i.contains("format_version")));
        assert!(issues.iter().any(|i| i.contains("classification")));
    }
}
