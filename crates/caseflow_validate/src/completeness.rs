//! Completeness checks over the hydrated record.

use crate::Validator;
use caseflow_schema::HydratedCase;

pub struct CompletenessValidator;

impl Validator for CompletenessValidator {
    fn name(&self) -> &'static str {
        "completeness"
    }

    fn validate(&self, case: &HydratedCase) -> Vec<String> {
        let mut issues = Vec::new();

        let plaintiff = &case.parties.plaintiff;
        if plaintiff.name.is_empty() || plaintiff.name == "Plaintiff" {
            issues.push("Missing plaintiff name".to_string());
        }
        if !plaintiff.address.has_city_state() {
            issues.push("Missing plaintiff city/state information".to_string());
        }

        if case.parties.defendants.is_empty() {
            issues.push("No defendants specified".to_string());
        }
        for (index, defendant) in case.parties.defendants.iter().enumerate() {
            if defendant.name.is_empty() {
                issues.push(format!("Missing name for defendant #{}", index + 1));
            }
        }

        if case.case_information.court_district.is_empty() {
            issues.push("Missing court jurisdiction".to_string());
        }
        if case.case_information.case_number.is_empty() {
            issues.push("Missing case number".to_string());
        }

        let timeline_events = case.case_timeline.document_dates.len()
            + case.case_timeline.damage_events.len();
        if timeline_events == 0 {
            issues.push("Missing timeline events".to_string());
        } else if timeline_events < 2 {
            issues.push(
                "Timeline should include multiple events to establish case chronology"
                    .to_string(),
            );
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::full_case;

    #[test]
    fn test_complete_record_passes() {
        assert!(CompletenessValidator.validate(&full_case()).is_empty());
    }

    #[test]
    fn test_placeholder_plaintiff_is_missing() {
        let mut case = full_case();
        case.parties.plaintiff.name = "Plaintiff".to_string();
        let issues = CompletenessValidator.validate(&case);
        assert!(issues.iter().any(|i| i.contains("plaintiff name")));
    }

    #[test]
    fn test_single_timeline_event_flagged() {
        let mut case = full_case();
        case.case_timeline.document_dates.truncate(1);
        case.case_timeline.damage_events.clear();
        let issues = CompletenessValidator.validate(&case);
        assert!(issues.iter().any(|i| i.contains("multiple events")));
    }

    #[test]
    fn test_missing_case_number_flagged() {
        let mut case = full_case();
        case.case_information.case_number.clear();
        let issues = CompletenessValidator.validate(&case);
        assert!(issues.iter().any(|i| i.contains("case number")));
    }
}
