//! Legal-sufficiency validation of hydrated case records.
//!
//! Three validators run in sequence over a finished record; each
//! returns human-readable issues and the suite aggregates them. The
//! timeline validator re-checks the chronology rules independently of
//! the consolidator so records that bypassed it are still caught.

mod completeness;
mod fcra;
mod timeline;

pub use completeness::CompletenessValidator;
pub use fcra::FcraValidator;
pub use timeline::TimelineValidator;

use caseflow_schema::HydratedCase;
use std::collections::BTreeMap;
use tracing::info;

/// One validator over a hydrated record.
pub trait Validator {
    fn name(&self) -> &'static str;

    /// Human-readable issues; empty means the validator passes.
    fn validate(&self, case: &HydratedCase) -> Vec<String>;
}

/// Aggregated result of the validation suite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub issues_by_validator: BTreeMap<String, Vec<String>>,
}

impl ValidationReport {
    /// All issues across validators, in suite order.
    pub fn all_issues(&self) -> Vec<&str> {
        self.issues_by_validator
            .values()
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

/// Run the standard suite: FCRA, completeness, timeline.
pub fn validate_case(case: &HydratedCase) -> ValidationReport {
    let validators: [&dyn Validator; 3] = [
        &FcraValidator,
        &CompletenessValidator,
        &TimelineValidator,
    ];

    let mut report = ValidationReport {
        is_valid: true,
        issues_by_validator: BTreeMap::new(),
    };
    for validator in validators {
        let issues = validator.validate(case);
        if !issues.is_empty() {
            report.is_valid = false;
        }
        report
            .issues_by_validator
            .insert(validator.name().to_string(), issues);
    }

    info!(
        "validation suite complete: valid={}, {} issues",
        report.is_valid,
        report.all_issues().len()
    );
    report
}
