//! FCRA legal-sufficiency checks.
//!
//! An FCRA complaint needs a credit-bureau defendant, a furnisher
//! defendant, dispute evidence and an adverse-action event. Anything
//! missing is a gap counsel must resolve before filing.

use crate::Validator;
use caseflow_model::DateContext;
use caseflow_schema::HydratedCase;

/// Known national credit bureaus, matched as substrings.
const CREDIT_BUREAUS: &[&str] = &[
    "experian",
    "transunion",
    "trans union",
    "equifax",
];

/// Name fragments that indicate a furnisher of credit information.
const FURNISHER_INDICATORS: &[&str] = &[
    "bank", "credit", "financial", "capital", "lending", "mortgage", "card", "union",
    "fund", "services",
];

pub struct FcraValidator;

impl Validator for FcraValidator {
    fn name(&self) -> &'static str {
        "fcra"
    }

    fn validate(&self, case: &HydratedCase) -> Vec<String> {
        let mut issues = Vec::new();

        if !has_credit_bureau(case) {
            issues.push(
                "FCRA case missing credit bureau defendant (Experian, TransUnion, or Equifax)"
                    .to_string(),
            );
        }
        if !has_furnisher(case) {
            issues.push(
                "FCRA case missing furnisher defendant (bank, creditor, or data furnisher)"
                    .to_string(),
            );
        }
        if !has_dispute_evidence(case) {
            issues.push("FCRA case missing dispute evidence in timeline".to_string());
        }
        if !has_adverse_action(case) {
            issues.push(
                "FCRA case missing adverse action event (credit denial, rate increase, etc.)"
                    .to_string(),
            );
        }

        issues
    }
}

fn has_credit_bureau(case: &HydratedCase) -> bool {
    case.parties.defendants.iter().any(|defendant| {
        let name = defendant.name.to_lowercase();
        CREDIT_BUREAUS.iter().any(|bureau| name.contains(bureau))
    })
}

fn has_furnisher(case: &HydratedCase) -> bool {
    case.parties.defendants.iter().any(|defendant| {
        let name = defendant.name.to_lowercase();
        // A bureau is not a furnisher even though "services" appears in
        // its legal name
        if CREDIT_BUREAUS.iter().any(|bureau| name.contains(bureau)) {
            return false;
        }
        FURNISHER_INDICATORS
            .iter()
            .any(|indicator| name.contains(indicator))
    })
}

fn has_dispute_evidence(case: &HydratedCase) -> bool {
    if case.case_timeline.dispute_date.is_some() {
        return true;
    }
    case.case_timeline
        .document_dates
        .iter()
        .any(|date| date.context == DateContext::DisputeDate)
}

fn has_adverse_action(case: &HydratedCase) -> bool {
    if !case.case_timeline.damage_events.is_empty() {
        return true;
    }
    case.case_timeline.document_dates.iter().any(|date| {
        matches!(
            date.context,
            DateContext::DenialDate | DateContext::AdverseActionDate
        )
    })
}
