//! Independent timeline validation over the persisted record.
//!
//! Re-checks the chronology rules from the record alone, without
//! trusting the consolidator's own `chronological_validation`. Catches
//! records that were edited downstream or produced by another tool.

use crate::Validator;
use caseflow_model::{parse_flexible_date, DateContext};
use caseflow_schema::HydratedCase;
use chrono::{Datelike, NaiveDate, Utc};

pub struct TimelineValidator;

impl Validator for TimelineValidator {
    fn name(&self) -> &'static str {
        "timeline"
    }

    fn validate(&self, case: &HydratedCase) -> Vec<String> {
        let mut issues = Vec::new();
        let timeline = &case.case_timeline;

        let discovery = parse_or_report(timeline.discovery_date.as_deref(), "discovery", &mut issues);
        let dispute = parse_or_report(timeline.dispute_date.as_deref(), "dispute", &mut issues);
        let filing = parse_or_report(timeline.filing_date.as_deref(), "filing", &mut issues);

        if let (Some(discovery), Some(dispute)) = (discovery, dispute) {
            if discovery > dispute {
                issues.push(format!(
                    "Discovery date ({discovery}) is after dispute date ({dispute})"
                ));
            }
        }
        if let (Some(dispute), Some(filing)) = (dispute, filing) {
            if dispute > filing {
                issues.push(format!(
                    "Dispute date ({dispute}) is after filing date ({filing})"
                ));
            }
        }

        if let Some(filing) = filing {
            for event in &timeline.damage_events {
                if let Some(date) = event.date.as_deref().and_then(parse_flexible_date) {
                    if date > filing {
                        issues.push(format!(
                            "Damage event ({date}) is after filing date ({filing})"
                        ));
                    }
                }
            }
        }

        let today = Utc::now().date_naive();
        for date in &timeline.document_dates {
            let Some(parsed) = date.parsed_date else {
                continue;
            };
            if parsed > today {
                issues.push(format!("Future date in record: {parsed}"));
            }
            if parsed.year() < 1990 {
                issues.push(format!("Implausibly old date in record: {parsed}"));
            }
        }

        // Application precedes denial, per source document
        for application in dates_in_context(case, DateContext::ApplicationDate) {
            for denial in dates_in_context(case, DateContext::DenialDate) {
                let same_document = application.1 == denial.1;
                if same_document && application.0 > denial.0 {
                    issues.push(format!(
                        "Application date ({}) is after denial date ({})",
                        application.0, denial.0
                    ));
                }
            }
        }

        issues
    }
}

fn parse_or_report(
    raw: Option<&str>,
    label: &str,
    issues: &mut Vec<String>,
) -> Option<NaiveDate> {
    let raw = raw?;
    match parse_flexible_date(raw) {
        Some(date) => Some(date),
        None => {
            issues.push(format!("Unparseable {label} date: '{raw}'"));
            None
        }
    }
}

fn dates_in_context(
    case: &HydratedCase,
    context: DateContext,
) -> Vec<(NaiveDate, Option<&str>)> {
    case.case_timeline
        .document_dates
        .iter()
        .filter(|d| d.context == context)
        .filter_map(|d| d.parsed_date.map(|p| (p, d.source_document.as_deref())))
        .collect()
}
