//! End-to-end consolidation scenarios over realistic case folders.
//!
//! Each test feeds hand-built extraction results (the shape the
//! document processor produces) through the full consolidation
//! pipeline and checks the hydrated record.

use caseflow_consolidate::{CaseConsolidator, FirmSettings};
use caseflow_events::{EventKind, MemorySink, NullSink};
use caseflow_model::{CancelToken, ConsolidatedCase, ExtractionResult};
use std::path::{Path, PathBuf};

fn doc(name: &str, text: &str) -> ExtractionResult {
    ExtractionResult::success(&PathBuf::from(format!("/cases/youssef/{name}")), "text", text.to_string())
}

fn failed_doc(name: &str) -> ExtractionResult {
    ExtractionResult::failure(
        &PathBuf::from(format!("/cases/youssef/{name}")),
        "pdf",
        "decode failed",
    )
}

const ATTY_NOTES: &str = "\
NAME: Eman Youssef
CASE_NUMBER: 1:25-cv-01987
COURT_NAME: UNITED STATES DISTRICT COURT
COURT_DISTRICT: EASTERN DISTRICT OF NEW YORK
FILING_DATE: April 5, 2025
PHONE: (347) 555-0123
ADDRESS:
123 Montague Street
Brooklyn, NY 11201
DEFENDANTS:
- TD Bank
PLAINTIFF_COUNSEL_NAME: Kevin Mallon
DISCOVERY_DATE: June 10, 2024
DISPUTE_DATE: December 9, 2024
BACKGROUND:
Plaintiff's credit card was stolen while traveling abroad.
Plaintiff disputed the fraudulent TD Bank charges with all three bureaus.
The bureaus verified the fraudulent charges as accurate.
DAMAGES:
Financial Harm:
- Denied credit card application at Capital One
Emotional Harm:
- Stress and anxiety from ongoing collection calls
";

fn denial_letter(bureau: &str, date: &str) -> String {
    format!(
        "{date}\n\nDear Eman Youssef,\n\nRegarding Your Application for the Platinum Card\n\n\
We are unable to approve your application. Your application was denied on {date} based on \
information in your {bureau} credit report.\n\nYour credit score: 512\n\n\
The reason(s) for our decision are:\n- Serious delinquency reported on the account\n\
- Proportion of balances to credit limits is too high\n\nSincerely,\n{bureau} Consumer Services\n"
    )
}

fn consolidate(results: &[ExtractionResult]) -> ConsolidatedCase {
    let consolidator = CaseConsolidator::new(FirmSettings::default());
    consolidator.consolidate(
        Path::new("/cases/youssef"),
        results,
        &NullSink,
        &CancelToken::new(),
    )
}

fn baseline_results() -> Vec<ExtractionResult> {
    vec![
        doc("Atty_Notes.txt", ATTY_NOTES),
        doc("Equifax_Denial_Letter.txt", &denial_letter("Equifax", "June 15, 2024")),
        doc("Experian_Denial_Letter.txt", &denial_letter("Experian", "July 2, 2024")),
        doc(
            "TransUnion_Denial_Letter.txt",
            &denial_letter("TransUnion", "August 20, 2024"),
        ),
    ]
}

// Scenario 1: baseline FCRA case
#[test]
fn test_baseline_fcra_case() {
    let case = consolidate(&baseline_results());

    assert_eq!(case.case_id, "youssef");
    assert_eq!(
        case.case_information.case_number.as_deref(),
        Some("1:25-cv-01987")
    );

    // TD Bank plus the three CRAs
    assert_eq!(case.defendants.len(), 4, "defendants: {:?}", case.defendants);
    let short_names: Vec<&str> = case
        .defendants
        .iter()
        .map(|d| d.short_name.as_str())
        .collect();
    for expected in ["TD Bank", "Equifax", "Experian", "TransUnion"] {
        assert!(short_names.contains(&expected), "missing {expected}");
    }

    let plaintiff = case.plaintiff.as_ref().expect("plaintiff consolidated");
    assert_eq!(plaintiff.name, "Eman Youssef");
    assert_eq!(plaintiff.address.city, "Brooklyn");
    assert_eq!(plaintiff.residency, "State of New York");

    let counsel = case.plaintiff_counsel.as_ref().expect("counsel present");
    assert_eq!(counsel.name, "Kevin Mallon");
    assert_eq!(counsel.firm, "Law Firm Name");

    assert!(case.case_timeline.chronological_validation.is_valid);
    assert!(
        case.case_timeline.timeline_confidence >= 90.0,
        "timeline confidence was {}",
        case.case_timeline.timeline_confidence
    );
    assert_eq!(
        case.case_timeline.dispute_date.as_deref(),
        Some("December 9, 2024")
    );
    assert!(!case.damages.structured_damages.is_empty());
    assert!(!case.factual_background.allegations.is_empty());
}

// Scenario 2: chronology violation flips the validity flag
#[test]
fn test_chronology_violation() {
    let baseline = consolidate(&baseline_results());

    let bad_notes = ATTY_NOTES.replace(
        "DISPUTE_DATE: December 9, 2024",
        "DISPUTE_DATE: 2025-05-01",
    );
    let mut results = baseline_results();
    results[0] = doc("Atty_Notes.txt", &bad_notes);
    let case = consolidate(&results);

    let validation = &case.case_timeline.chronological_validation;
    assert!(!validation.is_valid);
    assert!(
        validation
            .errors
            .iter()
            .any(|e| e.contains("after filing date")),
        "errors: {:?}",
        validation.errors
    );
    // The consistency bonus keys off warnings, which a chronology
    // error does not touch; the same fields are filled either way
    assert_eq!(
        case.extraction_confidence,
        baseline.extraction_confidence
    );
}

// Scenario 3: attorney notes absent
#[test]
fn test_attorney_notes_absent() {
    let results = vec![
        doc("Equifax_Denial_Letter.txt", &denial_letter("Equifax", "June 15, 2024")),
        doc("Experian_Denial_Letter.txt", &denial_letter("Experian", "July 2, 2024")),
        doc(
            "TransUnion_Denial_Letter.txt",
            &denial_letter("TransUnion", "August 20, 2024"),
        ),
    ];
    let case = consolidate(&results);

    let plaintiff = case.plaintiff.as_ref().expect("plaintiff from letters");
    assert_eq!(plaintiff.name, "Eman Youssef");
    assert!(case
        .warnings
        .iter()
        .any(|w| w.contains("Missing plaintiff address")));

    // Default template: every suggested claim awaits counsel review
    assert_eq!(case.causes_of_action.len(), 2);
    let all_claims: Vec<_> = case
        .causes_of_action
        .iter()
        .flat_map(|c| c.legal_claims.iter())
        .collect();
    assert!(!all_claims.is_empty());
    assert!(all_claims.iter().all(|claim| !claim.selected));
}

// Scenario 4: defendant deduplication across summonses
#[test]
fn test_summons_defendant_deduplication() {
    let summons_a = "SUMMONS IN A CIVIL ACTION\nTo: (Defendant's name and address)\nTRANS UNION LLC\n555 W. Adams Street\nChicago, IL 60661\nA lawsuit has been filed against you.\n";
    let summons_b = "SUMMONS IN A CIVIL ACTION\nTo: (Defendant's name and address)\nTRANS UNION, LLC\n555 W. Adams Street\nChicago, IL 60661\nA lawsuit has been filed against you.\n";
    let results = vec![doc("Summons_A.txt", summons_a), doc("Summons_B.txt", summons_b)];
    let case = consolidate(&results);

    assert_eq!(case.defendants.len(), 1, "defendants: {:?}", case.defendants);
    assert_eq!(case.defendants[0].short_name, "TransUnion");
    assert_eq!(case.defendants[0].name, "TRANS UNION, LLC");
}

// P6: adding a duplicate-named defendant never changes the count
#[test]
fn test_duplicate_defendant_is_noop() {
    let baseline = consolidate(&baseline_results());

    let notes_with_duplicate = ATTY_NOTES.replace(
        "DEFENDANTS:\n- TD Bank",
        "DEFENDANTS:\n- TD Bank\n- TD BANK, N.A.",
    );
    let mut results = baseline_results();
    results[0] = doc("Atty_Notes.txt", &notes_with_duplicate);
    let case = consolidate(&results);

    assert_eq!(case.defendants.len(), baseline.defendants.len());
}

// P1/P2: defendants pairwise distinct under normalization, and the
// plaintiff never appears among them
#[test]
fn test_defendant_invariants() {
    let notes_with_plaintiff_as_defendant = ATTY_NOTES.replace(
        "DEFENDANTS:\n- TD Bank",
        "DEFENDANTS:\n- TD Bank\n- Eman Youssef",
    );
    let mut results = baseline_results();
    results[0] = doc("Atty_Notes.txt", &notes_with_plaintiff_as_defendant);
    let case = consolidate(&results);

    let mut keys: Vec<String> = case
        .defendants
        .iter()
        .map(|d| caseflow_consolidate::defendants::normalize_key(&d.name))
        .collect();
    keys.sort();
    let deduped = {
        let mut k = keys.clone();
        k.dedup();
        k
    };
    assert_eq!(keys, deduped, "defendant keys must be pairwise distinct");

    assert!(case
        .defendants
        .iter()
        .all(|d| !d.name.eq_ignore_ascii_case("Eman Youssef")));
}

// Scenario 5: future-dated document warns without invalidating
#[test]
fn test_future_dated_document() {
    let mut results = baseline_results();
    results.push(doc(
        "Chase_Denial_Letter.txt",
        &denial_letter("Chase", "January 1, 2099"),
    ));
    let case = consolidate(&results);

    let validation = &case.case_timeline.chronological_validation;
    assert!(validation.is_valid, "errors: {:?}", validation.errors);
    assert!(validation.warnings.iter().any(|w| w.contains("Future date")));
    assert!(case
        .case_timeline
        .document_dates
        .iter()
        .any(|d| d.raw_text.contains("2099")));
}

// Scenario 6: empty folder
#[test]
fn test_empty_folder() {
    let case = consolidate(&[]);

    assert_eq!(case.case_id, "youssef");
    assert!(case.defendants.is_empty());
    assert!(case.plaintiff.is_none());
    assert_eq!(case.extraction_confidence, 0.0);
    assert!(case.warnings.iter().any(|w| w.contains("no documents processed")));
}

// P7: a LEGAL_CLAIMS block wholly determines the causes of action
#[test]
fn test_notes_claims_are_authoritative() {
    let notes_with_claims = format!(
        "{ATTY_NOTES}LEGAL_CLAIMS:\nCount 1 - FCRA Violations:\n- 15 U.S.C. 1681e(b): Failure to assure accuracy (Equifax, Experian, TransUnion)\n"
    );
    let mut results = baseline_results();
    results[0] = doc("Atty_Notes.txt", &notes_with_claims);
    let case = consolidate(&results);

    assert_eq!(case.causes_of_action.len(), 1);
    let cause = &case.causes_of_action[0];
    assert_eq!(cause.count_number, 1);
    assert_eq!(cause.legal_claims.len(), 1);
    assert_eq!(cause.legal_claims[0].citation, "15 U.S.C. 1681e(b)");
    // No corpus suggestions merged in
    assert!(cause
        .legal_claims
        .iter()
        .all(|c| !c.citation.contains("1681i")));
}

// P4: same inputs produce the same confidence
#[test]
fn test_confidence_is_pure() {
    let first = consolidate(&baseline_results());
    let second = consolidate(&baseline_results());
    assert_eq!(first.extraction_confidence, second.extraction_confidence);
}

// Failed extractions are skipped with a warning, not fatal
#[test]
fn test_failed_documents_become_warnings() {
    let mut results = baseline_results();
    results.push(failed_doc("Corrupt_Scan.pdf"));
    let case = consolidate(&results);

    assert!(case
        .warnings
        .iter()
        .any(|w| w.contains("Corrupt_Scan.pdf")));
    assert_eq!(case.source_documents.len(), 4);
}

// Consolidation closes the case event stream on every path
#[test]
fn test_case_complete_event_emitted() {
    let sink = MemorySink::new();
    let consolidator = CaseConsolidator::new(FirmSettings::default());
    consolidator.consolidate(
        Path::new("/cases/youssef"),
        &baseline_results(),
        &sink,
        &CancelToken::new(),
    );

    let events = sink.events();
    assert_eq!(events.last().map(|e| e.kind), Some(EventKind::CaseComplete));
    assert!(events.iter().all(|e| e.case_id == "youssef"));

    // The empty-input path also closes the stream
    let empty_sink = MemorySink::new();
    consolidator.consolidate(
        Path::new("/cases/youssef"),
        &[],
        &empty_sink,
        &CancelToken::new(),
    );
    assert_eq!(
        empty_sink.events().last().map(|e| e.kind),
        Some(EventKind::CaseComplete)
    );
}

// Cancellation yields a partial record with a warning
#[test]
fn test_cancellation_returns_partial_record() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let consolidator = CaseConsolidator::new(FirmSettings::default());
    let case = consolidator.consolidate(
        Path::new("/cases/youssef"),
        &baseline_results(),
        &NullSink,
        &cancel,
    );

    assert!(case
        .warnings
        .iter()
        .any(|w| w.contains("cancelled")));
    // Steps before the first checkpoint still ran
    assert!(case.case_information.case_number.is_some());
}
