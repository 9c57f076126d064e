//! Defendant normalization, deduplication and display lookup.
//!
//! Candidate defendant strings come from several sources (attorney
//! notes, FCRA heuristics, per-document entities) with inconsistent
//! spellings. A normalization function maps each raw string to a
//! canonical key used for deduplication only; the canonical *display*
//! name comes from a roster keyed by that key, with a generic builder
//! for unknown defendants.

use caseflow_model::Defendant;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Substitution table applied after uppercasing: first match wins.
const KEY_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("TRANS UNION", "TRANSUNION"),
    ("TRANSUNION", "TRANSUNION"),
    ("EXPERIAN", "EXPERIAN"),
    ("EQUIFAX", "EQUIFAX"),
    ("TD BANK", "TD BANK"),
    ("CAPITAL ONE", "CAPITAL ONE"),
    ("BARCLAYS", "BARCLAYS"),
];

/// Candidate strings that are never defendants: section noise picked up
/// by party-proximity matching.
const EXCLUDED_CANDIDATES: &[&str] = &[
    "LLC", "INC", "HIGH", "LOW", "RANGE", "FROM", "SCORE", "DATE",
];

/// Map a raw defendant string to its canonical deduplication key.
///
/// Uppercase, strip parenthetical incorporation notes, strip trailing
/// punctuation, collapse whitespace, then apply the substitution table.
pub fn normalize_key(raw: &str) -> String {
    static PARENTHETICAL: OnceLock<Regex> = OnceLock::new();
    let parenthetical = PARENTHETICAL
        .get_or_init(|| Regex::new(r"\s*\([^)]*\)").expect("static parenthetical pattern"));

    let mut key = raw.to_uppercase();
    key = parenthetical.replace_all(&key, "").into_owned();

    key = key.trim().trim_end_matches(['.', ',']).to_string();
    key = key.split_whitespace().collect::<Vec<_>>().join(" ");

    for (needle, replacement) in KEY_SUBSTITUTIONS {
        if key.contains(needle) {
            return replacement.to_string();
        }
    }
    key
}

/// Whether a candidate string is worth considering at all.
///
/// Filters out month names, credit-score narration and bare generic
/// tokens that party-proximity matching occasionally produces.
pub fn is_plausible_candidate(raw: &str) -> bool {
    static NOISE: OnceLock<Vec<Regex>> = OnceLock::new();
    let noise = NOISE.get_or_init(|| {
        [
            r"^(JANUARY|FEBRUARY|MARCH|APRIL|MAY|JUNE|JULY|AUGUST|SEPTEMBER|OCTOBER|NOVEMBER|DECEMBER)\b",
            r"^SCORES?\s+RANGE",
            r"^FROM\s+A\s+LOW",
            r"^\d{1,2}[,\s]\d{4}",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("static noise pattern"))
        .collect()
    });

    let upper = raw.trim().to_uppercase();
    if upper.len() < 3 {
        return false;
    }
    if EXCLUDED_CANDIDATES.contains(&upper.as_str()) {
        return false;
    }
    !noise.iter().any(|pattern| pattern.is_match(&upper))
}

/// Build the display record for a defendant, consulting the roster of
/// known FCRA defendants first.
pub fn build_defendant(raw: &str, forum_state: &str) -> Defendant {
    let key = normalize_key(raw);
    if let Some(defendant) = roster_lookup(&key, forum_state) {
        debug!("roster defendant for '{raw}': {}", defendant.name);
        return defendant;
    }

    let name = raw.trim().to_uppercase();
    Defendant {
        short_name: short_name_of(&name),
        defendant_type: classify(&name).to_string(),
        state_of_incorporation: incorporation_state_of(&name).to_string(),
        business_status: business_status(forum_state),
        name,
        address: None,
    }
}

/// Known-defendant roster: canonical display fields per normalized key.
fn roster_lookup(key: &str, forum_state: &str) -> Option<Defendant> {
    let (name, short_name, defendant_type, state) = match key {
        "EQUIFAX" => (
            "EQUIFAX INFORMATION SERVICES, LLC",
            "Equifax",
            "Consumer Reporting Agency",
            "Georgia",
        ),
        "EXPERIAN" => (
            "EXPERIAN INFORMATION SOLUTIONS, INC.",
            "Experian",
            "Consumer Reporting Agency",
            "Ohio",
        ),
        "TRANSUNION" => (
            "TRANS UNION, LLC",
            "TransUnion",
            "Consumer Reporting Agency",
            "Delaware",
        ),
        "TD BANK" => (
            "TD BANK, N.A.",
            "TD Bank",
            "Furnisher of Information",
            "Delaware",
        ),
        "CAPITAL ONE" => (
            "CAPITAL ONE, N.A.",
            "Capital One",
            "Furnisher of Information",
            "Virginia",
        ),
        "BARCLAYS" => (
            "BARCLAYS BANK DELAWARE",
            "Barclays",
            "Furnisher of Information",
            "Delaware",
        ),
        _ => return None,
    };
    Some(Defendant {
        name: name.to_string(),
        short_name: short_name.to_string(),
        defendant_type: defendant_type.to_string(),
        state_of_incorporation: state.to_string(),
        business_status: business_status(forum_state),
        address: None,
    })
}

fn business_status(forum_state: &str) -> String {
    let state = if forum_state.is_empty() || forum_state == "Unknown" {
        "New York"
    } else {
        forum_state
    };
    format!("Authorized to do business in {state}")
}

/// Classify an unknown defendant by name.
fn classify(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    if ["equifax", "experian", "transunion", "trans union"]
        .iter()
        .any(|cra| lower.contains(cra))
    {
        "Consumer Reporting Agency"
    } else if ["bank", "credit union", "financial", "lending"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        "Furnisher of Information"
    } else if ["llc", "inc", "corp", "company"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        "Corporate Defendant"
    } else {
        "Individual Defendant"
    }
}

/// Short display name: strip corporate suffixes and filler.
fn short_name_of(name: &str) -> String {
    let mut short = name.to_string();
    for suffix in [
        ", LLC",
        " LLC",
        ", INC.",
        ", INC",
        " INFORMATION SERVICES",
        " INFORMATION SOLUTIONS",
        ", N.A.",
    ] {
        short = short.replace(suffix, "");
    }
    let short = short.trim().trim_end_matches([',', '.']).trim();
    title_case(short)
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Likely state of incorporation for an unknown defendant.
fn incorporation_state_of(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    let table: &[(&str, &str)] = &[
        ("bank of america", "North Carolina"),
        ("wells fargo", "South Dakota"),
        ("chase", "Ohio"),
        ("citibank", "South Dakota"),
    ];
    for (needle, state) in table {
        if lower.contains(needle) {
            return state;
        }
    }
    // Delaware is the default forum of incorporation
    "Delaware"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trans_union_variants() {
        assert_eq!(normalize_key("TRANS UNION LLC"), "TRANSUNION");
        assert_eq!(normalize_key("Trans Union, LLC"), "TRANSUNION");
        assert_eq!(normalize_key("TransUnion"), "TRANSUNION");
    }

    #[test]
    fn test_normalize_equifax_comma_variants_agree() {
        // Both spellings map to the same key
        assert_eq!(
            normalize_key("EQUIFAX INFORMATION SERVICES, LLC"),
            normalize_key("EQUIFAX INFORMATION SERVICES LLC"),
        );
        assert_eq!(normalize_key("EQUIFAX INFORMATION SERVICES, LLC"), "EQUIFAX");
    }

    #[test]
    fn test_normalize_strips_parentheticals_and_punctuation() {
        assert_eq!(
            normalize_key("ACME RECOVERY (a Delaware corporation)."),
            "ACME RECOVERY"
        );
        assert_eq!(normalize_key("  ACME    RECOVERY  "), "ACME RECOVERY");
    }

    #[test]
    fn test_candidate_noise_filter() {
        assert!(!is_plausible_candidate("LLC"));
        assert!(!is_plausible_candidate("JANUARY 15, 2024"));
        assert!(!is_plausible_candidate("SCORES RANGE"));
        assert!(!is_plausible_candidate("FROM A LOW OF 500"));
        assert!(is_plausible_candidate("TD Bank"));
        assert!(is_plausible_candidate("ACME RECOVERY LLC"));
    }

    #[test]
    fn test_roster_display_names() {
        let equifax = build_defendant("equifax information services llc", "New York");
        assert_eq!(equifax.name, "EQUIFAX INFORMATION SERVICES, LLC");
        assert_eq!(equifax.short_name, "Equifax");
        assert_eq!(equifax.defendant_type, "Consumer Reporting Agency");
        assert_eq!(equifax.state_of_incorporation, "Georgia");

        let td = build_defendant("TD Bank", "New York");
        assert_eq!(td.name, "TD BANK, N.A.");
        assert_eq!(td.defendant_type, "Furnisher of Information");
        assert_eq!(td.business_status, "Authorized to do business in New York");
    }

    #[test]
    fn test_unknown_defendant_generic_builder() {
        let defendant = build_defendant("First National Bank of Springfield", "Ohio");
        assert_eq!(defendant.name, "FIRST NATIONAL BANK OF SPRINGFIELD");
        assert_eq!(defendant.defendant_type, "Furnisher of Information");
        assert_eq!(defendant.state_of_incorporation, "Delaware");
        assert_eq!(defendant.business_status, "Authorized to do business in Ohio");
    }

    #[test]
    fn test_short_name_strips_suffixes() {
        assert_eq!(short_name_of("TRANS UNION, LLC"), "Trans Union");
        assert_eq!(short_name_of("ACME CAPITAL, INC."), "Acme Capital");
    }
}
