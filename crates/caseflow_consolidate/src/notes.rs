//! Attorney-notes parsing.
//!
//! Counsel writes case notes in a labeled-field format: one
//! `LABEL: value` per line (value `TBD` means missing), plus free-text
//! blocks (`BACKGROUND:`, `DAMAGES:`, `LEGAL_CLAIMS:`, `RELIEF_SOUGHT:`,
//! `KEY_DATES:`) that run until the next uppercase label or EOF. The
//! notes are the highest-trust source for most consolidated fields.

use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

/// A `Count N - <Type>` claim group from the LEGAL_CLAIMS block.
#[derive(Debug, Clone, PartialEq)]
pub struct NotesClaim {
    pub count: u32,
    pub title: String,
    pub claim_type: String,
    pub citations: Vec<NotesCitation>,
}

/// One `- <Citation>: <Description> (<Defendants>)` bullet.
#[derive(Debug, Clone, PartialEq)]
pub struct NotesCitation {
    pub citation: String,
    pub description: String,
    pub defendants_affected: Vec<String>,
}

/// Damages written in the four labeled subcategories of the notes
/// DAMAGES block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotesDamages {
    pub financial_harm: Vec<String>,
    pub reputational_harm: Vec<String>,
    pub emotional_harm: Vec<String>,
    pub personal_costs: Vec<String>,
}

impl NotesDamages {
    pub fn is_empty(&self) -> bool {
        self.financial_harm.is_empty()
            && self.reputational_harm.is_empty()
            && self.emotional_harm.is_empty()
            && self.personal_costs.is_empty()
    }

    /// (category key, items) pairs in a stable order.
    pub fn categories(&self) -> [(&'static str, &Vec<String>); 4] {
        [
            ("financial_harm", &self.financial_harm),
            ("reputational_harm", &self.reputational_harm),
            ("emotional_harm", &self.emotional_harm),
            ("personal_costs", &self.personal_costs),
        ]
    }
}

/// Extract a single-line labeled field. `TBD` counts as missing.
pub fn labeled_field(text: &str, label: &str) -> Option<String> {
    let pattern = Regex::new(&format!(r"(?im)^{}:\s*(.*)$", regex::escape(label)))
        .expect("static label pattern");
    let value = pattern.captures(text)?.get(1)?.as_str().trim().to_string();
    if value.is_empty() || value.eq_ignore_ascii_case("TBD") {
        return None;
    }
    Some(value)
}

/// Whether a line opens a labeled field or block (`LABEL:` in caps).
fn is_label_line(line: &str) -> bool {
    let Some((head, _)) = line.split_once(':') else {
        return false;
    };
    let head = head.trim_end();
    head.len() >= 2
        && head.starts_with(|c: char| c.is_ascii_uppercase())
        && head
            .chars()
            .all(|c| c.is_ascii_uppercase() || c == '_' || c == ' ')
}

/// Extract a free-text block that runs until the next uppercase label
/// or EOF.
pub fn block(text: &str, label: &str) -> Option<String> {
    let header = format!("{}:", label.to_uppercase());
    let mut collected: Vec<&str> = Vec::new();
    let mut found = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if !found {
            if trimmed.to_uppercase() == header {
                found = true;
            }
            continue;
        }
        if is_label_line(trimmed) {
            break;
        }
        collected.push(line);
    }

    if !found {
        return None;
    }
    let body = collected.join("\n").trim().to_string();
    (!body.is_empty()).then_some(body)
}

/// Multi-line ADDRESS block: runs until the next labeled line.
pub fn address_block(text: &str) -> Option<String> {
    // ADDRESS may carry its value on the label line or on the lines
    // that follow, so handle both shapes
    let mut collected: Vec<String> = Vec::new();
    let mut found = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if !found {
            if let Some(rest) = strip_label(trimmed, "ADDRESS") {
                found = true;
                if !rest.is_empty() {
                    collected.push(rest.to_string());
                }
            }
            continue;
        }
        if is_label_line(trimmed) {
            break;
        }
        if !trimmed.is_empty() {
            collected.push(trimmed.to_string());
        }
    }
    if !found {
        return None;
    }
    let body = collected.join("\n").trim().to_string();
    (!body.is_empty() && !body.eq_ignore_ascii_case("TBD")).then_some(body)
}

fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let (head, rest) = line.split_once(':')?;
    head.trim().eq_ignore_ascii_case(label).then(|| rest.trim())
}

/// Bulleted DEFENDANTS list.
pub fn defendants_list(text: &str) -> Vec<String> {
    let Some(body) = block(text, "DEFENDANTS") else {
        return Vec::new();
    };
    bullets(&body)
}

/// Relief items from the RELIEF_SOUGHT block.
pub fn relief_sought(text: &str) -> Vec<String> {
    let Some(body) = block(text, "RELIEF_SOUGHT") else {
        return Vec::new();
    };
    body.lines()
        .map(|line| line.trim().trim_start_matches('-').trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Key dates: `- Event Type: Date` bullets from the KEY_DATES block
/// plus the top-level date labels, keyed by snake_case event name.
///
/// `credit_discovery` is accepted as an alias for `discovery_date`.
pub fn key_dates(text: &str) -> BTreeMap<String, String> {
    let mut dates = BTreeMap::new();

    if let Some(body) = block(text, "KEY_DATES") {
        let bullet = Regex::new(r"^-\s*([^:]+):\s*(.+)$").expect("static bullet pattern");
        for line in body.lines().map(str::trim) {
            if let Some(captures) = bullet.captures(line) {
                let event = captures
                    .get(1)
                    .expect("event group")
                    .as_str()
                    .trim()
                    .to_lowercase()
                    .replace(' ', "_");
                let date = captures.get(2).expect("date group").as_str().trim();
                dates.insert(event, date.to_string());
            }
        }
    }

    for label in [
        "DISCOVERY_DATE",
        "DISPUTE_DATE",
        "FILING_DATE",
        "APPLICATION_DATE",
        "DENIAL_DATE",
    ] {
        if let Some(value) = labeled_field(text, label) {
            dates.insert(label.to_lowercase(), value);
        }
    }

    if let Some(alias) = dates.get("credit_discovery").cloned() {
        dates.entry("discovery_date".to_string()).or_insert(alias);
    }

    debug!("extracted {} key dates from notes", dates.len());
    dates
}

/// Background allegations: one per non-empty line of the BACKGROUND
/// block.
pub fn background_allegations(text: &str) -> Vec<String> {
    let Some(body) = block(text, "BACKGROUND") else {
        return Vec::new();
    };
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Damages written in the North-Star four-subcategory layout. Empty
/// when the block is absent or uses the legacy bullet format.
pub fn structured_damages(text: &str) -> NotesDamages {
    let mut damages = NotesDamages::default();
    let Some(body) = block(text, "DAMAGES") else {
        return damages;
    };

    let mut current: Option<&mut Vec<String>> = None;
    for line in body.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        let lower = line.to_lowercase();
        if lower.starts_with("financial harm:") {
            current = Some(&mut damages.financial_harm);
        } else if lower.starts_with("reputational harm:") {
            current = Some(&mut damages.reputational_harm);
        } else if lower.starts_with("emotional harm:") {
            current = Some(&mut damages.emotional_harm);
        } else if lower.starts_with("personal costs:") {
            current = Some(&mut damages.personal_costs);
        } else if let Some(item) = line.strip_prefix('-') {
            // Bullets before any subcategory header belong to the
            // legacy format handled by the damage recognizer
            if let Some(target) = current.as_deref_mut() {
                let item = item.trim();
                if !item.is_empty() {
                    target.push(item.to_string());
                }
            }
        }
    }
    damages
}

/// Parse the LEGAL_CLAIMS block.
///
/// Grammar: `Count <N> - <ClaimType>:` headers, each followed by
/// `- <Citation>: <Description> (<Defendants affected>)` bullets. The
/// returned list is authoritative and supersedes corpus suggestions.
pub fn legal_claims(text: &str) -> Vec<NotesClaim> {
    let Some(body) = block(text, "LEGAL_CLAIMS") else {
        return Vec::new();
    };

    let header_pattern = Regex::new(r"(?im)^Count\s+(\d+)\s*-\s*([^:\n]+):\s*$")
        .expect("static count pattern");
    let citation_pattern = Regex::new(r"^-\s*([^:]+):\s*([^(]+)(?:\(([^)]+)\))?")
        .expect("static citation pattern");

    // Locate every `Count N - <Type>:` header, then slice the bullet
    // content between consecutive headers
    let headers: Vec<(usize, usize, u32, String)> = header_pattern
        .captures_iter(&body)
        .map(|captures| {
            let full = captures.get(0).expect("header match");
            let count = captures[1].parse().unwrap_or(0);
            (
                full.start(),
                full.end(),
                count,
                captures[2].trim().to_string(),
            )
        })
        .collect();

    let mut claims = Vec::new();
    for (index, (_, content_start, count, claim_type)) in headers.iter().enumerate() {
        let content_end = headers
            .get(index + 1)
            .map(|next| next.0)
            .unwrap_or(body.len());
        let content = &body[*content_start..content_end];

        let mut citations = Vec::new();
        for line in content.lines().map(str::trim) {
            if !line.starts_with('-') {
                continue;
            }
            if let Some(cite) = citation_pattern.captures(line) {
                citations.push(NotesCitation {
                    citation: cite[1].trim().to_string(),
                    description: cite[2].trim().to_string(),
                    defendants_affected: cite
                        .get(3)
                        .map(|m| {
                            m.as_str()
                                .split(',')
                                .map(|d| d.trim().to_string())
                                .filter(|d| !d.is_empty())
                                .collect()
                        })
                        .unwrap_or_default(),
                });
            }
        }

        claims.push(NotesClaim {
            count: *count,
            title: format!("Count {count} - {claim_type}"),
            claim_type: claim_type.clone(),
            citations,
        });
    }

    debug!("extracted {} legal claims from notes", claims.len());
    claims
}

fn bullets(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix('-'))
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTES: &str = "\
NAME: Eman Youssef
CASE_NUMBER: 1:25-cv-01987
COURT_NAME: UNITED STATES DISTRICT COURT
COURT_DISTRICT: EASTERN DISTRICT OF NEW YORK
FILING_DATE: April 5, 2025
PHONE: (347) 555-0123
ADDRESS:
123 Main Street
Brooklyn, NY 11201
DEFENDANTS:
- TD Bank
PLAINTIFF_COUNSEL_NAME: TBD
DISPUTE_DATE: December 9, 2024
KEY_DATES:
- Credit Discovery: June 10, 2024
- Dispute Date: December 9, 2024
BACKGROUND:
Plaintiff's card was stolen while traveling.
Fraudulent charges appeared on the TD Bank account.
DAMAGES:
Financial Harm:
- Denied credit card application at Capital One
Emotional Harm:
- Stress and anxiety from collection calls
LEGAL_CLAIMS:
Count 1 - FCRA Violations:
- 15 U.S.C. 1681e(b): Failure to assure accuracy (Equifax, Experian, TransUnion)
- 15 U.S.C. 1681s-2(b): Failure to investigate (TD Bank)
Count 2 - NY FCRA Violations:
- NY GBL 380-j: Inaccurate reporting (Equifax, Experian, TransUnion)
RELIEF_SOUGHT:
- Actual damages
- Statutory damages
";

    #[test]
    fn test_labeled_field() {
        assert_eq!(labeled_field(NOTES, "NAME").as_deref(), Some("Eman Youssef"));
        assert_eq!(
            labeled_field(NOTES, "CASE_NUMBER").as_deref(),
            Some("1:25-cv-01987")
        );
        // TBD is missing
        assert_eq!(labeled_field(NOTES, "PLAINTIFF_COUNSEL_NAME"), None);
        assert_eq!(labeled_field(NOTES, "NO_SUCH_LABEL"), None);
    }

    #[test]
    fn test_address_block_stops_at_next_label() {
        let address = address_block(NOTES).unwrap();
        assert_eq!(address, "123 Main Street\nBrooklyn, NY 11201");
    }

    #[test]
    fn test_defendants_list() {
        assert_eq!(defendants_list(NOTES), vec!["TD Bank"]);
    }

    #[test]
    fn test_key_dates_with_alias() {
        let dates = key_dates(NOTES);
        assert_eq!(dates["dispute_date"], "December 9, 2024");
        assert_eq!(dates["credit_discovery"], "June 10, 2024");
        // Alias carries over when no explicit discovery_date exists
        assert_eq!(dates["discovery_date"], "June 10, 2024");
        assert_eq!(dates["filing_date"], "April 5, 2025");
    }

    #[test]
    fn test_background_allegations() {
        let allegations = background_allegations(NOTES);
        assert_eq!(allegations.len(), 2);
        assert!(allegations[0].contains("stolen"));
    }

    #[test]
    fn test_structured_damages_subcategories() {
        let damages = structured_damages(NOTES);
        assert_eq!(damages.financial_harm.len(), 1);
        assert_eq!(damages.emotional_harm.len(), 1);
        assert!(damages.reputational_harm.is_empty());
        assert!(!damages.is_empty());
    }

    #[test]
    fn test_legal_claims_grammar() {
        let claims = legal_claims(NOTES);
        assert_eq!(claims.len(), 2);

        let first = &claims[0];
        assert_eq!(first.count, 1);
        assert_eq!(first.claim_type, "FCRA Violations");
        assert_eq!(first.title, "Count 1 - FCRA Violations");
        assert_eq!(first.citations.len(), 2);
        assert_eq!(first.citations[0].citation, "15 U.S.C. 1681e(b)");
        assert_eq!(
            first.citations[0].defendants_affected,
            vec!["Equifax", "Experian", "TransUnion"]
        );
        assert_eq!(first.citations[1].defendants_affected, vec!["TD Bank"]);

        let second = &claims[1];
        assert_eq!(second.count, 2);
        assert_eq!(second.citations.len(), 1);
    }

    #[test]
    fn test_relief_sought() {
        assert_eq!(relief_sought(NOTES), vec!["Actual damages", "Statutory damages"]);
    }

    #[test]
    fn test_missing_blocks_are_empty() {
        let bare = "NAME: Someone\n";
        assert!(legal_claims(bare).is_empty());
        assert!(background_allegations(bare).is_empty());
        assert!(structured_damages(bare).is_empty());
        assert!(key_dates(bare).is_empty());
    }
}
