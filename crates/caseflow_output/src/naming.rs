//! Case folder naming.
//!
//! Case folders are named `LastName_FirstName_YYYYMMDD` derived from
//! the plaintiff; when no usable name exists the fallback is
//! `Unknown_Case_YYYYMMDD_HHMMSS`.

use caseflow_model::ConsolidatedCase;
use chrono::Local;
use regex::Regex;

/// Longest sanitized base name kept before the date stamp.
const MAX_NAME_LENGTH: usize = 50;

/// Derive the case folder name from a consolidated record.
pub fn case_folder_name(case: &ConsolidatedCase) -> String {
    if let Some(plaintiff) = &case.plaintiff {
        if let Some(base) = last_first(&plaintiff.name) {
            return stamped(&base);
        }
    }
    fallback_name()
}

/// `"Eman Youssef"` -> `"Youssef_Eman"`; titles and suffixes dropped.
pub fn last_first(full_name: &str) -> Option<String> {
    let cleaned = clean_name(full_name);
    let parts: Vec<&str> = cleaned.split_whitespace().collect();
    match parts.as_slice() {
        [] => None,
        [single] => Some(sanitize(single)),
        [first, .., last] => Some(format!("{}_{}", sanitize(last), sanitize(first))),
    }
    .filter(|name| !name.is_empty() && name != "Unknown")
}

fn clean_name(name: &str) -> String {
    let titles =
        Regex::new(r"(?i)\b(Mr|Mrs|Ms|Dr|Prof|Sr|Jr|III|IV)\b\.?").expect("static title pattern");
    let roles = Regex::new(r"(?i)\b(Plaintiff|Defendant)s?\b").expect("static role pattern");
    let without_titles = titles.replace_all(name, "");
    let without_roles = roles.replace_all(&without_titles, "");
    without_roles.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Filesystem-safe component: drop reserved characters, collapse
/// separators to underscores, cap the length.
pub fn sanitize(name: &str) -> String {
    let reserved = Regex::new(r#"[<>:"/\\|?*]"#).expect("static reserved pattern");
    let separators = Regex::new(r"[\s.\-]+").expect("static separator pattern");
    let stripped = reserved.replace_all(name, "");
    let mut sanitized = separators
        .replace_all(&stripped, "_")
        .trim_matches('_')
        .to_string();
    if sanitized.is_empty() {
        return "Unknown".to_string();
    }
    if sanitized.len() > MAX_NAME_LENGTH {
        sanitized.truncate(MAX_NAME_LENGTH);
        sanitized = sanitized.trim_end_matches('_').to_string();
    }
    sanitized
}

fn stamped(base: &str) -> String {
    // Don't double-stamp a name that already ends in a date
    let dated = Regex::new(r"_\d{8}$").expect("static date pattern");
    if dated.is_match(base) {
        return base.to_string();
    }
    format!("{base}_{}", Local::now().format("%Y%m%d"))
}

fn fallback_name() -> String {
    format!("Unknown_Case_{}", Local::now().format("%Y%m%d_%H%M%S"))
}
