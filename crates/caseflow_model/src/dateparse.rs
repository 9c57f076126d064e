//! Permissive date parsing for chronology checks.
//!
//! Key timeline dates are preserved in their source representation
//! (strings); comparisons parse them on demand. The accepted formats are
//! the ones counsel actually writes: ISO, US numeric, and month-name
//! variants with or without commas.

use chrono::NaiveDate;

/// Formats tried in order after ISO parsing fails.
const DATE_FORMATS: &[&str] = &[
    "%B %d, %Y", // June 15, 2025
    "%b %d, %Y", // Jun 15, 2025
    "%B %d %Y",  // June 15 2025
    "%b %d %Y",  // Jun 15 2025
    "%d %B %Y",  // 15 June 2025
    "%d %b %Y",  // 15 Jun 2025
    "%m/%d/%Y",  // 06/15/2025
    "%m-%d-%Y",  // 06-15-2025
    "%Y/%m/%d",  // 2025/06/15
];

/// Parse a date written in any of the accepted formats.
///
/// Returns `None` for empty or unrecognized input; callers decide
/// whether that is an error (chronology validation) or simply missing
/// data (field extraction).
pub fn parse_flexible_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    // Two-digit-year numeric fallback: MM/DD/YY with a 1950 pivot
    if let Some(date) = parse_two_digit_year(trimmed) {
        return Some(date);
    }

    None
}

fn parse_two_digit_year(input: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = input.split(['/', '-']).collect();
    if parts.len() != 3 || parts[2].len() != 2 {
        return None;
    }
    let month: u32 = parts[0].parse().ok()?;
    let day: u32 = parts[1].parse().ok()?;
    let short_year: i32 = parts[2].parse().ok()?;
    let year = if short_year < 50 {
        2000 + short_year
    } else {
        1900 + short_year
    };
    NaiveDate::from_ymd_opt(year, month, day)
}
