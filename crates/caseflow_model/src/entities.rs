//! Legal entities and structured case information.

use serde::{Deserialize, Serialize};

/// Kind of legal entity recognized in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Court,
    Party,
    Attorney,
    CaseNumber,
}

/// Role a party or person plays in the case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Plaintiff,
    Defendant,
    Counsel,
    Judge,
    Clerk,
    None,
}

/// A party, attorney or court reference extracted from a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalEntity {
    pub entity_type: EntityType,
    pub name: String,
    #[serde(default)]
    pub role: Option<PartyRole>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Confidence score, 0.0-1.0
    pub confidence: f64,
    /// Text the entity was recognized in
    #[serde(default)]
    pub source_text: Option<String>,
}

impl LegalEntity {
    /// A party entity with just a name, role and confidence.
    pub fn party(name: impl Into<String>, role: PartyRole, confidence: f64) -> Self {
        Self {
            entity_type: EntityType::Party,
            name: name.into(),
            role: Some(role),
            address: None,
            phone: None,
            email: None,
            confidence,
            source_text: None,
        }
    }
}

/// Structured case header fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseInformation {
    pub case_number: Option<String>,
    pub court_name: Option<String>,
    pub court_district: Option<String>,
    pub case_type: Option<String>,
    pub filing_date: Option<String>,
    pub jury_demand: Option<bool>,
}

/// Postal address split into components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
}

impl Address {
    /// Parse a one- or multi-line address block.
    ///
    /// The last line is treated as "City, ST 12345"; everything before it
    /// is the street.
    pub fn parse(block: &str) -> Self {
        let lines: Vec<&str> = block
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let mut address = Address::default();
        if lines.is_empty() {
            return address;
        }

        if lines.len() > 1 {
            address.street = lines[..lines.len() - 1].join(" ");
        }
        let last = lines[lines.len() - 1];
        if let Some((city, state, zip)) = split_city_state_zip(last) {
            address.city = city;
            address.state = state;
            address.zip_code = zip;
        } else if lines.len() == 1 {
            address.street = last.to_string();
        } else {
            address.city = last.to_string();
        }
        address
    }

    /// True when no component is filled.
    pub fn is_empty(&self) -> bool {
        self.street.is_empty()
            && self.city.is_empty()
            && self.state.is_empty()
            && self.zip_code.is_empty()
    }

    /// Whether city and state are both present.
    pub fn has_city_state(&self) -> bool {
        !self.city.is_empty() && !self.state.is_empty()
    }
}

/// Split a "City, ST 12345" line into components.
fn split_city_state_zip(line: &str) -> Option<(String, String, String)> {
    let (city_part, rest) = line.rsplit_once(',')?;
    let mut tokens = rest.split_whitespace();
    let state = tokens.next()?;
    let zip = tokens.next()?;
    if state.len() != 2 || !state.chars().all(|c| c.is_ascii_uppercase()) {
        return None;
    }
    if !zip.chars().next()?.is_ascii_digit() {
        return None;
    }
    Some((
        city_part.trim().to_string(),
        state.to_string(),
        zip.to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multi_line_address() {
        let address = Address::parse("123 Main Street\nApt 4B\nBrooklyn, NY 11201");
        assert_eq!(address.street, "123 Main Street Apt 4B");
        assert_eq!(address.city, "Brooklyn");
        assert_eq!(address.state, "NY");
        assert_eq!(address.zip_code, "11201");
        assert!(address.has_city_state());
    }

    #[test]
    fn test_parse_single_line_without_city_state() {
        let address = Address::parse("PO Box 42");
        assert_eq!(address.street, "PO Box 42");
        assert!(address.city.is_empty());
    }

    #[test]
    fn test_parse_zip_plus_four() {
        let address = Address::parse("1 Court Street\nNew York, NY 10007-1234");
        assert_eq!(address.zip_code, "10007-1234");
    }

    #[test]
    fn test_empty_address() {
        assert!(Address::parse("  \n ").is_empty());
    }
}
