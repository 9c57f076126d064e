//! Firm-level settings consumed during consolidation.
//!
//! Counsel firm fields come from configuration, not from the case
//! documents; only the case-specific attorney name is read from the
//! notes. Missing settings fall back to documented placeholders.

use serde::Deserialize;

/// Externally-supplied firm and document defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FirmSettings {
    /// Firm name for the signature block
    pub name: String,
    /// Multi-line firm address
    pub address: String,
    pub phone: String,
    pub email: String,
    /// Court used when no document names one
    pub default_court: String,
    /// District used when no document names one
    pub default_district: String,
}

impl Default for FirmSettings {
    fn default() -> Self {
        Self {
            name: "Law Firm Name".to_string(),
            address: "123 Legal Street\nCity, State 12345".to_string(),
            phone: "(555) 123-4567".to_string(),
            email: "contact@lawfirm.com".to_string(),
            default_court: "UNITED STATES DISTRICT COURT".to_string(),
            default_district: "EASTERN DISTRICT OF NEW YORK".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_defaults() {
        let settings = FirmSettings::default();
        assert_eq!(settings.name, "Law Firm Name");
        assert!(settings.address.contains('\n'));
        assert_eq!(settings.default_court, "UNITED STATES DISTRICT COURT");
    }
}
