//! Hydrated case JSON: the schema downstream document assembly
//! consumes.
//!
//! [`HydratedCase`] is the on-disk shape (format version 3.0); the
//! builder renders a [`ConsolidatedCase`] into it, the validator checks
//! shape and enumerations, and the writer persists
//! `hydrated_FCRA_<case_name>.json`. Schema violations are surfaced as
//! warnings and never block the write.

pub mod validate;
pub mod writer;

pub use validate::validate_schema;
pub use writer::{write_hydrated_json, SchemaError};

use caseflow_model::{
    Address, CaseTimeline, ConsolidatedCase, DamageItem, DenialDetail,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current hydrated JSON format version.
pub const FORMAT_VERSION: &str = "3.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydratedCaseInformation {
    pub court_name: String,
    pub court_district: String,
    pub case_number: String,
    pub document_title: String,
    pub document_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydratedPlaintiff {
    pub name: String,
    pub address: Address,
    pub residency: String,
    pub consumer_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydratedDefendant {
    pub name: String,
    pub short_name: String,
    #[serde(rename = "type")]
    pub defendant_type: String,
    pub state_of_incorporation: String,
    pub business_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydratedParties {
    pub plaintiff: HydratedPlaintiff,
    pub defendants: Vec<HydratedDefendant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydratedCounsel {
    pub name: String,
    pub firm: String,
    pub address: Address,
    pub phone: String,
    pub email: String,
    pub bar_admission: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationBasis {
    pub basis: String,
    pub citation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JurisdictionAndVenue {
    pub federal_jurisdiction: CitationBasis,
    pub supplemental_jurisdiction: CitationBasis,
    pub venue: CitationBasis,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HydratedBackground {
    pub allegations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydratedClaim {
    pub citation: String,
    pub description: String,
    pub selected: bool,
    pub confidence: f64,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydratedCause {
    pub count_number: u32,
    pub title: String,
    pub against_defendants: Vec<String>,
    pub legal_claims: Vec<HydratedClaim>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActualDamages {
    pub description: String,
    pub categories: Vec<String>,
    pub specific_denials: Vec<DenialDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatutoryDamages {
    pub federal_fcra: String,
    pub ny_fcra: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PunitiveDamages {
    pub description: String,
    pub justification: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttorneyFees {
    pub federal_authority: String,
    pub state_authority: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HydratedDamages {
    pub structured_damages: Vec<DamageItem>,
    pub categorized_damages: BTreeMap<String, Vec<DamageItem>>,
    pub actual_damages: ActualDamages,
    pub statutory_damages: StatutoryDamages,
    pub punitive_damages: PunitiveDamages,
    pub attorney_fees: AttorneyFees,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrayerForRelief {
    pub damages: Vec<String>,
    pub injunctive_relief: Vec<String>,
    pub costs_and_fees: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingDetails {
    pub date: String,
    pub signature_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydratedMetadata {
    pub tiger_case_id: String,
    pub format_version: String,
}

/// The complete hydrated case record, format version 3.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydratedCase {
    pub case_information: HydratedCaseInformation,
    pub parties: HydratedParties,
    pub plaintiff_counsel: HydratedCounsel,
    pub jurisdiction_and_venue: JurisdictionAndVenue,
    pub preliminary_statement: String,
    pub factual_background: HydratedBackground,
    pub causes_of_action: Vec<HydratedCause>,
    pub damages: HydratedDamages,
    pub case_timeline: CaseTimeline,
    pub prayer_for_relief: PrayerForRelief,
    pub jury_demand: bool,
    pub filing_details: FilingDetails,
    pub metadata: HydratedMetadata,
}

const DEFAULT_COURT: &str = "UNITED STATES DISTRICT COURT";
const DEFAULT_DISTRICT: &str = "SOUTHERN DISTRICT OF NEW YORK";

/// Render a consolidated case into the hydrated schema.
pub fn build_hydrated_case(case: &ConsolidatedCase) -> HydratedCase {
    let plaintiff = case.plaintiff.clone().unwrap_or_default();
    let counsel = case.plaintiff_counsel.clone().unwrap_or_default();
    let plaintiff_name = if plaintiff.name.is_empty() {
        "Plaintiff".to_string()
    } else {
        plaintiff.name.clone()
    };

    HydratedCase {
        case_information: HydratedCaseInformation {
            court_name: case
                .case_information
                .court_name
                .clone()
                .unwrap_or_else(|| DEFAULT_COURT.to_string()),
            court_district: case
                .case_information
                .court_district
                .clone()
                .unwrap_or_else(|| DEFAULT_DISTRICT.to_string()),
            case_number: case.case_information.case_number.clone().unwrap_or_default(),
            document_title: "COMPLAINT".to_string(),
            document_type: "FCRA".to_string(),
        },
        parties: HydratedParties {
            plaintiff: HydratedPlaintiff {
                name: plaintiff_name.clone(),
                address: plaintiff.address,
                residency: plaintiff.residency,
                consumer_status: plaintiff.consumer_status,
            },
            defendants: case
                .defendants
                .iter()
                .map(|d| HydratedDefendant {
                    name: d.name.clone(),
                    short_name: d.short_name.clone(),
                    defendant_type: d.defendant_type.clone(),
                    state_of_incorporation: d.state_of_incorporation.clone(),
                    business_status: d.business_status.clone(),
                })
                .collect(),
        },
        plaintiff_counsel: HydratedCounsel {
            name: counsel.name,
            firm: counsel.firm,
            address: counsel.address,
            phone: counsel.phone,
            email: counsel.email,
            bar_admission: "Admitted to practice before this Court".to_string(),
        },
        jurisdiction_and_venue: JurisdictionAndVenue {
            federal_jurisdiction: CitationBasis {
                basis: "Federal Question".to_string(),
                citation: "15 U.S.C. § 1681p".to_string(),
            },
            supplemental_jurisdiction: CitationBasis {
                basis: "Supplemental Jurisdiction".to_string(),
                citation: "28 U.S.C. § 1367(a)".to_string(),
            },
            venue: CitationBasis {
                basis: "Proper Venue".to_string(),
                citation: "28 U.S.C. § 1391(b)".to_string(),
            },
        },
        preliminary_statement: format!(
            "{plaintiff_name} brings this action against the defendants for violations of the \
Fair Credit Reporting Act and the New York Fair Credit Reporting Act."
        ),
        factual_background: HydratedBackground {
            allegations: case.factual_background.allegations.clone(),
        },
        causes_of_action: case
            .causes_of_action
            .iter()
            .map(|cause| HydratedCause {
                count_number: cause.count_number,
                title: cause.title.clone(),
                against_defendants: cause.against_defendants.clone(),
                legal_claims: cause
                    .legal_claims
                    .iter()
                    .map(|claim| HydratedClaim {
                        citation: claim.citation.clone(),
                        description: claim.description.clone(),
                        selected: claim.selected,
                        confidence: claim.confidence,
                        category: claim.category.clone(),
                    })
                    .collect(),
            })
            .collect(),
        damages: build_damages(case),
        case_timeline: case.case_timeline.clone(),
        prayer_for_relief: PrayerForRelief {
            damages: vec![
                "Actual damages".to_string(),
                "Statutory damages".to_string(),
                "Punitive damages".to_string(),
            ],
            injunctive_relief: vec![
                "An order requiring defendants to correct the plaintiff's credit report"
                    .to_string(),
                "An order requiring defendants to implement policies to prevent future violations"
                    .to_string(),
            ],
            costs_and_fees: vec![
                "Litigation costs".to_string(),
                "Reasonable attorney's fees".to_string(),
            ],
        },
        jury_demand: case.case_information.jury_demand.unwrap_or(true),
        filing_details: FilingDetails {
            date: case
                .case_information
                .filing_date
                .clone()
                .unwrap_or_else(|| Utc::now().format("%B %d, %Y").to_string()),
            signature_date: Utc::now().format("%Y-%m-%d").to_string(),
        },
        metadata: HydratedMetadata {
            tiger_case_id: case.case_id.clone(),
            format_version: FORMAT_VERSION.to_string(),
        },
    }
}

fn build_damages(case: &ConsolidatedCase) -> HydratedDamages {
    HydratedDamages {
        structured_damages: case.damages.structured_damages.clone(),
        categorized_damages: case.damages.categorized_damages.clone(),
        actual_damages: ActualDamages {
            description:
                "Plaintiff has suffered actual damages as a direct result of Defendants' violations"
                    .to_string(),
            categories: vec![
                "Damage to reputation and credit standing".to_string(),
                "Adverse impact on credit rating and credit score".to_string(),
                "Denial of credit applications".to_string(),
                "Emotional distress, humiliation, and frustration".to_string(),
                "Expenditure of time and resources to correct credit reports".to_string(),
            ],
            specific_denials: case.damages.denials.clone(),
        },
        statutory_damages: StatutoryDamages {
            federal_fcra:
                "Not less than $100 and not more than $1,000 per violation under 15 U.S.C. § 1681n(a)(1)(A)"
                    .to_string(),
            ny_fcra: "Such damages as the court deems appropriate under N.Y. GBL § 380-l"
                .to_string(),
        },
        punitive_damages: PunitiveDamages {
            description: "Punitive damages for willful violations of the FCRA and NY FCRA"
                .to_string(),
            justification:
                "Defendants' conduct was willful and showed reckless disregard for Plaintiff's rights"
                    .to_string(),
        },
        attorney_fees: AttorneyFees {
            federal_authority: "15 U.S.C. § 1681n(a)(3) and 15 U.S.C. § 1681o(a)(2)".to_string(),
            state_authority: "N.Y. GBL § 380-l and N.Y. GBL § 380-m".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_case() -> ConsolidatedCase {
        let mut case = ConsolidatedCase::new("Youssef_Eman_20250405");
        case.case_information.case_number = Some("1:25-cv-01987".to_string());
        case.case_information.court_name = Some("UNITED STATES DISTRICT COURT".to_string());
        case.case_information.court_district = Some("EASTERN DISTRICT OF NEW YORK".to_string());
        case.plaintiff = Some(caseflow_model::Plaintiff {
            name: "Eman Youssef".to_string(),
            residency: "State of New York".to_string(),
            ..Default::default()
        });
        case
    }

    #[test]
    fn test_builder_fills_constants() {
        let hydrated = build_hydrated_case(&sample_case());
        assert_eq!(hydrated.case_information.document_title, "COMPLAINT");
        assert_eq!(hydrated.case_information.document_type, "FCRA");
        assert_eq!(hydrated.metadata.format_version, "3.0");
        assert_eq!(hydrated.metadata.tiger_case_id, "Youssef_Eman_20250405");
        assert!(hydrated.jury_demand);
        assert!(hydrated.preliminary_statement.starts_with("Eman Youssef"));
    }

    #[test]
    fn test_builder_defaults_for_sparse_record() {
        let sparse = ConsolidatedCase::new("empty");
        let hydrated = build_hydrated_case(&sparse);
        assert_eq!(hydrated.case_information.court_name, DEFAULT_COURT);
        assert_eq!(hydrated.parties.plaintiff.name, "Plaintiff");
        assert!(hydrated.parties.defendants.is_empty());
        assert!(hydrated.case_information.case_number.is_empty());
    }

    #[test]
    fn test_round_trip_is_stable() {
        let hydrated = build_hydrated_case(&sample_case());
        let first = serde_json::to_string_pretty(&hydrated).unwrap();
        let parsed: HydratedCase = serde_json::from_str(&first).unwrap();
        let second = serde_json::to_string_pretty(&parsed).unwrap();
        assert_eq!(first, second);
        assert_eq!(parsed, hydrated);
    }

    #[test]
    fn test_wire_shape_field_names() {
        let hydrated = build_hydrated_case(&sample_case());
        let json = serde_json::to_value(&hydrated).unwrap();
        assert!(json.get("case_information").is_some());
        assert!(json["parties"].get("plaintiff").is_some());
        assert!(json["jurisdiction_and_venue"]
            .get("federal_jurisdiction")
            .is_some());
        assert_eq!(json["metadata"]["format_version"], "3.0");
    }
}
