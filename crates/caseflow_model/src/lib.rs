//! Core data model for the caseflow pipeline.
//!
//! Every stage of the pipeline communicates through the types in this
//! crate: per-document [`ExtractionResult`]s flow into the consolidator,
//! which produces a single [`ConsolidatedCase`] per case folder. All
//! types are plain serde records with enumerated variants; open maps are
//! reserved for decoder-specific metadata only.

pub mod cancel;
pub mod case;
pub mod damages;
pub mod dateparse;
pub mod dates;
pub mod entities;
pub mod extraction;

pub use cancel::CancelToken;
pub use case::{
    CaseTimeline, CauseOfAction, ChronologicalValidation, ConsolidatedCase, Counsel,
    DamageEvent, DamagesInfo, Defendant, FactualBackground, LegalClaim, Plaintiff,
};
pub use damages::{DamageCategory, DamageItem, DenialDetail};
pub use dateparse::parse_flexible_date;
pub use dates::{DateContext, ExtractedDate};
pub use entities::{Address, CaseInformation, EntityType, LegalEntity, PartyRole};
pub use extraction::{ExtractionResult, QualityMetrics};
