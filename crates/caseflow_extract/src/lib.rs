//! Document extraction: format decoders, rule-based recognizers and the
//! per-file processor.
//!
//! ```text
//! file ──▶ TextDecoder (by extension) ──▶ plain text + metadata
//!                 │
//!                 ▼
//!          recognizers (dates, entities, damages)
//!                 │
//!                 ▼
//!          ExtractionResult (+ document_start/complete/error events)
//! ```
//!
//! Decoders are stateless, one per format. Recognizers are pure
//! functions of text with their regex tables compiled once at
//! construction.

pub mod damages;
pub mod dates;
pub mod decoder;
pub mod entity;
pub mod processor;

pub use damages::DamageRecognizer;
pub use dates::DateRecognizer;
pub use decoder::{DecodeError, DecodedDocument, DecoderRegistry, TextDecoder};
pub use entity::{EntityFindings, EntityRecognizer};
pub use processor::DocumentProcessor;
