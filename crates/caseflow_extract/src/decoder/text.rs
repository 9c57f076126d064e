//! Plain-text decoder.

use super::{check_extracted_text, validate_input, DecodeError, DecodedDocument, TextDecoder};
use std::path::Path;
use tracing::debug;

/// Decoder for `.txt` files. Reads UTF-8, lossy on invalid bytes, and
/// normalizes Windows line endings.
pub struct PlainTextDecoder;

impl TextDecoder for PlainTextDecoder {
    fn name(&self) -> &'static str {
        "text"
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &["txt"]
    }

    fn decode(&self, path: &Path) -> Result<DecodedDocument, DecodeError> {
        validate_input(self, path)?;

        let bytes = std::fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes).replace("\r\n", "\n");
        check_extracted_text(&text)?;

        debug!("decoded {} ({} chars)", path.display(), text.len());

        let mut document = DecodedDocument::new(text);
        document
            .metadata
            .insert("source_bytes".into(), bytes.len().to_string());
        Ok(document)
    }
}
