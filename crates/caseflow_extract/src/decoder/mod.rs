//! Format-specific text decoders.
//!
//! A decoder turns one file into plain text plus metadata. Decoders are
//! stateless; the [`DecoderRegistry`] routes a path to the decoder
//! claiming its extension.
//!
//! Required behaviors shared by every decoder:
//! - files larger than 100 MiB are rejected with [`DecodeError::FileTooLarge`]
//! - unclaimed extensions are rejected with [`DecodeError::UnsupportedFormat`]
//! - fewer than 10 non-whitespace characters of output is
//!   [`DecodeError::EmptyExtraction`]
//! - paragraph breaks are preserved; table rows flatten to
//!   `" | "`-joined cells

mod docx;
mod pdf;
mod text;

pub use docx::DocxDecoder;
pub use pdf::PdfDecoder;
pub use text::PlainTextDecoder;

use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Maximum input file size accepted by any decoder.
const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Minimum non-whitespace characters for an extraction to count.
const MIN_EXTRACTED_CHARS: usize = 10;

/// Errors produced by text decoders.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("File too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Extracted text too short to be usable")]
    EmptyExtraction,

    #[error("Extraction tool failed: {0}")]
    Tool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decoded file contents: plain text plus decoder-specific metadata.
#[derive(Debug, Clone, Default)]
pub struct DecodedDocument {
    pub text: String,
    pub metadata: BTreeMap<String, String>,
}

impl DecodedDocument {
    pub fn new(text: String) -> Self {
        Self {
            text,
            metadata: BTreeMap::new(),
        }
    }
}

/// A stateless, per-format text decoder.
pub trait TextDecoder: Send + Sync {
    /// Decoder name, recorded as `engine_name` on results.
    fn name(&self) -> &'static str;

    /// Lowercase extensions (without dot) this decoder claims.
    fn supported_extensions(&self) -> &'static [&'static str];

    /// Decode `path` into text and metadata.
    fn decode(&self, path: &Path) -> Result<DecodedDocument, DecodeError>;
}

/// Shared pre-flight checks: existence, extension, size.
pub(crate) fn validate_input(
    decoder: &dyn TextDecoder,
    path: &Path,
) -> Result<(), DecodeError> {
    let extension = extension_of(path);
    if !decoder.supported_extensions().contains(&extension.as_str()) {
        return Err(DecodeError::UnsupportedFormat(extension));
    }
    let size = std::fs::metadata(path)?.len();
    if size > MAX_FILE_SIZE {
        return Err(DecodeError::FileTooLarge {
            size,
            limit: MAX_FILE_SIZE,
        });
    }
    Ok(())
}

/// Reject outputs below the usable-text floor.
pub(crate) fn check_extracted_text(text: &str) -> Result<(), DecodeError> {
    let non_whitespace = text.chars().filter(|c| !c.is_whitespace()).count();
    if non_whitespace < MIN_EXTRACTED_CHARS {
        return Err(DecodeError::EmptyExtraction);
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Routes files to the decoder claiming their extension.
pub struct DecoderRegistry {
    decoders: Vec<Box<dyn TextDecoder>>,
}

impl DecoderRegistry {
    /// Registry with the standard decoder set: plain text, DOCX, PDF.
    pub fn standard() -> Self {
        Self {
            decoders: vec![
                Box::new(PlainTextDecoder),
                Box::new(DocxDecoder),
                Box::new(PdfDecoder::default()),
            ],
        }
    }

    /// Registry with a custom decoder set.
    pub fn with_decoders(decoders: Vec<Box<dyn TextDecoder>>) -> Self {
        Self { decoders }
    }

    /// Find the decoder for `path`, if any claims its extension.
    pub fn decoder_for(&self, path: &Path) -> Option<&dyn TextDecoder> {
        let extension = extension_of(path);
        self.decoders
            .iter()
            .find(|d| d.supported_extensions().contains(&extension.as_str()))
            .map(|d| d.as_ref())
    }

    /// Decode `path` with the matching decoder.
    pub fn decode(&self, path: &Path) -> Result<(DecodedDocument, &'static str), DecodeError> {
        let decoder = self
            .decoder_for(path)
            .ok_or_else(|| DecodeError::UnsupportedFormat(extension_of(path)))?;
        let document = decoder.decode(path)?;
        Ok((document, decoder.name()))
    }

    /// All extensions claimed by registered decoders.
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        let mut extensions: Vec<&'static str> = self
            .decoders
            .iter()
            .flat_map(|d| d.supported_extensions().iter().copied())
            .collect();
        extensions.sort_unstable();
        extensions.dedup();
        extensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_registry_routes_by_extension() {
        let registry = DecoderRegistry::standard();
        assert_eq!(
            registry.decoder_for(Path::new("notes.txt")).unwrap().name(),
            "text"
        );
        assert_eq!(
            registry.decoder_for(Path::new("notes.DOCX")).unwrap().name(),
            "docx"
        );
        assert!(registry.decoder_for(Path::new("photo.png")).is_none());
    }

    #[test]
    fn test_unsupported_extension_error() {
        let registry = DecoderRegistry::standard();
        let err = registry.decode(Path::new("image.png")).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat(ext) if ext == "png"));
    }

    #[test]
    fn test_empty_extraction_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tiny.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "hi").unwrap();

        let registry = DecoderRegistry::standard();
        let err = registry.decode(&path).unwrap_err();
        assert!(matches!(err, DecodeError::EmptyExtraction));
    }

    #[test]
    fn test_supported_extensions_deduplicated() {
        let registry = DecoderRegistry::standard();
        let extensions = registry.supported_extensions();
        assert!(extensions.contains(&"txt"));
        assert!(extensions.contains(&"docx"));
        assert!(extensions.contains(&"pdf"));
    }
}
