//! DOCX decoder.
//!
//! A `.docx` file is a zip container; the body lives in
//! `word/document.xml`. The decoder walks that XML with a small tag
//! scanner: paragraph ends become line breaks, table rows flatten to
//! `" | "`-joined cells. Author and revision metadata come from
//! `docProps/core.xml` when present.

use super::{check_extracted_text, validate_input, DecodeError, DecodedDocument, TextDecoder};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Decoder for `.docx` files.
pub struct DocxDecoder;

impl TextDecoder for DocxDecoder {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &["docx"]
    }

    fn decode(&self, path: &Path) -> Result<DecodedDocument, DecodeError> {
        validate_input(self, path)?;

        let file = std::fs::File::open(path)?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| DecodeError::Tool(format!("not a valid docx container: {e}")))?;

        let body_xml = read_archive_file(&mut archive, "word/document.xml")?
            .ok_or_else(|| DecodeError::Tool("docx is missing word/document.xml".into()))?;
        let text = document_xml_to_text(&body_xml);
        check_extracted_text(&text)?;

        let mut document = DecodedDocument::new(text);
        document
            .metadata
            .insert("paragraph_count".into(), count_tag(&body_xml, "</w:p>").to_string());
        document
            .metadata
            .insert("table_count".into(), count_tag(&body_xml, "<w:tbl>").to_string());

        if let Some(core_xml) = read_archive_file(&mut archive, "docProps/core.xml")? {
            if let Some(author) = tag_content(&core_xml, "dc:creator") {
                document.metadata.insert("author".into(), author);
            }
            if let Some(modified) = tag_content(&core_xml, "dcterms:modified") {
                document.metadata.insert("modified".into(), modified);
            }
        }

        debug!(
            "decoded {} ({} chars)",
            path.display(),
            document.text.len()
        );
        Ok(document)
    }
}

fn read_archive_file<R: Read + std::io::Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, DecodeError> {
    match archive.by_name(name) {
        Ok(mut entry) => {
            let mut content = String::new();
            entry
                .read_to_string(&mut content)
                .map_err(|e| DecodeError::Tool(format!("failed to read {name}: {e}")))?;
            Ok(Some(content))
        }
        Err(zip::result::ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(DecodeError::Tool(format!("failed to open {name}: {e}"))),
    }
}

/// Convert WordprocessingML body XML into plain text.
///
/// Only structural tags matter: `<w:t>` runs carry text, `</w:p>` ends
/// a line, `<w:tbl>`/`</w:tc>`/`</w:tr>` drive the row flattening.
fn document_xml_to_text(xml: &str) -> String {
    let mut output = String::new();
    let mut paragraph = String::new();
    let mut row_cells: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut table_depth: usize = 0;
    let mut in_text_run = false;

    let mut rest = xml;
    while let Some(open) = rest.find('<') {
        let text_segment = &rest[..open];
        if in_text_run && !text_segment.is_empty() {
            let target = if table_depth > 0 { &mut cell } else { &mut paragraph };
            target.push_str(&unescape_xml(text_segment));
        }

        let Some(close) = rest[open..].find('>') else {
            break;
        };
        let tag = &rest[open + 1..open + close];
        let tag_name = tag
            .trim_start_matches('/')
            .split([' ', '/'])
            .next()
            .unwrap_or("");
        let is_closing = tag.starts_with('/');
        let is_self_closing = tag.ends_with('/');

        match (tag_name, is_closing) {
            ("w:t", false) if !is_self_closing => in_text_run = true,
            ("w:t", true) => in_text_run = false,
            ("w:tab", false) => {
                let target = if table_depth > 0 { &mut cell } else { &mut paragraph };
                target.push('\t');
            }
            ("w:br", false) => {
                let target = if table_depth > 0 { &mut cell } else { &mut paragraph };
                target.push('\n');
            }
            ("w:tbl", false) if !is_self_closing => table_depth += 1,
            ("w:tbl", true) => table_depth = table_depth.saturating_sub(1),
            ("w:tc", true) => {
                row_cells.push(cell.trim().to_string());
                cell.clear();
            }
            ("w:tr", true) => {
                output.push_str(&row_cells.join(" | "));
                output.push('\n');
                row_cells.clear();
            }
            ("w:p", true) => {
                if table_depth > 0 {
                    // Paragraph break inside a cell reads as a space
                    if !cell.is_empty() && !cell.ends_with(' ') {
                        cell.push(' ');
                    }
                } else {
                    output.push_str(paragraph.trim_end());
                    output.push('\n');
                    paragraph.clear();
                }
            }
            _ => {}
        }

        rest = &rest[open + close + 1..];
    }

    if !paragraph.trim().is_empty() {
        output.push_str(paragraph.trim_end());
        output.push('\n');
    }
    output
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn count_tag(xml: &str, tag: &str) -> usize {
    xml.matches(tag).count()
}

/// Text content of the first `<tag>...</tag>` element.
fn tag_content(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let start = xml.find(&open)?;
    let body_start = xml[start..].find('>')? + start + 1;
    let end = xml[body_start..].find(&close)? + body_start;
    let content = unescape_xml(xml[body_start..end].trim());
    (!content.is_empty()).then_some(content)
}
