//! PDF decoder.
//!
//! PDF text extraction is delegated to `pdftotext` running as an
//! isolated subprocess with a hard timeout, so a wedged tool or a
//! hostile file can never stall the pipeline. The child is polled and
//! killed on expiry rather than waited on unconditionally.

use super::{check_extracted_text, validate_input, DecodeError, DecodedDocument, TextDecoder};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default timeout for one extraction run.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Decoder for `.pdf` files via the `pdftotext` command-line tool.
pub struct PdfDecoder {
    tool_path: PathBuf,
    timeout: Duration,
}

impl Default for PdfDecoder {
    fn default() -> Self {
        Self {
            tool_path: PathBuf::from("pdftotext"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl PdfDecoder {
    /// Decoder with a custom tool path and timeout.
    pub fn with_tool(tool_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            tool_path: tool_path.into(),
            timeout,
        }
    }

    fn run_tool(&self, path: &Path) -> Result<String, DecodeError> {
        let mut child = Command::new(&self.tool_path)
            .arg("-layout")
            .arg(path)
            .arg("-") // stdout
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                DecodeError::Tool(format!(
                    "failed to spawn {}: {e}",
                    self.tool_path.display()
                ))
            })?;

        let start = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    let output = child
                        .wait_with_output()
                        .map_err(|e| DecodeError::Tool(format!("failed to collect output: {e}")))?;
                    if !status.success() {
                        let stderr = String::from_utf8_lossy(&output.stderr);
                        return Err(DecodeError::Tool(format!(
                            "pdftotext exited with {status}: {}",
                            stderr.trim()
                        )));
                    }
                    return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
                }
                Ok(None) => {
                    if start.elapsed() >= self.timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        warn!(
                            "pdftotext timed out after {:?} on {}",
                            self.timeout,
                            path.display()
                        );
                        return Err(DecodeError::Tool(format!(
                            "pdftotext timed out after {:?}",
                            self.timeout
                        )));
                    }
                    std::thread::sleep(Duration::from_millis(25));
                }
                Err(e) => {
                    return Err(DecodeError::Tool(format!("failed to poll tool: {e}")));
                }
            }
        }
    }
}

impl TextDecoder for PdfDecoder {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &["pdf"]
    }

    fn decode(&self, path: &Path) -> Result<DecodedDocument, DecodeError> {
        validate_input(self, path)?;

        let raw = self.run_tool(path)?;
        // pdftotext marks page boundaries with form feeds
        let page_count = raw.matches('\u{c}').count().max(1);
        let text = raw.replace('\u{c}', "\n");
        check_extracted_text(&text)?;

        debug!(
            "decoded {} ({} pages, {} chars)",
            path.display(),
            page_count,
            text.len()
        );

        let mut document = DecodedDocument::new(text);
        document
            .metadata
            .insert("page_count".into(), page_count.to_string());
        Ok(document)
    }
}
