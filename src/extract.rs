//! Plain-text loading for note and upload files.
//!
//! [`read_document`] is the boundary the ranking engine relies on: it always
//! returns a string. Unsupported extensions, ignored file names and every
//! read or parse failure come back as `""`; failures are logged.
//!
//! | Extension | Extraction |
//! |-----------|------------|
//! | `.pdf` | `pdf-extract` text |
//! | `.docx` | paragraphs of `word/document.xml`, one per line |
//! | `.txt`, `.md` | UTF-8 file contents |
//! | `.json` | re-serialized with 2-space indentation |

use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::corpus::should_skip_file;

/// Maximum decompressed bytes read from `word/document.xml` (zip-bomb guard).
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported extension: {0}")]
    UnsupportedExtension(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
    #[error("DOCX extraction failed: {0}")]
    Docx(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads the text of `path`, or `""` when it cannot or should not be read.
pub fn read_document(path: &Path, ignored_prefixes: &[String]) -> String {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if should_skip_file(&filename, ignored_prefixes) {
        return String::new();
    }

    match load_text(path) {
        Ok(text) => text,
        Err(ExtractError::UnsupportedExtension(ext)) => {
            tracing::debug!(path = %path.display(), %ext, "unsupported extension, skipping");
            String::new()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read document");
            String::new()
        }
    }
}

/// Dispatches on the lowercased extension of `path`.
pub fn load_text(path: &Path) -> Result<String, ExtractError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => extract_pdf(&std::fs::read(path)?),
        "docx" => extract_docx(&std::fs::read(path)?),
        "txt" | "md" => Ok(std::fs::read_to_string(path)?),
        "json" => pretty_json(&std::fs::read_to_string(path)?),
        _ => Err(ExtractError::UnsupportedExtension(ext)),
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

fn pretty_json(raw: &str) -> Result<String, ExtractError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| ExtractError::Docx(e.to_string()))?;
    let entry = archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut doc_xml = Vec::new();
    entry.take(MAX_XML_ENTRY_BYTES).read_to_end(&mut doc_xml)?;
    if doc_xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err(ExtractError::Docx(
            "word/document.xml exceeds size limit".to_string(),
        ));
    }

    docx_paragraphs(&doc_xml).map(|paragraphs| paragraphs.join("\n"))
}

/// Collects the text runs (`w:t`) of each paragraph (`w:p`).
fn docx_paragraphs(xml: &[u8]) -> Result<Vec<String>, ExtractError> {
    use quick_xml::events::Event;

    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;

    let mut reader = quick_xml::Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => current = Some(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                // <w:p/> is an empty paragraph
                if e.local_name().as_ref() == b"p" {
                    paragraphs.push(String::new());
                }
            }
            Ok(Event::Text(te)) if in_text => {
                let text = te
                    .unescape()
                    .map_err(|e| ExtractError::Docx(e.to_string()))?;
                if let Some(p) = current.as_mut() {
                    p.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if let Some(p) = current.take() {
                        paragraphs.push(p);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Docx(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}
