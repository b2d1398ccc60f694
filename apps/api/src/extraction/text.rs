//! Text Extractor — turns an uploaded resume document into plain text.
//!
//! Unsupported formats extract to an empty string rather than an error;
//! callers treat empty text as a degraded but non-fatal result.

use bytes::Bytes;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF could not be parsed: {0}")]
    Pdf(String),

    #[error("DOCX could not be parsed: {0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detects the format from the file extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }
}

/// Raw upload plus its detected format. Lives only for one extraction call.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub bytes: Bytes,
    /// `None` for unsupported formats.
    pub format: Option<DocumentFormat>,
}

impl ResumeDocument {
    pub fn from_upload(filename: &str, bytes: Bytes) -> Self {
        Self {
            bytes,
            format: DocumentFormat::from_filename(filename),
        }
    }
}

/// Extracts plain text from the document.
///
/// CPU-bound: call from `spawn_blocking` when on the async runtime.
pub fn extract_text(document: &ResumeDocument) -> Result<String, ExtractionError> {
    match document.format {
        Some(DocumentFormat::Pdf) => read_pdf_text(&document.bytes),
        Some(DocumentFormat::Docx) => read_docx_text(&document.bytes),
        None => {
            warn!("Unsupported document format; extracted text is empty");
            Ok(String::new())
        }
    }
}

/// Per-page text in page order, joined with single spaces.
pub fn read_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;
    debug!("Extracted text from {} PDF pages", pages.len());
    Ok(pages.join(" "))
}

/// Paragraph text in document order, joined with single spaces.
pub fn read_docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(
                p.children
                    .iter()
                    .filter_map(|pc| match pc {
                        ParagraphChild::Run(run) => Some(run_text(run)),
                        _ => None,
                    })
                    .collect::<String>(),
            ),
            _ => None,
        })
        .collect();

    debug!("Extracted text from {} DOCX paragraphs", paragraphs.len());
    Ok(paragraphs.join(" "))
}

fn run_text(run: &docx_rs::Run) -> String {
    run.children
        .iter()
        .filter_map(|rc| match rc {
            RunChild::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect()
}
