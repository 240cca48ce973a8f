//! Loading CV transcripts from files
//!
//! Supported inputs:
//! - `.txt` / `.md`: used as-is
//! - `.pdf`: text extracted page by page with lopdf, pages separated by
//!   `--- PAGE n ---` markers
//! - `.xml`: an already-unpacked `word/document.xml`; the transcript is
//!   rebuilt from its text runs and the markup is kept for checkbox detection

use crate::CvError;
use log::debug;
use lopdf::Document;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static PARAGRAPH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<w:p[\s>].*?</w:p>|<w:p\s*/>").unwrap());
static RUN_TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:tab\s*/>").unwrap());

/// A loaded CV: the text transcript and, for document parts, the raw markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvSource {
    pub text: String,
    pub markup: Option<String>,
}

/// Load a CV source, choosing the reader from the file extension
pub fn load_source<P: AsRef<Path>>(path: P) -> Result<CvSource, CvError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => {
            let doc = Document::load(path)?;
            Ok(CvSource {
                text: pdf_text(&doc)?,
                markup: None,
            })
        }
        "xml" => {
            let markup = std::fs::read_to_string(path)?;
            Ok(CvSource {
                text: markup_to_text(&markup),
                markup: Some(markup),
            })
        }
        "txt" | "md" | "" => Ok(CvSource {
            text: std::fs::read_to_string(path)?,
            markup: None,
        }),
        "docx" => Err(CvError::UnsupportedFormat(format!(
            "{}: unpack the archive and pass word/document.xml",
            path.display()
        ))),
        other => Err(CvError::UnsupportedFormat(other.to_string())),
    }
}

/// Load a PDF transcript from memory
pub fn load_pdf_mem(buffer: &[u8]) -> Result<CvSource, CvError> {
    let doc = Document::load_mem(buffer)?;
    Ok(CvSource {
        text: pdf_text(&doc)?,
        markup: None,
    })
}

fn pdf_text(doc: &Document) -> Result<String, CvError> {
    let pages = doc.get_pages();
    let mut text = String::new();

    for page_num in pages.keys() {
        let page_text = doc
            .extract_text(&[*page_num])
            .map_err(|e| CvError::Pdf(e.to_string()))?;
        text.push_str(&format!("\n--- PAGE {} ---\n", page_num));
        text.push_str(&page_text);
        text.push('\n');
    }

    debug!("extracted {} chars from {} pages", text.len(), pages.len());
    Ok(text)
}

/// Plain text of a document part: one line per paragraph, runs concatenated,
/// tabs as spaces. Empty paragraphs are dropped.
pub fn markup_to_text(markup: &str) -> String {
    PARAGRAPH_RE
        .find_iter(markup)
        .map(|p| {
            RUN_TEXT_RE
                .captures_iter(p.as_str())
                .map(|c| c.get(1).map_or(" ", |m| m.as_str()))
                .collect::<String>()
        })
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
