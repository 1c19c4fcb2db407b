use std::path::Path;

use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use lopdf::Document;
use scraper::{Html, Selector};

use super::ExtractionError;

/// Text of every page, in page order.
pub(super) fn pdf_text(path: &Path) -> Result<String, ExtractionError> {
    let doc = Document::load(path)
        .map_err(|e| ExtractionError::Pdf(format!("failed to load PDF: {e}")))?;

    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    if pages.is_empty() {
        return Ok(String::new());
    }

    doc.extract_text(&pages)
        .map_err(|e| ExtractionError::Pdf(e.to_string()))
}

/// Paragraph text of a DOCX body, one paragraph per line.
pub(super) fn docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        let DocumentChild::Paragraph(paragraph) = child else {
            continue;
        };

        let mut line = String::new();
        for p_child in &paragraph.children {
            if let ParagraphChild::Run(run) = p_child {
                for r_child in &run.children {
                    if let RunChild::Text(t) = r_child {
                        line.push_str(&t.text);
                    }
                }
            }
        }
        if !line.trim().is_empty() {
            paragraphs.push(line);
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Visible text of the `<body>`, or of the whole document when there is none.
pub(super) fn html_text(html: &str) -> String {
    let doc = Html::parse_document(html);

    let root = Selector::parse("body")
        .ok()
        .and_then(|sel| doc.select(&sel).next())
        .unwrap_or_else(|| doc.root_element());

    root.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
