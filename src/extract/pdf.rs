//! PDF text extraction, two engines deep
//!
//! `pdf-extract` handles layout-aware extraction and is the primary path.
//! `lopdf` reads the content streams directly and recovers text from some
//! documents the primary chokes on. Page texts are joined with "\n".

use anyhow::{Context, Result};

/// Layout-aware extraction via pdf-extract.
pub fn extract_primary(content: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(content)
        .context("pdf-extract failed to decode document")?;
    Ok(text)
}

/// Content-stream extraction via lopdf, page by page.
pub fn extract_fallback(content: &[u8]) -> Result<String> {
    let doc = lopdf::Document::load_mem(content).context("lopdf failed to parse document")?;

    let mut pages: Vec<String> = Vec::new();
    for (page_number, _) in doc.get_pages() {
        match doc.extract_text(&[page_number]) {
            Ok(text) => pages.push(text),
            // A single broken page should not sink the document
            Err(_) => pages.push(String::new()),
        }
    }

    Ok(pages.join("\n"))
}
