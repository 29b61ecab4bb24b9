//! Document-to-text extraction
//!
//! Decodes PDF/DOCX/TXT bytes into normalized, line-preserving UTF-8 text.
//! PDF goes through a fallback chain: pdf-extract, then lopdf, then a
//! page-limited OCR pass for image-only scans.

mod docx;
mod ocr;
mod pdf;

pub use ocr::OcrEngine;

use tracing::{debug, warn};

use crate::config::{LimitsConfig, OcrConfig};
use crate::error::{IngestError, Result};

/// Minimum non-whitespace characters for an extraction to count as usable.
const MIN_USABLE_CHARS: usize = 50;

pub struct TextExtractor {
    ocr: OcrEngine,
    text_hard_cap_bytes: usize,
}

impl TextExtractor {
    pub fn new(ocr_config: OcrConfig, limits: &LimitsConfig) -> Self {
        Self {
            ocr: OcrEngine::new(ocr_config),
            text_hard_cap_bytes: limits.text_hard_cap_bytes,
        }
    }

    /// Extract text from document bytes based on extension.
    ///
    /// Fails with an extraction error only when every path yields fewer
    /// than 50 non-whitespace characters.
    pub fn extract(&self, content: &[u8], extension: &str) -> Result<String> {
        let raw = match extension.to_ascii_lowercase().as_str() {
            "pdf" => self.extract_pdf(content),
            "docx" => docx::extract(content).unwrap_or_default(),
            "txt" => String::from_utf8_lossy(content).into_owned(),
            other => {
                return Err(IngestError::Extraction(format!(
                    "unsupported file format: {other}"
                )))
            }
        };

        let text = cap_text(&normalize(&raw), self.text_hard_cap_bytes);

        if !is_usable(&text) {
            return Err(IngestError::Extraction(
                "document yielded too little readable text".to_string(),
            ));
        }

        Ok(text)
    }

    fn extract_pdf(&self, content: &[u8]) -> String {
        // High-fidelity extractor first
        match pdf::extract_primary(content) {
            Ok(text) if is_usable(&text) => return text,
            Ok(_) => debug!("primary pdf extractor returned near-empty text"),
            Err(e) => warn!(error = %e, "primary pdf extraction failed"),
        }

        // Second extractor over the raw content streams
        match pdf::extract_fallback(content) {
            Ok(text) if is_usable(&text) => return text,
            Ok(_) => debug!("fallback pdf extractor returned near-empty text"),
            Err(e) => warn!(error = %e, "fallback pdf extraction failed"),
        }

        // Image-only scan: best-effort OCR on the first few pages
        match self.ocr.recognize_pdf(content) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "ocr pass failed");
                String::new()
            }
        }
    }
}

/// Whether extracted text clears the usability bar.
fn is_usable(text: &str) -> bool {
    text.chars().filter(|c| !c.is_whitespace()).count() >= MIN_USABLE_CHARS
}

/// Normalize extracted text for parsing.
///
/// Collapses runs of spaces/tabs within each line and fixes known OCR
/// substitutions. Newlines are preserved: downstream parsing is line-aware.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let mut last_was_space = false;
        for ch in line.chars() {
            let ch = match ch {
                'Ø' => '0',
                '\t' => ' ',
                c => c,
            };
            if ch == ' ' {
                if !last_was_space {
                    out.push(' ');
                }
                last_was_space = true;
            } else {
                out.push(ch);
                last_was_space = false;
            }
        }
        while out.ends_with(' ') {
            out.pop();
        }
    }
    out
}

/// Truncate to at most `cap` bytes on a char boundary.
fn cap_text(text: &str, cap: usize) -> String {
    if text.len() <= cap {
        return text.to_string();
    }
    let mut end = cap;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> TextExtractor {
        TextExtractor::new(OcrConfig::default(), &LimitsConfig::default())
    }

    #[test]
    fn txt_passes_through_lossy() {
        let mut bytes = b"Jane Doe\njane@example.com\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.extend_from_slice(b"ten years of experience building distributed systems");
        let text = extractor().extract(&bytes, "txt").unwrap();
        assert!(text.contains("Jane Doe"));
        assert!(text.contains('\u{fffd}'));
    }

    #[test]
    fn short_input_is_extraction_error() {
        let err = extractor().extract(b"too short", "txt").unwrap_err();
        assert!(matches!(err, IngestError::Extraction(_)));
    }

    #[test]
    fn normalize_collapses_spaces_but_keeps_newlines() {
        let input = "Jane   Doe\t\tEngineer\nSecond    line  \nThird";
        assert_eq!(normalize(input), "Jane Doe Engineer\nSecond line\nThird");
    }

    #[test]
    fn normalize_fixes_ocr_zero() {
        assert_eq!(normalize("GPA 3.Ø/4.Ø"), "GPA 3.0/4.0");
    }

    #[test]
    fn cap_respects_char_boundaries() {
        let s = "éééé"; // 2 bytes each
        let capped = cap_text(s, 5);
        assert_eq!(capped, "éé");
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = extractor().extract(b"data", "odt").unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }
}
