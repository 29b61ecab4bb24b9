//! Best-effort OCR for image-only PDF scans
//!
//! Shells out to `pdftoppm` to render the first N pages and `tesseract`
//! (TSV output) to recognize them. Pages whose mean word confidence falls
//! below the configured threshold are dropped. When either tool is missing
//! the pass degrades to an empty result; the caller decides whether that
//! sinks the extraction.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

use crate::config::OcrConfig;

pub struct OcrEngine {
    config: OcrConfig,
}

struct PageText {
    text: String,
    mean_confidence: f64,
}

impl OcrEngine {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// OCR the first `max_pages` pages of a PDF. Page texts are joined
    /// with "\n".
    pub fn recognize_pdf(&self, content: &[u8]) -> Result<String> {
        let workdir = tempfile::tempdir().context("failed to create ocr scratch dir")?;
        let pdf_path = workdir.path().join("input.pdf");
        std::fs::write(&pdf_path, content)?;

        let prefix = workdir.path().join("page");
        let render = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg("200")
            .arg("-f")
            .arg("1")
            .arg("-l")
            .arg(self.config.max_pages.to_string())
            .arg(&pdf_path)
            .arg(&prefix)
            .output();

        let render = match render {
            Ok(out) if out.status.success() => out,
            Ok(out) => {
                warn!(stderr = %String::from_utf8_lossy(&out.stderr), "pdftoppm failed");
                return Ok(String::new());
            }
            Err(e) => {
                warn!(error = %e, "pdftoppm not available, skipping ocr");
                return Ok(String::new());
            }
        };
        drop(render);

        let mut pages: Vec<(String, PageText)> = Vec::new();
        for entry in std::fs::read_dir(workdir.path())? {
            let path = entry?.path();
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            if name.starts_with("page") && name.ends_with(".png") {
                if let Some(page) = self.recognize_image(&path) {
                    pages.push((name, page));
                }
            }
        }
        // pdftoppm zero-pads page numbers, so name order is page order
        pages.sort_by(|a, b| a.0.cmp(&b.0));

        let mut kept = Vec::new();
        for (name, page) in pages {
            if page.mean_confidence >= self.config.confidence_threshold {
                kept.push(page.text);
            } else {
                debug!(
                    page = name,
                    confidence = page.mean_confidence,
                    "dropping low-confidence ocr page"
                );
            }
        }

        Ok(kept.join("\n"))
    }

    fn recognize_image(&self, image: &Path) -> Option<PageText> {
        let output = Command::new("tesseract")
            .arg(image)
            .arg("stdout")
            .arg("tsv")
            .output();

        match output {
            Ok(out) if out.status.success() => {
                Some(parse_tsv(&String::from_utf8_lossy(&out.stdout)))
            }
            Ok(out) => {
                warn!(stderr = %String::from_utf8_lossy(&out.stderr), "tesseract failed");
                None
            }
            Err(e) => {
                warn!(error = %e, "tesseract not available, skipping ocr");
                None
            }
        }
    }
}

/// Reconstruct text and mean word confidence from tesseract TSV output.
///
/// Columns: level page block par line word left top width height conf text.
/// Word rows carry conf >= 0; structural rows carry -1.
fn parse_tsv(tsv: &str) -> PageText {
    let mut text = String::new();
    let mut confidences: Vec<f64> = Vec::new();
    let mut last_line_key: Option<(u32, u32, u32)> = None;

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 {
            continue;
        }
        let conf: f64 = match cols[10].parse() {
            Ok(c) => c,
            Err(_) => continue,
        };
        if conf < 0.0 {
            continue;
        }
        let word = cols[11].trim();
        if word.is_empty() {
            continue;
        }

        let key = (
            cols[2].parse().unwrap_or(0),
            cols[3].parse().unwrap_or(0),
            cols[4].parse().unwrap_or(0),
        );
        match last_line_key {
            Some(prev) if prev == key => text.push(' '),
            Some(_) => text.push('\n'),
            None => {}
        }
        last_line_key = Some(key);

        text.push_str(word);
        confidences.push(conf / 100.0);
    }

    let mean_confidence = if confidences.is_empty() {
        0.0
    } else {
        confidences.iter().sum::<f64>() / confidences.len() as f64
    };

    PageText { text, mean_confidence }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    #[test]
    fn tsv_reconstructs_lines_and_confidence() {
        let tsv = format!(
            "{HEADER}\n\
             1\t1\t0\t0\t0\t0\t0\t0\t100\t100\t-1\t\n\
             5\t1\t1\t1\t1\t1\t0\t0\t10\t10\t96\tJane\n\
             5\t1\t1\t1\t1\t2\t12\t0\t10\t10\t92\tDoe\n\
             5\t1\t1\t1\t2\t1\t0\t14\t10\t10\t88\tEngineer\n"
        );
        let page = parse_tsv(&tsv);
        assert_eq!(page.text, "Jane Doe\nEngineer");
        assert!((page.mean_confidence - 0.92).abs() < 0.001);
    }

    #[test]
    fn empty_tsv_has_zero_confidence() {
        let page = parse_tsv(HEADER);
        assert_eq!(page.text, "");
        assert_eq!(page.mean_confidence, 0.0);
    }

    #[test]
    fn missing_tools_degrade_to_empty() {
        // Whatever the host has installed, garbage bytes must not panic
        // and must not produce usable text.
        let engine = OcrEngine::new(OcrConfig::default());
        let out = engine.recognize_pdf(b"not a pdf").unwrap_or_default();
        assert!(out.len() < 50);
    }
}
