//! Certification extraction: a catalog pass over the whole text, then a
//! sweep of the certifications section for anything the catalog missed.

use std::sync::LazyLock;

use regex::Regex;

use super::lexicon;
use super::sections::{self, Section};
use super::CertificationEntry;

static CATALOG: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    lexicon::CERTIFICATION_PATTERNS
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
        .collect()
});

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").unwrap());

static CREDENTIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:credential|license|cert(?:ification)?)\s*(?:id|#|no\.?)\s*:?\s*([A-Za-z0-9][A-Za-z0-9\-]{4,})")
        .unwrap()
});

static EXPIRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:expires?|valid\s+(?:until|through)|expiry)\s*:?\s*([A-Za-z]+\s+\d{4}|\d{4})")
        .unwrap()
});

fn lookup_issuer(name: &str) -> Option<String> {
    let lower = name.to_lowercase();
    lexicon::CERTIFICATION_ISSUERS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, issuer)| issuer.to_string())
}

/// A 100-char window of text around a match, on char boundaries.
fn window_around(text: &str, start: usize, end: usize) -> &str {
    let mut from = start.saturating_sub(50);
    while from > 0 && !text.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = (end + 50).min(text.len());
    while to < text.len() && !text.is_char_boundary(to) {
        to += 1;
    }
    &text[from..to]
}

fn entry_from_match(name: &str, context: &str) -> CertificationEntry {
    let issue_date = YEAR_RE
        .captures(context)
        .map(|c| c[1].to_string());
    let expiry_date = EXPIRY_RE.captures(context).map(|c| c[1].to_string());
    let credential_id = CREDENTIAL_RE.captures(context).map(|c| c[1].to_string());

    CertificationEntry {
        name: name.trim().to_string(),
        issuer: lookup_issuer(name),
        issue_date,
        expiry_date,
        credential_id,
    }
}

/// A section line that reads like a job entry, not a certification.
fn looks_like_experience(line: &str) -> bool {
    let lower = line.to_lowercase();
    lexicon::TITLE_KEYWORDS
        .iter()
        .any(|k| lower.split_whitespace().any(|w| w == *k))
        && !lower.contains("certif")
}

pub fn extract_certifications(text: &str, lines: &[&str]) -> Vec<CertificationEntry> {
    let mut out: Vec<CertificationEntry> = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    let push = |entry: CertificationEntry, out: &mut Vec<CertificationEntry>, seen: &mut Vec<String>| {
        let key = entry.name.to_lowercase();
        if !key.is_empty() && !seen.contains(&key) {
            seen.push(key);
            out.push(entry);
        }
    };

    // Catalog pass over the whole document
    for pattern in CATALOG.iter() {
        for m in pattern.find_iter(text) {
            let context = window_around(text, m.start(), m.end());
            push(entry_from_match(m.as_str(), context), &mut out, &mut seen);
        }
    }

    // Section sweep for the rest
    let header = lines
        .iter()
        .position(|l| sections::section_header(l) == Some(Section::Certifications));
    if let Some(start) = header {
        for line in &lines[start + 1..] {
            if sections::is_any_header(line) {
                break;
            }
            let t = sections::strip_bullet(line);
            if t.is_empty() || t.len() < 8 || looks_like_experience(t) {
                continue;
            }
            // Split off a trailing year so the name stays clean
            let name = YEAR_RE
                .find(t)
                .map(|m| t[..m.start()].trim_end_matches([',', '-', '–', '(', ' ']))
                .unwrap_or(t);
            if name.is_empty() {
                continue;
            }
            push(entry_from_match(name, t), &mut out, &mut seen);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Vec<CertificationEntry> {
        let lines: Vec<&str> = text.lines().collect();
        extract_certifications(text, &lines)
    }

    #[test]
    fn catalog_match_with_issuer_and_year() {
        let certs = extract("AWS Certified Solutions Architect, 2022");
        assert_eq!(certs.len(), 1);
        assert_eq!(certs[0].name, "AWS Certified Solutions Architect");
        assert_eq!(certs[0].issuer.as_deref(), Some("Amazon Web Services"));
        assert_eq!(certs[0].issue_date.as_deref(), Some("2022"));
    }

    #[test]
    fn credential_id_and_expiry_from_window() {
        let certs = extract(
            "Certified Kubernetes Administrator Credential ID: LF-ab12cd34 expires March 2026",
        );
        assert_eq!(certs.len(), 1);
        assert_eq!(certs[0].issuer.as_deref(), Some("Cloud Native Computing Foundation"));
        assert_eq!(certs[0].credential_id.as_deref(), Some("LF-ab12cd34"));
        assert_eq!(certs[0].expiry_date.as_deref(), Some("March 2026"));
    }

    #[test]
    fn section_sweep_catches_unknown_certs() {
        let text = "CERTIFICATIONS\n\
- Advanced Welding Certificate, 2019\n\
- AWS Certified Developer\n\
EXPERIENCE\n\
- Not a cert";
        let certs = extract(text);
        assert_eq!(certs.len(), 2);
        let names: Vec<&str> = certs.iter().map(|c| c.name.as_str()).collect();
        assert!(names.contains(&"AWS Certified Developer"));
        assert!(names.contains(&"Advanced Welding Certificate"));
    }

    #[test]
    fn duplicates_collapse_case_insensitively() {
        let text = "PMP\nCERTIFICATIONS\n- pmp";
        let certs = extract(text);
        assert_eq!(certs.len(), 1);
        assert_eq!(certs[0].issuer.as_deref(), Some("Project Management Institute"));
    }

    #[test]
    fn job_lines_in_section_are_skipped() {
        let text = "CERTIFICATIONS\nSenior Engineer at Acme Corp\n- CompTIA Security+";
        let certs = extract(text);
        assert_eq!(certs.len(), 1);
        assert!(certs[0].name.starts_with("CompTIA"));
    }
}
