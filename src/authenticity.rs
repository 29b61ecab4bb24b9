//! Authenticity scoring.
//!
//! Produces a deterministic 0-100 plausibility score from the extracted
//! text and field map. Signals: contact coverage, date consistency,
//! section coverage, text quality, and template/placeholder patterns.
//! The analyzer never fails; an unusable input scores 0 with a reason.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fields::{dates, FieldMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticityReport {
    /// Weighted overall score, one decimal, in [0, 100].
    pub overall_score: f64,
    pub contact_score: f64,
    pub date_consistency_score: f64,
    pub section_coverage_score: f64,
    pub text_quality_score: f64,
    pub suspicious_pattern_score: f64,
    pub notes: Vec<String>,
    /// Set only when the input was unusable and the score is 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AuthenticityReport {
    fn unusable(reason: &str) -> Self {
        Self {
            overall_score: 0.0,
            contact_score: 0.0,
            date_consistency_score: 0.0,
            section_coverage_score: 0.0,
            text_quality_score: 0.0,
            suspicious_pattern_score: 0.0,
            notes: Vec::new(),
            reason: Some(reason.to_string()),
        }
    }
}

static PLACEHOLDER_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(?:lorem ipsum|sample text)\b",
        r"(?i)\b(?:experience|skill|achievement)\s+\d+\b",
        r"(?i)\b(?:placeholder|template|example)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static NUMERIC_DATE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b\d{1,2}/\d{1,2}/\d{4}\b",
        r"\b\d{1,2}-\d{1,2}-\d{4}\b",
        r"\b\d{4}-\d{1,2}-\d{1,2}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

const GENERIC_TITLES: &[&str] = &[
    "software engineer",
    "developer",
    "manager",
    "analyst",
    "specialist",
];

pub struct AuthenticityAnalyzer;

impl AuthenticityAnalyzer {
    pub fn analyze(text: &str, fields: &FieldMap) -> AuthenticityReport {
        if text.trim().len() < 50 {
            return AuthenticityReport::unusable("document has too little text to analyze");
        }

        let contact = contact_score(fields);
        let dates = date_consistency_score(fields);
        let sections = section_coverage_score(fields);
        let quality = text_quality_score(text);
        let suspicious = suspicious_pattern_score(text);

        let overall = contact * 0.20
            + dates * 0.25
            + sections * 0.20
            + quality * 0.15
            + suspicious * 0.20;
        let overall = (overall * 10.0).round() / 10.0;

        debug!(
            overall,
            contact, dates, sections, quality, suspicious, "authenticity scored"
        );

        AuthenticityReport {
            overall_score: overall.clamp(0.0, 100.0),
            contact_score: contact,
            date_consistency_score: dates,
            section_coverage_score: sections,
            text_quality_score: quality,
            suspicious_pattern_score: suspicious,
            notes: notes_for(contact, dates, quality, suspicious),
            reason: None,
        }
    }
}

fn contact_score(fields: &FieldMap) -> f64 {
    let mut score = 0.0;
    if fields.email.is_some() {
        score += 40.0;
    }
    if fields.phone.is_some() {
        score += 30.0;
    }
    if fields.name.is_some() {
        score += 20.0;
    }
    if fields.linkedin_url.is_some() || fields.github_url.is_some() || fields.portfolio_url.is_some()
    {
        score += 10.0;
    }
    score
}

fn date_consistency_score(fields: &FieldMap) -> f64 {
    let today = dates::today();
    let mut score: f64 = 100.0;

    let current_jobs = fields.work_experience.iter().filter(|e| e.is_current).count();
    if current_jobs > 1 {
        score -= 20.0;
    }

    for entry in &fields.work_experience {
        let start = dates::parse_year_month(&entry.start_date);
        let end = entry.end_date.as_deref().and_then(dates::parse_year_month);

        if let Some(start) = start {
            if (start.year, start.month) > (today.year, today.month) {
                score -= 25.0;
            }
            if let Some(end) = end {
                if (end.year, end.month) < (start.year, start.month) {
                    score -= 25.0;
                }
            }
        }
        if let Some(end) = end {
            if (end.year, end.month) > (today.year, today.month) {
                score -= 25.0;
            }
        }
    }

    for entry in &fields.education {
        if let (Some(start), Some(end)) = (entry.start_year, entry.end_year) {
            if end < start {
                score -= 25.0;
            }
        }
        if entry.end_year.is_some_and(|y| y > today.year + 6) {
            // Graduation far in the future is implausible even for a
            // degree in progress
            score -= 25.0;
        }
    }

    score.max(0.0)
}

fn section_coverage_score(fields: &FieldMap) -> f64 {
    let present = [
        fields.name.is_some(),
        !fields.skills.is_empty(),
        !fields.education.is_empty(),
        !fields.work_experience.is_empty(),
        fields.summary.is_some(),
    ];
    present.iter().filter(|p| **p).count() as f64 * 20.0
}

fn text_quality_score(text: &str) -> f64 {
    let mut issues = 0u32;

    let exclamations = text.matches('!').count();
    let periods = text.matches('.').count();
    if exclamations > periods * 2 {
        issues += 2;
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if !words.is_empty() {
        let screaming = words
            .iter()
            .filter(|w| w.len() > 3 && w.chars().all(|c| !c.is_lowercase()) && w.chars().any(|c| c.is_alphabetic()))
            .count();
        if screaming as f64 > words.len() as f64 * 0.15 {
            issues += 2;
        }
    }

    let sentences: Vec<&str> = text
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if !sentences.is_empty() {
        let fragments = sentences
            .iter()
            .filter(|s| s.split_whitespace().count() < 3)
            .count();
        if fragments as f64 > sentences.len() as f64 * 0.3 {
            issues += 1;
        }
    }

    (100.0 - f64::from(issues) * 15.0).max(0.0)
}

/// Count distinct 3-word phrases appearing more than twice, capped at 10.
fn repeated_phrases(text: &str) -> usize {
    let words: Vec<String> = text
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.to_string())
        .collect();
    if words.len() < 10 {
        return 0;
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for window in words.windows(3) {
        *counts.entry(window.join(" ")).or_default() += 1;
    }
    counts.values().filter(|c| **c > 2).count().min(10)
}

fn suspicious_pattern_score(text: &str) -> f64 {
    let mut indicators = 0u32;

    if repeated_phrases(text) > 3 {
        indicators += 1;
    }

    for pattern in PLACEHOLDER_RES.iter() {
        if pattern.is_match(text) {
            indicators += 1;
        }
    }

    let lower = text.to_lowercase();
    let generic = GENERIC_TITLES
        .iter()
        .filter(|t| lower.contains(*t))
        .count();
    if generic > 3 {
        indicators += 1;
    }

    let numeric_formats = NUMERIC_DATE_RES
        .iter()
        .filter(|p| p.is_match(text))
        .count();
    if numeric_formats > 1 {
        indicators += 1;
    }

    let bullet_count = text.matches(['•', '●', '■']).count();
    let line_count = text.lines().filter(|l| !l.trim().is_empty()).count();
    if line_count > 0 && bullet_count as f64 / line_count as f64 > 0.7 {
        indicators += 1;
    }

    (100.0 - f64::from(indicators) / 5.0 * 100.0).max(0.0)
}

fn notes_for(contact: f64, dates: f64, quality: f64, suspicious: f64) -> Vec<String> {
    let mut notes = Vec::new();
    if contact < 50.0 {
        notes.push("Few verifiable contact endpoints found".to_string());
    }
    if dates < 80.0 {
        notes.push("Inconsistent or implausible dates detected".to_string());
    }
    if quality < 60.0 {
        notes.push("Text quality issues detected, review for fragments or shouting".to_string());
    } else if quality > 85.0 {
        notes.push("Good language quality".to_string());
    }
    if suspicious < 70.0 {
        notes.push("Content patterns may indicate template usage".to_string());
    } else if suspicious > 85.0 {
        notes.push("Content appears original".to_string());
    }
    if notes.is_empty() {
        notes.push("No significant issues found".to_string());
    }
    notes
}
