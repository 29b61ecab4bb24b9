//! Section detection plus the extractors that are purely section-driven:
//! summary, projects, languages, achievements.

use std::sync::LazyLock;

use regex::Regex;

use super::lexicon;
use super::{LanguageEntry, Proficiency, ProjectEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    Experience,
    Education,
    Skills,
    Certifications,
    Projects,
    Languages,
    Achievements,
}

/// Classify a line as a section header, if it is one.
///
/// A header is a short line equal to a known header name, optional
/// trailing colon, compared case-insensitively.
pub fn section_header(line: &str) -> Option<Section> {
    let trimmed = line.trim().trim_end_matches(':').trim();
    if trimmed.is_empty() || trimmed.len() > 40 {
        return None;
    }
    let lower = trimmed.to_lowercase();

    let tables: &[(&[&str], Section)] = &[
        (lexicon::SUMMARY_HEADERS, Section::Summary),
        (lexicon::EXPERIENCE_HEADERS, Section::Experience),
        (lexicon::EDUCATION_HEADERS, Section::Education),
        (lexicon::SKILLS_HEADERS, Section::Skills),
        (lexicon::CERTIFICATION_HEADERS, Section::Certifications),
        (lexicon::PROJECT_HEADERS, Section::Projects),
        (lexicon::LANGUAGE_HEADERS, Section::Languages),
        (lexicon::ACHIEVEMENT_HEADERS, Section::Achievements),
    ];
    for (names, section) in tables {
        if names.contains(&lower.as_str()) {
            return Some(*section);
        }
    }
    None
}

pub fn is_any_header(line: &str) -> bool {
    section_header(line).is_some()
}

pub fn is_bullet(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with('•')
        || t.starts_with('●')
        || t.starts_with('○')
        || t.starts_with('-')
        || t.starts_with('*')
        || t.starts_with('▪')
}

pub fn strip_bullet(line: &str) -> &str {
    line.trim_start()
        .trim_start_matches(['•', '●', '○', '-', '*', '▪'])
        .trim()
}

/// Indices of the body lines of the first section of the given kind.
fn section_body(lines: &[&str], section: Section) -> Option<std::ops::Range<usize>> {
    let start = lines
        .iter()
        .position(|l| section_header(l) == Some(section))?
        + 1;
    let end = lines[start..]
        .iter()
        .position(|l| is_any_header(l))
        .map(|p| start + p)
        .unwrap_or(lines.len());
    Some(start..end)
}

/// Summary requires an explicit header; prose before the first section
/// is never promoted to a summary.
pub fn extract_summary(lines: &[&str]) -> Option<String> {
    let range = section_body(lines, Section::Summary)?;
    let mut parts: Vec<&str> = Vec::new();
    for line in &lines[range] {
        let t = line.trim();
        if t.is_empty() {
            if !parts.is_empty() {
                break;
            }
            continue;
        }
        parts.push(t);
    }
    let summary = parts.join(" ");
    if (30..=1000).contains(&summary.len()) {
        Some(summary)
    } else {
        None
    }
}

static TECH_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:technologies|tech stack|tools|built with)\s*:\s*(.+)$").unwrap()
});

pub fn extract_projects(lines: &[&str]) -> Vec<ProjectEntry> {
    let Some(range) = section_body(lines, Section::Projects) else {
        return Vec::new();
    };

    let mut projects: Vec<ProjectEntry> = Vec::new();
    for line in &lines[range] {
        let t = line.trim();
        if t.is_empty() {
            continue;
        }
        if let Some(caps) = TECH_LINE.captures(t) {
            if let Some(current) = projects.last_mut() {
                current.technologies = caps[1]
                    .split([',', ';', '|'])
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            continue;
        }
        if is_bullet(t) {
            if let Some(current) = projects.last_mut() {
                if !current.description.is_empty() {
                    current.description.push(' ');
                }
                current.description.push_str(strip_bullet(t));
            }
            continue;
        }
        // A plain line starts a new project
        projects.push(ProjectEntry {
            name: t.trim_end_matches(':').trim().to_string(),
            description: String::new(),
            technologies: Vec::new(),
        });
    }
    projects.retain(|p| !p.name.is_empty());
    projects
}

static LANGUAGES_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*languages?\s*:\s*(.+)$").unwrap());

fn parse_proficiency(s: &str) -> Proficiency {
    let lower = s.to_lowercase();
    let table: &[(&str, Proficiency)] = &[
        ("native", Proficiency::Native),
        ("fluent", Proficiency::Fluent),
        ("professional", Proficiency::Professional),
        ("working", Proficiency::Working),
        ("intermediate", Proficiency::Intermediate),
        ("conversational", Proficiency::Intermediate),
        ("basic", Proficiency::Basic),
        ("elementary", Proficiency::Elementary),
        ("beginner", Proficiency::Beginner),
    ];
    for (token, level) in table {
        if lower.contains(token) {
            return *level;
        }
    }
    Proficiency::Unknown
}

/// Parse one "French (Fluent)" / "French - Fluent" / "French: Fluent"
/// candidate. The name must be a known spoken language.
fn parse_language(candidate: &str) -> Option<LanguageEntry> {
    let t = candidate.trim();
    if t.is_empty() {
        return None;
    }
    let (name_part, level_part) = if let Some(open) = t.find('(') {
        (&t[..open], t[open..].trim_matches(['(', ')']))
    } else if let Some(dash) = t.find([':', '-', '–']) {
        let sep_len = t[dash..].chars().next().map_or(1, |c| c.len_utf8());
        (&t[..dash], t[dash + sep_len..].trim())
    } else {
        (t, "")
    };

    let name = name_part.trim();
    if !lexicon::KNOWN_LANGUAGES.contains(&name.to_lowercase().as_str()) {
        return None;
    }
    let mut chars = name.chars();
    let display = match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => return None,
    };
    Some(LanguageEntry {
        name: display,
        proficiency: parse_proficiency(level_part),
    })
}

pub fn extract_languages(lines: &[&str]) -> Vec<LanguageEntry> {
    let mut candidates: Vec<String> = Vec::new();

    if let Some(range) = section_body(lines, Section::Languages) {
        for line in &lines[range] {
            let t = strip_bullet(line);
            if t.is_empty() {
                continue;
            }
            candidates.extend(t.split([',', ';']).map(|s| s.to_string()));
        }
    }
    if candidates.is_empty() {
        for line in lines {
            if let Some(caps) = LANGUAGES_LINE.captures(line) {
                candidates.extend(caps[1].split([',', ';']).map(|s| s.to_string()));
                break;
            }
        }
    }

    let mut out: Vec<LanguageEntry> = Vec::new();
    for candidate in candidates {
        if let Some(entry) = parse_language(&candidate) {
            if !out.iter().any(|e| e.name == entry.name) {
                out.push(entry);
            }
        }
    }
    out
}

fn is_all_caps(line: &str) -> bool {
    let has_alpha = line.chars().any(|c| c.is_alphabetic());
    has_alpha && !line.chars().any(|c| c.is_lowercase())
}

pub fn extract_achievements(lines: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    let push = |text: &str, out: &mut Vec<String>, seen: &mut Vec<String>| {
        let t = text.trim();
        if t.is_empty() || t.len() < 10 {
            return;
        }
        let key = t.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            out.push(t.to_string());
        }
    };

    if let Some(range) = section_body(lines, Section::Achievements) {
        for line in &lines[range.clone()] {
            let t = line.trim();
            if t.is_empty() || is_all_caps(t) {
                continue;
            }
            push(strip_bullet(t), &mut out, &mut seen);
        }
        // Lines outside the section still count if they name an award
        for (i, line) in lines.iter().enumerate() {
            if range.contains(&i) {
                continue;
            }
            let lower = line.to_lowercase();
            if lexicon::AWARD_KEYWORDS.iter().any(|k| lower.contains(k)) {
                push(strip_bullet(line), &mut out, &mut seen);
            }
        }
    } else {
        for line in lines {
            let lower = line.to_lowercase();
            if lexicon::AWARD_KEYWORDS.iter().any(|k| lower.contains(k)) {
                push(strip_bullet(line), &mut out, &mut seen);
            }
        }
    }

    out.truncate(10);
    out
}
