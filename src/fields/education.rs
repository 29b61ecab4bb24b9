//! Education extraction.
//!
//! Degree patterns are checked in level order, doctorate first, so a
//! line like "Ph.D. in Physics" never lands on an M-pattern. Word forms
//! are case-insensitive; dotted abbreviations are case-sensitive, which
//! keeps "Ms. Jane" and the state "MA" out of the results.

use std::sync::LazyLock;

use regex::Regex;

use super::lexicon;
use super::sections;
use super::{DegreeLevel, EducationEntry};

struct DegreePattern {
    level: DegreeLevel,
    re: Regex,
}

const FIELD: &str = r"([A-Z][A-Za-z&]*(?:\s[A-Za-z&]+)*)";

static DEGREE_PATTERNS: LazyLock<Vec<DegreePattern>> = LazyLock::new(|| {
    let mut patterns = Vec::new();
    let mut push = |level: DegreeLevel, re: &str| {
        patterns.push(DegreePattern {
            level,
            re: Regex::new(re).unwrap(),
        });
    };

    let field_opt = format!(r"(?:\s+(?:in\s+)?{FIELD})?");
    let word_field = r"\s+(?:of|in)\s+([A-Za-z][A-Za-z& ]*)";

    // Doctorate before master: "Ph.D." must never resolve as an M-degree
    push(DegreeLevel::Doctorate, &format!(r"Ph\.?\s?D\.?{field_opt}"));
    push(DegreeLevel::Doctorate, &format!(r"(?i)\bDoctor(?:ate)?{word_field}"));

    push(DegreeLevel::Master, &format!(r"\bM\.S\.?c?\.?{field_opt}"));
    push(DegreeLevel::Master, &format!(r"\bMSc?\s+in\s+{FIELD}"));
    push(DegreeLevel::Master, &format!(r"\bM\.A\.{field_opt}"));
    push(DegreeLevel::Master, &format!(r"\bM\.?Tech\b{field_opt}"));
    push(DegreeLevel::Master, &format!(r"\bM\.E\.{field_opt}"));
    push(DegreeLevel::Master, r"\bMBA\b|\bM\.B\.A\.?");
    push(DegreeLevel::Master, &format!(r"(?i)\bMaster(?:'|’)?s?{word_field}"));

    push(DegreeLevel::Bachelor, &format!(r"\bB\.S\.?c?\.?{field_opt}"));
    push(DegreeLevel::Bachelor, &format!(r"\bBSc?\b{field_opt}"));
    push(DegreeLevel::Bachelor, &format!(r"\bB\.A\.{field_opt}"));
    push(DegreeLevel::Bachelor, &format!(r"\bB\.?Tech\b{field_opt}"));
    push(DegreeLevel::Bachelor, &format!(r"\bB\.E\.{field_opt}"));
    push(DegreeLevel::Bachelor, &format!(r"(?i)\bBachelor(?:'|’)?s?{word_field}"));

    push(DegreeLevel::Associate, &format!(r"\bA\.S\.{field_opt}"));
    push(DegreeLevel::Associate, &format!(r"\bA\.A\.{field_opt}"));
    push(
        DegreeLevel::Associate,
        &format!(r"(?i)\bAssociate(?:'|’)?s?(?:\s+degree)?{word_field}"),
    );

    patterns
});

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").unwrap());

static GPA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:GPA|CGPA|Grade)\s*:?\s*([0-9](?:\.[0-9]+)?)(?:\s*/\s*([0-9]+(?:\.[0-9]+)?))?")
        .unwrap()
});

/// The comma segment of a line naming an institution, if any.
fn institution_segment(line: &str) -> Option<String> {
    for segment in line.split(',') {
        let seg = segment.trim();
        let lower = seg.to_lowercase();
        let generic = lexicon::INSTITUTION_KEYWORDS
            .iter()
            .any(|k| lower.contains(k));
        let named = lexicon::INSTITUTION_NAMES.iter().any(|k| {
            lower
                .split(|c: char| !c.is_alphanumeric())
                .any(|w| w == *k)
        });
        if generic || named {
            // Drop trailing year spans like "IIT Bombay 2014 - 2018"
            let cleaned = seg
                .trim_end_matches(|c: char| c.is_ascii_digit() || c == '-' || c == '–' || c == ' ')
                .trim();
            if !cleaned.is_empty() {
                return Some(cleaned.to_string());
            }
        }
    }
    None
}

fn looks_like_year_line(line: &str) -> bool {
    let stripped: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    !stripped.is_empty()
        && stripped
            .chars()
            .all(|c| c.is_ascii_digit() || c == '-' || c == '–')
}

pub fn extract_education(lines: &[&str]) -> Vec<EducationEntry> {
    let mut entries: Vec<EducationEntry> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let Some((pattern, caps)) = DEGREE_PATTERNS
            .iter()
            .find_map(|p| p.re.captures(line).map(|c| (p, c)))
        else {
            continue;
        };

        let degree = caps.get(0).map(|m| m.as_str().trim().to_string()).unwrap_or_default();
        let mut field_of_study = caps
            .get(1)
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty());

        // Window: this line plus the next four
        let window_end = lines.len().min(i + 5);
        let window = &lines[i..window_end];

        let mut institution = None;
        for w in window {
            if let Some(seg) = institution_segment(w) {
                institution = Some(seg);
                break;
            }
        }
        if institution.is_none() {
            for w in &window[1..] {
                let t = w.trim();
                if t.is_empty() || sections::is_any_header(t) || looks_like_year_line(t) {
                    continue;
                }
                if t.chars().next().is_some_and(|c| c.is_uppercase()) {
                    institution = Some(t.to_string());
                    break;
                }
            }
        }

        if field_of_study.is_none() {
            if let Some(next) = lines.get(i + 1) {
                let t = next.trim();
                if !t.is_empty()
                    && !sections::is_any_header(t)
                    && !looks_like_year_line(t)
                    && institution.as_deref() != Some(t)
                    && institution_segment(t).is_none()
                {
                    field_of_study = Some(t.to_string());
                }
            }
        }

        let mut years: Vec<i32> = Vec::new();
        for w in window {
            for caps in YEAR_RE.captures_iter(w) {
                if let Ok(year) = caps[1].parse() {
                    years.push(year);
                }
            }
        }
        let (start_year, end_year) = match years.as_slice() {
            [] => (None, None),
            [one] => (None, Some(*one)),
            [a, b, ..] => (Some(*a.min(b)), Some(*a.max(b))),
        };

        let gpa = window.iter().find_map(|w| {
            GPA_RE.captures(w).map(|caps| match caps.get(2) {
                Some(scale) => format!("{}/{}", &caps[1], scale.as_str()),
                None => caps[1].to_string(),
            })
        });

        // One entry per line; a dedicated degree line plus its detail
        // lines should not yield duplicates
        let duplicate = entries.iter().any(|e: &EducationEntry| {
            e.degree_level == Some(pattern.level) && e.institution == institution
        });
        if duplicate {
            continue;
        }

        entries.push(EducationEntry {
            degree_level: Some(pattern.level),
            degree,
            field_of_study,
            institution,
            start_year,
            end_year,
            gpa,
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    #[test]
    fn single_line_entry() {
        let entries = extract_education(&lines("B.S. Computer Science, MIT, 2014-2018"));
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.degree_level, Some(DegreeLevel::Bachelor));
        assert_eq!(e.field_of_study.as_deref(), Some("Computer Science"));
        assert_eq!(e.institution.as_deref(), Some("MIT"));
        assert_eq!(e.start_year, Some(2014));
        assert_eq!(e.end_year, Some(2018));
    }

    #[test]
    fn phd_is_not_a_masters() {
        let entries = extract_education(&lines("Ph.D. in Physics\nStanford University\n2020"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].degree_level, Some(DegreeLevel::Doctorate));
        assert_eq!(entries[0].field_of_study.as_deref(), Some("Physics"));
        assert_eq!(entries[0].institution.as_deref(), Some("Stanford University"));
        assert_eq!(entries[0].start_year, None);
        assert_eq!(entries[0].end_year, Some(2020));
    }

    #[test]
    fn word_form_with_gpa() {
        let text = "EDUCATION\nMaster of Science in Data Engineering\nCarnegie Mellon University\n2019 - 2021\nGPA: 3.8/4.0";
        let entries = extract_education(&lines(text));
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.degree_level, Some(DegreeLevel::Master));
        assert!(e.field_of_study.as_deref().unwrap().starts_with("Science"));
        assert_eq!(e.institution.as_deref(), Some("Carnegie Mellon University"));
        assert_eq!(e.gpa.as_deref(), Some("3.8/4.0"));
        assert_eq!((e.start_year, e.end_year), (Some(2019), Some(2021)));
    }

    #[test]
    fn honorific_ms_is_not_a_degree() {
        assert!(extract_education(&lines("Ms. Jane reviewed the program")).is_empty());
        assert!(extract_education(&lines("Boston, MA based consultant")).is_empty());
    }

    #[test]
    fn years_are_ordered() {
        let entries = extract_education(&lines("B.Tech in Mechanical Engineering\nIIT Bombay 2018 - 2014"));
        assert_eq!(entries[0].start_year, Some(2014));
        assert_eq!(entries[0].end_year, Some(2018));
    }

    #[test]
    fn mba_without_field() {
        let entries = extract_education(&lines("MBA\nHarvard Business School\n2016"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].degree_level, Some(DegreeLevel::Master));
        assert_eq!(entries[0].field_of_study, None);
        assert_eq!(entries[0].institution.as_deref(), Some("Harvard Business School"));
    }
}
