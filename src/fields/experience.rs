//! Work-experience extraction.
//!
//! Anchored on date ranges: a line containing one starts an entry, and
//! the title/company are recovered from the text before the range or
//! from a small window of preceding lines. A state machine keeps date
//! ranges inside the education section from becoming jobs.

use std::sync::LazyLock;

use regex::Regex;

use super::dates;
use super::lexicon;
use super::sections::{self, Section};
use super::WorkExperienceEntry;

// Ordered: "Mon YYYY", "M/YYYY", then bare "YYYY" ranges.
static DATE_RANGE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    // Full names before abbreviations so "Marketing 2019" cannot match
    let month = r"(?:january|february|march|april|may|june|july|august|september|sept|october|november|december|jan|feb|mar|apr|jun|jul|aug|sep|oct|nov|dec)\.?";
    let sep = r"\s*(?:[-–—]|to|until)\s*";
    vec![
        Regex::new(&format!(
            r"(?i)({month}\s+\d{{4}}){sep}({month}\s+\d{{4}}|present|current)"
        ))
        .unwrap(),
        Regex::new(&format!(
            r"(?i)(\d{{1,2}}/\d{{4}}){sep}(\d{{1,2}}/\d{{4}}|present|current)"
        ))
        .unwrap(),
        Regex::new(&format!(
            r"(?i)\b((?:19|20)\d{{2}}){sep}((?:19|20)\d{{2}}|present|current)\b"
        ))
        .unwrap(),
    ]
});

struct DateRange {
    start: String,
    end: String,
    match_start: usize,
}

fn find_date_range(line: &str) -> Option<DateRange> {
    for pattern in DATE_RANGE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(line) {
            let m = caps.get(0).unwrap();
            return Some(DateRange {
                start: caps[1].trim().to_string(),
                end: caps[2].trim().to_string(),
                match_start: m.start(),
            });
        }
    }
    None
}

static STATE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*[A-Z]{2}\s*$").unwrap());

fn looks_like_company(line: &str) -> bool {
    let lower = line.to_lowercase();
    let has_keyword = lower
        .split_whitespace()
        .map(|w| w.trim_matches([',', '.', ';']))
        .any(|w| lexicon::COMPANY_KEYWORDS.contains(&w));
    has_keyword || STATE_SUFFIX_RE.is_match(line)
}

fn looks_like_title(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower
        .split_whitespace()
        .map(|w| w.trim_matches([',', '.', ';']))
        .any(|w| lexicon::TITLE_KEYWORDS.contains(&w))
}

/// Split "Engineer, Acme, Austin" or "Engineer at Acme" inline prefixes.
fn parse_prefix(prefix: &str) -> (Option<String>, Option<String>, Option<String>) {
    let cleaned = prefix
        .trim()
        .trim_end_matches(['|', ',', '(', '-', '–', '—'])
        .trim();
    if cleaned.is_empty() {
        return (None, None, None);
    }

    let parts: Vec<&str> = cleaned
        .split(['|', ','])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    let first = parts.first().copied().unwrap_or(cleaned);
    if parts.len() == 1 {
        if let Some((title, company)) = first.split_once(" at ") {
            return (
                Some(title.trim().to_string()),
                Some(company.trim().to_string()),
                None,
            );
        }
        return (Some(first.to_string()), None, None);
    }

    (
        Some(first.to_string()),
        parts.get(1).map(|s| s.to_string()),
        parts.get(2).map(|s| s.to_string()),
    )
}

/// Previous non-empty, non-header, non-bullet lines, nearest first.
fn preceding_lines<'a>(lines: &[&'a str], i: usize) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut j = i;
    while j > 0 && out.len() < 2 {
        j -= 1;
        let t = lines[j].trim();
        if t.is_empty() || sections::is_bullet(t) {
            break;
        }
        if sections::is_any_header(t) || find_date_range(t).is_some() {
            break;
        }
        out.push(t);
    }
    out
}

pub fn extract_experience(lines: &[&str]) -> Vec<WorkExperienceEntry> {
    let mut entries: Vec<WorkExperienceEntry> = Vec::new();
    let mut in_education = false;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();

        match sections::section_header(line) {
            Some(Section::Education) => {
                in_education = true;
                i += 1;
                continue;
            }
            Some(Section::Experience) => {
                in_education = false;
                i += 1;
                continue;
            }
            _ => {}
        }

        if in_education {
            i += 1;
            continue;
        }

        let Some(range) = find_date_range(line) else {
            i += 1;
            continue;
        };

        let (mut title, mut company, location) = parse_prefix(&line[..range.match_start]);

        if title.is_none() && company.is_none() {
            let prev = preceding_lines(lines, i);
            match prev.as_slice() {
                [one] => {
                    if looks_like_company(one) && !looks_like_title(one) {
                        company = Some(one.to_string());
                    } else {
                        title = Some(one.to_string());
                    }
                }
                [one, two, ..] => {
                    if looks_like_company(one) && !looks_like_company(two) {
                        title = Some(two.to_string());
                        company = Some(one.to_string());
                    } else {
                        title = Some(one.to_string());
                        company = Some(two.to_string());
                    }
                }
                [] => {}
            }
        }

        let is_current = dates::is_present(&range.end);
        let duration_months = dates::duration_months(&range.start, &range.end);

        // Bullets and free text below the date line belong to this entry
        let mut responsibilities: Vec<String> = Vec::new();
        let mut description_parts: Vec<String> = Vec::new();
        let mut j = i + 1;
        while j < lines.len() {
            let t = lines[j].trim();
            if t.is_empty() || sections::is_any_header(t) || find_date_range(t).is_some() {
                break;
            }
            if sections::is_bullet(t) {
                responsibilities.push(sections::strip_bullet(t).to_string());
            } else {
                // A plain line just above the next date range is the next
                // entry's header block, not part of this description
                let upcoming = lines[j..lines.len().min(j + 3)]
                    .iter()
                    .any(|l| find_date_range(l).is_some());
                if upcoming {
                    break;
                }
                description_parts.push(t.to_string());
            }
            j += 1;
        }

        entries.push(WorkExperienceEntry {
            company,
            title,
            location,
            start_date: range.start,
            end_date: if is_current { None } else { Some(range.end) },
            is_current,
            duration_months,
            responsibilities,
            description: description_parts.join(" "),
        });

        i = j;
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
    fn stacked_entries_with_header_blocks() {
        let text = "EXPERIENCE\n\
Senior Engineer\n\
Acme Inc\n\
Jan 2020 - Present\n\
- Led the payments team\n\
- Cut deploy time in half\n\
Engineer\n\
Beta LLC\n\
Jun 2018 - Dec 2019\n\
- Built the billing service";
        let entries = extract_experience(&lines(text));
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].title.as_deref(), Some("Senior Engineer"));
        assert_eq!(entries[0].company.as_deref(), Some("Acme Inc"));
        assert!(entries[0].is_current);
        assert_eq!(entries[0].end_date, None);
        assert_eq!(entries[0].responsibilities.len(), 2);

        assert_eq!(entries[1].title.as_deref(), Some("Engineer"));
        assert_eq!(entries[1].company.as_deref(), Some("Beta LLC"));
        assert!(!entries[1].is_current);
        assert_eq!(entries[1].end_date.as_deref(), Some("Dec 2019"));
        assert_eq!(entries[1].duration_months, Some(18));
    }

    #[test]
    fn inline_prefix_title_and_company() {
        let text = "EXPERIENCE\nEngineer, Acme, Jan 2019 - Present";
        let entries = extract_experience(&lines(text));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title.as_deref(), Some("Engineer"));
        assert_eq!(entries[0].company.as_deref(), Some("Acme"));
    }

    #[test]
    fn at_separator_in_prefix() {
        let text = "EXPERIENCE\nStaff Developer at Initech 3/2015 - 8/2019";
        let entries = extract_experience(&lines(text));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title.as_deref(), Some("Staff Developer"));
        assert_eq!(entries[0].company.as_deref(), Some("Initech"));
        assert_eq!(entries[0].duration_months, Some(53));
    }

    #[test]
    fn education_years_are_not_jobs() {
        let text = "EDUCATION\n\
B.S. Computer Science\n\
State University, 2014-2018\n\
EXPERIENCE\n\
Developer\n\
2019 - 2021";
        let entries = extract_experience(&lines(text));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].start_date, "2019");
        assert_eq!(entries[0].duration_months, Some(24));
    }

    #[test]
    fn unparseable_dates_leave_duration_none() {
        // Year-only pattern cannot match "20x1"; nothing extracted
        let text = "EXPERIENCE\nDeveloper\n20x1 - 20y2";
        assert!(extract_experience(&lines(text)).is_empty());
    }

    #[test]
    fn current_role_duration_uses_today() {
        let text = "EXPERIENCE\nAnalyst\nGamma Corp\nJan 2019 to Present";
        let entries = extract_experience(&lines(text));
        assert!(entries[0].duration_months.unwrap() >= 60);
    }
}
