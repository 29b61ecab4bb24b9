//! Date parsing helpers for work-experience ranges.

use chrono::{Datelike, Local};

/// A month-resolution point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

pub fn is_present(token: &str) -> bool {
    let lower = token.trim().to_lowercase();
    lower == "present" || lower == "current" || lower == "now" || lower == "ongoing"
}

fn month_number(name: &str) -> Option<u32> {
    const MONTHS: &[&str] = &[
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];
    let lower = name.trim_end_matches('.').to_lowercase();
    if lower.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| m.starts_with(&lower))
        .map(|i| i as u32 + 1)
}

/// Parse "Jan 2020", "January 2020", "1/2020", or "2020".
/// Year-only dates resolve to January.
pub fn parse_year_month(token: &str) -> Option<YearMonth> {
    let t = token.trim();

    if let Some((m, y)) = t.split_once('/') {
        let month: u32 = m.trim().parse().ok()?;
        let year: i32 = y.trim().parse().ok()?;
        if (1..=12).contains(&month) && (1900..=2100).contains(&year) {
            return Some(YearMonth { year, month });
        }
        return None;
    }

    if let Some((name, y)) = t.rsplit_once(' ') {
        let month = month_number(name)?;
        let year: i32 = y.trim().parse().ok()?;
        if (1900..=2100).contains(&year) {
            return Some(YearMonth { year, month });
        }
        return None;
    }

    let year: i32 = t.parse().ok()?;
    if (1900..=2100).contains(&year) {
        return Some(YearMonth { year, month: 1 });
    }
    None
}

pub fn today() -> YearMonth {
    let now = Local::now();
    YearMonth {
        year: now.year(),
        month: now.month(),
    }
}

/// Whole months between two points, never negative.
pub fn months_between(start: YearMonth, end: YearMonth) -> u32 {
    let span = (end.year - start.year) * 12 + end.month as i32 - start.month as i32;
    span.max(0) as u32
}

/// Duration in whole months for a raw start/end pair. `None` when the
/// start does not parse, or the end is neither "present" nor parseable.
pub fn duration_months(start: &str, end: &str) -> Option<u32> {
    let start = parse_year_month(start)?;
    let end = if is_present(end) {
        today()
    } else {
        parse_year_month(end)?
    };
    Some(months_between(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names_short_and_long() {
        assert_eq!(parse_year_month("Jan 2020"), Some(YearMonth { year: 2020, month: 1 }));
        assert_eq!(
            parse_year_month("September 2019"),
            Some(YearMonth { year: 2019, month: 9 })
        );
        assert_eq!(parse_year_month("Sept. 2019"), Some(YearMonth { year: 2019, month: 9 }));
    }

    #[test]
    fn numeric_and_year_only() {
        assert_eq!(parse_year_month("3/2021"), Some(YearMonth { year: 2021, month: 3 }));
        assert_eq!(parse_year_month("2018"), Some(YearMonth { year: 2018, month: 1 }));
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_year_month("Febtember 20x1"), None);
        assert_eq!(parse_year_month("13/2020"), None);
        assert_eq!(parse_year_month("1850"), None);
    }

    #[test]
    fn month_arithmetic() {
        let a = YearMonth { year: 2020, month: 1 };
        let b = YearMonth { year: 2023, month: 6 };
        assert_eq!(months_between(a, b), 41);
        // Inverted ranges clamp instead of going negative
        assert_eq!(months_between(b, a), 0);
    }

    #[test]
    fn duration_handles_present() {
        let months = duration_months("Jan 2019", "Present").unwrap();
        assert!(months >= 60);
        assert_eq!(duration_months("nonsense", "Present"), None);
        assert_eq!(duration_months("Jan 2019", "sometime"), None);
    }
}
