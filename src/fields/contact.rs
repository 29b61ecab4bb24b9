//! Contact-field extraction: name, email, phone, profile URLs, location.

use std::sync::LazyLock;

use regex::Regex;

use super::lexicon;
use super::sections;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());

/// Syntactic email validation on top of the regex match.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if email.matches('@').count() != 1 {
        return false;
    }
    if local.is_empty() || local.len() > 64 {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    if domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
        return false;
    }
    let Some((_, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// Whether the text just before `start` ends with an email local-part
/// character. A match starting there is a fragment of a larger address
/// (`.lead@x.com`, the domain after an `@`), not a value of its own.
fn follows_email_char(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .is_some_and(|c| {
            c == '@' || c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-')
        })
}

/// First syntactically valid email, case preserved.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE
        .find_iter(text)
        .filter(|m| !follows_email_char(text, m.start()))
        .map(|m| m.as_str())
        .find(|candidate| is_valid_email(candidate))
        .map(|s| s.to_string())
}

// Ordered: international, parenthesized NANP, bare ten-digit.
static PHONE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"\+\d{1,3}[\s.-]?\(?\d{1,4}\)?(?:[\s.-]?\d{2,4}){2,4}").unwrap(),
        Regex::new(r"\(\d{3}\)[\s.-]?\d{3}[\s.-]?\d{4}").unwrap(),
        Regex::new(r"\b\d{3}[\s.-]?\d{3}[\s.-]?\d{4}\b").unwrap(),
    ]
});

fn digits_of(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Lightweight plausibility check on a phone candidate.
fn is_valid_phone(candidate: &str) -> bool {
    let digits = digits_of(candidate);
    match digits.len() {
        10 => digits.as_bytes()[0] != b'0' && digits.as_bytes()[0] != b'1',
        11 => {
            // NANP with country code, or a non-plus international number
            candidate.starts_with('+') || digits.starts_with('1')
        }
        12..=15 => true,
        _ => false,
    }
}

/// First phone number that validates, in the original formatting. Falls
/// back to the first candidate with at least ten digits.
pub fn extract_phone(text: &str) -> Option<String> {
    let mut fallback: Option<String> = None;
    for pattern in PHONE_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            let candidate = m.as_str().trim();
            if is_valid_phone(candidate) {
                return Some(candidate.to_string());
            }
            if fallback.is_none() && digits_of(candidate).len() >= 10 {
                fallback = Some(candidate.to_string());
            }
        }
    }
    fallback
}

/// Canonical comparison form: digits only, last ten when longer.
/// Idempotent, so stored values can be re-normalized safely.
pub fn normalize_phone(phone: &str) -> String {
    let digits = digits_of(phone);
    if digits.len() > 10 {
        digits[digits.len() - 10..].to_string()
    } else {
        digits
    }
}

static LINKEDIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.|[a-z]{2}\.)?linkedin\.com/in/[\w\-%.]+/?").unwrap()
});

static GITHUB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?github\.com/[\w\-]+/?").unwrap()
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?[a-z0-9\-]+\.(?:com|io|dev|me|tech|net|org)(?:/[\w\-./]*)?")
        .unwrap()
});

fn with_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

pub fn extract_linkedin(text: &str) -> Option<String> {
    LINKEDIN_RE.find(text).map(|m| with_scheme(m.as_str()))
}

pub fn extract_github(text: &str) -> Option<String> {
    GITHUB_RE.find(text).map(|m| with_scheme(m.as_str()))
}

/// First generic URL that is not a profile or mail host, and not the
/// domain half of an email address.
pub fn extract_portfolio(text: &str) -> Option<String> {
    const EXCLUDED: &[&str] = &["linkedin.", "github.", "gmail.", "yahoo.", "outlook.", "hotmail."];
    URL_RE
        .find_iter(text)
        .filter(|m| !follows_email_char(text, m.start()))
        .map(|m| m.as_str())
        .find(|url| {
            let lower = url.to_lowercase();
            !EXCLUDED.iter().any(|host| lower.contains(host))
        })
        .map(with_scheme)
}

/// A "capitalized word" for name detection: leading uppercase, at least
/// two chars, alphabetic with hyphens allowed.
fn is_capitalized_word(word: &str) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_uppercase()
        && word.chars().count() >= 2
        && word.chars().all(|c| c.is_alphabetic() || c == '-')
}

fn is_all_caps(line: &str) -> bool {
    let has_alpha = line.chars().any(|c| c.is_alphabetic());
    has_alpha && !line.chars().any(|c| c.is_lowercase())
}

fn has_digit_run(line: &str, n: usize) -> bool {
    let mut run = 0;
    for c in line.chars() {
        if c.is_ascii_digit() {
            run += 1;
            if run >= n {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Candidate-name heuristic over the first twenty lines.
pub fn extract_name(lines: &[&str]) -> Option<String> {
    const REJECT_CHARS: &[char] = &[':', '|', '/', '\\', '•', '●', '○'];

    for line in lines.iter().take(20) {
        let t = line.trim();
        if t.is_empty() || sections::is_any_header(t) {
            continue;
        }
        let lower = t.to_lowercase();
        if t.contains('@')
            || lower.contains("http")
            || lower.contains("www")
            || lower.contains(".com")
            || lower.contains(".net")
        {
            continue;
        }
        if t.contains(REJECT_CHARS) || has_digit_run(t, 3) || is_all_caps(t) {
            continue;
        }
        if t.len() >= 60 {
            continue;
        }

        let capitalized: Vec<&str> = t
            .split_whitespace()
            .filter(|w| is_capitalized_word(w.trim_matches(|c: char| !c.is_alphanumeric() && c != '-')))
            .collect();
        if (2..=4).contains(&capitalized.len()) {
            return Some(capitalized.join(" "));
        }
    }
    None
}

static LOCATION_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:location|address|city|based in)\s*:\s*(.+)$").unwrap()
});

static CITY_REGION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][a-z]+(?:\s[A-Z][a-z]+)?),\s*([A-Za-z]{2,15})\b").unwrap()
});

/// Location: explicit label first, then a `City, Region` shape in the
/// top of the document.
pub fn extract_location(lines: &[&str]) -> Option<String> {
    for line in lines.iter().take(15) {
        if let Some(caps) = LOCATION_LABEL_RE.captures(line) {
            let value = caps[1].trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    for line in lines.iter().take(15) {
        for caps in CITY_REGION_RE.captures_iter(line) {
            let city = caps[1].trim();
            let region = caps[2].trim();
            let city_l = city.to_lowercase();
            let region_l = region.to_lowercase();
            let forbidden = lexicon::LOCATION_FORBIDDEN;
            if forbidden.iter().any(|w| city_l.split_whitespace().any(|t| t == *w))
                || forbidden.contains(&region_l.as_str())
            {
                continue;
            }
            return Some(format!("{city}, {region}"));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_first_valid_case_preserved() {
        let text = "contact: bad..local@x.com then Jane.Doe@Example.COM and other@y.org";
        assert_eq!(extract_email(text).as_deref(), Some("Jane.Doe@Example.COM"));
    }

    #[test]
    fn email_rejects_malformed() {
        assert!(extract_email("a@b").is_none());
        assert!(extract_email(".lead@x.com").is_none());
        assert!(extract_email("x@y.c0m trailing").is_none());
    }

    #[test]
    fn phone_international_preferred() {
        let text = "call 123 456 7890 or +44 20 7946 0958";
        assert_eq!(extract_phone(text).as_deref(), Some("+44 20 7946 0958"));
    }

    #[test]
    fn phone_nanp_parenthesized() {
        assert_eq!(
            extract_phone("Phone: (555) 123-4567").as_deref(),
            Some("(555) 123-4567")
        );
    }

    #[test]
    fn phone_fallback_when_nothing_validates() {
        // Leading 0 fails validation but has ten digits
        assert_eq!(extract_phone("tel 055-123-4567").as_deref(), Some("055-123-4567"));
    }

    #[test]
    fn normalize_phone_is_idempotent() {
        let once = normalize_phone("+1 (555) 123-4567");
        assert_eq!(once, "5551234567");
        assert_eq!(normalize_phone(&once), once);
    }

    #[test]
    fn urls_get_https_scheme() {
        assert_eq!(
            extract_linkedin("see linkedin.com/in/jane-doe").as_deref(),
            Some("https://linkedin.com/in/jane-doe")
        );
        assert_eq!(
            extract_github("code at https://github.com/janedoe").as_deref(),
            Some("https://github.com/janedoe")
        );
    }

    #[test]
    fn portfolio_excludes_profile_hosts() {
        let text = "linkedin.com/in/jane github.com/jane jane@gmail.com janedoe.dev";
        assert_eq!(extract_portfolio(text).as_deref(), Some("https://janedoe.dev"));
    }

    #[test]
    fn portfolio_not_invented_from_email_domain() {
        assert_eq!(extract_portfolio("Jane Doe\njane@example.com\n(555) 123-4567"), None);
        // A real URL elsewhere still comes through
        let text = "jane@example.com and portfolio at janedoe.dev";
        assert_eq!(extract_portfolio(text).as_deref(), Some("https://janedoe.dev"));
    }

    #[test]
    fn name_from_top_lines() {
        let lines = vec!["", "RESUME", "Jane Doe", "jane@x.com"];
        assert_eq!(extract_name(&lines).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn name_skips_headers_contacts_and_all_caps() {
        let lines = vec![
            "JANE DOE",
            "jane@x.com",
            "linkedin.com/in/jane",
            "Phone: 555 123 4567",
            "Maria de la Cruz",
        ];
        // ALL-CAPS line is skipped, accented/multi-word name accepted
        assert_eq!(extract_name(&lines).as_deref(), Some("Maria Cruz"));
    }

    #[test]
    fn unicode_name_accepted() {
        let lines = vec!["José Álvarez", "jose@x.com"];
        assert_eq!(extract_name(&lines).as_deref(), Some("José Álvarez"));
    }

    #[test]
    fn location_label_wins() {
        let lines = vec!["Jane Doe", "Location: Lisbon, Portugal", "Austin, TX"];
        assert_eq!(extract_location(&lines).as_deref(), Some("Lisbon, Portugal"));
    }

    #[test]
    fn location_city_region_fallback() {
        let lines = vec!["Jane Doe", "Senior Engineer", "Austin, TX"];
        assert_eq!(extract_location(&lines).as_deref(), Some("Austin, TX"));
    }

    #[test]
    fn location_rejects_title_like_pairs() {
        let lines = vec!["Jane Doe", "Engineer, Senior"];
        assert_eq!(extract_location(&lines), None);
    }
}
