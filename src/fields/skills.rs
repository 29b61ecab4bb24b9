//! Skill matching against the categorized lexicon.

use std::sync::LazyLock;

use regex::Regex;

use super::lexicon;

struct SkillMatcher {
    name: &'static str,
    re: Regex,
}

// One regex per lexicon entry, built once. Word boundaries are only
// applied next to word characters so "c++" and "c#" still anchor.
static MATCHERS: LazyLock<Vec<SkillMatcher>> = LazyLock::new(|| {
    let mut matchers = Vec::new();
    for (_, skills) in lexicon::SKILL_CATEGORIES {
        for skill in *skills {
            let escaped = regex::escape(skill);
            let lead = if skill.starts_with(|c: char| c.is_ascii_alphanumeric()) {
                r"\b"
            } else {
                ""
            };
            let trail = if skill.ends_with(|c: char| c.is_ascii_alphanumeric()) {
                r"\b"
            } else {
                ""
            };
            matchers.push(SkillMatcher {
                name: skill,
                re: Regex::new(&format!("{lead}{escaped}{trail}")).unwrap(),
            });
        }
    }
    matchers
});

fn title_case(skill: &str) -> String {
    skill
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn display_name(skill: &str) -> String {
    lexicon::CANONICAL_CAPS
        .iter()
        .find(|(lower, _)| *lower == skill)
        .map(|(_, display)| display.to_string())
        .unwrap_or_else(|| title_case(skill))
}

/// All lexicon skills present in the text, deduplicated, in canonical
/// capitalization, sorted for stable output.
pub fn extract_skills(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut out: Vec<String> = Vec::new();
    for matcher in MATCHERS.iter() {
        if matcher.re.is_match(&lower) {
            let display = display_name(matcher.name);
            if !out.contains(&display) {
                out.push(display);
            }
        }
    }
    out.sort();
    out
}
