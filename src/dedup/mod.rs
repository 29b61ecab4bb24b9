//! Duplicate detection for candidates and resumes.
//!
//! Candidate identity resolves through ordered strategies: exact email,
//! normalized phone, then fuzzy name (gated on having an email and no
//! exact hit). Resume duplicates resolve by content hash first, then by
//! text similarity against the candidate's existing resumes.

pub mod similarity;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::fields::contact;
use crate::store::CandidateStore;

pub const FUZZY_NAME_THRESHOLD: f64 = 0.80;
const EMAIL_CONFIDENCE: f64 = 1.0;
const PHONE_CONFIDENCE: f64 = 0.95;
const FILE_HASH_CONFIDENCE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Email,
    Phone,
    FuzzyName,
    FileHash,
    ContentSimilarity,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Email => "email",
            MatchType::Phone => "phone",
            MatchType::FuzzyName => "fuzzy_name",
            MatchType::FileHash => "file_hash",
            MatchType::ContentSimilarity => "content_similarity",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_id: Option<String>,
    pub match_type: MatchType,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_field: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateDecision {
    pub is_duplicate: bool,
    /// Highest match confidence, 0.0 when nothing matched.
    pub confidence: f64,
    pub matches: Vec<DuplicateMatch>,
    pub recommendation: String,
}

impl DuplicateDecision {
    fn from_matches(mut matches: Vec<DuplicateMatch>) -> Self {
        matches.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        let confidence = matches.first().map(|m| m.confidence).unwrap_or(0.0);
        Self {
            is_duplicate: confidence >= FUZZY_NAME_THRESHOLD,
            confidence,
            recommendation: recommendation(confidence, !matches.is_empty()).to_string(),
            matches,
        }
    }

    /// Decision with no matches, for callers that skip detection.
    pub fn no_match() -> Self {
        Self::from_matches(Vec::new())
    }

    /// The candidate behind the strongest match, if any.
    pub fn best_candidate_id(&self) -> Option<&str> {
        self.matches.first().and_then(|m| m.candidate_id.as_deref())
    }
}

fn recommendation(confidence: f64, any_match: bool) -> &'static str {
    if confidence >= 0.95 {
        "Strong duplicate: use the existing candidate or skip this upload"
    } else if confidence >= FUZZY_NAME_THRESHOLD {
        "Possible duplicate: review before proceeding"
    } else if any_match {
        "Weak signals only: manual verification recommended"
    } else {
        "No duplicates found: safe to proceed"
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarCandidate {
    pub candidate_id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub similarity: f64,
}

pub struct DuplicateDetector<'a> {
    store: &'a CandidateStore,
    content_similarity_threshold: f64,
}

impl<'a> DuplicateDetector<'a> {
    pub fn new(store: &'a CandidateStore, content_similarity_threshold: f64) -> Self {
        Self {
            store,
            content_similarity_threshold,
        }
    }

    /// Candidate identity check. Strategies run in order; fuzzy name
    /// only runs when neither exact strategy fired and an email exists.
    pub fn check_candidate(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
        name: Option<&str>,
    ) -> Result<DuplicateDecision> {
        let mut matches: Vec<DuplicateMatch> = Vec::new();

        if let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) {
            if let Some(existing) = self.store.find_candidate_by_email(email)? {
                matches.push(DuplicateMatch {
                    candidate_id: Some(existing.id),
                    resume_id: None,
                    match_type: MatchType::Email,
                    confidence: EMAIL_CONFIDENCE,
                    matched_field: Some(email.to_string()),
                });
            }
        }

        if let Some(phone) = phone {
            let normalized = contact::normalize_phone(phone);
            if normalized.len() == 10 {
                for existing in self.store.find_candidates_by_phone(&normalized)? {
                    if matches.iter().any(|m| m.candidate_id.as_deref() == Some(&existing.id)) {
                        continue;
                    }
                    matches.push(DuplicateMatch {
                        candidate_id: Some(existing.id),
                        resume_id: None,
                        match_type: MatchType::Phone,
                        confidence: PHONE_CONFIDENCE,
                        matched_field: Some(normalized.clone()),
                    });
                }
            }
        }

        if matches.is_empty() {
            if let (Some(email), Some(name)) = (email, name) {
                self.fuzzy_name_matches(email, name, &mut matches)?;
            }
        }

        let decision = DuplicateDecision::from_matches(matches);
        debug!(
            confidence = decision.confidence,
            matches = decision.matches.len(),
            "candidate duplicate check"
        );
        Ok(decision)
    }

    fn fuzzy_name_matches(
        &self,
        email: &str,
        name: &str,
        matches: &mut Vec<DuplicateMatch>,
    ) -> Result<()> {
        let name = name.trim();
        let Some(first_token) = name.split_whitespace().next() else {
            return Ok(());
        };
        let domain = email.rsplit_once('@').map(|(_, d)| d).unwrap_or_default();

        let needle = name.to_lowercase();
        for candidate in self.store.candidates_for_fuzzy_match(first_token, domain)? {
            let Some(full_name) = candidate.full_name.as_deref() else {
                continue;
            };
            let score = similarity::ratio(&needle, &full_name.to_lowercase());
            if score >= FUZZY_NAME_THRESHOLD {
                matches.push(DuplicateMatch {
                    candidate_id: Some(candidate.id),
                    resume_id: None,
                    match_type: MatchType::FuzzyName,
                    confidence: score,
                    matched_field: Some(full_name.to_string()),
                });
            }
        }
        Ok(())
    }

    /// Resume duplicate check: exact content hash wins immediately;
    /// otherwise compare text openings against the candidate's existing
    /// resumes.
    pub fn check_resume(
        &self,
        content_hash: &str,
        text: &str,
        resume_id: &str,
        candidate_id: Option<&str>,
    ) -> Result<DuplicateDecision> {
        if let Some(existing) = self.store.find_resume_by_hash(content_hash)? {
            if existing != resume_id {
                return Ok(DuplicateDecision::from_matches(vec![DuplicateMatch {
                    candidate_id: None,
                    resume_id: Some(existing),
                    match_type: MatchType::FileHash,
                    confidence: FILE_HASH_CONFIDENCE,
                    matched_field: Some(content_hash.to_string()),
                }]));
            }
        }

        let mut matches: Vec<DuplicateMatch> = Vec::new();
        if let Some(candidate_id) = candidate_id {
            let opening = text_opening(text);
            for (existing_id, existing_text) in self
                .store
                .resume_texts_for_candidate(candidate_id, Some(resume_id))?
            {
                let score = similarity::ratio(&opening, &text_opening(&existing_text));
                if score >= self.content_similarity_threshold {
                    matches.push(DuplicateMatch {
                        candidate_id: Some(candidate_id.to_string()),
                        resume_id: Some(existing_id),
                        match_type: MatchType::ContentSimilarity,
                        confidence: score,
                        matched_field: None,
                    });
                }
            }
        }

        Ok(DuplicateDecision::from_matches(matches))
    }

    /// Same-email-domain candidates ranked by name similarity, for
    /// merge-suggestion listings.
    pub fn find_similar(&self, candidate_id: &str, limit: usize) -> Result<Vec<SimilarCandidate>> {
        let Some(subject) = self.store.get_candidate_row(candidate_id)? else {
            return Ok(Vec::new());
        };
        let Some(domain) = subject
            .email
            .as_deref()
            .and_then(|e| e.rsplit_once('@'))
            .map(|(_, d)| d.to_string())
        else {
            return Ok(Vec::new());
        };
        let subject_name = subject.full_name.unwrap_or_default().to_lowercase();

        let mut similar: Vec<SimilarCandidate> = Vec::new();
        for other in self.store.candidates_by_email_domain(&domain, candidate_id)? {
            let other_name = other.full_name.clone().unwrap_or_default().to_lowercase();
            let score = similarity::ratio(&subject_name, &other_name);
            if score > 0.6 {
                similar.push(SimilarCandidate {
                    candidate_id: other.id,
                    full_name: other.full_name,
                    email: other.email,
                    similarity: score,
                });
            }
        }
        similar.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        similar.truncate(limit);
        Ok(similar)
    }
}

/// First 5,000 characters, case-folded, for content comparison.
fn text_opening(text: &str) -> String {
    text.chars().take(5000).collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldMap;
    use crate::store::NewResume;

    fn store_with_jane() -> CandidateStore {
        let store = CandidateStore::open_in_memory().unwrap();
        let fields = FieldMap {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            phone: Some("(555) 123-4567".to_string()),
            ..Default::default()
        };
        store.create_candidate("c1", &fields).unwrap();
        store
    }

    #[test]
    fn email_match_is_exact_and_confident() {
        let store = store_with_jane();
        let detector = DuplicateDetector::new(&store, 0.85);
        let decision = detector
            .check_candidate(Some("jane@example.com"), None, None)
            .unwrap();
        assert!(decision.is_duplicate);
        assert_eq!(decision.confidence, 1.0);
        assert_eq!(decision.matches[0].match_type, MatchType::Email);
        assert_eq!(decision.best_candidate_id(), Some("c1"));
        assert!(decision.recommendation.contains("existing candidate"));
    }

    #[test]
    fn phone_matches_on_normalized_last_ten() {
        let store = store_with_jane();
        let detector = DuplicateDetector::new(&store, 0.85);
        let decision = detector
            .check_candidate(None, Some("+1-555-123-4567"), None)
            .unwrap();
        assert!(decision.is_duplicate);
        assert_eq!(decision.confidence, 0.95);
        assert_eq!(decision.matches[0].match_type, MatchType::Phone);
    }

    #[test]
    fn fuzzy_name_needs_email_and_no_exact_hit() {
        let store = store_with_jane();
        let detector = DuplicateDetector::new(&store, 0.85);

        // Same first token, slightly different name, different email
        let decision = detector
            .check_candidate(Some("jane.d@other.org"), None, Some("Jane Do"))
            .unwrap();
        assert_eq!(decision.matches[0].match_type, MatchType::FuzzyName);
        assert!(decision.confidence >= 0.80);

        // No email means no fuzzy pass at all
        let decision = detector.check_candidate(None, None, Some("Jane Doe")).unwrap();
        assert!(decision.matches.is_empty());
        assert!(!decision.is_duplicate);
        assert!(decision.recommendation.contains("safe to proceed"));
    }

    #[test]
    fn exact_hit_suppresses_fuzzy() {
        let store = store_with_jane();
        let detector = DuplicateDetector::new(&store, 0.85);
        let decision = detector
            .check_candidate(Some("jane@example.com"), None, Some("Jane Doe"))
            .unwrap();
        assert!(decision
            .matches
            .iter()
            .all(|m| m.match_type != MatchType::FuzzyName));
    }

    #[test]
    fn unrelated_name_is_not_fuzzy_matched() {
        let store = store_with_jane();
        let detector = DuplicateDetector::new(&store, 0.85);
        let decision = detector
            .check_candidate(Some("bob@example.com"), None, Some("Robert Jones"))
            .unwrap();
        assert!(!decision.is_duplicate);
    }

    #[test]
    fn file_hash_match_returns_immediately() {
        let store = store_with_jane();
        store
            .create_resume(&NewResume {
                id: "r1",
                original_file_name: "a.pdf",
                file_size: 10,
                mime_type: "application/pdf",
                content_hash: "deadbeef",
                stored_path: "p1",
            })
            .unwrap();

        let detector = DuplicateDetector::new(&store, 0.85);
        let decision = detector
            .check_resume("deadbeef", "whatever", "r2", None)
            .unwrap();
        assert!(decision.is_duplicate);
        assert_eq!(decision.matches[0].match_type, MatchType::FileHash);
        assert_eq!(decision.matches[0].resume_id.as_deref(), Some("r1"));

        // The same resume's own hash is not a duplicate of itself
        let own = detector.check_resume("deadbeef", "whatever", "r1", None).unwrap();
        assert!(!own.is_duplicate);
    }

    #[test]
    fn content_similarity_against_candidate_resumes() {
        let store = store_with_jane();
        store
            .create_resume(&NewResume {
                id: "r1",
                original_file_name: "a.txt",
                file_size: 10,
                mime_type: "text/plain",
                content_hash: "h1",
                stored_path: "p1",
            })
            .unwrap();
        store.try_begin_processing("r1").unwrap();
        let text = "Jane Doe, engineer. Ten years of Rust and distributed systems experience.";
        store.save_raw_text("r1", text).unwrap();
        store.mark_completed("r1", Some("c1")).unwrap();

        let detector = DuplicateDetector::new(&store, 0.85);
        let near = format!("{text} ");
        let decision = detector.check_resume("h2", &near, "r2", Some("c1")).unwrap();
        assert!(decision.is_duplicate);
        assert_eq!(decision.matches[0].match_type, MatchType::ContentSimilarity);

        let far = "Completely different document about gardening and birds.";
        let decision = detector.check_resume("h3", far, "r3", Some("c1")).unwrap();
        assert!(!decision.is_duplicate);
    }

    #[test]
    fn find_similar_ranks_same_domain_names() {
        let store = store_with_jane();
        let near = FieldMap {
            name: Some("Jane D".to_string()),
            email: Some("jd@example.com".to_string()),
            ..Default::default()
        };
        store.create_candidate("c2", &near).unwrap();
        let far = FieldMap {
            name: Some("Zed Quux".to_string()),
            email: Some("zq@example.com".to_string()),
            ..Default::default()
        };
        store.create_candidate("c3", &far).unwrap();

        let detector = DuplicateDetector::new(&store, 0.85);
        let similar = detector.find_similar("c1", 5).unwrap();
        assert_eq!(similar.len(), 1);
        assert_eq!(similar[0].candidate_id, "c2");
        assert!(similar[0].similarity > 0.6);
    }
}
