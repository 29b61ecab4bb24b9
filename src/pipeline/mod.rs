//! Background processing of uploaded resumes.
//!
//! `IngestionJob::run` drives one resume from `pending` to a terminal
//! state: extract text, parse fields, score authenticity, resolve the
//! candidate through duplicate detection, persist. The job is idempotent
//! under redelivery: the pending->processing claim is a compare-and-set,
//! terminal states are no-ops, and identity races settle on the store's
//! UNIQUE constraints. Only persistence failures are retried; extraction
//! failures and the wall-clock timeout are terminal.

pub mod queue;

use std::time::{Duration, Instant};

use tracing::{info, warn};
use uuid::Uuid;

use crate::authenticity::AuthenticityAnalyzer;
use crate::config::Config;
use crate::dedup::{DuplicateDecision, DuplicateDetector, MatchType};
use crate::error::{IngestError, Result};
use crate::extract::TextExtractor;
use crate::fields::{self, FieldMap};
use crate::files::{extension_of, FileStore};
use crate::store::{CandidateInsert, CandidateStore, ResumeRow, ResumeStatus};

/// Minimum duplicate confidence to link a resume to an existing
/// candidate instead of creating a new one.
const LINK_CONFIDENCE: f64 = 0.95;

const RETRY_BASE_DELAY: Duration = Duration::from_millis(200);

/// Wall-clock budget for one resume. Checked between steps, never
/// mid-step, so a slow extraction finishes before it can be charged.
struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    fn new(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    fn check(&self) -> Result<()> {
        if self.started.elapsed() > self.budget {
            Err(IngestError::Timeout)
        } else {
            Ok(())
        }
    }
}

pub struct IngestionJob {
    store: CandidateStore,
    files: FileStore,
    extractor: TextExtractor,
    content_similarity_threshold: f64,
    wall_clock: Duration,
    max_attempts: u32,
}

impl IngestionJob {
    /// Open a job runner with its own store connection. Each worker
    /// thread gets one of these.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = CandidateStore::open(&config.database_path())?;
        Ok(Self::new(store, config))
    }

    pub fn new(store: CandidateStore, config: &Config) -> Self {
        Self {
            store,
            files: FileStore::new(config.upload_root()),
            extractor: TextExtractor::new(config.ocr.clone(), &config.limits),
            content_similarity_threshold: config.deduplication.content_similarity_threshold,
            wall_clock: Duration::from_secs(config.jobs.task_wall_clock_seconds),
            max_attempts: config.jobs.task_max_attempts.max(1),
        }
    }

    pub fn store(&self) -> &CandidateStore {
        &self.store
    }

    /// Process one resume to a terminal state.
    ///
    /// Safe to call more than once for the same id: a resume that
    /// another delivery claimed, or that already settled, is skipped and
    /// its current status returned.
    pub fn run(&self, resume_id: &str) -> Result<ResumeStatus> {
        if self.store.get_resume(resume_id)?.is_none() {
            return Err(IngestError::NotFound(resume_id.to_string()));
        }

        if !self.store.try_begin_processing(resume_id)? {
            let current = self
                .store
                .get_resume(resume_id)?
                .map(|r| r.status)
                .unwrap_or(ResumeStatus::Failed);
            info!(
                resume_id,
                status = current.as_str(),
                "resume already claimed or settled, skipping"
            );
            return Ok(current);
        }

        let deadline = Deadline::new(self.wall_clock);
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let outcome = deadline
                .check()
                .and_then(|()| self.attempt(resume_id, &deadline));
            match outcome {
                Ok(status) => {
                    info!(resume_id, status = status.as_str(), attempt, "resume settled");
                    return Ok(status);
                }
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    warn!(resume_id, attempt, error = %e, "retryable step failed, backing off");
                    std::thread::sleep(RETRY_BASE_DELAY * 2u32.pow(attempt - 1));
                }
                Err(e @ IngestError::NotFound(_)) => return Err(e),
                Err(e) => {
                    warn!(resume_id, error = %e, "resume failed");
                    self.store.mark_failed(resume_id, &e.to_string())?;
                    return Ok(ResumeStatus::Failed);
                }
            }
        }
    }

    /// One pass over the steps. Reloads the row so a retry picks up
    /// whatever the failed attempt already saved.
    fn attempt(&self, resume_id: &str, deadline: &Deadline) -> Result<ResumeStatus> {
        let resume = self
            .store
            .get_resume(resume_id)?
            .ok_or_else(|| IngestError::NotFound(resume_id.to_string()))?;

        let text = self.ensure_text(&resume)?;
        deadline.check()?;

        let fields = self.ensure_fields(&resume, &text)?;
        deadline.check()?;

        let report = AuthenticityAnalyzer::analyze(&text, &fields);
        let report_json =
            serde_json::to_string(&report).map_err(|e| IngestError::Persistence(e.to_string()))?;
        self.store
            .save_authenticity(&resume.id, report.overall_score, &report_json)?;
        deadline.check()?;

        let detector = DuplicateDetector::new(&self.store, self.content_similarity_threshold);
        let decision = match detector.check_candidate(
            fields.email.as_deref(),
            fields.phone.as_deref(),
            fields.name.as_deref(),
        ) {
            Ok(decision) => decision,
            Err(IngestError::DuplicateDecision(msg)) => {
                warn!(resume_id, error = %msg, "duplicate check failed, treating as no match");
                DuplicateDecision::no_match()
            }
            Err(e) => return Err(e),
        };
        self.record_matches(&resume.id, &decision)?;
        deadline.check()?;

        self.resolve(&resume, &text, &fields, &decision, &detector)
    }

    /// Settle the resume: link, create, or complete without a candidate.
    fn resolve(
        &self,
        resume: &ResumeRow,
        text: &str,
        fields: &FieldMap,
        decision: &DuplicateDecision,
        detector: &DuplicateDetector,
    ) -> Result<ResumeStatus> {
        if decision.confidence >= LINK_CONFIDENCE {
            if let Some(candidate_id) = decision.best_candidate_id().map(str::to_string) {
                return self.link_to_existing(resume, text, &candidate_id, detector);
            }
        }

        if fields.email.is_some() {
            let insert = self
                .store
                .create_candidate(&Uuid::new_v4().to_string(), fields)?;
            if let CandidateInsert::ExistingEmail(winner) = &insert {
                // Lost the insert race to another worker; link to the winner
                self.store.record_duplicate_match(
                    &resume.id,
                    MatchType::Email.as_str(),
                    1.0,
                    Some(winner),
                    None,
                )?;
            }
            self.store.mark_completed(&resume.id, Some(insert.id()))?;
            return Ok(ResumeStatus::Completed);
        }

        // No email means no identity to key on: keep the resume, no candidate
        self.store.mark_completed(&resume.id, None)?;
        Ok(ResumeStatus::Completed)
    }

    /// A confidently matched candidate exists. If this resume is also a
    /// near-copy of one of theirs, it settles as `duplicate`; otherwise
    /// it completes as additional material for the same person.
    fn link_to_existing(
        &self,
        resume: &ResumeRow,
        text: &str,
        candidate_id: &str,
        detector: &DuplicateDetector,
    ) -> Result<ResumeStatus> {
        let resume_decision =
            detector.check_resume(&resume.content_hash, text, &resume.id, Some(candidate_id))?;
        self.record_matches(&resume.id, &resume_decision)?;

        if resume_decision.is_duplicate {
            self.store.mark_duplicate(&resume.id, Some(candidate_id))?;
            return Ok(ResumeStatus::Duplicate);
        }
        self.store.mark_completed(&resume.id, Some(candidate_id))?;
        Ok(ResumeStatus::Completed)
    }

    fn record_matches(&self, resume_id: &str, decision: &DuplicateDecision) -> Result<()> {
        for m in &decision.matches {
            self.store.record_duplicate_match(
                resume_id,
                m.match_type.as_str(),
                m.confidence,
                m.candidate_id.as_deref(),
                m.resume_id.as_deref(),
            )?;
        }
        Ok(())
    }

    /// Text for this resume: reuse what a previous attempt saved, else
    /// read the stored file and extract. Saved text under 50 characters
    /// is treated as absent and re-extracted.
    fn ensure_text(&self, resume: &ResumeRow) -> Result<String> {
        if let Some(text) = resume.raw_text.as_deref() {
            if text.trim().chars().count() >= 50 {
                return Ok(text.to_string());
            }
        }
        let content = self.files.read(&resume.stored_path)?;
        let text = self
            .extractor
            .extract(&content, &extension_of(&resume.stored_path))?;
        self.store.save_raw_text(&resume.id, &text)?;
        Ok(text)
    }

    fn ensure_fields(&self, resume: &ResumeRow, text: &str) -> Result<FieldMap> {
        if let Some(json) = resume.extracted_data.as_deref() {
            if let Ok(saved) = serde_json::from_str::<FieldMap>(json) {
                return Ok(saved);
            }
        }
        let fields = fields::extract_all(text);
        let json =
            serde_json::to_string(&fields).map_err(|e| IngestError::Persistence(e.to_string()))?;
        self.store.save_extracted_data(&resume.id, &json)?;
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NewResume;
    use crate::files::content_hash;

    const JANE_TXT: &[u8] = b"Jane Doe\n\
jane@example.com\n\
(555) 123-4567\n\
SUMMARY\n\
Backend engineer with ten years of experience building storage systems.\n\
SKILLS\n\
Rust, Python, PostgreSQL\n\
EDUCATION\n\
B.S. Computer Science, MIT, 2010-2014\n\
EXPERIENCE\n\
Engineer, Acme Inc, Jan 2015 - Present\n\
- Built the ingest pipeline.";

    const JANE_ALT_TXT: &[u8] = b"Jane Doe\n\
jane@example.com\n\
SUMMARY\n\
Entirely reworked application focused on infrastructure and reliability\n\
engineering, with emphasis on observability tooling and on-call automation\n\
rather than storage internals.\n\
SKILLS\n\
Go, Terraform, Kubernetes\n\
EXPERIENCE\n\
Site Reliability Engineer, Globex, Mar 2020 - Present\n\
- Ran the on-call rotation and cut paging volume in half.";

    fn setup() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.database.path = dir.path().join("test.db").to_string_lossy().into_owned();
        config.storage.upload_root = dir.path().join("uploads").to_string_lossy().into_owned();
        config.jobs.task_max_attempts = 1;
        (dir, config)
    }

    fn upload(job: &IngestionJob, content: &[u8], resume_id: &str) {
        let stored_path = job
            .files
            .save(content, "test-owner", resume_id, "txt")
            .unwrap();
        job.store
            .create_resume(&NewResume {
                id: resume_id,
                original_file_name: "resume.txt",
                file_size: content.len() as u64,
                mime_type: "text/plain",
                content_hash: &content_hash(content),
                stored_path: &stored_path,
            })
            .unwrap();
    }

    #[test]
    fn txt_resume_completes_and_creates_candidate() {
        let (_dir, config) = setup();
        let job = IngestionJob::from_config(&config).unwrap();
        upload(&job, JANE_TXT, "r1");

        assert_eq!(job.run("r1").unwrap(), ResumeStatus::Completed);

        let row = job.store.get_resume("r1").unwrap().unwrap();
        assert_eq!(row.status, ResumeStatus::Completed);
        assert!(row.raw_text.is_some());
        assert!(row.authenticity_score.unwrap() > 0.0);

        let candidate_id = row.candidate_id.unwrap();
        let record = job.store.get_candidate(&candidate_id).unwrap().unwrap();
        assert_eq!(record.candidate.email.as_deref(), Some("jane@example.com"));
        assert_eq!(record.candidate.phone.as_deref(), Some("5551234567"));
        assert!(!record.skills.is_empty());
        assert_eq!(record.education.len(), 1);
    }

    #[test]
    fn same_email_links_to_existing_candidate() {
        let (_dir, config) = setup();
        let job = IngestionJob::from_config(&config).unwrap();
        upload(&job, JANE_TXT, "r1");
        upload(&job, JANE_ALT_TXT, "r2");

        job.run("r1").unwrap();
        // Different enough content to complete rather than settle as a
        // near-copy, but the email matches the existing candidate
        assert_eq!(job.run("r2").unwrap(), ResumeStatus::Completed);

        let first = job.store.get_resume("r1").unwrap().unwrap();
        let second = job.store.get_resume("r2").unwrap().unwrap();
        assert_eq!(first.candidate_id, second.candidate_id);
        assert_eq!(job.store.stats().unwrap().candidates, 1);
    }

    #[test]
    fn near_copy_for_same_candidate_is_duplicate() {
        let (_dir, config) = setup();
        let job = IngestionJob::from_config(&config).unwrap();
        upload(&job, JANE_TXT, "r1");

        // Same text with a trailing tweak: different hash, same opening
        let mut tweaked = JANE_TXT.to_vec();
        tweaked.extend_from_slice(b"\nReferences available on request.");
        upload(&job, &tweaked, "r2");

        job.run("r1").unwrap();
        assert_eq!(job.run("r2").unwrap(), ResumeStatus::Duplicate);

        let second = job.store.get_resume("r2").unwrap().unwrap();
        assert_eq!(second.status, ResumeStatus::Duplicate);
        assert!(second.candidate_id.is_some());
        assert_eq!(job.store.stats().unwrap().candidates, 1);
    }

    #[test]
    fn unreadable_document_fails_terminally() {
        let (_dir, config) = setup();
        let job = IngestionJob::from_config(&config).unwrap();
        upload(&job, b"too short", "r1");

        assert_eq!(job.run("r1").unwrap(), ResumeStatus::Failed);
        let row = job.store.get_resume("r1").unwrap().unwrap();
        assert!(row.processing_error.unwrap().contains("extraction"));
        assert!(row.candidate_id.is_none());
        assert_eq!(job.store.stats().unwrap().candidates, 0);
    }

    #[test]
    fn stale_short_raw_text_is_reextracted() {
        let (_dir, config) = setup();
        let job = IngestionJob::from_config(&config).unwrap();
        upload(&job, JANE_TXT, "r1");
        // A truncated save from an interrupted attempt must not be
        // trusted as the document text
        job.store.save_raw_text("r1", "partial save").unwrap();

        assert_eq!(job.run("r1").unwrap(), ResumeStatus::Completed);
        let row = job.store.get_resume("r1").unwrap().unwrap();
        assert!(row.raw_text.unwrap().contains("jane@example.com"));
    }

    #[test]
    fn redelivery_of_settled_resume_is_noop() {
        let (_dir, config) = setup();
        let job = IngestionJob::from_config(&config).unwrap();
        upload(&job, JANE_TXT, "r1");

        assert_eq!(job.run("r1").unwrap(), ResumeStatus::Completed);
        assert_eq!(job.run("r1").unwrap(), ResumeStatus::Completed);
        assert_eq!(job.store.stats().unwrap().candidates, 1);
    }

    #[test]
    fn unknown_resume_is_not_found() {
        let (_dir, config) = setup();
        let job = IngestionJob::from_config(&config).unwrap();
        assert!(matches!(
            job.run("missing").unwrap_err(),
            IngestError::NotFound(_)
        ));
    }

    #[test]
    fn missing_stored_file_fails_after_retry_budget() {
        let (_dir, config) = setup();
        let job = IngestionJob::from_config(&config).unwrap();
        job.store
            .create_resume(&NewResume {
                id: "r1",
                original_file_name: "ghost.txt",
                file_size: 10,
                mime_type: "text/plain",
                content_hash: "h1",
                stored_path: "2026/08/none/ghost.txt",
            })
            .unwrap();

        assert_eq!(job.run("r1").unwrap(), ResumeStatus::Failed);
        let row = job.store.get_resume("r1").unwrap().unwrap();
        assert!(row.processing_error.unwrap().contains("not found"));
    }

    #[test]
    fn exhausted_wall_clock_fails_with_timeout() {
        let (_dir, mut config) = setup();
        config.jobs.task_wall_clock_seconds = 0;
        let job = IngestionJob::from_config(&config).unwrap();
        upload(&job, JANE_TXT, "r1");

        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(job.run("r1").unwrap(), ResumeStatus::Failed);
        let row = job.store.get_resume("r1").unwrap().unwrap();
        assert_eq!(row.processing_error.as_deref(), Some("timeout"));
    }
}
