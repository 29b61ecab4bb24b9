//! Upload-facing operations: ingest, status, candidate lookup, retry.
//!
//! `Dossier` is the synchronous boundary in front of the store and the
//! job queue. Validation failures persist nothing; an upload whose
//! content hash already exists is answered `duplicate` immediately,
//! without storing a second copy or queueing a job.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::dedup::{DuplicateDecision, DuplicateDetector};
use crate::error::{IngestError, Result};
use crate::files::{content_hash, mime_type, sanitize_filename, FileStore, FileValidator};
use crate::pipeline::queue::JobQueue;
use crate::store::{CandidateRecord, CandidateStore, NewResume, SearchHit, StoreStats};

#[derive(Debug, Serialize)]
pub struct IngestReceipt {
    pub resume_id: String,
    /// `pending` for a queued upload, `duplicate` for an exact re-upload.
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_resume_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub resume_id: String,
    pub status: String,
    pub original_file_name: String,
    pub candidate_id: Option<String>,
    pub authenticity_score: Option<f64>,
    pub processing_error: Option<String>,
    pub uploaded_at: Option<String>,
    pub processed_at: Option<String>,
}

pub struct Dossier {
    store: CandidateStore,
    files: FileStore,
    validator: FileValidator,
    content_similarity_threshold: f64,
}

impl Dossier {
    pub fn open(config: &Config) -> Result<Self> {
        Ok(Self {
            store: CandidateStore::open(&config.database_path())?,
            files: FileStore::new(config.upload_root()),
            validator: FileValidator::new(config.limits.clone()),
            content_similarity_threshold: config.deduplication.content_similarity_threshold,
        })
    }

    pub fn store(&self) -> &CandidateStore {
        &self.store
    }

    /// Accept an upload and queue it for processing.
    pub fn ingest(
        &self,
        content: &[u8],
        file_name: &str,
        owner_id: &str,
        queue: &dyn JobQueue,
    ) -> Result<IngestReceipt> {
        let ext = self.validator.validate(content, file_name)?;
        let hash = content_hash(content);

        if let Some(existing) = self.store.find_resume_by_hash(&hash)? {
            info!(resume_id = existing, "exact duplicate upload, nothing stored");
            return Ok(duplicate_receipt(existing));
        }

        let resume_id = Uuid::new_v4().to_string();
        let stored_path = self.files.save(content, owner_id, &resume_id, &ext)?;
        let created = self.store.create_resume(&NewResume {
            id: &resume_id,
            original_file_name: &sanitize_filename(file_name),
            file_size: content.len() as u64,
            mime_type: mime_type(&ext),
            content_hash: &hash,
            stored_path: &stored_path,
        });

        if let Err(e) = created {
            // Lost a same-content race after the hash probe: drop our
            // copy and answer with the row that won
            self.files.delete(&stored_path);
            if let Some(existing) = self.store.find_resume_by_hash(&hash)? {
                return Ok(duplicate_receipt(existing));
            }
            return Err(e);
        }

        queue.enqueue(&resume_id)?;
        info!(resume_id, file_name, "resume accepted");
        Ok(IngestReceipt {
            resume_id,
            status: "pending",
            existing_resume_id: None,
        })
    }

    pub fn status(&self, resume_id: &str) -> Result<StatusReport> {
        let row = self
            .store
            .get_resume(resume_id)?
            .ok_or_else(|| IngestError::NotFound(resume_id.to_string()))?;
        Ok(StatusReport {
            resume_id: row.id,
            status: row.status.as_str().to_string(),
            original_file_name: row.original_file_name,
            candidate_id: row.candidate_id,
            authenticity_score: row.authenticity_score,
            processing_error: row.processing_error,
            uploaded_at: row.uploaded_at,
            processed_at: row.processed_at,
        })
    }

    pub fn get_candidate(&self, candidate_id: &str) -> Result<Option<CandidateRecord>> {
        self.store.get_candidate(candidate_id)
    }

    /// Check contact details against existing candidates without
    /// uploading anything.
    pub fn find_candidate(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
        name: Option<&str>,
    ) -> Result<DuplicateDecision> {
        DuplicateDetector::new(&self.store, self.content_similarity_threshold)
            .check_candidate(email, phone, name)
    }

    /// Re-queue a failed resume. Returns false when the resume exists
    /// but is not in the `failed` state.
    pub fn retry(&self, resume_id: &str, queue: &dyn JobQueue) -> Result<bool> {
        if self.store.get_resume(resume_id)?.is_none() {
            return Err(IngestError::NotFound(resume_id.to_string()));
        }
        if !self.store.reset_for_retry(resume_id)? {
            return Ok(false);
        }
        queue.enqueue(resume_id)?;
        info!(resume_id, "resume re-queued");
        Ok(true)
    }

    pub fn search(&self, query: &str, page: u32, per_page: u32) -> Result<(Vec<SearchHit>, i64)> {
        self.store.search(query, page, per_page)
    }

    pub fn stats(&self) -> Result<StoreStats> {
        self.store.stats()
    }
}

fn duplicate_receipt(existing: String) -> IngestReceipt {
    IngestReceipt {
        resume_id: existing.clone(),
        status: "duplicate",
        existing_resume_id: Some(existing),
    }
}
