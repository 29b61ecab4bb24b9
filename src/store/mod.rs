//! Candidate and resume storage over SQLite.
//!
//! One `CandidateStore` wraps one connection; workers each open their
//! own. Status transitions use compare-and-set updates, and identity
//! races between workers settle on the UNIQUE constraints (candidate
//! email, resume content hash) rather than on locks.

mod schema;

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::fields::{contact, DegreeLevel, FieldMap, Proficiency};

pub use schema::SCHEMA;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Duplicate,
}

impl ResumeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResumeStatus::Pending => "pending",
            ResumeStatus::Processing => "processing",
            ResumeStatus::Completed => "completed",
            ResumeStatus::Failed => "failed",
            ResumeStatus::Duplicate => "duplicate",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ResumeStatus::Pending),
            "processing" => Some(ResumeStatus::Processing),
            "completed" => Some(ResumeStatus::Completed),
            "failed" => Some(ResumeStatus::Failed),
            "duplicate" => Some(ResumeStatus::Duplicate),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ResumeStatus::Completed | ResumeStatus::Failed | ResumeStatus::Duplicate
        )
    }
}

/// Metadata captured at upload time, before processing starts.
pub struct NewResume<'a> {
    pub id: &'a str,
    pub original_file_name: &'a str,
    pub file_size: u64,
    pub mime_type: &'a str,
    pub content_hash: &'a str,
    pub stored_path: &'a str,
}

#[derive(Debug, Clone)]
pub struct ResumeRow {
    pub id: String,
    pub candidate_id: Option<String>,
    pub original_file_name: String,
    pub file_size: i64,
    pub mime_type: Option<String>,
    pub content_hash: String,
    pub stored_path: String,
    pub status: ResumeStatus,
    pub raw_text: Option<String>,
    pub extracted_data: Option<String>,
    pub authenticity_score: Option<f64>,
    pub processing_error: Option<String>,
    pub uploaded_at: Option<String>,
    pub processed_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CandidateRow {
    pub id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub created_at: Option<String>,
}

/// Candidate plus all child lists, for read-only projection.
#[derive(Debug, Clone)]
pub struct CandidateRecord {
    pub candidate: CandidateRow,
    pub skills: Vec<String>,
    pub education: Vec<crate::fields::EducationEntry>,
    pub work_experience: Vec<crate::fields::WorkExperienceEntry>,
    pub certifications: Vec<crate::fields::CertificationEntry>,
    pub projects: Vec<crate::fields::ProjectEntry>,
    pub languages: Vec<crate::fields::LanguageEntry>,
    pub achievements: Vec<String>,
}

/// Outcome of a candidate insert: either a fresh row, or the id of the
/// existing candidate that won the email race.
#[derive(Debug, PartialEq, Eq)]
pub enum CandidateInsert {
    Created(String),
    ExistingEmail(String),
}

impl CandidateInsert {
    pub fn id(&self) -> &str {
        match self {
            CandidateInsert::Created(id) | CandidateInsert::ExistingEmail(id) => id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub education_count: i64,
    pub skill_count: i64,
    pub total_experience_months: i64,
}

#[derive(Debug, Default)]
pub struct StoreStats {
    pub resumes_pending: i64,
    pub resumes_processing: i64,
    pub resumes_completed: i64,
    pub resumes_failed: i64,
    pub resumes_duplicate: i64,
    pub candidates: i64,
    pub duplicate_matches: i64,
}

pub struct CandidateStore {
    conn: Connection,
}

impl CandidateStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    // ============================================
    // RESUMES
    // ============================================

    pub fn create_resume(&self, new: &NewResume) -> Result<()> {
        self.conn.execute(
            "INSERT INTO resumes (id, original_file_name, file_size, mime_type, content_hash, stored_path, status, uploaded_at)
             VALUES (?, ?, ?, ?, ?, ?, 'pending', datetime('now'))",
            params![
                new.id,
                new.original_file_name,
                new.file_size as i64,
                new.mime_type,
                new.content_hash,
                new.stored_path,
            ],
        )?;
        Ok(())
    }

    pub fn find_resume_by_hash(&self, content_hash: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT id FROM resumes WHERE content_hash = ?",
                params![content_hash],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn get_resume(&self, id: &str) -> Result<Option<ResumeRow>> {
        self.conn
            .query_row(
                "SELECT id, candidate_id, original_file_name, file_size, mime_type,
                        content_hash, stored_path, status, raw_text, extracted_data,
                        authenticity_score, processing_error, uploaded_at, processed_at
                 FROM resumes WHERE id = ?",
                params![id],
                |row| {
                    let status: String = row.get(7)?;
                    Ok(ResumeRow {
                        id: row.get(0)?,
                        candidate_id: row.get(1)?,
                        original_file_name: row.get(2)?,
                        file_size: row.get(3)?,
                        mime_type: row.get(4)?,
                        content_hash: row.get(5)?,
                        stored_path: row.get(6)?,
                        status: ResumeStatus::parse(&status).unwrap_or(ResumeStatus::Failed),
                        raw_text: row.get(8)?,
                        extracted_data: row.get(9)?,
                        authenticity_score: row.get(10)?,
                        processing_error: row.get(11)?,
                        uploaded_at: row.get(12)?,
                        processed_at: row.get(13)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Compare-and-set `pending -> processing`. Returns false when some
    /// other worker already claimed the row or it reached a terminal
    /// state, which makes double delivery a no-op.
    pub fn try_begin_processing(&self, id: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE resumes SET status = 'processing', processing_started_at = datetime('now')
             WHERE id = ? AND status = 'pending'",
            params![id],
        )?;
        Ok(changed == 1)
    }

    pub fn save_raw_text(&self, id: &str, text: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE resumes SET raw_text = ? WHERE id = ?",
            params![text, id],
        )?;
        Ok(())
    }

    pub fn save_extracted_data(&self, id: &str, json: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE resumes SET extracted_data = ? WHERE id = ?",
            params![json, id],
        )?;
        Ok(())
    }

    pub fn save_authenticity(&self, id: &str, score: f64, details_json: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE resumes SET authenticity_score = ?, authenticity_details = ? WHERE id = ?",
            params![score, details_json, id],
        )?;
        Ok(())
    }

    pub fn mark_completed(&self, id: &str, candidate_id: Option<&str>) -> Result<()> {
        self.conn.execute(
            "UPDATE resumes SET status = 'completed', candidate_id = ?, processing_error = NULL,
                    processed_at = datetime('now')
             WHERE id = ?",
            params![candidate_id, id],
        )?;
        Ok(())
    }

    pub fn mark_failed(&self, id: &str, error: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE resumes SET status = 'failed', processing_error = ?, processed_at = datetime('now')
             WHERE id = ?",
            params![error, id],
        )?;
        Ok(())
    }

    pub fn mark_duplicate(&self, id: &str, candidate_id: Option<&str>) -> Result<()> {
        self.conn.execute(
            "UPDATE resumes SET status = 'duplicate', candidate_id = ?, processed_at = datetime('now')
             WHERE id = ?",
            params![candidate_id, id],
        )?;
        Ok(())
    }

    /// Reset a failed resume to pending for re-ingestion. Only `failed`
    /// rows are eligible; anything else returns false.
    pub fn reset_for_retry(&self, id: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE resumes SET status = 'pending', processing_error = NULL,
                    processing_started_at = NULL, processed_at = NULL
             WHERE id = ? AND status = 'failed'",
            params![id],
        )?;
        Ok(changed == 1)
    }

    /// Ids of resumes waiting for a worker, oldest first.
    pub fn pending_resumes(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM resumes WHERE status = 'pending' ORDER BY uploaded_at, id")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Raw texts of the resumes already linked to a candidate, for
    /// content-similarity checks.
    pub fn resume_texts_for_candidate(
        &self,
        candidate_id: &str,
        exclude_resume_id: Option<&str>,
    ) -> Result<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, raw_text FROM resumes
             WHERE candidate_id = ? AND raw_text IS NOT NULL AND id != COALESCE(?, '')",
        )?;
        let rows = stmt.query_map(params![candidate_id, exclude_resume_id], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    // ============================================
    // CANDIDATES
    // ============================================

    pub fn find_candidate_by_email(&self, email: &str) -> Result<Option<CandidateRow>> {
        self.candidate_query("WHERE email = ? COLLATE NOCASE", params![email])
            .map(|mut rows| rows.pop())
    }

    pub fn find_candidates_by_phone(&self, normalized_phone: &str) -> Result<Vec<CandidateRow>> {
        self.candidate_query("WHERE phone = ? AND phone != ''", params![normalized_phone])
    }

    /// Prefilter for fuzzy name matching: candidates whose name shares
    /// the first token or whose email shares the domain.
    pub fn candidates_for_fuzzy_match(
        &self,
        first_name_token: &str,
        email_domain: &str,
    ) -> Result<Vec<CandidateRow>> {
        self.candidate_query(
            "WHERE full_name LIKE ? OR email LIKE ?",
            params![
                format!("{first_name_token}%"),
                format!("%@{email_domain}")
            ],
        )
    }

    pub fn candidates_by_email_domain(
        &self,
        email_domain: &str,
        exclude_id: &str,
    ) -> Result<Vec<CandidateRow>> {
        self.candidate_query(
            "WHERE email LIKE ? AND id != ?",
            params![format!("%@{email_domain}"), exclude_id],
        )
    }

    pub fn get_candidate_row(&self, id: &str) -> Result<Option<CandidateRow>> {
        self.candidate_query("WHERE id = ?", params![id])
            .map(|mut rows| rows.pop())
    }

    fn candidate_query(
        &self,
        where_clause: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<CandidateRow>> {
        let sql = format!(
            "SELECT id, full_name, email, phone, linkedin_url, github_url, portfolio_url,
                    location, summary, created_at
             FROM candidates {where_clause}"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok(CandidateRow {
                id: row.get(0)?,
                full_name: row.get(1)?,
                email: row.get(2)?,
                phone: row.get(3)?,
                linkedin_url: row.get(4)?,
                github_url: row.get(5)?,
                portfolio_url: row.get(6)?,
                location: row.get(7)?,
                summary: row.get(8)?,
                created_at: row.get(9)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Create a candidate and all child rows in one transaction.
    ///
    /// When another worker inserted the same email first, the UNIQUE
    /// constraint fires; the transaction rolls back and the existing
    /// candidate id is returned instead.
    pub fn create_candidate(&self, id: &str, fields: &FieldMap) -> Result<CandidateInsert> {
        let normalized_phone = fields.phone.as_deref().map(contact::normalize_phone);

        let tx = self.conn.unchecked_transaction()?;

        let inserted = tx.execute(
            "INSERT INTO candidates
                 (id, full_name, email, phone, linkedin_url, github_url, portfolio_url,
                  location, summary, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, datetime('now'), datetime('now'))",
            params![
                id,
                fields.name,
                fields.email,
                normalized_phone,
                fields.linkedin_url,
                fields.github_url,
                fields.portfolio_url,
                fields.location,
                fields.summary,
            ],
        );

        if let Err(e) = inserted {
            drop(tx);
            if is_constraint_violation(&e) {
                if let Some(email) = fields.email.as_deref() {
                    if let Some(existing) = self.find_candidate_by_email(email)? {
                        debug!(candidate_id = existing.id, "email race lost, linking to winner");
                        return Ok(CandidateInsert::ExistingEmail(existing.id));
                    }
                }
            }
            return Err(e.into());
        }

        for entry in &fields.education {
            tx.execute(
                "INSERT INTO education
                     (candidate_id, degree_level, degree, field_of_study, institution,
                      start_year, end_year, gpa)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    id,
                    entry.degree_level.map(|l| l.as_str()),
                    entry.degree,
                    entry.field_of_study,
                    entry.institution,
                    entry.start_year,
                    entry.end_year,
                    entry.gpa,
                ],
            )?;
        }

        for entry in &fields.work_experience {
            tx.execute(
                "INSERT INTO work_experience
                     (candidate_id, company, title, location, start_date, end_date,
                      is_current, duration_months, responsibilities, description)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    id,
                    entry.company,
                    entry.title,
                    entry.location,
                    entry.start_date,
                    entry.end_date,
                    entry.is_current,
                    entry.duration_months,
                    serde_json::to_string(&entry.responsibilities)
                        .map_err(|e| IngestError::Persistence(e.to_string()))?,
                    entry.description,
                ],
            )?;
        }

        for entry in &fields.certifications {
            tx.execute(
                "INSERT INTO certifications
                     (candidate_id, name, issuer, issue_date, expiry_date, credential_id)
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    id,
                    entry.name,
                    entry.issuer,
                    entry.issue_date,
                    entry.expiry_date,
                    entry.credential_id,
                ],
            )?;
        }

        for entry in &fields.projects {
            tx.execute(
                "INSERT INTO projects (candidate_id, name, description, technologies)
                 VALUES (?, ?, ?, ?)",
                params![
                    id,
                    entry.name,
                    entry.description,
                    serde_json::to_string(&entry.technologies)
                        .map_err(|e| IngestError::Persistence(e.to_string()))?,
                ],
            )?;
        }

        for entry in &fields.languages {
            tx.execute(
                "INSERT INTO languages (candidate_id, name, proficiency) VALUES (?, ?, ?)",
                params![id, entry.name, proficiency_str(entry.proficiency)],
            )?;
        }

        for achievement in &fields.achievements {
            tx.execute(
                "INSERT INTO achievements (candidate_id, description) VALUES (?, ?)",
                params![id, achievement],
            )?;
        }

        for skill in &fields.skills {
            let name = skill.to_lowercase();
            tx.execute("INSERT OR IGNORE INTO skills (name) VALUES (?)", params![name])?;
            let skill_id: i64 = tx.query_row(
                "SELECT id FROM skills WHERE name = ?",
                params![name],
                |row| row.get(0),
            )?;
            tx.execute(
                "INSERT OR IGNORE INTO candidate_skills (candidate_id, skill_id) VALUES (?, ?)",
                params![id, skill_id],
            )?;
        }

        tx.commit()?;
        Ok(CandidateInsert::Created(id.to_string()))
    }

    pub fn get_candidate(&self, id: &str) -> Result<Option<CandidateRecord>> {
        let Some(candidate) = self.get_candidate_row(id)? else {
            return Ok(None);
        };

        let skills = {
            let mut stmt = self.conn.prepare(
                "SELECT s.name FROM skills s
                 JOIN candidate_skills cs ON cs.skill_id = s.id
                 WHERE cs.candidate_id = ? ORDER BY s.name",
            )?;
            let rows = stmt.query_map(params![id], |row| row.get(0))?;
            rows.collect::<rusqlite::Result<Vec<String>>>()?
        };

        let education = {
            let mut stmt = self.conn.prepare(
                "SELECT degree_level, degree, field_of_study, institution, start_year, end_year, gpa
                 FROM education WHERE candidate_id = ? ORDER BY end_year DESC",
            )?;
            let rows = stmt.query_map(params![id], |row| {
                let level: Option<String> = row.get(0)?;
                Ok(crate::fields::EducationEntry {
                    degree_level: level.as_deref().map(DegreeLevel::parse),
                    degree: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    field_of_study: row.get(2)?,
                    institution: row.get(3)?,
                    start_year: row.get(4)?,
                    end_year: row.get(5)?,
                    gpa: row.get(6)?,
                })
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        let work_experience = {
            let mut stmt = self.conn.prepare(
                "SELECT company, title, location, start_date, end_date, is_current,
                        duration_months, responsibilities, description
                 FROM work_experience WHERE candidate_id = ? ORDER BY id",
            )?;
            let rows = stmt.query_map(params![id], |row| {
                let responsibilities: Option<String> = row.get(7)?;
                Ok(crate::fields::WorkExperienceEntry {
                    company: row.get(0)?,
                    title: row.get(1)?,
                    location: row.get(2)?,
                    start_date: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    end_date: row.get(4)?,
                    is_current: row.get(5)?,
                    duration_months: row.get(6)?,
                    responsibilities: responsibilities
                        .and_then(|j| serde_json::from_str(&j).ok())
                        .unwrap_or_default(),
                    description: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
                })
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        let certifications = {
            let mut stmt = self.conn.prepare(
                "SELECT name, issuer, issue_date, expiry_date, credential_id
                 FROM certifications WHERE candidate_id = ? ORDER BY id",
            )?;
            let rows = stmt.query_map(params![id], |row| {
                Ok(crate::fields::CertificationEntry {
                    name: row.get(0)?,
                    issuer: row.get(1)?,
                    issue_date: row.get(2)?,
                    expiry_date: row.get(3)?,
                    credential_id: row.get(4)?,
                })
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        let projects = {
            let mut stmt = self.conn.prepare(
                "SELECT name, description, technologies FROM projects
                 WHERE candidate_id = ? ORDER BY id",
            )?;
            let rows = stmt.query_map(params![id], |row| {
                let technologies: Option<String> = row.get(2)?;
                Ok(crate::fields::ProjectEntry {
                    name: row.get(0)?,
                    description: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    technologies: technologies
                        .and_then(|j| serde_json::from_str(&j).ok())
                        .unwrap_or_default(),
                })
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        let languages = {
            let mut stmt = self.conn.prepare(
                "SELECT name, proficiency FROM languages WHERE candidate_id = ? ORDER BY id",
            )?;
            let rows = stmt.query_map(params![id], |row| {
                let proficiency: String = row.get(1)?;
                Ok(crate::fields::LanguageEntry {
                    name: row.get(0)?,
                    proficiency: parse_proficiency(&proficiency),
                })
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        let achievements = {
            let mut stmt = self.conn.prepare(
                "SELECT description FROM achievements WHERE candidate_id = ? ORDER BY id",
            )?;
            let rows = stmt.query_map(params![id], |row| row.get(0))?;
            rows.collect::<rusqlite::Result<Vec<String>>>()?
        };

        Ok(Some(CandidateRecord {
            candidate,
            skills,
            education,
            work_experience,
            certifications,
            projects,
            languages,
            achievements,
        }))
    }

    // ============================================
    // SEARCH & STATS
    // ============================================

    pub fn search(&self, query: &str, page: u32, per_page: u32) -> Result<(Vec<SearchHit>, i64)> {
        let like = format!("%{query}%");
        let per_page = per_page.clamp(1, 100);
        let offset = page.saturating_sub(1) * per_page;

        let total: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM candidates
             WHERE full_name LIKE ?1 OR email LIKE ?1 OR phone LIKE ?1",
            params![like],
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.full_name, c.email, c.phone,
                    (SELECT COUNT(*) FROM education e WHERE e.candidate_id = c.id),
                    (SELECT COUNT(*) FROM candidate_skills cs WHERE cs.candidate_id = c.id),
                    (SELECT COALESCE(SUM(w.duration_months), 0) FROM work_experience w
                      WHERE w.candidate_id = c.id)
             FROM candidates c
             WHERE c.full_name LIKE ?1 OR c.email LIKE ?1 OR c.phone LIKE ?1
             ORDER BY c.created_at DESC
             LIMIT ?2 OFFSET ?3",
        )?;
        let rows = stmt.query_map(params![like, per_page, offset], |row| {
            Ok(SearchHit {
                id: row.get(0)?,
                full_name: row.get(1)?,
                email: row.get(2)?,
                phone: row.get(3)?,
                education_count: row.get(4)?,
                skill_count: row.get(5)?,
                total_experience_months: row.get(6)?,
            })
        })?;
        let hits = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((hits, total))
    }

    pub fn record_duplicate_match(
        &self,
        resume_id: &str,
        match_type: &str,
        confidence: f64,
        matched_candidate_id: Option<&str>,
        matched_resume_id: Option<&str>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO duplicate_matches
                 (resume_id, matched_candidate_id, matched_resume_id, match_type, confidence)
             VALUES (?, ?, ?, ?, ?)",
            params![resume_id, matched_candidate_id, matched_resume_id, match_type, confidence],
        )?;
        Ok(())
    }

    pub fn stats(&self) -> Result<StoreStats> {
        let mut stats = StoreStats::default();

        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM resumes GROUP BY status")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        for row in rows {
            let (status, count) = row?;
            match ResumeStatus::parse(&status) {
                Some(ResumeStatus::Pending) => stats.resumes_pending = count,
                Some(ResumeStatus::Processing) => stats.resumes_processing = count,
                Some(ResumeStatus::Completed) => stats.resumes_completed = count,
                Some(ResumeStatus::Failed) => stats.resumes_failed = count,
                Some(ResumeStatus::Duplicate) => stats.resumes_duplicate = count,
                None => {}
            }
        }

        stats.candidates = self
            .conn
            .query_row("SELECT COUNT(*) FROM candidates", [], |row| row.get(0))?;
        stats.duplicate_matches = self
            .conn
            .query_row("SELECT COUNT(*) FROM duplicate_matches", [], |row| row.get(0))?;

        Ok(stats)
    }
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation
    )
}

fn proficiency_str(p: Proficiency) -> &'static str {
    match p {
        Proficiency::Native => "native",
        Proficiency::Fluent => "fluent",
        Proficiency::Professional => "professional",
        Proficiency::Working => "working",
        Proficiency::Intermediate => "intermediate",
        Proficiency::Basic => "basic",
        Proficiency::Elementary => "elementary",
        Proficiency::Beginner => "beginner",
        Proficiency::Unknown => "unknown",
    }
}

fn parse_proficiency(s: &str) -> Proficiency {
    match s {
        "native" => Proficiency::Native,
        "fluent" => Proficiency::Fluent,
        "professional" => Proficiency::Professional,
        "working" => Proficiency::Working,
        "intermediate" => Proficiency::Intermediate,
        "basic" => Proficiency::Basic,
        "elementary" => Proficiency::Elementary,
        "beginner" => Proficiency::Beginner,
        _ => Proficiency::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{extract_all, LanguageEntry};

    fn store() -> CandidateStore {
        CandidateStore::open_in_memory().unwrap()
    }

    fn sample_fields() -> FieldMap {
        FieldMap {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            phone: Some("+1 (555) 123-4567".to_string()),
            skills: vec!["Rust".to_string(), "Python".to_string()],
            languages: vec![LanguageEntry {
                name: "French".to_string(),
                proficiency: Proficiency::Fluent,
            }],
            achievements: vec!["Employee of the year".to_string()],
            ..Default::default()
        }
    }

    fn sample_resume(store: &CandidateStore, id: &str, hash: &str) {
        store
            .create_resume(&NewResume {
                id,
                original_file_name: "resume.pdf",
                file_size: 1024,
                mime_type: "application/pdf",
                content_hash: hash,
                stored_path: "2026/08/u1/r1.pdf",
            })
            .unwrap();
    }

    #[test]
    fn resume_lifecycle_and_cas_claim() {
        let store = store();
        sample_resume(&store, "r1", "h1");

        let row = store.get_resume("r1").unwrap().unwrap();
        assert_eq!(row.status, ResumeStatus::Pending);
        assert_eq!(row.content_hash, "h1");

        // First claim wins, second is a no-op
        assert!(store.try_begin_processing("r1").unwrap());
        assert!(!store.try_begin_processing("r1").unwrap());

        store.mark_completed("r1", None).unwrap();
        let row = store.get_resume("r1").unwrap().unwrap();
        assert_eq!(row.status, ResumeStatus::Completed);
        assert!(row.processed_at.is_some());

        // Terminal states cannot be re-claimed
        assert!(!store.try_begin_processing("r1").unwrap());
    }

    #[test]
    fn content_hash_is_unique() {
        let store = store();
        sample_resume(&store, "r1", "same");
        let err = store
            .create_resume(&NewResume {
                id: "r2",
                original_file_name: "copy.pdf",
                file_size: 1024,
                mime_type: "application/pdf",
                content_hash: "same",
                stored_path: "elsewhere.pdf",
            })
            .unwrap_err();
        assert!(err.to_string().to_lowercase().contains("unique"));
        assert_eq!(store.find_resume_by_hash("same").unwrap().as_deref(), Some("r1"));
    }

    #[test]
    fn retry_resets_only_failed() {
        let store = store();
        sample_resume(&store, "r1", "h1");
        assert!(!store.reset_for_retry("r1").unwrap()); // pending, not failed

        store.try_begin_processing("r1").unwrap();
        store.mark_failed("r1", "boom").unwrap();
        assert!(store.reset_for_retry("r1").unwrap());

        let row = store.get_resume("r1").unwrap().unwrap();
        assert_eq!(row.status, ResumeStatus::Pending);
        assert!(row.processing_error.is_none());
    }

    #[test]
    fn candidate_with_children_roundtrips() {
        let store = store();
        let fields = sample_fields();
        let result = store.create_candidate("c1", &fields).unwrap();
        assert_eq!(result, CandidateInsert::Created("c1".to_string()));

        let record = store.get_candidate("c1").unwrap().unwrap();
        assert_eq!(record.candidate.full_name.as_deref(), Some("Jane Doe"));
        // Phone is stored normalized
        assert_eq!(record.candidate.phone.as_deref(), Some("5551234567"));
        // Skills normalized to lowercase, sorted
        assert_eq!(record.skills, vec!["python", "rust"]);
        assert_eq!(record.languages[0].proficiency, Proficiency::Fluent);
        assert_eq!(record.achievements.len(), 1);
    }

    #[test]
    fn full_extraction_roundtrips_through_store() {
        let text = "Jane Doe\njane@x.com\nSKILLS\nRust, PostgreSQL\n\
EDUCATION\nB.S. Computer Science, MIT, 2014-2018\n\
EXPERIENCE\nEngineer, Acme, Jan 2019 - Present\n- Shipped things";
        let fields = extract_all(text);
        let store = store();
        store.create_candidate("c1", &fields).unwrap();

        let record = store.get_candidate("c1").unwrap().unwrap();
        assert_eq!(record.education.len(), 1);
        assert_eq!(record.education[0].institution.as_deref(), Some("MIT"));
        assert_eq!(record.work_experience.len(), 1);
        assert!(record.work_experience[0].is_current);
        assert_eq!(record.work_experience[0].responsibilities, vec!["Shipped things"]);
    }

    #[test]
    fn email_race_returns_existing_candidate() {
        let store = store();
        store.create_candidate("c1", &sample_fields()).unwrap();

        let result = store.create_candidate("c2", &sample_fields()).unwrap();
        assert_eq!(result, CandidateInsert::ExistingEmail("c1".to_string()));
        assert_eq!(result.id(), "c1");

        // The losing insert must not leave a partial row behind
        assert!(store.get_candidate_row("c2").unwrap().is_none());
    }

    #[test]
    fn two_candidates_without_email_are_allowed() {
        let store = store();
        let mut fields = sample_fields();
        fields.email = None;
        store.create_candidate("c1", &fields).unwrap();
        let result = store.create_candidate("c2", &fields).unwrap();
        assert_eq!(result, CandidateInsert::Created("c2".to_string()));
    }

    #[test]
    fn search_matches_name_email_phone() {
        let store = store();
        store.create_candidate("c1", &sample_fields()).unwrap();

        let (hits, total) = store.search("jane", 1, 10).unwrap();
        assert_eq!(total, 1);
        assert_eq!(hits[0].skill_count, 2);

        let (hits, _) = store.search("5551234567", 1, 10).unwrap();
        assert_eq!(hits.len(), 1);

        let (hits, total) = store.search("nobody", 1, 10).unwrap();
        assert!(hits.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn stats_counts_by_status() {
        let store = store();
        sample_resume(&store, "r1", "h1");
        sample_resume(&store, "r2", "h2");
        store.try_begin_processing("r2").unwrap();
        store.mark_failed("r2", "boom").unwrap();
        store.create_candidate("c1", &sample_fields()).unwrap();
        store
            .record_duplicate_match("r2", "email", 1.0, Some("c1"), None)
            .unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.resumes_pending, 1);
        assert_eq!(stats.resumes_failed, 1);
        assert_eq!(stats.candidates, 1);
        assert_eq!(stats.duplicate_matches, 1);
    }

    #[test]
    fn fuzzy_prefilter_uses_name_or_domain() {
        let store = store();
        store.create_candidate("c1", &sample_fields()).unwrap();

        let by_name = store.candidates_for_fuzzy_match("Jane", "nowhere.org").unwrap();
        assert_eq!(by_name.len(), 1);

        let by_domain = store.candidates_for_fuzzy_match("Zed", "example.com").unwrap();
        assert_eq!(by_domain.len(), 1);

        let neither = store.candidates_for_fuzzy_match("Zed", "nowhere.org").unwrap();
        assert!(neither.is_empty());
    }
}
