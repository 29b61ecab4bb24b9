//! SQLite schema definition.
//!
//! Candidates own their child lists (cascade on delete); resumes keep a
//! nullable back-reference to the candidate they resolved to. The email
//! and content-hash UNIQUE constraints are load-bearing: concurrent
//! workers rely on them to settle races.

pub const SCHEMA: &str = r#"
-- ============================================
-- CANDIDATES
-- ============================================

CREATE TABLE IF NOT EXISTS candidates (
    id TEXT PRIMARY KEY,                   -- UUID
    full_name TEXT,
    email TEXT UNIQUE,                     -- NULLs may repeat; values may not
    phone TEXT,                            -- normalized: digits only, last ten
    linkedin_url TEXT,
    github_url TEXT,
    portfolio_url TEXT,
    location TEXT,
    summary TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

-- ============================================
-- RESUMES
-- ============================================

CREATE TABLE IF NOT EXISTS resumes (
    id TEXT PRIMARY KEY,                   -- UUID
    candidate_id TEXT,                     -- NULL until resolved
    original_file_name TEXT NOT NULL,
    file_size INTEGER NOT NULL,
    mime_type TEXT,
    content_hash TEXT NOT NULL UNIQUE,     -- sha256 hex of the raw bytes
    stored_path TEXT NOT NULL,             -- relative to the upload root
    status TEXT NOT NULL DEFAULT 'pending', -- pending|processing|completed|failed|duplicate
    raw_text TEXT,
    extracted_data TEXT,                   -- JSON FieldMap
    authenticity_score REAL,
    authenticity_details TEXT,             -- JSON report
    processing_error TEXT,
    uploaded_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    processing_started_at DATETIME,
    processed_at DATETIME,
    FOREIGN KEY(candidate_id) REFERENCES candidates(id) ON DELETE SET NULL
);

-- ============================================
-- CANDIDATE CHILD LISTS
-- ============================================

CREATE TABLE IF NOT EXISTS education (
    id INTEGER PRIMARY KEY,
    candidate_id TEXT NOT NULL,
    degree_level TEXT,                     -- doctorate|master|bachelor|associate|other
    degree TEXT,
    field_of_study TEXT,
    institution TEXT,
    start_year INTEGER,
    end_year INTEGER,
    gpa TEXT,                              -- preserves the original scale
    FOREIGN KEY(candidate_id) REFERENCES candidates(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS work_experience (
    id INTEGER PRIMARY KEY,
    candidate_id TEXT NOT NULL,
    company TEXT,
    title TEXT,
    location TEXT,
    start_date TEXT,
    end_date TEXT,                         -- NULL iff is_current
    is_current BOOLEAN DEFAULT FALSE,
    duration_months INTEGER,
    responsibilities TEXT,                 -- JSON array of bullets
    description TEXT,
    FOREIGN KEY(candidate_id) REFERENCES candidates(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS certifications (
    id INTEGER PRIMARY KEY,
    candidate_id TEXT NOT NULL,
    name TEXT NOT NULL,
    issuer TEXT,
    issue_date TEXT,
    expiry_date TEXT,
    credential_id TEXT,
    FOREIGN KEY(candidate_id) REFERENCES candidates(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY,
    candidate_id TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    technologies TEXT,                     -- JSON array
    FOREIGN KEY(candidate_id) REFERENCES candidates(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS languages (
    id INTEGER PRIMARY KEY,
    candidate_id TEXT NOT NULL,
    name TEXT NOT NULL,
    proficiency TEXT NOT NULL DEFAULT 'unknown',
    FOREIGN KEY(candidate_id) REFERENCES candidates(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS achievements (
    id INTEGER PRIMARY KEY,
    candidate_id TEXT NOT NULL,
    description TEXT NOT NULL,
    FOREIGN KEY(candidate_id) REFERENCES candidates(id) ON DELETE CASCADE
);

-- ============================================
-- SKILLS (many-to-many)
-- ============================================

CREATE TABLE IF NOT EXISTS skills (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE              -- normalized lowercase
);

CREATE TABLE IF NOT EXISTS candidate_skills (
    candidate_id TEXT NOT NULL,
    skill_id INTEGER NOT NULL,
    UNIQUE(candidate_id, skill_id),
    FOREIGN KEY(candidate_id) REFERENCES candidates(id) ON DELETE CASCADE,
    FOREIGN KEY(skill_id) REFERENCES skills(id) ON DELETE CASCADE
);

-- ============================================
-- DUPLICATE DECISIONS
-- ============================================

-- Audit log of duplicate detections, feeds the stats command
CREATE TABLE IF NOT EXISTS duplicate_matches (
    id INTEGER PRIMARY KEY,
    resume_id TEXT NOT NULL,
    matched_candidate_id TEXT,
    matched_resume_id TEXT,
    match_type TEXT NOT NULL,              -- email|phone|fuzzy_name|file_hash|content_similarity
    confidence REAL NOT NULL,              -- 0.0 to 1.0
    detected_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY(resume_id) REFERENCES resumes(id) ON DELETE CASCADE
);

-- ============================================
-- INDEXES
-- ============================================

CREATE INDEX IF NOT EXISTS idx_candidates_email ON candidates(email);
CREATE INDEX IF NOT EXISTS idx_candidates_phone ON candidates(phone);
CREATE INDEX IF NOT EXISTS idx_candidates_name ON candidates(full_name);

CREATE INDEX IF NOT EXISTS idx_resumes_status ON resumes(status);
CREATE INDEX IF NOT EXISTS idx_resumes_candidate ON resumes(candidate_id);
CREATE INDEX IF NOT EXISTS idx_resumes_hash ON resumes(content_hash);

CREATE INDEX IF NOT EXISTS idx_education_candidate ON education(candidate_id);
CREATE INDEX IF NOT EXISTS idx_experience_candidate ON work_experience(candidate_id);
CREATE INDEX IF NOT EXISTS idx_certifications_candidate ON certifications(candidate_id);
CREATE INDEX IF NOT EXISTS idx_projects_candidate ON projects(candidate_id);
CREATE INDEX IF NOT EXISTS idx_languages_candidate ON languages(candidate_id);
CREATE INDEX IF NOT EXISTS idx_achievements_candidate ON achievements(candidate_id);
CREATE INDEX IF NOT EXISTS idx_candidate_skills_skill ON candidate_skills(skill_id);

CREATE INDEX IF NOT EXISTS idx_duplicate_matches_resume ON duplicate_matches(resume_id);
"#;
