//! Configuration management with YAML support

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub ocr: OcrConfig,

    #[serde(default)]
    pub deduplication: DeduplicationConfig,

    #[serde(default)]
    pub jobs: JobConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

/// File storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_upload_root")]
    pub upload_root: String,
}

/// Upload validation limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// Extracted text is truncated past this many bytes before parsing.
    #[serde(default = "default_text_hard_cap_bytes")]
    pub text_hard_cap_bytes: usize,
}

/// OCR fallback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_ocr_max_pages")]
    pub max_pages: u32,

    #[serde(default = "default_ocr_confidence_threshold")]
    pub confidence_threshold: f64,
}

/// Duplicate detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeduplicationConfig {
    #[serde(default = "default_content_similarity_threshold")]
    pub content_similarity_threshold: f64,
}

/// Background job configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    #[serde(default = "default_task_wall_clock_seconds")]
    pub task_wall_clock_seconds: u64,

    #[serde(default = "default_task_max_attempts")]
    pub task_max_attempts: u32,

    #[serde(default = "default_workers")]
    pub workers: usize,
}

// Default value functions
fn default_database_path() -> String {
    "~/.local/share/dossier/dossier.db".to_string()
}

fn default_upload_root() -> String {
    "uploads/resumes".to_string()
}

fn default_max_file_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["pdf".to_string(), "docx".to_string(), "txt".to_string()]
}

fn default_text_hard_cap_bytes() -> usize {
    1024 * 1024
}

fn default_ocr_max_pages() -> u32 {
    5
}

fn default_ocr_confidence_threshold() -> f64 {
    0.7
}

fn default_content_similarity_threshold() -> f64 {
    0.85
}

fn default_task_wall_clock_seconds() -> u64 {
    300
}

fn default_task_max_attempts() -> u32 {
    3
}

fn default_workers() -> usize {
    2
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_root: default_upload_root(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: default_max_file_bytes(),
            allowed_extensions: default_allowed_extensions(),
            text_hard_cap_bytes: default_text_hard_cap_bytes(),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            max_pages: default_ocr_max_pages(),
            confidence_threshold: default_ocr_confidence_threshold(),
        }
    }
}

impl Default for DeduplicationConfig {
    fn default() -> Self {
        Self {
            content_similarity_threshold: default_content_similarity_threshold(),
        }
    }
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            task_wall_clock_seconds: default_task_wall_clock_seconds(),
            task_max_attempts: default_task_max_attempts(),
            workers: default_workers(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            storage: StorageConfig::default(),
            limits: LimitsConfig::default(),
            ocr: OcrConfig::default(),
            deduplication: DeduplicationConfig::default(),
            jobs: JobConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    /// Searches in order:
    /// 1. Provided path
    /// 2. ./dossier.yaml (current directory)
    /// 3. ~/.config/dossier/dossier.yaml
    pub fn load(path: &str) -> Result<Self> {
        let search_paths = vec![
            shellexpand::tilde(path).to_string(),
            "dossier.yaml".to_string(),
            shellexpand::tilde("~/.config/dossier/dossier.yaml").to_string(),
        ];

        for search_path in &search_paths {
            if std::path::Path::new(search_path).exists() {
                let content = std::fs::read_to_string(search_path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        // No config file found, use defaults
        Ok(Config::default())
    }

    /// Get the database path, expanding ~ to home directory
    pub fn database_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.database.path).to_string();
        PathBuf::from(expanded)
    }

    /// Get the upload root, expanding ~ to home directory
    pub fn upload_root(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.storage.upload_root).to_string();
        PathBuf::from(expanded)
    }

    /// Whether the given extension (without dot) is accepted at upload
    pub fn is_extension_allowed(&self, ext: &str) -> bool {
        self.limits
            .allowed_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }
}
