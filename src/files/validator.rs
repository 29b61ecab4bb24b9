//! Upload validation: size, extension, filename hygiene, content hashing

use sha2::{Digest, Sha256};

use crate::config::LimitsConfig;
use crate::error::{IngestError, Result};

/// Validates uploaded resume files before anything is persisted.
pub struct FileValidator {
    limits: LimitsConfig,
}

impl FileValidator {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Validate file content and name.
    ///
    /// Returns the lowercase extension on success; collects every problem
    /// into one error so the caller can show them all at once.
    pub fn validate(&self, content: &[u8], file_name: &str) -> Result<String> {
        let mut errors: Vec<String> = Vec::new();

        if content.is_empty() {
            errors.push("file is empty".to_string());
        } else if content.len() as u64 > self.limits.max_file_bytes {
            let max_mb = self.limits.max_file_bytes as f64 / (1024.0 * 1024.0);
            let actual_mb = content.len() as f64 / (1024.0 * 1024.0);
            errors.push(format!(
                "file size ({actual_mb:.1} MiB) exceeds maximum of {max_mb:.0} MiB"
            ));
        }

        let ext = extension_of(file_name);
        let allowed = self
            .limits
            .allowed_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(&ext));
        if !allowed {
            errors.push(format!(
                "invalid file format '{ext}'; allowed: {}",
                self.limits.allowed_extensions.join(", ")
            ));
        }

        if errors.is_empty() {
            Ok(ext)
        } else {
            Err(IngestError::Validation(errors.join("; ")))
        }
    }
}

/// Lowercase extension without the dot, or empty string.
pub fn extension_of(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// SHA-256 hex digest of the raw bytes. The content hash is the identity
/// of a file independent of its name.
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// MIME type from extension. Extension-based only; no magic-byte sniffing.
pub fn mime_type(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Sanitize a client-supplied filename: strip path components, replace
/// dangerous characters, cap at 255 chars preserving the extension.
pub fn sanitize_filename(filename: &str) -> String {
    // Strip path components (both separators; clients vary)
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .to_string();

    let mut name = base.replace("..", "_");
    for ch in ['/', '\\', '\0', '<', '>', ':', '"', '|', '?', '*'] {
        name = name.replace(ch, "_");
    }

    if name.chars().count() > 255 {
        let ext = extension_of(&name);
        if ext.is_empty() {
            name = name.chars().take(255).collect();
        } else {
            let keep = 255usize.saturating_sub(ext.len() + 1);
            let stem: String = name
                .chars()
                .take(keep)
                .collect::<String>()
                .trim_end_matches('.')
                .to_string();
            name = format!("{stem}.{ext}");
        }
    }

    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LimitsConfig;

    fn validator() -> FileValidator {
        FileValidator::new(LimitsConfig::default())
    }

    #[test]
    fn accepts_valid_pdf() {
        let ext = validator().validate(b"%PDF-1.4 content", "resume.pdf").unwrap();
        assert_eq!(ext, "pdf");
    }

    #[test]
    fn rejects_empty_file() {
        let err = validator().validate(b"", "resume.pdf").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn rejects_oversized_file() {
        // 10 MiB + 1 byte
        let content = vec![0u8; 10 * 1024 * 1024 + 1];
        let err = validator().validate(&content, "resume.pdf").unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn rejects_bad_extension() {
        let err = validator().validate(b"hello", "resume.exe").unwrap_err();
        assert!(err.to_string().contains("invalid file format"));
    }

    #[test]
    fn extension_is_case_insensitive() {
        assert!(validator().validate(b"hello", "Resume.PDF").is_ok());
    }

    #[test]
    fn hash_is_stable_and_hex() {
        let a = content_hash(b"same bytes");
        let b = content_hash(b"same bytes");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, content_hash(b"other bytes"));
    }

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("/tmp/evil.pdf"), "evil.pdf");
        assert_eq!(sanitize_filename("C:\\Users\\x\\cv.docx"), "cv.docx");
    }

    #[test]
    fn sanitize_replaces_dangerous_chars() {
        assert_eq!(sanitize_filename("a<b>c.pdf"), "a_b_c.pdf");
        assert_eq!(sanitize_filename("we|ird?.txt"), "we_ird_.txt");
    }

    #[test]
    fn sanitize_truncates_preserving_extension() {
        let long = format!("{}.pdf", "x".repeat(300));
        let cleaned = sanitize_filename(&long);
        assert!(cleaned.chars().count() <= 255);
        assert!(cleaned.ends_with(".pdf"));
    }

    #[test]
    fn mime_table() {
        assert_eq!(mime_type("pdf"), "application/pdf");
        assert_eq!(mime_type("txt"), "text/plain");
        assert_eq!(mime_type("zip"), "application/octet-stream");
    }
}
