//! On-disk resume storage with organized paths
//!
//! Layout: `{root}/{YYYY}/{MM}/{owner_id}/{resume_id}.{ext}`. Paths are
//! purely addressing; the content hash is the ground truth for identity.

use chrono::{Datelike, Utc};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Save file bytes, returning the path relative to the store root.
    ///
    /// The write is atomic per file: the content is fully written and the
    /// handle closed before the path is returned. Directories are created
    /// lazily.
    pub fn save(&self, content: &[u8], owner_id: &str, resume_id: &str, ext: &str) -> Result<String> {
        let now = Utc::now();
        let relative = PathBuf::from(format!("{:04}", now.year()))
            .join(format!("{:02}", now.month()))
            .join(owner_id)
            .join(format!("{resume_id}.{ext}"));

        let absolute = self.root.join(&relative);
        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::File::create(&absolute)?;
        file.write_all(content)?;
        file.sync_all()?;
        drop(file);

        debug!(path = %relative.display(), bytes = content.len(), "saved upload");
        Ok(relative.to_string_lossy().to_string())
    }

    /// Read a previously saved file by its relative path.
    pub fn read(&self, relative_path: &str) -> Result<Vec<u8>> {
        let absolute = self.absolute(relative_path);
        fs::read(&absolute).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                IngestError::Persistence(format!("file not found: {relative_path}"))
            } else {
                IngestError::Persistence(e.to_string())
            }
        })
    }

    /// Delete a stored file. Returns false if it did not exist.
    pub fn delete(&self, relative_path: &str) -> bool {
        let absolute = self.absolute(relative_path);
        match fs::remove_file(&absolute) {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                warn!(path = relative_path, error = %e, "failed to delete stored file");
                false
            }
        }
    }

    pub fn exists(&self, relative_path: &str) -> bool {
        self.absolute(relative_path).exists()
    }

    pub fn size(&self, relative_path: &str) -> Option<u64> {
        fs::metadata(self.absolute(relative_path)).ok().map(|m| m.len())
    }

    fn absolute(&self, relative_path: &str) -> PathBuf {
        let p = Path::new(relative_path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.root.join(p)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_read_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let rel = store.save(b"resume bytes", "user-1", "res-1", "pdf").unwrap();
        assert!(rel.ends_with("user-1/res-1.pdf") || rel.ends_with("user-1\\res-1.pdf"));
        assert!(store.exists(&rel));
        assert_eq!(store.size(&rel), Some(12));
        assert_eq!(store.read(&rel).unwrap(), b"resume bytes");

        assert!(store.delete(&rel));
        assert!(!store.delete(&rel));
        assert!(!store.exists(&rel));
    }

    #[test]
    fn path_contains_year_month_owner() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let rel = store.save(b"x", "owner-9", "abc", "txt").unwrap();

        let now = Utc::now();
        assert!(rel.contains(&format!("{:04}", now.year())));
        assert!(rel.contains(&format!("{:02}", now.month())));
        assert!(rel.contains("owner-9"));
    }

    #[test]
    fn read_missing_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let err = store.read("2024/01/none/missing.pdf").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
