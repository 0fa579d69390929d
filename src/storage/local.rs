//! Local filesystem storage implementation.
//!
//! Files are written atomically: the JSON goes to a temp file that is then
//! renamed over the target.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{AppError, Result};
use crate::models::JobPost;
use crate::storage::{JobStorage, JobsFile};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Storage rooted at the parent of `path`, plus the key naming `path`.
    pub fn for_file(path: &Path) -> Result<(Self, String)> {
        let key = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| AppError::config(format!("invalid output path {path:?}")))?
            .to_string();
        let root = path.parent().unwrap_or(Path::new("")).to_path_buf();
        Ok((Self::new(root), key))
    }

    /// Get the full path for a relative key.
    pub fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Write bytes atomically (write to temp, then rename).
    fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.flush()?;
        drop(file);

        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes)
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

impl JobStorage for LocalStorage {
    fn write_jobs(&self, key: &str, jobs: &[JobPost]) -> Result<JobsFile> {
        let file = JobsFile::new(jobs.to_vec());
        self.write_json(key, &file)?;
        Ok(file)
    }

    fn read_jobs(&self, key: &str) -> Result<Option<JobsFile>> {
        self.read_json(key)
    }
}
