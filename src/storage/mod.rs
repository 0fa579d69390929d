//! Storage abstractions for scrape results.
//!
//! A result file is a single JSON document:
//!
//! ```text
//! {
//!   "scraped_at": "2026-10-19T12:00:00Z",
//!   "count": 2,
//!   "jobs": [ { "id": "internshala-…", "title": "…", … }, … ]
//! }
//! ```

pub mod local;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::JobPost;

pub use local::LocalStorage;

/// Contents of a result file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsFile {
    /// ISO 8601 timestamp of the scrape
    pub scraped_at: DateTime<Utc>,
    /// Number of posts
    pub count: usize,
    pub jobs: Vec<JobPost>,
}

impl JobsFile {
    pub fn new(jobs: Vec<JobPost>) -> Self {
        Self {
            scraped_at: Utc::now(),
            count: jobs.len(),
            jobs,
        }
    }
}

/// Trait for result storage backends.
pub trait JobStorage {
    /// Write posts under `key`, replacing any previous file.
    fn write_jobs(&self, key: &str, jobs: &[JobPost]) -> Result<JobsFile>;

    /// Load posts written under `key`, `None` if nothing is there.
    fn read_jobs(&self, key: &str) -> Result<Option<JobsFile>>;
}
