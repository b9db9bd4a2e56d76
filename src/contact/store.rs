//! Submission persistence

use super::types::ContactSubmission;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Where accepted submissions are written
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    fn name(&self) -> &str;

    async fn save(&self, submission: &ContactSubmission) -> Result<()>;

    /// Every stored submission, oldest first
    async fn list(&self) -> Result<Vec<ContactSubmission>>;
}

/// Keeps submissions for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemorySubmissionStore {
    submissions: RwLock<Vec<ContactSubmission>>,
}

impl MemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionStore for MemorySubmissionStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn save(&self, submission: &ContactSubmission) -> Result<()> {
        self.submissions.write().await.push(submission.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ContactSubmission>> {
        Ok(self.submissions.read().await.clone())
    }
}

/// Append-only JSON-lines file, one submission per line
#[derive(Debug)]
pub struct JsonlSubmissionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlSubmissionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SubmissionStore for JsonlSubmissionStore {
    fn name(&self) -> &str {
        "jsonl"
    }

    async fn save(&self, submission: &ContactSubmission) -> Result<()> {
        let mut line = serde_json::to_string(submission)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::storage(format!("Failed to create {}: {e}", parent.display())))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| Error::storage(format!("Failed to open {}: {e}", self.path.display())))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| Error::storage(format!("Failed to append submission: {e}")))?;
        file.flush()
            .await
            .map_err(|e| Error::storage(format!("Failed to flush submission: {e}")))?;

        debug!(id = %submission.id, path = %self.path.display(), "submission stored");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ContactSubmission>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::storage(format!("Failed to read {}: {e}", self.path.display())))?;

        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line)
                    .map_err(|e| Error::storage(format!("Corrupt submission on line {}: {e}", i + 1)))
            })
            .collect()
    }
}
