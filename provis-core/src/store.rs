use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Result;

/// Durable record of a job that completed with exit code zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub id: u64,
    pub hostname_prefix: String,
    pub job_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub log_file: Option<PathBuf>,
}

/// Append-only list of provisioned instances, persisted as a single JSON
/// array rewritten wholesale on each append.
///
/// `append` is a load-then-save critical section with no file lock; two jobs
/// completing at the same instant can lose one record. Jobs complete serially
/// under this deployment's expected load, so the race is documented rather
/// than fixed.
#[derive(Debug, Clone)]
pub struct InstanceStore {
    path: PathBuf,
}

impl InstanceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All persisted records. A missing or unparseable file reads as empty.
    pub async fn load(&self) -> Vec<InstanceRecord> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "failed to read instance store");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "instance store is corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    /// Append one record, assigning the next sequential id, and rewrite the
    /// whole file.
    pub async fn append(
        &self,
        hostname_prefix: impl Into<String>,
        job_id: Uuid,
        completed_at: DateTime<Utc>,
        log_file: Option<PathBuf>,
    ) -> Result<InstanceRecord> {
        let mut records = self.load().await;
        let record = InstanceRecord {
            id: records.len() as u64 + 1,
            hostname_prefix: hostname_prefix.into(),
            job_id,
            completed_at,
            log_file,
        };
        records.push(record.clone());

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_string_pretty(&records)?).await?;

        debug!(
            id = record.id,
            prefix = %record.hostname_prefix,
            "instance recorded"
        );
        Ok(record)
    }

    /// Delete the persisted file. Returns whether a file was actually removed.
    pub async fn clear(&self) -> bool {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => true,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => false,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "failed to remove instance store");
                false
            }
        }
    }

    /// Case-insensitive membership check over persisted prefixes.
    pub async fn prefix_used(&self, prefix: &str) -> bool {
        self.load()
            .await
            .iter()
            .any(|record| record.hostname_prefix.eq_ignore_ascii_case(prefix))
    }
}
