use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a provisioning job.
///
/// `Completed` and `Failed` are terminal; a record never leaves a terminal
/// state once it reaches one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// One request to run the provisioning script for a submitted hostname prefix.
///
/// Owned by the [`JobRegistry`](crate::registry::JobRegistry); mutated only by
/// the background task handling the job, read concurrently by status polls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: Uuid,
    pub status: JobStatus,
    pub hostname_prefix: String,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Path of the captured transcript, once the script has run.
    pub log_file: Option<PathBuf>,
    pub exit_code: Option<i32>,
    pub error: Option<String>,
}

impl JobRecord {
    pub fn new(hostname_prefix: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            status: JobStatus::Queued,
            hostname_prefix: hostname_prefix.into(),
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            log_file: None,
            exit_code: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_record_is_queued_with_no_outcome() {
        let record = JobRecord::new("web01");
        assert_eq!(record.status, JobStatus::Queued);
        assert_eq!(record.hostname_prefix, "web01");
        assert!(record.started_at.is_none());
        assert!(record.completed_at.is_none());
        assert!(record.exit_code.is_none());
    }

    #[test]
    fn terminal_states() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Queued).unwrap(),
            "\"queued\""
        );
        assert_eq!(
            serde_json::to_string(&JobStatus::Failed).unwrap(),
            "\"failed\""
        );
    }
}
