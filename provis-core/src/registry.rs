use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::job::JobRecord;

/// In-memory mapping of job id to job record.
///
/// Tolerates one writer (the background task owning a job) and many readers
/// (status polls). The lock is held only for the duration of a single read or
/// field update, never across child process execution. Records are never
/// deleted; they live for the process lifetime.
#[derive(Debug, Clone)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<Uuid, JobRecord>>>,
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Allocate a fresh job in `queued` state and return its id before any
    /// script work has run.
    pub async fn submit(&self, hostname_prefix: impl Into<String>) -> Uuid {
        let record = JobRecord::new(hostname_prefix);
        let id = record.id;
        self.jobs.write().await.insert(id, record);
        id
    }

    /// Snapshot of a single job record.
    pub async fn get(&self, id: Uuid) -> Option<JobRecord> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// Snapshot of all job records, unspecified order.
    pub async fn list_all(&self) -> Vec<JobRecord> {
        self.jobs.read().await.values().cloned().collect()
    }

    /// Apply a field update to one record. Ignored for unknown ids and for
    /// records already in a terminal state.
    pub async fn update<F>(&self, id: Uuid, mutate: F)
    where
        F: FnOnce(&mut JobRecord),
    {
        let mut jobs = self.jobs.write().await;
        if let Some(record) = jobs.get_mut(&id) {
            if record.status.is_terminal() {
                return;
            }
            mutate(record);
        }
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}
