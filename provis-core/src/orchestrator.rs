use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use crate::job::JobStatus;
use crate::registry::JobRegistry;
use crate::runner::ScriptRunner;
use crate::store::InstanceStore;

/// Accepts a submission, registers a queued job, and launches the script
/// runner on a detached background task the caller never waits on.
///
/// The registry update is the task's sole synchronization point. Once a
/// script starts there is no way to stop it; cancellation is unsupported.
#[derive(Debug, Clone)]
pub struct JobOrchestrator {
    registry: JobRegistry,
    runner: Arc<ScriptRunner>,
    store: InstanceStore,
}

impl JobOrchestrator {
    pub fn new(registry: JobRegistry, runner: ScriptRunner, store: InstanceStore) -> Self {
        Self {
            registry,
            runner: Arc::new(runner),
            store,
        }
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    pub fn store(&self) -> &InstanceStore {
        &self.store
    }

    /// Register a new queued job and return its id immediately; the script
    /// runs on a background task that outlives the triggering request.
    pub async fn start(&self, hostname_prefix: impl Into<String>) -> Uuid {
        let hostname_prefix = hostname_prefix.into();
        let job_id = self.registry.submit(hostname_prefix.clone()).await;
        info!(%job_id, prefix = %hostname_prefix, "job queued");

        let orchestrator = self.clone();
        tokio::spawn(async move {
            orchestrator.run_job(job_id, hostname_prefix).await;
        });

        job_id
    }

    async fn run_job(&self, job_id: Uuid, hostname_prefix: String) {
        self.registry
            .update(job_id, |record| {
                record.status = JobStatus::Running;
                record.started_at = Some(Utc::now());
            })
            .await;

        match self.runner.run(job_id, &hostname_prefix).await {
            Ok(outcome) => {
                let succeeded = outcome.exit_code == 0;
                let completed_at = Utc::now();

                self.registry
                    .update(job_id, |record| {
                        record.status = if succeeded {
                            JobStatus::Completed
                        } else {
                            JobStatus::Failed
                        };
                        record.completed_at = Some(completed_at);
                        record.exit_code = Some(outcome.exit_code);
                        record.log_file = Some(outcome.log_file.clone());
                        if !succeeded {
                            record.error = Some(if outcome.stderr.is_empty() {
                                format!("script exited with code {}", outcome.exit_code)
                            } else {
                                outcome.stderr.clone()
                            });
                        }
                    })
                    .await;

                if succeeded {
                    if let Err(err) = self
                        .store
                        .append(
                            &hostname_prefix,
                            job_id,
                            completed_at,
                            Some(outcome.log_file),
                        )
                        .await
                    {
                        error!(%job_id, %err, "failed to record provisioned instance");
                    }
                    info!(%job_id, prefix = %hostname_prefix, "job completed");
                } else {
                    info!(%job_id, exit_code = outcome.exit_code, "job failed");
                }
            }
            Err(err) => {
                error!(%job_id, %err, "job execution error");
                self.registry
                    .update(job_id, |record| {
                        record.status = JobStatus::Failed;
                        record.completed_at = Some(Utc::now());
                        record.error = Some(err.to_string());
                    })
                    .await;
            }
        }
    }
}
