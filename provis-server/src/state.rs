use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use provis_core::{HostnameProber, InstanceStore, JobOrchestrator, JobRegistry, ScriptRunner};

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orchestrator: JobOrchestrator,
    pub prober: HostnameProber,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Self {
        let runner = ScriptRunner::new(&config.script_template, config.logs_dir());
        let store = InstanceStore::new(config.instances_file());
        let orchestrator = JobOrchestrator::new(JobRegistry::new(), runner, store);
        let prober = HostnameProber::new(Duration::from_secs(config.ping_timeout_secs));

        Self {
            config,
            orchestrator,
            prober,
        }
    }

    pub fn registry(&self) -> &JobRegistry {
        self.orchestrator.registry()
    }

    pub fn store(&self) -> &InstanceStore {
        self.orchestrator.store()
    }
}
