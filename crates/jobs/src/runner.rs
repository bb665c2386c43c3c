use crate::LifecycleJob;
use std::sync::Arc;
use tracing::info;

/// Central orchestrator for all background jobs. Builder pattern:
/// register jobs, then call `.start()` once.
pub struct JobRunner {
    lifecycle: Option<LifecycleJob>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self { lifecycle: None }
    }

    pub fn with_lifecycle(mut self, job: LifecycleJob) -> Self {
        self.lifecycle = Some(job);
        self
    }

    pub async fn start(self) {
        info!("starting background job runner");

        if let Some(job) = self.lifecycle {
            Arc::new(job).start().await;
        }

        info!("all background jobs started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
