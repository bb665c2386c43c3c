use std::net::Ipv4Addr;
use std::sync::Arc;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::sync::Semaphore;
use tracing::{debug, error, instrument, warn};

use crate::use_cases::ValidateCandidateUseCase;
use proxyforge_domain::DomainError;

/// Fans a batch of `(ip, port)` candidates out across
/// `ValidateCandidateUseCase::execute`, bounded by `max_concurrency`.
/// Candidates are independent: one candidate's failure never
/// aborts the others. Only a `DomainError::StorageUnavailable` surfaced by
/// the catalog halts the whole batch, since that means every remaining
/// write would fail too.
pub struct ValidationPipeline {
    use_case: Arc<ValidateCandidateUseCase>,
    max_concurrency: usize,
}

/// Outcome of running one batch through the pipeline.
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub candidates: usize,
    pub records_saved: usize,
}

impl ValidationPipeline {
    pub fn new(use_case: Arc<ValidateCandidateUseCase>, max_concurrency: usize) -> Self {
        Self {
            use_case,
            max_concurrency: max_concurrency.max(1),
        }
    }

    #[instrument(skip(self, candidates))]
    pub async fn run(
        &self,
        candidates: Vec<(Ipv4Addr, u16)>,
    ) -> Result<PipelineReport, DomainError> {
        let total = candidates.len();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = FuturesUnordered::new();

        for (ip, port) in candidates {
            let permit = semaphore.clone();
            let use_case = self.use_case.clone();
            tasks.push(tokio::spawn(async move {
                let _permit = permit
                    .acquire_owned()
                    .await
                    .expect("semaphore never closed");
                use_case.execute(ip, port).await
            }));
        }

        let mut records_saved = 0usize;
        while let Some(joined) = tasks.next().await {
            match joined {
                Ok(Ok(saved)) => records_saved += saved,
                Ok(Err(DomainError::StorageUnavailable(msg))) => {
                    error!(error = %msg, "catalog unavailable, aborting pipeline");
                    return Err(DomainError::StorageUnavailable(msg));
                }
                Ok(Err(err)) => warn!(error = %err, "candidate validation failed"),
                Err(join_err) => warn!(error = %join_err, "validation task panicked"),
            }
        }

        debug!(total, records_saved, "validation batch complete");
        Ok(PipelineReport {
            candidates: total,
            records_saved,
        })
    }
}
