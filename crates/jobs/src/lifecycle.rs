use std::sync::Arc;
use std::time::Duration;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use proxyforge_application::ports::ProxyCatalog;
use proxyforge_application::use_cases::{CleanupDeadProxiesUseCase, ReverifyRecordUseCase};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

/// The Lifecycle Engine's periodic sweep: `tokio::select!` over a
/// `CancellationToken` and an `interval`, with builder-style
/// `with_interval`/`with_cancellation` setters.
///
/// Each tick re-verifies up to `batch_size` catalog records concurrently,
/// bounded by the same semaphore pattern as the Validation Pipeline, then
/// sweeps out everything below `evict_threshold`.
pub struct LifecycleJob {
    catalog: Arc<dyn ProxyCatalog>,
    reverify: Arc<ReverifyRecordUseCase>,
    cleanup: Arc<CleanupDeadProxiesUseCase>,
    batch_size: i64,
    evict_threshold: i32,
    max_concurrency: usize,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl LifecycleJob {
    pub fn new(
        catalog: Arc<dyn ProxyCatalog>,
        reverify: Arc<ReverifyRecordUseCase>,
        cleanup: Arc<CleanupDeadProxiesUseCase>,
        batch_size: i64,
        evict_threshold: i32,
        max_concurrency: usize,
    ) -> Self {
        Self {
            catalog,
            reverify,
            cleanup,
            batch_size,
            evict_threshold,
            max_concurrency: max_concurrency.max(1),
            interval_secs: 300,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Runs exactly one sweep and returns, for the CLI's `lifecycle --once`.
    #[instrument(skip(self))]
    pub async fn one_shot(&self) {
        let records = match self.catalog.get_proxies(None, self.batch_size).await {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "lifecycle sweep failed to list candidates");
                return;
            }
        };

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = FuturesUnordered::new();
        for record in records {
            let permit = semaphore.clone();
            let reverify = self.reverify.clone();
            tasks.push(tokio::spawn(async move {
                let _permit = permit.acquire_owned().await.expect("semaphore never closed");
                reverify.execute(&record).await
            }));
        }

        let mut checked = 0usize;
        while let Some(joined) = tasks.next().await {
            match joined {
                Ok(Ok(_)) => checked += 1,
                Ok(Err(e)) => error!(error = %e, "reverify failed"),
                Err(e) => error!(error = %e, "reverify task panicked"),
            }
        }

        match self.cleanup.execute(self.evict_threshold).await {
            Ok(removed) => info!(checked, removed, "lifecycle sweep complete"),
            Err(e) => error!(error = %e, "lifecycle cleanup sweep failed"),
        }
    }

    pub async fn start(self: Arc<Self>) {
        info!(interval_secs = self.interval_secs, "starting lifecycle job");

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(self.interval_secs));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("lifecycle job shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        self.one_shot().await;
                    }
                }
            }
        });
    }
}
