use std::sync::Arc;

use proxyforge_domain::DomainError;
use tracing::{info, instrument};

use crate::ports::ProxyCatalog;

/// Evicts every catalog record whose health score has decayed below the
/// configured floor (lifecycle job).
pub struct CleanupDeadProxiesUseCase {
    catalog: Arc<dyn ProxyCatalog>,
}

impl CleanupDeadProxiesUseCase {
    pub fn new(catalog: Arc<dyn ProxyCatalog>) -> Self {
        Self { catalog }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, threshold: i32) -> Result<u64, DomainError> {
        let removed = self.catalog.cleanup_below_threshold(threshold).await?;
        if removed > 0 {
            info!(removed, threshold, "evicted dead proxies");
        }
        Ok(removed)
    }
}
