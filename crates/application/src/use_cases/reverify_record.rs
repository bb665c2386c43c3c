use std::sync::Arc;

use proxyforge_domain::{DomainError, ProxyRecord};
use tracing::instrument;

use crate::ports::{ProtocolValidator, ProxyCatalog};

/// Re-checks a record already in the catalog against its previously-matched
/// protocol (lifecycle job). Success boosts the health score via
/// `ProxyCatalog::update_health`; failure decays it. The record's own
/// `health_score`/`success_count`/`fail_count` fields are not trusted here —
/// the catalog is the sole owner of that arithmetic.
pub struct ReverifyRecordUseCase {
    validator: Arc<dyn ProtocolValidator>,
    catalog: Arc<dyn ProxyCatalog>,
}

impl ReverifyRecordUseCase {
    pub fn new(validator: Arc<dyn ProtocolValidator>, catalog: Arc<dyn ProxyCatalog>) -> Self {
        Self { validator, catalog }
    }

    #[instrument(skip(self, record), fields(ip = %record.ip, port = record.port))]
    pub async fn execute(&self, record: &ProxyRecord) -> Result<bool, DomainError> {
        let fresh = self
            .validator
            .check_proxy(record.ip, record.port, record.protocol)
            .await;
        let still_works = fresh.is_some();

        if let Some(fresh) = fresh {
            let mut refreshed = record.clone();
            refreshed.response_time_ms = fresh.response_time_ms;
            refreshed.anonymity = fresh.anonymity;
            refreshed.isp = fresh.isp;
            self.catalog.save_proxy(&refreshed).await?;
        }

        self.catalog
            .update_health(record.ip, record.port, still_works)
            .await?;

        Ok(still_works)
    }
}
