use std::net::Ipv4Addr;
use std::sync::Arc;

use proxyforge_domain::DomainError;
use tracing::{debug, instrument, warn};

use crate::ports::{LivenessProber, ProtocolValidator, ProxyCatalog, SubnetIntelRepository};

/// Runs a single `(ip, port)` candidate through the validation pipeline's
/// per-candidate body: liveness filter, then protocol
/// validation, then catalog + subnet-intel writes for every protocol that
/// succeeded.
///
/// A candidate's failure at any stage never surfaces as an error here —
/// only `DomainError::StorageUnavailable` from the catalog propagates.
pub struct ValidateCandidateUseCase {
    liveness: Arc<dyn LivenessProber>,
    validator: Arc<dyn ProtocolValidator>,
    catalog: Arc<dyn ProxyCatalog>,
    subnet_intel: Arc<dyn SubnetIntelRepository>,
}

impl ValidateCandidateUseCase {
    pub fn new(
        liveness: Arc<dyn LivenessProber>,
        validator: Arc<dyn ProtocolValidator>,
        catalog: Arc<dyn ProxyCatalog>,
        subnet_intel: Arc<dyn SubnetIntelRepository>,
    ) -> Self {
        Self {
            liveness,
            validator,
            catalog,
            subnet_intel,
        }
    }

    /// Returns the number of protocol records saved for this candidate (0
    /// if it was dropped by liveness or failed every protocol).
    #[instrument(skip(self))]
    pub async fn execute(&self, ip: Ipv4Addr, port: u16) -> Result<usize, DomainError> {
        if !self.liveness.verify(ip, port).await {
            debug!(%ip, port, "candidate dropped by liveness filter");
            return Ok(0);
        }

        let records = self.validator.validate_all_protocols(ip, port).await;
        if records.is_empty() {
            debug!(%ip, port, "candidate failed all protocols");
            return Ok(0);
        }

        let mut saved = 0usize;
        for record in &records {
            self.catalog.save_proxy(record).await?;
            if let Err(err) = self
                .subnet_intel
                .update_subnet_intel(record.ip, &record.isp, 1)
                .await
            {
                warn!(%ip, port, error = %err, "failed to update subnet intel");
            }
            saved += 1;
        }
        Ok(saved)
    }
}
