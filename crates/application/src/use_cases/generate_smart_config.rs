use std::sync::Arc;

use proxyforge_domain::{DomainError, ScanSpec};
use tracing::instrument;

use crate::ports::SubnetIntelRepository;

/// Turns the highest-yield subnets into re-scan targets. Each
/// subnet becomes its own `ScanSpec` so a downstream scanner can prioritize
/// them independently of the baseline `scanning.cidrs` sweep.
pub struct GenerateSmartConfigUseCase {
    subnet_intel: Arc<dyn SubnetIntelRepository>,
    rate: u32,
    ports: Vec<u16>,
}

impl GenerateSmartConfigUseCase {
    pub fn new(subnet_intel: Arc<dyn SubnetIntelRepository>, rate: u32, ports: Vec<u16>) -> Self {
        Self {
            subnet_intel,
            rate,
            ports,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, limit: i64) -> Result<Vec<ScanSpec>, DomainError> {
        let subnets = self.subnet_intel.get_top_subnets(None, limit).await?;
        Ok(subnets
            .into_iter()
            .map(|s| ScanSpec {
                cidrs: vec![s.subnet_prefix.clone()],
                rate: self.rate,
                ports: self.ports.clone(),
            })
            .collect())
    }
}
