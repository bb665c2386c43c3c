use std::sync::Arc;

use proxyforge_domain::{DomainError, SubnetIntel};
use tracing::instrument;

use crate::ports::SubnetIntelRepository;

/// Reads the subnet-intelligence feedback table for consumption by the
/// Smart Config Generator.
pub struct GetTopSubnetsUseCase {
    subnet_intel: Arc<dyn SubnetIntelRepository>,
}

impl GetTopSubnetsUseCase {
    pub fn new(subnet_intel: Arc<dyn SubnetIntelRepository>) -> Self {
        Self { subnet_intel }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self,
        isp: Option<&str>,
        limit: i64,
    ) -> Result<Vec<SubnetIntel>, DomainError> {
        self.subnet_intel.get_top_subnets(isp, limit).await
    }
}
