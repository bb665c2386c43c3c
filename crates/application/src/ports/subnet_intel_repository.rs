use async_trait::async_trait;
use proxyforge_domain::{DomainError, SubnetIntel};
use std::net::Ipv4Addr;

/// Application-layer port for the Catalog Store's `subnet_intel` table.
#[async_trait]
pub trait SubnetIntelRepository: Send + Sync {
    /// Derives the `/24` of `ip` and upserts: `total_found += found_count;
    /// yield_score += found_count`.
    async fn update_subnet_intel(
        &self,
        ip: Ipv4Addr,
        isp: &str,
        found_count: i64,
    ) -> Result<(), DomainError>;

    /// `total_scanned += count` for the given prefix. Reserved: nothing
    /// reads `total_scanned` for eviction or prioritization decisions today.
    async fn record_scanned(&self, subnet_prefix: &str, count: i64) -> Result<(), DomainError>;

    /// Subnets sorted by descending `yield_score`, optionally filtered by
    /// a substring match on `isp`.
    async fn get_top_subnets(
        &self,
        isp: Option<&str>,
        limit: i64,
    ) -> Result<Vec<SubnetIntel>, DomainError>;
}
