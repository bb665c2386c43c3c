use async_trait::async_trait;
use proxyforge_domain::{DomainError, Protocol, ProxyRecord};

/// Application-layer port for the Catalog Store's `proxies` table.
///
/// The implementation lives in the infrastructure layer (SQLite today) and
/// is injected at wiring time. All mutations are individually atomic; the
/// store assumes a single writing process.
#[async_trait]
pub trait ProxyCatalog: Send + Sync {
    /// Upsert by `(ip, port)`. Fields absent from `record` are the caller's
    /// responsibility to default before calling; the repository does not
    /// infer missing values beyond the documented first-save defaults.
    async fn save_proxy(&self, record: &ProxyRecord) -> Result<(), DomainError>;

    /// Records ordered by ascending `response_time_ms`, optionally filtered
    /// by protocol.
    async fn get_proxies(
        &self,
        protocol: Option<Protocol>,
        limit: i64,
    ) -> Result<Vec<ProxyRecord>, DomainError>;

    async fn delete_proxy(&self, ip: std::net::Ipv4Addr, port: u16) -> Result<(), DomainError>;

    /// `score = min(100, score+10); success_count++` on success;
    /// `score = max(0, score-20); fail_count++` on failure. Both paths
    /// touch `last_checked`.
    async fn update_health(
        &self,
        ip: std::net::Ipv4Addr,
        port: u16,
        working: bool,
    ) -> Result<(), DomainError>;

    /// Candidates for the gateway's hot pool: `health_score > min_health`,
    /// ordered by latency ascending.
    async fn get_pool_candidates(
        &self,
        min_health: i32,
        limit: i64,
    ) -> Result<Vec<ProxyRecord>, DomainError>;

    /// Deletes every record with `health_score < threshold`. Returns the
    /// number of rows removed.
    async fn cleanup_below_threshold(&self, threshold: i32) -> Result<u64, DomainError>;
}
