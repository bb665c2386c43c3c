use async_trait::async_trait;
use std::collections::HashMap;
use std::net::Ipv4Addr;

/// Fields returned by a geolocation lookup. Never an error — a failed
/// lookup degrades to the `unknown` defaults (`GeoUnknown`).
#[derive(Debug, Clone, PartialEq)]
pub struct GeoResult {
    pub country: String,
    pub country_name: String,
    pub isp: String,
    pub org: String,
}

impl GeoResult {
    pub fn unknown() -> Self {
        Self {
            country: "XX".to_string(),
            country_name: "Unknown".to_string(),
            isp: "Unknown".to_string(),
            org: String::new(),
        }
    }
}

/// Application-layer port for the Geolocation Client. Calls are
/// rate-limited by the backend; the batch method partitions inputs into
/// bounded groups internally.
#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn lookup(&self, ip: Ipv4Addr) -> GeoResult;

    async fn lookup_batch(&self, ips: &[Ipv4Addr]) -> HashMap<Ipv4Addr, GeoResult>;
}
