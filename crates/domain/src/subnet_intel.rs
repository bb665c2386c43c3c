use chrono::{DateTime, Utc};
use serde::Serialize;

/// Per-/24 productivity signal, keyed by `subnet_prefix` (e.g. `1.2.3.0/24`).
#[derive(Debug, Clone, PartialEq)]
pub struct SubnetIntel {
    pub subnet_prefix: String,
    pub isp: String,
    pub total_scanned: i64,
    pub total_found: i64,
    pub yield_score: f64,
    pub last_updated: DateTime<Utc>,
}

/// A targeted scan specification emitted by the smart-config generator,
/// biasing the next scan round toward historically productive subnets.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSpec {
    pub cidrs: Vec<String>,
    pub rate: u32,
    pub ports: Vec<u16>,
}
