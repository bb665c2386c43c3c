use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationStrategy {
    Random,
    RoundRobin,
}

impl Default for RotationStrategy {
    fn default() -> Self {
        RotationStrategy::Random
    }
}

/// The Rotating Gateway's hot-pool and listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RotationConfig {
    #[serde(default)]
    pub strategy: RotationStrategy,

    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Maximum members kept in the hot pool. Default: 10.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Seconds between health-monitor ticks. Default: 15.
    #[serde(default = "default_health_check_interval_secs")]
    pub health_check_interval_secs: u64,

    /// Per-member probe timeout. Default: 5.
    #[serde(default = "default_health_check_timeout_secs")]
    pub health_check_timeout_secs: u64,

    /// Consecutive probe failures before a member is evicted. Default: 3.
    #[serde(default = "default_eviction_threshold")]
    pub eviction_threshold: u32,

    /// Minimum catalog `health_score` a record must have to be admitted
    /// into the hot pool. Default: 50.
    #[serde(default = "default_min_pool_health")]
    pub min_pool_health: i32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            strategy: RotationStrategy::default(),
            listen_addr: default_listen_addr(),
            pool_size: default_pool_size(),
            health_check_interval_secs: default_health_check_interval_secs(),
            health_check_timeout_secs: default_health_check_timeout_secs(),
            eviction_threshold: default_eviction_threshold(),
            min_pool_health: default_min_pool_health(),
        }
    }
}

fn default_listen_addr() -> String {
    "127.0.0.1:8888".to_string()
}

fn default_pool_size() -> usize {
    10
}

fn default_health_check_interval_secs() -> u64 {
    15
}

fn default_health_check_timeout_secs() -> u64 {
    5
}

fn default_eviction_threshold() -> u32 {
    3
}

fn default_min_pool_health() -> i32 {
    50
}
