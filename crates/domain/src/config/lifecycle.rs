use serde::{Deserialize, Serialize};

/// The Lifecycle Engine's periodic re-verify + cleanup sweep.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LifecycleConfig {
    /// Seconds between sweeps. Default: 300.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Maximum records re-verified per sweep. Default: 1000.
    #[serde(default = "default_batch_size")]
    pub batch_size: i64,

    /// Health floor below which a record is deleted on cleanup. Default: 40.
    #[serde(default = "default_evict_threshold")]
    pub evict_threshold: i32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            batch_size: default_batch_size(),
            evict_threshold: default_evict_threshold(),
        }
    }
}

fn default_interval_secs() -> u64 {
    300
}

fn default_batch_size() -> i64 {
    1000
}

fn default_evict_threshold() -> i32 {
    40
}
