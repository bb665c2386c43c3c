use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Overall per-candidate protocol-validation deadline. Default: 8.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Echo endpoints used to classify anonymity and as the HTTP fallback
    /// probe.
    #[serde(default = "default_judge_urls")]
    pub judge_urls: Vec<String>,

    /// Global bound on candidates simultaneously in flight through the
    /// validation pipeline. Default: 50.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Liveness prober's outer deadline. Default: 3.
    #[serde(default = "default_liveness_timeout_secs")]
    pub liveness_timeout_secs: u64,

    /// Liveness prober's probe-and-read sub-deadline. Default: 2.
    #[serde(default = "default_liveness_read_timeout_secs")]
    pub liveness_read_timeout_secs: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            judge_urls: default_judge_urls(),
            max_concurrency: default_max_concurrency(),
            liveness_timeout_secs: default_liveness_timeout_secs(),
            liveness_read_timeout_secs: default_liveness_read_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    8
}

fn default_judge_urls() -> Vec<String> {
    vec!["http://httpbin.org/get".to_string()]
}

fn default_max_concurrency() -> usize {
    50
}

fn default_liveness_timeout_secs() -> u64 {
    3
}

fn default_liveness_read_timeout_secs() -> u64 {
    2
}
