use serde::{Deserialize, Serialize};

/// Invocation parameters for the out-of-scope port-scan producer. This core
/// only consumes the `(ip, port)` tuples it emits; it never invokes it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanningConfig {
    pub scanner_bin: Option<String>,

    #[serde(default = "default_rate")]
    pub rate: u32,

    #[serde(default = "default_interface")]
    pub interface: String,

    #[serde(default = "default_ports")]
    pub default_ports: String,

    #[serde(default)]
    pub cidrs: Vec<String>,
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            scanner_bin: None,
            rate: default_rate(),
            interface: default_interface(),
            default_ports: default_ports(),
            cidrs: Vec::new(),
        }
    }
}

fn default_rate() -> u32 {
    1000
}

fn default_interface() -> String {
    "eth0".to_string()
}

fn default_ports() -> String {
    "80,8080,3128,1080".to_string()
}
