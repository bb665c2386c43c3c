use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Protocol a proxy candidate was last validated under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Socks4,
    Socks5,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Socks4 => "socks4",
            Protocol::Socks5 => "socks5",
        }
    }

    /// Probe order used by `validate_all_protocols`: SOCKS5 first (richest),
    /// then SOCKS4, then plain HTTP.
    pub fn probe_order() -> [Protocol; 3] {
        [Protocol::Socks5, Protocol::Socks4, Protocol::Http]
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "socks4" => Ok(Protocol::Socks4),
            "socks5" => Ok(Protocol::Socks5),
            other => Err(format!("unknown protocol: {other}")),
        }
    }
}

/// Anonymity class assigned during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anonymity {
    Elite,
    Anonymous,
    Transparent,
    Unknown,
}

impl Anonymity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Anonymity::Elite => "elite",
            Anonymity::Anonymous => "anonymous",
            Anonymity::Transparent => "transparent",
            Anonymity::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Anonymity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Anonymity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "elite" => Ok(Anonymity::Elite),
            "anonymous" => Ok(Anonymity::Anonymous),
            "transparent" => Ok(Anonymity::Transparent),
            _ => Ok(Anonymity::Unknown),
        }
    }
}

/// A validated proxy, keyed by `(ip, port)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyRecord {
    pub ip: Ipv4Addr,
    pub port: u16,
    pub protocol: Protocol,
    pub anonymity: Anonymity,
    pub country: String,
    pub region: String,
    pub city: String,
    pub isp: String,
    pub org: String,
    pub response_time_ms: i64,
    pub last_checked: DateTime<Utc>,
    pub health_score: i32,
    pub success_count: i64,
    pub fail_count: i64,
}

/// Lower/upper bounds a health score is always clamped to.
pub const HEALTH_SCORE_MIN: i32 = 0;
pub const HEALTH_SCORE_MAX: i32 = 100;
pub const HEALTH_SCORE_INITIAL: i32 = 100;

impl ProxyRecord {
    pub fn new(ip: Ipv4Addr, port: u16, protocol: Protocol) -> Self {
        Self {
            ip,
            port,
            protocol,
            anonymity: Anonymity::Unknown,
            country: "XX".to_string(),
            region: String::new(),
            city: String::new(),
            isp: "Unknown".to_string(),
            org: String::new(),
            response_time_ms: 0,
            last_checked: Utc::now(),
            health_score: HEALTH_SCORE_INITIAL,
            success_count: 1,
            fail_count: 0,
        }
    }

    /// Derive this record's `/24` subnet prefix, e.g. `1.2.3.0/24`.
    pub fn subnet_prefix(&self) -> String {
        subnet_prefix_of(self.ip)
    }

    /// Apply the boost a successful re-verification grants, clamped to
    /// `HEALTH_SCORE_MAX`. Never wraps.
    pub fn boost(score: i32) -> i32 {
        (score + 10).min(HEALTH_SCORE_MAX)
    }

    /// Apply the decay a failed re-verification applies, clamped to
    /// `HEALTH_SCORE_MIN`. Never wraps.
    pub fn decay(score: i32) -> i32 {
        (score - 20).max(HEALTH_SCORE_MIN)
    }
}

/// Derive the `/24` subnet prefix for an IPv4 address, e.g. `1.2.3.0/24`.
pub fn subnet_prefix_of(ip: Ipv4Addr) -> String {
    let o = ip.octets();
    format!("{}.{}.{}.0/24", o[0], o[1], o[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boost_clamps_at_max() {
        assert_eq!(ProxyRecord::boost(95), 100);
        assert_eq!(ProxyRecord::boost(100), 100);
        assert_eq!(ProxyRecord::boost(50), 60);
    }

    #[test]
    fn decay_clamps_at_min() {
        assert_eq!(ProxyRecord::decay(10), 0);
        assert_eq!(ProxyRecord::decay(0), 0);
        assert_eq!(ProxyRecord::decay(50), 30);
    }

    #[test]
    fn subnet_prefix_uses_first_three_octets() {
        let ip: Ipv4Addr = "203.0.113.42".parse().unwrap();
        assert_eq!(subnet_prefix_of(ip), "203.0.113.0/24");
    }

    #[test]
    fn protocol_round_trips_through_str() {
        for p in Protocol::probe_order() {
            assert_eq!(p.as_str().parse::<Protocol>().unwrap(), p);
        }
    }
}
