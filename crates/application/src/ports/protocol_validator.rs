use async_trait::async_trait;
use proxyforge_domain::{Protocol, ProxyRecord};
use std::net::Ipv4Addr;

/// Application-layer port for the Protocol Validator. All
/// proxy-level failures (connect refused, TLS error, non-2xx, timeout)
/// resolve to `None` — never an error to the caller.
#[async_trait]
pub trait ProtocolValidator: Send + Sync {
    async fn check_proxy(
        &self,
        ip: Ipv4Addr,
        port: u16,
        protocol: Protocol,
    ) -> Option<ProxyRecord>;

    /// Launches the three protocol probes concurrently; returns every
    /// protocol that succeeded, each as its own record.
    async fn validate_all_protocols(&self, ip: Ipv4Addr, port: u16) -> Vec<ProxyRecord>;
}
