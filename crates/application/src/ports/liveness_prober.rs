use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Application-layer port for the Liveness Prober: a cheap
/// stage-1 check that discards scan false positives (tarpits that accept
/// SYN but never converse) before committing to full protocol validation.
/// Infallible by contract — never raises, only resolves `true`/`false`.
#[async_trait]
pub trait LivenessProber: Send + Sync {
    async fn verify(&self, ip: Ipv4Addr, port: u16) -> bool;
}
