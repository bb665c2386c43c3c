use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use proxyforge_application::ports::{LivenessProber, ProtocolValidator};
use proxyforge_domain::{Protocol, ProxyRecord};

use crate::common::fixtures::sample_record;

/// Liveness prober that always succeeds, for pipeline tests that only
/// care about the protocol-validation and catalog-write stages.
pub struct AlwaysAlive;

#[async_trait]
impl LivenessProber for AlwaysAlive {
    async fn verify(&self, _ip: Ipv4Addr, _port: u16) -> bool {
        true
    }
}

/// Liveness prober that always drops the candidate.
pub struct NeverAlive;

#[async_trait]
impl LivenessProber for NeverAlive {
    async fn verify(&self, _ip: Ipv4Addr, _port: u16) -> bool {
        false
    }
}

/// Protocol validator that reports success under `Protocol::Http` only,
/// standing in for a live candidate without dialing the network.
pub struct FakeValidator;

#[async_trait]
impl ProtocolValidator for FakeValidator {
    async fn check_proxy(
        &self,
        ip: Ipv4Addr,
        port: u16,
        protocol: Protocol,
    ) -> Option<ProxyRecord> {
        if protocol == Protocol::Http {
            Some(sample_record(ip, port))
        } else {
            None
        }
    }

    async fn validate_all_protocols(&self, ip: Ipv4Addr, port: u16) -> Vec<ProxyRecord> {
        self.check_proxy(ip, port, Protocol::Http)
            .await
            .into_iter()
            .collect()
    }
}

/// Protocol validator whose re-verification outcome is toggled by a flag,
/// for lifecycle tests that need a deterministic success/failure sequence.
pub struct ToggleValidator {
    alive: AtomicBool,
}

impl ToggleValidator {
    pub fn new(initially_alive: bool) -> Self {
        Self {
            alive: AtomicBool::new(initially_alive),
        }
    }

    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProtocolValidator for ToggleValidator {
    async fn check_proxy(
        &self,
        ip: Ipv4Addr,
        port: u16,
        protocol: Protocol,
    ) -> Option<ProxyRecord> {
        if self.alive.load(Ordering::SeqCst) {
            let mut record = sample_record(ip, port);
            record.protocol = protocol;
            Some(record)
        } else {
            None
        }
    }

    async fn validate_all_protocols(&self, ip: Ipv4Addr, port: u16) -> Vec<ProxyRecord> {
        self.check_proxy(ip, port, Protocol::Http)
            .await
            .into_iter()
            .collect()
    }
}
