use std::sync::Arc;
use std::time::Duration;

use proxyforge_application::ports::ProxyCatalog;
use proxyforge_domain::ProxyRecord;
use reqwest::Client;
use tokio::sync::Mutex;
use tokio::time::interval;
use tracing::{info, instrument, warn};

/// Circuit-breaker state of a pool member (state table).
/// `Evicted` is transient: reaching it removes the member from the pool
/// on the same health-monitor tick rather than being retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberState {
    Fresh,
    Healthy,
    Suspect(u32),
    Evicted,
}

#[derive(Debug, Clone)]
pub struct PoolMember {
    pub record: ProxyRecord,
    pub consecutive_failures: u32,
    pub state: MemberState,
}

/// The gateway's hot pool: a bounded set of pre-validated upstreams kept
/// warm and probed on an interval, held as a manager owning both its
/// config and its live members.
pub struct HotPool {
    members: Mutex<Vec<PoolMember>>,
    catalog: Arc<dyn ProxyCatalog>,
    pool_size: i64,
    min_pool_health: i32,
    eviction_threshold: u32,
    probe_timeout: Duration,
}

const PROBE_URL: &str = "https://www.google.com";

impl HotPool {
    pub fn new(
        catalog: Arc<dyn ProxyCatalog>,
        pool_size: i64,
        min_pool_health: i32,
        eviction_threshold: u32,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            members: Mutex::new(Vec::new()),
            catalog,
            pool_size,
            min_pool_health,
            eviction_threshold,
            probe_timeout,
        }
    }

    /// Seeds the pool from the catalog's top candidates when empty. A
    /// no-op otherwise — this implementation keeps the source's
    /// empty-only refill rather than topping up below a low-water mark.
    #[instrument(skip(self))]
    pub async fn refill(&self) {
        let mut members = self.members.lock().await;
        if !members.is_empty() {
            return;
        }

        match self
            .catalog
            .get_pool_candidates(self.min_pool_health, self.pool_size)
            .await
        {
            Ok(candidates) => {
                info!(count = candidates.len(), "refilled gateway hot pool");
                *members = candidates
                    .into_iter()
                    .map(|record| PoolMember {
                        record,
                        consecutive_failures: 0,
                        state: MemberState::Fresh,
                    })
                    .collect();
            }
            Err(e) => warn!(error = %e, "failed to refill gateway hot pool"),
        }
    }

    /// Picks a member uniformly at random (default strategy).
    pub async fn pick_random(&self) -> Option<ProxyRecord> {
        let members = self.members.lock().await;
        if members.is_empty() {
            return None;
        }
        let idx = fastrand::usize(..members.len());
        Some(members[idx].record.clone())
    }

    /// Picks the next member in rotation order (supplement: `rotation`
    /// config names a `round-robin` strategy alongside `random`).
    pub async fn pick_round_robin(&self, counter: &std::sync::atomic::AtomicUsize) -> Option<ProxyRecord> {
        let members = self.members.lock().await;
        if members.is_empty() {
            return None;
        }
        let idx = counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed) % members.len();
        Some(members[idx].record.clone())
    }

    pub async fn is_empty(&self) -> bool {
        self.members.lock().await.is_empty()
    }

    async fn probe_member(&self, member: &PoolMember) -> bool {
        let proxy_url = format!(
            "{}://{}:{}",
            member.record.protocol.as_str(),
            member.record.ip,
            member.record.port
        );
        let Ok(proxy) = reqwest::Proxy::all(&proxy_url) else {
            return false;
        };
        let Ok(client) = Client::builder()
            .proxy(proxy)
            .timeout(self.probe_timeout)
            .build()
        else {
            return false;
        };

        matches!(client.get(PROBE_URL).send().await, Ok(resp) if resp.status().is_success())
    }

    /// One health-monitor pass: probes every member, evicts those that
    /// reach `eviction_threshold` consecutive failures, and refills if the
    /// pool emptied out as a result.
    #[instrument(skip(self))]
    pub async fn run_health_pass(&self) {
        let snapshot = self.members.lock().await.clone();
        let mut evicted = Vec::new();
        let mut outcomes = Vec::with_capacity(snapshot.len());

        for member in &snapshot {
            let alive = self.probe_member(member).await;
            outcomes.push(alive);
        }

        {
            let mut members = self.members.lock().await;
            let mut keep = Vec::with_capacity(members.len());
            for (member, alive) in members.drain(..).zip(outcomes) {
                let mut member = member;
                if alive {
                    member.consecutive_failures = 0;
                    member.state = MemberState::Healthy;
                    keep.push(member);
                } else {
                    member.consecutive_failures += 1;
                    if member.consecutive_failures >= self.eviction_threshold {
                        member.state = MemberState::Evicted;
                        evicted.push(member.record.clone());
                    } else {
                        member.state = MemberState::Suspect(member.consecutive_failures);
                        keep.push(member);
                    }
                }
            }
            *members = keep;
        }

        for record in &evicted {
            warn!(ip = %record.ip, port = record.port, "evicting dead proxy from gateway pool");
            if let Err(e) = self
                .catalog
                .update_health(record.ip, record.port, false)
                .await
            {
                warn!(error = %e, "failed to record eviction in catalog");
            }
        }

        if self.is_empty().await {
            self.refill().await;
        }
    }

    /// Spawns the periodic health-monitor background task.
    pub fn spawn_health_monitor(self: Arc<Self>, check_interval: Duration) {
        tokio::spawn(async move {
            self.refill().await;
            let mut ticker = interval(check_interval);
            loop {
                ticker.tick().await;
                self.run_health_pass().await;
            }
        });
    }
}
