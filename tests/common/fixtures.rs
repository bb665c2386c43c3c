use std::net::Ipv4Addr;

use proxyforge_domain::config::DatabaseConfig;
use proxyforge_domain::{Anonymity, Protocol, ProxyRecord};
use proxyforge_infrastructure::database::create_write_pool;
use sqlx::SqlitePool;

/// A single-connection in-memory SQLite pool with migrations applied.
/// `max_connections(1)` is load-bearing: a second connection to
/// `sqlite::memory:` would open an unrelated, empty database.
pub async fn memory_pool() -> SqlitePool {
    let cfg = DatabaseConfig {
        write_pool_max_connections: 1,
        ..DatabaseConfig::default()
    };
    create_write_pool("sqlite::memory:", &cfg)
        .await
        .expect("in-memory pool")
}

pub fn sample_record(ip: Ipv4Addr, port: u16) -> ProxyRecord {
    let mut record = ProxyRecord::new(ip, port, Protocol::Http);
    record.anonymity = Anonymity::Elite;
    record.country = "US".to_string();
    record.isp = "Example Networks".to_string();
    record.response_time_ms = 120;
    record
}
