mod common;

use proxyforge_application::ports::ProxyCatalog;
use proxyforge_domain::Protocol;
use proxyforge_infrastructure::SqliteProxyCatalog;

use common::fixtures::{memory_pool, sample_record};

#[tokio::test]
async fn save_then_get_round_trips() {
    let pool = memory_pool().await;
    let catalog = SqliteProxyCatalog::new(pool);

    let record = sample_record("203.0.113.10".parse().unwrap(), 8080);
    catalog.save_proxy(&record).await.unwrap();

    let fetched = catalog.get_proxies(None, 10).await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].ip, record.ip);
    assert_eq!(fetched[0].port, record.port);
    assert_eq!(fetched[0].isp, "Example Networks");
}

#[tokio::test]
async fn save_upserts_on_conflict() {
    let pool = memory_pool().await;
    let catalog = SqliteProxyCatalog::new(pool);

    let ip = "198.51.100.5".parse().unwrap();
    let mut record = sample_record(ip, 3128);
    catalog.save_proxy(&record).await.unwrap();

    record.response_time_ms = 42;
    catalog.save_proxy(&record).await.unwrap();

    let fetched = catalog.get_proxies(None, 10).await.unwrap();
    assert_eq!(fetched.len(), 1, "conflict should update, not duplicate");
    assert_eq!(fetched[0].response_time_ms, 42);
}

#[tokio::test]
async fn get_proxies_filters_by_protocol() {
    let pool = memory_pool().await;
    let catalog = SqliteProxyCatalog::new(pool);

    let mut http_record = sample_record("203.0.113.11".parse().unwrap(), 80);
    http_record.protocol = Protocol::Http;
    catalog.save_proxy(&http_record).await.unwrap();

    let mut socks_record = sample_record("203.0.113.12".parse().unwrap(), 1080);
    socks_record.protocol = Protocol::Socks5;
    catalog.save_proxy(&socks_record).await.unwrap();

    let http_only = catalog.get_proxies(Some(Protocol::Http), 10).await.unwrap();
    assert_eq!(http_only.len(), 1);
    assert_eq!(http_only[0].protocol, Protocol::Http);
}

#[tokio::test]
async fn update_health_boosts_and_decays_with_clamping() {
    let pool = memory_pool().await;
    let catalog = SqliteProxyCatalog::new(pool);

    let ip = "203.0.113.20".parse().unwrap();
    let record = sample_record(ip, 8080);
    catalog.save_proxy(&record).await.unwrap();

    catalog.update_health(ip, 8080, true).await.unwrap();
    let after_success = &catalog.get_proxies(None, 10).await.unwrap()[0];
    assert_eq!(after_success.health_score, 100);
    assert_eq!(after_success.success_count, 2);

    for _ in 0..10 {
        catalog.update_health(ip, 8080, false).await.unwrap();
    }
    let after_failures = &catalog.get_proxies(None, 10).await.unwrap()[0];
    assert_eq!(after_failures.health_score, 0, "health score must clamp at 0");
    assert_eq!(after_failures.fail_count, 10);
}

#[tokio::test]
async fn cleanup_below_threshold_removes_dead_records() {
    let pool = memory_pool().await;
    let catalog = SqliteProxyCatalog::new(pool);

    let healthy = sample_record("203.0.113.30".parse().unwrap(), 8080);
    catalog.save_proxy(&healthy).await.unwrap();

    let dying_ip = "203.0.113.31".parse().unwrap();
    let dying = sample_record(dying_ip, 8080);
    catalog.save_proxy(&dying).await.unwrap();
    for _ in 0..5 {
        catalog.update_health(dying_ip, 8080, false).await.unwrap();
    }

    let removed = catalog.cleanup_below_threshold(20).await.unwrap();
    assert_eq!(removed, 1);

    let remaining = catalog.get_proxies(None, 10).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].ip, healthy.ip);
}

#[tokio::test]
async fn get_pool_candidates_honors_min_health() {
    let pool = memory_pool().await;
    let catalog = SqliteProxyCatalog::new(pool);

    let weak_ip = "203.0.113.40".parse().unwrap();
    catalog.save_proxy(&sample_record(weak_ip, 8080)).await.unwrap();
    catalog.update_health(weak_ip, 8080, false).await.unwrap();

    let strong = sample_record("203.0.113.41".parse().unwrap(), 8080);
    catalog.save_proxy(&strong).await.unwrap();

    let candidates = catalog.get_pool_candidates(90, 10).await.unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].ip, strong.ip);
}
