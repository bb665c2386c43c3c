mod common;

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

use proxyforge_application::ports::ProxyCatalog;
use proxyforge_infrastructure::gateway::HotPool;
use proxyforge_infrastructure::SqliteProxyCatalog;

use common::fixtures::{memory_pool, sample_record};

#[tokio::test]
async fn refill_seeds_pool_from_catalog_candidates() {
    let pool = memory_pool().await;
    let catalog: Arc<dyn ProxyCatalog> = Arc::new(SqliteProxyCatalog::new(pool));
    catalog
        .save_proxy(&sample_record("203.0.113.70".parse().unwrap(), 8080))
        .await
        .unwrap();
    catalog
        .save_proxy(&sample_record("203.0.113.71".parse().unwrap(), 8080))
        .await
        .unwrap();

    let hot_pool = HotPool::new(catalog, 10, 50, 3, Duration::from_secs(5));
    assert!(hot_pool.is_empty().await);

    hot_pool.refill().await;
    assert!(!hot_pool.is_empty().await);

    let picked = hot_pool.pick_random().await;
    assert!(picked.is_some());
}

#[tokio::test]
async fn refill_is_a_no_op_when_pool_already_populated() {
    let pool = memory_pool().await;
    let catalog: Arc<dyn ProxyCatalog> = Arc::new(SqliteProxyCatalog::new(pool));
    let seeded_ip = "203.0.113.80".parse().unwrap();
    catalog
        .save_proxy(&sample_record(seeded_ip, 8080))
        .await
        .unwrap();

    let hot_pool = HotPool::new(catalog.clone(), 10, 50, 3, Duration::from_secs(5));
    hot_pool.refill().await;

    catalog
        .save_proxy(&sample_record("203.0.113.81".parse().unwrap(), 8080))
        .await
        .unwrap();
    hot_pool.refill().await;

    let picked = hot_pool.pick_random().await.unwrap();
    assert_eq!(picked.ip, seeded_ip, "refill must not top up a non-empty pool");
}

#[tokio::test]
async fn round_robin_cycles_through_every_member() {
    let pool = memory_pool().await;
    let catalog: Arc<dyn ProxyCatalog> = Arc::new(SqliteProxyCatalog::new(pool));
    for i in 90..93 {
        catalog
            .save_proxy(&sample_record(
                format!("203.0.113.{i}").parse().unwrap(),
                8080,
            ))
            .await
            .unwrap();
    }

    let hot_pool = HotPool::new(catalog, 10, 50, 3, Duration::from_secs(5));
    hot_pool.refill().await;

    let counter = AtomicUsize::new(0);
    let mut seen = Vec::new();
    for _ in 0..3 {
        seen.push(hot_pool.pick_round_robin(&counter).await.unwrap().ip);
    }
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 3, "round robin must visit every distinct member");
}

#[tokio::test]
async fn pick_random_returns_none_on_empty_pool() {
    let pool = memory_pool().await;
    let catalog: Arc<dyn ProxyCatalog> = Arc::new(SqliteProxyCatalog::new(pool));
    let hot_pool = HotPool::new(catalog, 10, 50, 3, Duration::from_secs(5));

    assert!(hot_pool.pick_random().await.is_none());
}
