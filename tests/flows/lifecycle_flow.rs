mod common;

use std::sync::Arc;

use proxyforge_application::ports::ProxyCatalog;
use proxyforge_application::use_cases::{CleanupDeadProxiesUseCase, ReverifyRecordUseCase};
use proxyforge_infrastructure::SqliteProxyCatalog;
use proxyforge_jobs::LifecycleJob;

use common::fakes::ToggleValidator;
use common::fixtures::{memory_pool, sample_record};

#[tokio::test]
async fn one_shot_evicts_records_that_keep_failing_reverification() {
    let pool = memory_pool().await;
    let catalog: Arc<dyn ProxyCatalog> = Arc::new(SqliteProxyCatalog::new(pool));

    let dying_ip = "203.0.113.90".parse().unwrap();
    catalog
        .save_proxy(&sample_record(dying_ip, 8080))
        .await
        .unwrap();

    let validator = Arc::new(ToggleValidator::new(false));
    let reverify = Arc::new(ReverifyRecordUseCase::new(validator, catalog.clone()));
    let cleanup = Arc::new(CleanupDeadProxiesUseCase::new(catalog.clone()));

    let job = LifecycleJob::new(catalog.clone(), reverify, cleanup, 50, 20, 4);

    // Each sweep decays the record by 20; five sweeps brings a fresh
    // health_score of 100 down to 0, which the cleanup pass then evicts.
    for _ in 0..5 {
        job.one_shot().await;
    }

    let remaining = catalog.get_proxies(None, 10).await.unwrap();
    assert!(remaining.is_empty(), "record should be evicted once health decays below threshold");
}

#[tokio::test]
async fn one_shot_keeps_records_that_reverify_successfully() {
    let pool = memory_pool().await;
    let catalog: Arc<dyn ProxyCatalog> = Arc::new(SqliteProxyCatalog::new(pool));

    let healthy_ip = "203.0.113.91".parse().unwrap();
    catalog
        .save_proxy(&sample_record(healthy_ip, 8080))
        .await
        .unwrap();

    let validator = Arc::new(ToggleValidator::new(true));
    let reverify = Arc::new(ReverifyRecordUseCase::new(validator, catalog.clone()));
    let cleanup = Arc::new(CleanupDeadProxiesUseCase::new(catalog.clone()));

    let job = LifecycleJob::new(catalog.clone(), reverify, cleanup, 50, 20, 4);
    job.one_shot().await;

    let remaining = catalog.get_proxies(None, 10).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].ip, healthy_ip);
    assert_eq!(remaining[0].health_score, 100);
}

#[tokio::test]
async fn one_shot_tolerates_an_empty_catalog() {
    let pool = memory_pool().await;
    let catalog: Arc<dyn ProxyCatalog> = Arc::new(SqliteProxyCatalog::new(pool));

    let validator = Arc::new(ToggleValidator::new(true));
    let reverify = Arc::new(ReverifyRecordUseCase::new(validator, catalog.clone()));
    let cleanup = Arc::new(CleanupDeadProxiesUseCase::new(catalog.clone()));

    let job = LifecycleJob::new(catalog, reverify, cleanup, 50, 20, 4);
    job.one_shot().await;
}
