mod common;

use std::sync::Arc;

use proxyforge_application::ports::{ProxyCatalog, SubnetIntelRepository};
use proxyforge_application::use_cases::ValidateCandidateUseCase;
use proxyforge_application::ValidationPipeline;
use proxyforge_infrastructure::{SqliteProxyCatalog, SqliteSubnetIntelRepository};

use common::fakes::{AlwaysAlive, FakeValidator, NeverAlive};
use common::fixtures::memory_pool;

#[tokio::test]
async fn pipeline_saves_every_candidate_that_passes_liveness() {
    let pool = memory_pool().await;
    let catalog: Arc<dyn ProxyCatalog> = Arc::new(SqliteProxyCatalog::new(pool.clone()));
    let subnet_intel: Arc<dyn SubnetIntelRepository> =
        Arc::new(SqliteSubnetIntelRepository::new(pool));

    let use_case = Arc::new(ValidateCandidateUseCase::new(
        Arc::new(AlwaysAlive),
        Arc::new(FakeValidator),
        catalog.clone(),
        subnet_intel,
    ));
    let pipeline = ValidationPipeline::new(use_case, 4);

    let candidates = vec![
        ("203.0.113.50".parse().unwrap(), 8080),
        ("203.0.113.51".parse().unwrap(), 3128),
        ("203.0.113.52".parse().unwrap(), 8888),
    ];
    let report = pipeline.run(candidates).await.unwrap();

    assert_eq!(report.candidates, 3);
    assert_eq!(report.records_saved, 3);

    let stored = catalog.get_proxies(None, 10).await.unwrap();
    assert_eq!(stored.len(), 3);
}

#[tokio::test]
async fn pipeline_drops_candidates_that_fail_liveness() {
    let pool = memory_pool().await;
    let catalog: Arc<dyn ProxyCatalog> = Arc::new(SqliteProxyCatalog::new(pool.clone()));
    let subnet_intel: Arc<dyn SubnetIntelRepository> =
        Arc::new(SqliteSubnetIntelRepository::new(pool));

    let use_case = Arc::new(ValidateCandidateUseCase::new(
        Arc::new(NeverAlive),
        Arc::new(FakeValidator),
        catalog.clone(),
        subnet_intel,
    ));
    let pipeline = ValidationPipeline::new(use_case, 4);

    let report = pipeline
        .run(vec![("203.0.113.60".parse().unwrap(), 8080)])
        .await
        .unwrap();

    assert_eq!(report.candidates, 1);
    assert_eq!(report.records_saved, 0);
    assert!(catalog.get_proxies(None, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn pipeline_tolerates_empty_batch() {
    let pool = memory_pool().await;
    let catalog: Arc<dyn ProxyCatalog> = Arc::new(SqliteProxyCatalog::new(pool.clone()));
    let subnet_intel: Arc<dyn SubnetIntelRepository> =
        Arc::new(SqliteSubnetIntelRepository::new(pool));

    let use_case = Arc::new(ValidateCandidateUseCase::new(
        Arc::new(AlwaysAlive),
        Arc::new(FakeValidator),
        catalog,
        subnet_intel,
    ));
    let pipeline = ValidationPipeline::new(use_case, 4);

    let report = pipeline.run(Vec::new()).await.unwrap();
    assert_eq!(report.candidates, 0);
    assert_eq!(report.records_saved, 0);
}
