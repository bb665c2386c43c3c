mod common;

use proxyforge_application::ports::SubnetIntelRepository;
use proxyforge_infrastructure::SqliteSubnetIntelRepository;

use common::fixtures::memory_pool;

#[tokio::test]
async fn update_subnet_intel_accumulates_per_prefix() {
    let pool = memory_pool().await;
    let repo = SqliteSubnetIntelRepository::new(pool);

    let ip = "203.0.113.7".parse().unwrap();
    repo.update_subnet_intel(ip, "Example Networks", 2).await.unwrap();
    repo.update_subnet_intel(ip, "Example Networks", 3).await.unwrap();

    let top = repo.get_top_subnets(None, 10).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].subnet_prefix, "203.0.113.0/24");
    assert_eq!(top[0].total_found, 5);
    assert_eq!(top[0].yield_score, 5.0);
}

#[tokio::test]
async fn record_scanned_tracks_independently_of_found() {
    let pool = memory_pool().await;
    let repo = SqliteSubnetIntelRepository::new(pool);

    repo.record_scanned("198.51.100.0/24", 256).await.unwrap();
    repo.record_scanned("198.51.100.0/24", 256).await.unwrap();

    let top = repo.get_top_subnets(None, 10).await.unwrap();
    assert_eq!(top[0].total_scanned, 512);
    assert_eq!(top[0].total_found, 0);
}

#[tokio::test]
async fn get_top_subnets_orders_by_yield_and_filters_by_isp() {
    let pool = memory_pool().await;
    let repo = SqliteSubnetIntelRepository::new(pool);

    repo.update_subnet_intel("203.0.113.1".parse().unwrap(), "Acme ISP", 1)
        .await
        .unwrap();
    repo.update_subnet_intel("198.51.100.1".parse().unwrap(), "Contoso Networks", 9)
        .await
        .unwrap();

    let all = repo.get_top_subnets(None, 10).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].isp, "Contoso Networks", "higher yield sorts first");

    let acme_only = repo.get_top_subnets(Some("Acme"), 10).await.unwrap();
    assert_eq!(acme_only.len(), 1);
    assert_eq!(acme_only[0].isp, "Acme ISP");
}
