use std::sync::Arc;
use std::time::Duration;

use proxyforge_application::ports::{
    GeoLocator, LivenessProber, ProtocolValidator, ProxyCatalog, SubnetIntelRepository,
};
use proxyforge_application::use_cases::{
    CleanupDeadProxiesUseCase, GenerateSmartConfigUseCase, GetTopSubnetsUseCase,
    ImportCandidatesUseCase, ReverifyRecordUseCase, ValidateCandidateUseCase,
};
use proxyforge_application::ValidationPipeline;
use proxyforge_domain::{CliOverrides, Config};
use proxyforge_infrastructure::gateway::HotPool;
use proxyforge_infrastructure::{HttpValidator, IpApiGeoLocator, SqliteProxyCatalog, SqliteSubnetIntelRepository, TcpLivenessProber};

use crate::bootstrap::{init_database, load_config};

/// Wires every port to its SQLite/HTTP adapter and holds the constructed
/// use cases in a single context struct, sized to this system's port count.
pub struct AppContext {
    pub config: Config,
    pub catalog: Arc<dyn ProxyCatalog>,
    pub subnet_intel: Arc<dyn SubnetIntelRepository>,
    pub geo: Arc<dyn GeoLocator>,
    pub liveness: Arc<dyn LivenessProber>,
    pub validator: Arc<dyn ProtocolValidator>,
}

impl AppContext {
    pub async fn bootstrap(
        config_path: Option<&str>,
        overrides: CliOverrides,
    ) -> anyhow::Result<Self> {
        let config = load_config(config_path, overrides)?;

        let (write_pool, read_pool) = init_database(
            &config.database.path,
            &config.database_url(),
            &config.database,
        )
        .await?;

        let catalog: Arc<dyn ProxyCatalog> = Arc::new(SqliteProxyCatalog::new(write_pool.clone()));
        let subnet_intel: Arc<dyn SubnetIntelRepository> =
            Arc::new(SqliteSubnetIntelRepository::new(write_pool));
        let geo: Arc<dyn GeoLocator> = Arc::new(IpApiGeoLocator::new());
        let liveness: Arc<dyn LivenessProber> = Arc::new(TcpLivenessProber::new(
            Duration::from_secs(config.verification.liveness_timeout_secs),
            Duration::from_secs(config.verification.liveness_read_timeout_secs),
        ));
        let validator: Arc<dyn ProtocolValidator> = Arc::new(HttpValidator::new(
            geo.clone(),
            Duration::from_secs(config.verification.timeout_secs),
        ));

        // read_pool is reserved for the gateway's pool-refill reads once the
        // gateway and write paths are split across processes; the in-process
        // CLI currently shares the write pool for simplicity.
        let _ = read_pool;

        Ok(Self {
            config,
            catalog,
            subnet_intel,
            geo,
            liveness,
            validator,
        })
    }

    pub fn import_candidates_use_case(&self) -> ImportCandidatesUseCase {
        ImportCandidatesUseCase::new()
    }

    pub fn validation_pipeline(&self) -> ValidationPipeline {
        let validate = Arc::new(ValidateCandidateUseCase::new(
            self.liveness.clone(),
            self.validator.clone(),
            self.catalog.clone(),
            self.subnet_intel.clone(),
        ));
        ValidationPipeline::new(validate, self.config.verification.max_concurrency)
    }

    pub fn reverify_use_case(&self) -> Arc<ReverifyRecordUseCase> {
        Arc::new(ReverifyRecordUseCase::new(
            self.validator.clone(),
            self.catalog.clone(),
        ))
    }

    pub fn cleanup_use_case(&self) -> Arc<CleanupDeadProxiesUseCase> {
        Arc::new(CleanupDeadProxiesUseCase::new(self.catalog.clone()))
    }

    pub fn get_top_subnets_use_case(&self) -> GetTopSubnetsUseCase {
        GetTopSubnetsUseCase::new(self.subnet_intel.clone())
    }

    pub fn generate_smart_config_use_case(&self) -> GenerateSmartConfigUseCase {
        let ports: Vec<u16> = self
            .config
            .scanning
            .default_ports
            .split(',')
            .filter_map(|p| p.trim().parse().ok())
            .collect();
        GenerateSmartConfigUseCase::new(self.subnet_intel.clone(), self.config.scanning.rate, ports)
    }

    pub fn hot_pool(&self) -> Arc<HotPool> {
        Arc::new(HotPool::new(
            self.catalog.clone(),
            self.config.rotation.pool_size as i64,
            self.config.rotation.min_pool_health,
            self.config.rotation.eviction_threshold,
            Duration::from_secs(self.config.rotation.health_check_timeout_secs),
        ))
    }
}
