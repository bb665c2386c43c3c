pub mod proxy_catalog_repository;
pub mod subnet_intel_repository;

pub use proxy_catalog_repository::SqliteProxyCatalog;
pub use subnet_intel_repository::SqliteSubnetIntelRepository;
