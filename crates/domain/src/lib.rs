//! Proxyforge domain layer
pub mod config;
pub mod errors;
pub mod pool_assignment;
pub mod proxy_record;
pub mod subnet_intel;
pub mod validators;

pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use pool_assignment::PoolBucket;
pub use proxy_record::{Anonymity, Protocol, ProxyRecord};
pub use subnet_intel::{ScanSpec, SubnetIntel};
