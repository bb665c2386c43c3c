pub mod geo_locator;
pub mod liveness_prober;
pub mod protocol_validator;
pub mod proxy_catalog;
pub mod subnet_intel_repository;

pub use geo_locator::{GeoLocator, GeoResult};
pub use liveness_prober::LivenessProber;
pub use protocol_validator::ProtocolValidator;
pub use proxy_catalog::ProxyCatalog;
pub use subnet_intel_repository::SubnetIntelRepository;
