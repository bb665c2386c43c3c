pub mod database;
pub mod gateway;
pub mod geoip;
pub mod liveness;
pub mod repositories;
pub mod validator;

pub use geoip::IpApiGeoLocator;
pub use liveness::TcpLivenessProber;
pub use repositories::{SqliteProxyCatalog, SqliteSubnetIntelRepository};
pub use validator::HttpValidator;
