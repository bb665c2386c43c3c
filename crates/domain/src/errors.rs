use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid port: {0}")]
    InvalidPort(u32),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),
}
