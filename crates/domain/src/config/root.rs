use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    ConfigError, DatabaseConfig, LifecycleConfig, LoggingConfig, RotationConfig, ScanningConfig,
    VerificationConfig,
};
use crate::errors::DomainError;

/// CLI-supplied overrides applied after the config file is parsed.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub database_path: Option<String>,
    pub listen_addr: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scanning: ScanningConfig,
    #[serde(default)]
    pub verification: VerificationConfig,
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load from `path`, falling back to built-in defaults if `path` is
    /// `None`, then apply `overrides`.
    pub fn load(path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };

        if let Some(db_path) = overrides.database_path {
            config.database.path = db_path;
        }
        if let Some(listen_addr) = overrides.listen_addr {
            config.rotation.listen_addr = listen_addr;
        }
        if let Some(level) = overrides.log_level {
            config.logging.level = level;
        }

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Structural sanity checks that do not require I/O.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.rotation.pool_size == 0 {
            return Err(DomainError::ConfigInvalid(
                "rotation.pool_size must be at least 1".to_string(),
            ));
        }
        if self.verification.max_concurrency == 0 {
            return Err(DomainError::ConfigInvalid(
                "verification.max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.lifecycle.evict_threshold < 0 || self.lifecycle.evict_threshold > 100 {
            return Err(DomainError::ConfigInvalid(
                "lifecycle.evict_threshold must be within [0, 100]".to_string(),
            ));
        }
        if self.rotation.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(DomainError::ConfigInvalid(format!(
                "rotation.listen_addr is not a valid socket address: {}",
                self.rotation.listen_addr
            )));
        }
        for cidr in &self.scanning.cidrs {
            if cidr.parse::<ipnetwork::Ipv4Network>().is_err() {
                return Err(DomainError::ConfigInvalid(format!(
                    "scanning.cidrs entry is not a valid IPv4 CIDR: {cidr}"
                )));
            }
        }
        Ok(())
    }

    pub fn database_url(&self) -> String {
        format!("sqlite://{}", self.database.path)
    }
}

/// Ensure the parent directory of the configured database path exists.
pub fn ensure_parent_dir(path: &str) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_pool_size() {
        let mut config = Config::default();
        config.rotation.pool_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_cidr() {
        let mut config = Config::default();
        config.scanning.cidrs.push("not-a-cidr".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn overrides_apply_over_defaults() {
        let overrides = CliOverrides {
            database_path: Some("/tmp/other.db".to_string()),
            listen_addr: None,
            log_level: None,
        };
        let config = Config::load(None, overrides).unwrap();
        assert_eq!(config.database.path, "/tmp/other.db");
    }
}
