use proxyforge_domain::errors::DomainError;
use proxyforge_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(config_path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(config_path, overrides).map_err(DomainError::from)?;
    config.validate()?;

    info!(
        config_file = config_path.unwrap_or("default"),
        listen_addr = %config.rotation.listen_addr,
        database = %config.database.path,
        "configuration loaded"
    );

    Ok(config)
}
