use proxyforge_domain::config::DatabaseConfig;
use proxyforge_infrastructure::database::{create_read_pool, create_write_pool, ensure_database_dir};
use sqlx::SqlitePool;
use tracing::{error, info};

pub async fn init_database(
    database_path: &str,
    database_url: &str,
    cfg: &DatabaseConfig,
) -> anyhow::Result<(SqlitePool, SqlitePool)> {
    info!(database_url, "initializing database");

    ensure_database_dir(database_path)?;

    let write_pool = create_write_pool(database_url, cfg).await.map_err(|e| {
        error!(error = %e, "failed to initialize write pool");
        anyhow::anyhow!(e)
    })?;

    let read_pool = create_read_pool(database_url, cfg).await.map_err(|e| {
        error!(error = %e, "failed to initialize read pool");
        anyhow::anyhow!(e)
    })?;

    info!(
        write_max = cfg.write_pool_max_connections,
        read_max = cfg.read_pool_max_connections,
        "database initialized"
    );

    Ok((write_pool, read_pool))
}
