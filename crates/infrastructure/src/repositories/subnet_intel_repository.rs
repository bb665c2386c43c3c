use std::net::Ipv4Addr;

use async_trait::async_trait;
use proxyforge_application::ports::SubnetIntelRepository;
use proxyforge_domain::proxy_record::subnet_prefix_of;
use proxyforge_domain::{DomainError, SubnetIntel};
use sqlx::SqlitePool;
use tracing::{error, instrument};

#[derive(sqlx::FromRow)]
struct SubnetRow {
    subnet_prefix: String,
    isp: String,
    total_scanned: i64,
    total_found: i64,
    yield_score: f64,
    last_updated: String,
}

pub struct SqliteSubnetIntelRepository {
    pool: SqlitePool,
}

impl SqliteSubnetIntelRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_intel(row: SubnetRow) -> SubnetIntel {
        SubnetIntel {
            subnet_prefix: row.subnet_prefix,
            isp: row.isp,
            total_scanned: row.total_scanned,
            total_found: row.total_found,
            yield_score: row.yield_score,
            last_updated: row
                .last_updated
                .parse()
                .unwrap_or_else(|_| chrono::Utc::now()),
        }
    }
}

#[async_trait]
impl SubnetIntelRepository for SqliteSubnetIntelRepository {
    #[instrument(skip(self))]
    async fn update_subnet_intel(
        &self,
        ip: Ipv4Addr,
        isp: &str,
        found_count: i64,
    ) -> Result<(), DomainError> {
        let prefix = subnet_prefix_of(ip);

        sqlx::query(
            "INSERT INTO subnet_intel (subnet_prefix, isp, total_found, yield_score, last_updated)
             VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(subnet_prefix) DO UPDATE SET
                isp = excluded.isp,
                total_found = total_found + excluded.total_found,
                yield_score = yield_score + excluded.yield_score,
                last_updated = CURRENT_TIMESTAMP",
        )
        .bind(&prefix)
        .bind(isp)
        .bind(found_count)
        .bind(found_count as f64)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, prefix = %prefix, "failed to update subnet intel");
            DomainError::StorageUnavailable(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn record_scanned(&self, subnet_prefix: &str, count: i64) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO subnet_intel (subnet_prefix, total_scanned, last_updated)
             VALUES (?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(subnet_prefix) DO UPDATE SET
                total_scanned = total_scanned + excluded.total_scanned,
                last_updated = CURRENT_TIMESTAMP",
        )
        .bind(subnet_prefix)
        .bind(count)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, subnet_prefix, "failed to record scanned count");
            DomainError::StorageUnavailable(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_top_subnets(
        &self,
        isp: Option<&str>,
        limit: i64,
    ) -> Result<Vec<SubnetIntel>, DomainError> {
        let rows = match isp {
            Some(filter) => {
                let pattern = format!("%{filter}%");
                sqlx::query_as::<_, SubnetRow>(
                    "SELECT subnet_prefix, isp, total_scanned, total_found, yield_score, last_updated
                     FROM subnet_intel WHERE isp LIKE ?
                     ORDER BY yield_score DESC LIMIT ?",
                )
                .bind(pattern)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => sqlx::query_as::<_, SubnetRow>(
                "SELECT subnet_prefix, isp, total_scanned, total_found, yield_score, last_updated
                 FROM subnet_intel
                 ORDER BY yield_score DESC LIMIT ?",
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await,
        }
        .map_err(|e| {
            error!(error = %e, "failed to query top subnets");
            DomainError::StorageUnavailable(e.to_string())
        })?;

        Ok(rows.into_iter().map(Self::row_to_intel).collect())
    }
}
