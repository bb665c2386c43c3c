use std::net::Ipv4Addr;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use proxyforge_application::ports::ProxyCatalog;
use proxyforge_domain::{Anonymity, DomainError, Protocol, ProxyRecord};
use sqlx::SqlitePool;
use tracing::{error, instrument};

#[derive(sqlx::FromRow)]
struct ProxyRow {
    ip: String,
    port: i64,
    protocol: String,
    anonymity: String,
    country: String,
    region: String,
    city: String,
    isp: String,
    org: String,
    response_time_ms: i64,
    last_checked: String,
    health_score: i64,
    success_count: i64,
    fail_count: i64,
}

pub struct SqliteProxyCatalog {
    pool: SqlitePool,
}

impl SqliteProxyCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: ProxyRow) -> Result<ProxyRecord, DomainError> {
        let ProxyRow {
            ip,
            port,
            protocol,
            anonymity,
            country,
            region,
            city,
            isp,
            org,
            response_time_ms,
            last_checked,
            health_score,
            success_count,
            fail_count,
        } = row;

        Ok(ProxyRecord {
            ip: Ipv4Addr::from_str(&ip)
                .map_err(|_| DomainError::InvalidIpAddress(ip.clone()))?,
            port: port as u16,
            protocol: protocol
                .parse::<Protocol>()
                .map_err(DomainError::ConfigInvalid)?,
            anonymity: anonymity.parse::<Anonymity>().unwrap_or(Anonymity::Unknown),
            country,
            region,
            city,
            isp,
            org,
            response_time_ms,
            last_checked: DateTime::<Utc>::from_str(&last_checked).unwrap_or_else(|_| Utc::now()),
            health_score: health_score as i32,
            success_count,
            fail_count,
        })
    }
}

#[async_trait]
impl ProxyCatalog for SqliteProxyCatalog {
    #[instrument(skip(self, record))]
    async fn save_proxy(&self, record: &ProxyRecord) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO proxies
             (ip, port, protocol, anonymity, country, region, city, isp, org,
              response_time_ms, last_checked, health_score, success_count, fail_count)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(ip, port) DO UPDATE SET
                protocol = excluded.protocol,
                anonymity = excluded.anonymity,
                country = excluded.country,
                region = excluded.region,
                city = excluded.city,
                isp = excluded.isp,
                org = excluded.org,
                response_time_ms = excluded.response_time_ms,
                last_checked = excluded.last_checked",
        )
        .bind(record.ip.to_string())
        .bind(record.port as i64)
        .bind(record.protocol.as_str())
        .bind(record.anonymity.as_str())
        .bind(&record.country)
        .bind(&record.region)
        .bind(&record.city)
        .bind(&record.isp)
        .bind(&record.org)
        .bind(record.response_time_ms)
        .bind(record.last_checked.to_rfc3339())
        .bind(record.health_score as i64)
        .bind(record.success_count)
        .bind(record.fail_count)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, ip = %record.ip, port = record.port, "failed to save proxy");
            DomainError::StorageUnavailable(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_proxies(
        &self,
        protocol: Option<Protocol>,
        limit: i64,
    ) -> Result<Vec<ProxyRecord>, DomainError> {
        let rows = match protocol {
            Some(p) => sqlx::query_as::<_, ProxyRow>(
                "SELECT ip, port, protocol, anonymity, country, region, city, isp, org,
                        response_time_ms, last_checked, health_score, success_count, fail_count
                 FROM proxies WHERE protocol = ?
                 ORDER BY response_time_ms ASC LIMIT ?",
            )
            .bind(p.as_str())
            .bind(limit)
            .fetch_all(&self.pool)
            .await,
            None => sqlx::query_as::<_, ProxyRow>(
                "SELECT ip, port, protocol, anonymity, country, region, city, isp, org,
                        response_time_ms, last_checked, health_score, success_count, fail_count
                 FROM proxies
                 ORDER BY response_time_ms ASC LIMIT ?",
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await,
        }
        .map_err(|e| {
            error!(error = %e, "failed to query proxies");
            DomainError::StorageUnavailable(e.to_string())
        })?;

        rows.into_iter().map(Self::row_to_record).collect()
    }

    #[instrument(skip(self))]
    async fn delete_proxy(&self, ip: Ipv4Addr, port: u16) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM proxies WHERE ip = ? AND port = ?")
            .bind(ip.to_string())
            .bind(port as i64)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, %ip, port, "failed to delete proxy");
                DomainError::StorageUnavailable(e.to_string())
            })?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_health(&self, ip: Ipv4Addr, port: u16, working: bool) -> Result<(), DomainError> {
        let now = Utc::now().to_rfc3339();
        let query = if working {
            "UPDATE proxies SET health_score = MIN(100, health_score + 10),
                success_count = success_count + 1, last_checked = ?
             WHERE ip = ? AND port = ?"
        } else {
            "UPDATE proxies SET health_score = MAX(0, health_score - 20),
                fail_count = fail_count + 1, last_checked = ?
             WHERE ip = ? AND port = ?"
        };

        sqlx::query(query)
            .bind(&now)
            .bind(ip.to_string())
            .bind(port as i64)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, %ip, port, "failed to update health");
                DomainError::StorageUnavailable(e.to_string())
            })?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_pool_candidates(
        &self,
        min_health: i32,
        limit: i64,
    ) -> Result<Vec<ProxyRecord>, DomainError> {
        let rows = sqlx::query_as::<_, ProxyRow>(
            "SELECT ip, port, protocol, anonymity, country, region, city, isp, org,
                    response_time_ms, last_checked, health_score, success_count, fail_count
             FROM proxies WHERE health_score > ?
             ORDER BY response_time_ms ASC LIMIT ?",
        )
        .bind(min_health as i64)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to query pool candidates");
            DomainError::StorageUnavailable(e.to_string())
        })?;

        rows.into_iter().map(Self::row_to_record).collect()
    }

    #[instrument(skip(self))]
    async fn cleanup_below_threshold(&self, threshold: i32) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM proxies WHERE health_score < ?")
            .bind(threshold as i64)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "failed to cleanup dead proxies");
                DomainError::StorageUnavailable(e.to_string())
            })?;
        Ok(result.rows_affected())
    }
}
