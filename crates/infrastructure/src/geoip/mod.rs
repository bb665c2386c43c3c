use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use proxyforge_application::ports::{GeoLocator, GeoResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::{instrument, warn};

const BATCH_LIMIT: usize = 100;

/// `ip-api.com` geolocation client. The free tier is rate
/// limited to 45 req/min; batching through `/batch` keeps a full sweep
/// well under that for any realistic pool size. Every failure path
/// degrades to `GeoResult::unknown()` rather than propagating an error —
/// a proxy candidate with unknown geography is still a usable proxy.
pub struct IpApiGeoLocator {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SingleResponse {
    status: String,
    #[serde(rename = "countryCode")]
    country_code: Option<String>,
    country: Option<String>,
    isp: Option<String>,
    org: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BatchResponse {
    query: String,
    status: String,
    #[serde(rename = "countryCode")]
    country_code: Option<String>,
    country: Option<String>,
    isp: Option<String>,
    org: Option<String>,
}

impl IpApiGeoLocator {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("geoip http client"),
            base_url: "http://ip-api.com".to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("geoip http client"),
            base_url,
        }
    }
}

impl Default for IpApiGeoLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeoLocator for IpApiGeoLocator {
    #[instrument(skip(self))]
    async fn lookup(&self, ip: Ipv4Addr) -> GeoResult {
        let url = format!(
            "{}/json/{}?fields=status,country,countryCode,isp,org",
            self.base_url, ip
        );

        let result = async {
            let resp = self.client.get(&url).send().await?;
            resp.json::<SingleResponse>().await
        }
        .await;

        match result {
            Ok(data) if data.status == "success" => GeoResult {
                country: data.country_code.unwrap_or_else(|| "XX".to_string()),
                country_name: data.country.unwrap_or_else(|| "Unknown".to_string()),
                isp: data.isp.unwrap_or_else(|| "Unknown".to_string()),
                org: data.org.unwrap_or_default(),
            },
            Ok(_) => GeoResult::unknown(),
            Err(e) => {
                warn!(%ip, error = %e, "geoip lookup failed");
                GeoResult::unknown()
            }
        }
    }

    #[instrument(skip(self, ips))]
    async fn lookup_batch(&self, ips: &[Ipv4Addr]) -> HashMap<Ipv4Addr, GeoResult> {
        let mut results = HashMap::with_capacity(ips.len());

        for chunk in ips.chunks(BATCH_LIMIT) {
            let payload: Vec<_> = chunk
                .iter()
                .map(|ip| {
                    serde_json::json!({
                        "query": ip.to_string(),
                        "fields": "query,status,country,countryCode,isp,org",
                    })
                })
                .collect();

            let url = format!("{}/batch", self.base_url);
            let response = self.client.post(&url).json(&payload).send().await;

            match response {
                Ok(resp) => match resp.json::<Vec<BatchResponse>>().await {
                    Ok(entries) => {
                        for entry in entries {
                            let Ok(ip) = entry.query.parse::<Ipv4Addr>() else {
                                continue;
                            };
                            let geo = if entry.status == "success" {
                                GeoResult {
                                    country: entry.country_code.unwrap_or_else(|| "XX".to_string()),
                                    country_name: entry.country.unwrap_or_else(|| "Unknown".to_string()),
                                    isp: entry.isp.unwrap_or_else(|| "Unknown".to_string()),
                                    org: entry.org.unwrap_or_default(),
                                }
                            } else {
                                GeoResult::unknown()
                            };
                            results.insert(ip, geo);
                        }
                    }
                    Err(e) => warn!(error = %e, "geoip batch decode failed"),
                },
                Err(e) => warn!(error = %e, "geoip batch request failed"),
            }
        }

        for ip in ips {
            results.entry(*ip).or_insert_with(GeoResult::unknown);
        }

        results
    }
}
