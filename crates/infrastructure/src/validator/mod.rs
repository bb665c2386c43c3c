use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use proxyforge_application::ports::{GeoLocator, ProtocolValidator};
use proxyforge_domain::{Anonymity, Protocol, ProxyRecord};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, instrument, warn};

const STRICT_URL: &str = "https://www.google.com";
const FALLBACK_URL: &str = "http://httpbin.org/get";
const EGRESS_URL: &str = "https://api.ipify.org";

const PROXY_IDENTIFYING_HEADERS: &[&str] = &[
    "via",
    "x-forwarded-for",
    "x-forwarded",
    "forwarded-for",
    "forwarded",
    "client-ip",
    "x-real-ip",
];

/// Protocol Validator, using a two-pass probe strategy (strict HTTPS,
/// fallback plain HTTP). A fresh `reqwest::Client` is built per candidate
/// with a `reqwest::Proxy` pointed at `protocol://ip:port` — reqwest
/// natively speaks the `http`, `socks4` and `socks5` proxy schemes.
pub struct HttpValidator {
    direct_client: Client,
    geo: Arc<dyn GeoLocator>,
    timeout: Duration,
    egress_ip: OnceCell<Option<String>>,
}

impl HttpValidator {
    pub fn new(geo: Arc<dyn GeoLocator>, timeout: Duration) -> Self {
        Self {
            direct_client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("direct http client"),
            geo,
            timeout,
            egress_ip: OnceCell::new(),
        }
    }

    async fn own_egress_ip(&self) -> Option<&str> {
        self.egress_ip
            .get_or_init(|| async {
                match self.direct_client.get(EGRESS_URL).send().await {
                    Ok(resp) => resp.text().await.ok().map(|s| s.trim().to_string()),
                    Err(e) => {
                        warn!(error = %e, "failed to resolve own egress ip");
                        None
                    }
                }
            })
            .await
            .as_deref()
    }

    fn proxied_client(&self, ip: Ipv4Addr, port: u16, protocol: Protocol) -> Option<Client> {
        let proxy_url = format!("{}://{}:{}", protocol.as_str(), ip, port);
        let proxy = reqwest::Proxy::all(&proxy_url).ok()?;
        Client::builder()
            .proxy(proxy)
            .timeout(self.timeout)
            .build()
            .ok()
    }

    async fn probe(client: &Client, url: &str) -> Option<()> {
        let resp = client.get(url).send().await.ok()?;
        matches!(
            resp.status(),
            StatusCode::OK | StatusCode::FOUND | StatusCode::MOVED_PERMANENTLY
        )
        .then_some(())
    }

    async fn classify_anonymity(&self, client: &Client) -> Anonymity {
        let Ok(resp) = client.get(FALLBACK_URL).send().await else {
            return Anonymity::Unknown;
        };
        let Ok(body) = resp.json::<Value>().await else {
            return Anonymity::Unknown;
        };

        let Some(headers) = body.get("headers").and_then(Value::as_object) else {
            return Anonymity::Unknown;
        };

        let matched: Vec<&str> = headers
            .keys()
            .map(|k| k.as_str())
            .filter(|k| PROXY_IDENTIFYING_HEADERS.contains(&k.to_lowercase().as_str()))
            .collect();

        if matched.is_empty() {
            return Anonymity::Elite;
        }

        if let Some(own_ip) = self.own_egress_ip().await {
            let leaks_own_ip = matched.iter().any(|h| {
                headers
                    .get(*h)
                    .and_then(Value::as_str)
                    .map(|v| v.contains(own_ip))
                    .unwrap_or(false)
            });
            if leaks_own_ip {
                return Anonymity::Transparent;
            }
        }

        Anonymity::Anonymous
    }
}

#[async_trait]
impl ProtocolValidator for HttpValidator {
    #[instrument(skip(self))]
    async fn check_proxy(
        &self,
        ip: Ipv4Addr,
        port: u16,
        protocol: Protocol,
    ) -> Option<ProxyRecord> {
        let client = self.proxied_client(ip, port, protocol)?;
        let start = Instant::now();

        let passed = if Self::probe(&client, STRICT_URL).await.is_some() {
            true
        } else {
            Self::probe(&client, FALLBACK_URL).await.is_some()
        };

        if !passed {
            debug!(%ip, port, %protocol, "proxy failed both validation passes");
            return None;
        }

        let response_time_ms = start.elapsed().as_millis() as i64;
        let anonymity = self.classify_anonymity(&client).await;
        let geo = self.geo.lookup(ip).await;

        let mut record = ProxyRecord::new(ip, port, protocol);
        record.anonymity = anonymity;
        record.country = geo.country;
        record.isp = geo.isp;
        record.org = geo.org;
        record.response_time_ms = response_time_ms;
        Some(record)
    }

    #[instrument(skip(self))]
    async fn validate_all_protocols(&self, ip: Ipv4Addr, port: u16) -> Vec<ProxyRecord> {
        let (http, socks4, socks5) = tokio::join!(
            self.check_proxy(ip, port, Protocol::Http),
            self.check_proxy(ip, port, Protocol::Socks4),
            self.check_proxy(ip, port, Protocol::Socks5),
        );

        [socks5, socks4, http].into_iter().flatten().collect()
    }
}
