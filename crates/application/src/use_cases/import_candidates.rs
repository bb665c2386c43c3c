use std::collections::HashSet;
use std::net::Ipv4Addr;

use proxyforge_domain::DomainError;
use serde::Deserialize;
use tracing::{instrument, warn};

/// Parses the candidate feed formats an ingest source may hand the
/// pipeline: plain `ip:port` lines, masscan-style
/// `open tcp <port> <ip> <epoch>` lines, and a JSON array of
/// `{"ip": ..., "port": ...}` objects from the port-scan producer.
///
/// De-duplicates across the whole input; unparseable lines are logged and
/// skipped rather than failing the batch.
#[derive(Debug, Default)]
pub struct ImportCandidatesUseCase;

#[derive(Debug, Deserialize)]
struct JsonCandidate {
    ip: String,
    port: u16,
}

impl ImportCandidatesUseCase {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip(self, input))]
    pub fn execute(&self, input: &str) -> Result<Vec<(Ipv4Addr, u16)>, DomainError> {
        let trimmed = input.trim_start();
        let parsed = if trimmed.starts_with('[') {
            self.parse_json(trimmed)?
        } else {
            self.parse_lines(input)
        };

        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(parsed.len());
        for candidate in parsed {
            if seen.insert(candidate) {
                out.push(candidate);
            }
        }
        Ok(out)
    }

    fn parse_json(&self, input: &str) -> Result<Vec<(Ipv4Addr, u16)>, DomainError> {
        let entries: Vec<JsonCandidate> = serde_json::from_str(input)
            .map_err(|e| DomainError::ConfigInvalid(format!("invalid candidate JSON: {e}")))?;

        Ok(entries
            .into_iter()
            .filter_map(|c| match c.ip.parse::<Ipv4Addr>() {
                Ok(ip) => Some((ip, c.port)),
                Err(_) => {
                    warn!(ip = %c.ip, "skipping candidate with unparseable ip");
                    None
                }
            })
            .collect())
    }

    fn parse_lines(&self, input: &str) -> Vec<(Ipv4Addr, u16)> {
        input
            .lines()
            .filter_map(|line| self.parse_line(line.trim()))
            .collect()
    }

    fn parse_line(&self, line: &str) -> Option<(Ipv4Addr, u16)> {
        if line.is_empty() {
            return None;
        }

        if let Some(rest) = line.strip_prefix("open tcp ") {
            let mut fields = rest.split_whitespace();
            let port: u16 = fields.next()?.parse().ok()?;
            let ip: Ipv4Addr = fields.next()?.parse().ok()?;
            return Some((ip, port));
        }

        let (ip_str, port_str) = line.rsplit_once(':')?;
        let ip: Ipv4Addr = ip_str.parse().ok()?;
        let port: u16 = port_str.parse().ok()?;
        Some((ip, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ip_colon_port_lines() {
        let uc = ImportCandidatesUseCase::new();
        let out = uc.execute("1.2.3.4:8080\n5.6.7.8:1080\n").unwrap();
        assert_eq!(
            out,
            vec![
                ("1.2.3.4".parse().unwrap(), 8080),
                ("5.6.7.8".parse().unwrap(), 1080),
            ]
        );
    }

    #[test]
    fn parses_masscan_open_tcp_lines() {
        let uc = ImportCandidatesUseCase::new();
        let out = uc
            .execute("open tcp 3128 9.9.9.9 1690000000\n")
            .unwrap();
        assert_eq!(out, vec![("9.9.9.9".parse().unwrap(), 3128)]);
    }

    #[test]
    fn parses_json_array() {
        let uc = ImportCandidatesUseCase::new();
        let out = uc
            .execute(r#"[{"ip": "1.1.1.1", "port": 80}, {"ip": "2.2.2.2", "port": 443}]"#)
            .unwrap();
        assert_eq!(
            out,
            vec![
                ("1.1.1.1".parse().unwrap(), 80),
                ("2.2.2.2".parse().unwrap(), 443),
            ]
        );
    }

    #[test]
    fn deduplicates_across_input() {
        let uc = ImportCandidatesUseCase::new();
        let out = uc
            .execute("1.2.3.4:80\n1.2.3.4:80\nopen tcp 80 1.2.3.4 1\n")
            .unwrap();
        assert_eq!(out, vec![("1.2.3.4".parse().unwrap(), 80)]);
    }

    #[test]
    fn skips_unparseable_lines() {
        let uc = ImportCandidatesUseCase::new();
        let out = uc.execute("garbage\n1.2.3.4:80\n").unwrap();
        assert_eq!(out, vec![("1.2.3.4".parse().unwrap(), 80)]);
    }
}
