use std::net::Ipv4Addr;

use crate::errors::DomainError;

pub fn validate_ip(s: &str) -> Result<Ipv4Addr, DomainError> {
    s.parse::<Ipv4Addr>()
        .map_err(|_| DomainError::InvalidIpAddress(s.to_string()))
}

pub fn validate_port(port: u32) -> Result<u16, DomainError> {
    if port == 0 || port > u16::MAX as u32 {
        return Err(DomainError::InvalidPort(port));
    }
    Ok(port as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_port() {
        assert!(validate_port(0).is_err());
        assert!(validate_port(70_000).is_err());
        assert!(validate_port(8080).is_ok());
    }

    #[test]
    fn rejects_malformed_ip() {
        assert!(validate_ip("not-an-ip").is_err());
        assert!(validate_ip("1.2.3.4").is_ok());
    }
}
