use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use proxyforge_application::ports::LivenessProber;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, instrument};

const READ_CAP: usize = 1024;

/// Cheap stage-1 filter: a bare TCP connect, followed by a best-effort
/// `HEAD / HTTP/1.0` write and a capped read, discarding candidates that
/// accept SYN but never converse (scan false positives, tarpits, peers
/// that reset mid-read) before the expensive protocol probes run.
pub struct TcpLivenessProber {
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl TcpLivenessProber {
    pub fn new(connect_timeout: Duration, read_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            read_timeout,
        }
    }
}

#[async_trait]
impl LivenessProber for TcpLivenessProber {
    #[instrument(skip(self))]
    async fn verify(&self, ip: Ipv4Addr, port: u16) -> bool {
        let addr = SocketAddr::from((ip, port));
        let mut stream = match timeout(self.connect_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                debug!(%ip, port, error = %e, "liveness connect failed");
                return false;
            }
            Err(_) => {
                debug!(%ip, port, "liveness connect timed out");
                return false;
            }
        };

        let probe = timeout(self.read_timeout, async {
            stream.write_all(b"HEAD / HTTP/1.0\r\n\r\n").await?;
            let mut buf = [0u8; READ_CAP];
            stream.read(&mut buf).await
        })
        .await;

        match probe {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                debug!(%ip, port, error = %e, "liveness probe reset mid-read");
                false
            }
            Err(_) => {
                debug!(%ip, port, "liveness probe read timed out");
                false
            }
        }
    }
}
