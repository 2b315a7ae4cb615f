//! TCP connect probing.
//!
//! Uses the operating system's socket API to complete a full handshake.
//! No special privileges are needed, and the probe is easy to spot in the
//! target's logs.

use crate::banner::grab_banner;
use crate::error::BannerResult;
use crate::scanner::traits::PortProbe;
use crate::types::Port;
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Single connect attempt to `host:port`, bounded by `limit`.
///
/// Returns `true` iff the handshake completes in time. Refused, filtered,
/// unreachable and unresolvable all come back as `false`. The connection
/// is closed before returning and never retried.
pub async fn probe(host: &str, port: Port, limit: Duration) -> bool {
    match timeout(limit, TcpStream::connect((host, port.as_u16()))).await {
        Ok(Ok(stream)) => {
            drop(stream);
            true
        }
        Ok(Err(e)) => {
            trace!(host, port = port.as_u16(), error = %e, "connect failed");
            false
        }
        Err(_) => {
            trace!(host, port = port.as_u16(), "connect timed out");
            false
        }
    }
}

/// TCP connect prober for one host.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    timeout: Duration,
}

impl TcpProbe {
    /// Create a new TCP prober.
    ///
    /// # Arguments
    /// * `host` - Hostname or IP address to probe
    /// * `timeout` - Limit for each connect and for each banner read
    pub fn new(host: impl Into<String>, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            timeout,
        }
    }
}

#[async_trait]
impl PortProbe for TcpProbe {
    fn host(&self) -> &str {
        &self.host
    }

    async fn probe(&self, port: Port) -> bool {
        probe(&self.host, port, self.timeout).await
    }

    async fn grab_banner(&self, port: Port) -> BannerResult<String> {
        grab_banner(&self.host, port, self.timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::net::TcpListener;

    #[test]
    fn test_prober_creation() {
        let prober = TcpProbe::new("127.0.0.1", Duration::from_millis(800));
        assert_eq!(prober.host(), "127.0.0.1");
        assert_eq!(prober.timeout, Duration::from_millis(800));
    }

    #[tokio::test]
    async fn test_probe_open_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();

        assert!(probe("127.0.0.1", port, Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn test_probe_closed_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();
        drop(listener);

        assert!(!probe("127.0.0.1", port, Duration::from_millis(200)).await);
    }

    #[tokio::test]
    async fn test_probe_unresolvable_host() {
        let port = Port::new(80).unwrap();
        assert!(!probe("no-such-host.invalid", port, Duration::from_millis(500)).await);
    }

    #[tokio::test]
    async fn test_probe_respects_timeout() {
        // TEST-NET-1 is never routed; the connect either hangs or fails fast.
        let limit = Duration::from_millis(300);
        let start = Instant::now();
        let open = probe("192.0.2.1", Port::new(81).unwrap(), limit).await;

        assert!(!open);
        assert!(start.elapsed() < limit + Duration::from_millis(500));
    }
}
