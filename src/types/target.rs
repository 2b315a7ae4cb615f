//! Scan target resolution.
//!
//! A target is a hostname or an IP literal. Names are resolved once up front
//! so the scanner does not repeat a DNS lookup for every port.

use serde::Serialize;
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::system_conf::read_system_conf;
use trust_dns_resolver::TokioAsyncResolver;

/// Longest wait for a single DNS query.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);
/// Queries sent per name server before giving up.
const LOOKUP_ATTEMPTS: usize = 1;

/// A host as typed by the operator, plus its address when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanTarget {
    /// The original input (hostname or IP string).
    pub original: String,
    /// The resolved IP address.
    pub ip: Option<IpAddr>,
}

impl ScanTarget {
    /// Resolve `host`, keeping the original text when resolution fails.
    pub async fn resolve(host: &str) -> (Self, Option<TargetError>) {
        let host = host.trim();
        match resolve_host(host).await {
            Ok(ip) => (
                Self {
                    original: host.to_string(),
                    ip: Some(ip),
                },
                None,
            ),
            Err(e) => (
                Self {
                    original: host.to_string(),
                    ip: None,
                },
                Some(e),
            ),
        }
    }

    /// What the scanner should connect to: the address if we have one.
    pub fn connect_host(&self) -> String {
        self.ip
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| self.original.clone())
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ip {
            Some(ip) if self.original != ip.to_string() => {
                write!(f, "{} ({})", self.original, ip)
            }
            _ => write!(f, "{}", self.original),
        }
    }
}

/// Error type for target resolution.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TargetError {
    #[error("empty target")]
    Empty,
    #[error("failed to resolve hostname '{0}': {1}")]
    DnsResolutionFailed(String, String),
    #[error("no IP addresses found for hostname '{0}'")]
    NoAddressesFound(String),
}

/// Resolve a hostname or IP address string to an `IpAddr`.
pub async fn resolve_host(host: &str) -> Result<IpAddr, TargetError> {
    if host.is_empty() {
        return Err(TargetError::Empty);
    }

    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let resolver = system_resolver();

    let response = resolver
        .lookup_ip(host)
        .await
        .map_err(|e| TargetError::DnsResolutionFailed(host.to_string(), e.to_string()))?;

    response
        .iter()
        .next()
        .ok_or_else(|| TargetError::NoAddressesFound(host.to_string()))
}

/// Resolver built from the host's own configuration (`/etc/resolv.conf`,
/// `/etc/hosts`).
///
/// Without a readable system configuration only the hosts file and literal
/// addresses resolve; no public name server is queried in its place.
fn system_resolver() -> TokioAsyncResolver {
    let (config, opts) = read_system_conf().unwrap_or_else(|e| {
        debug!(error = %e, "no system resolver configuration");
        (ResolverConfig::new(), ResolverOpts::default())
    });
    TokioAsyncResolver::tokio(config, bounded(opts))
}

/// Cap the per-query timeout and retries so an unreachable name server
/// cannot hold up a scan for long.
fn bounded(mut opts: ResolverOpts) -> ResolverOpts {
    opts.timeout = opts.timeout.min(LOOKUP_TIMEOUT);
    opts.attempts = opts.attempts.min(LOOKUP_ATTEMPTS);
    opts
}
