//! Scanner module - coordinates concurrent port probing.
//!
//! One task is spawned per port. Each task probes, and on an open port grabs
//! a banner and classifies it. Admission to the network is bounded by a
//! `ConcurrencyGate`; results flow back over a channel sized to the port
//! count and are drained only after every task has finished.

pub mod gate;
pub mod rate_limiter;
pub mod tcp;
pub mod traits;

use crate::types::{Port, PortRange};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub use gate::{ConcurrencyGate, DEFAULT_CONCURRENCY};
pub use rate_limiter::RateLimiter;
pub use tcp::{probe, TcpProbe};
pub use traits::{PortProbe, PortStatus, ScanResult};

/// Configuration for a scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Hostname or IP address to probe.
    pub host: String,
    /// Inclusive port range.
    pub ports: PortRange,
    /// Per-connection timeout (connect and banner read each).
    pub timeout: Duration,
    /// Maximum simultaneous in-flight connections.
    pub concurrency: usize,
    /// Connection attempts per second, 0 for unlimited.
    pub rate_limit: u32,
    /// Draw a progress bar while scanning.
    pub show_progress: bool,
}

impl ScanConfig {
    /// Create a scan configuration with default timeout and ceiling.
    pub fn new(host: impl Into<String>, ports: PortRange) -> Self {
        Self {
            host: host.into(),
            ports,
            timeout: Duration::from_millis(800),
            concurrency: DEFAULT_CONCURRENCY,
            rate_limit: 0,
            show_progress: false,
        }
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the concurrency ceiling.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the rate limit.
    pub fn with_rate_limit(mut self, rate_limit: u32) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Enable the progress bar.
    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }
}

/// Complete scan results for one invocation.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Host as given to the scan.
    pub host: String,
    /// Address the ports were probed on, when the host was resolved.
    pub resolved: Option<IpAddr>,
    pub start_port: Port,
    pub end_port: Port,
    pub started_at: DateTime<Utc>,
    pub ports_scanned: usize,
    pub open_ports: usize,
    pub duration_ms: u64,
    /// Open ports only, in completion order.
    pub results: Vec<ScanResult>,
}

impl ScanReport {
    /// Results ordered by port number.
    pub fn sorted_results(&self) -> Vec<&ScanResult> {
        let mut sorted: Vec<&ScanResult> = self.results.iter().collect();
        sorted.sort_by_key(|r| r.port);
        sorted
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Per-scan knobs shared by every task.
#[derive(Clone)]
pub struct ScanOptions {
    pub concurrency: usize,
    pub rate_limiter: Option<RateLimiter>,
    pub progress: Option<ProgressBar>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            rate_limiter: None,
            progress: None,
        }
    }
}

/// Scan `[start, end]` on `host` with the default ceiling of 100.
///
/// Returns only open ports, in no particular order.
pub async fn scan(host: &str, start: Port, end: Port, timeout: Duration) -> Vec<ScanResult> {
    let ports = match PortRange::new(start, end) {
        Ok(ports) => ports,
        Err(e) => {
            warn!(host, error = %e, "nothing to scan");
            return Vec::new();
        }
    };

    let prober = Arc::new(TcpProbe::new(host, timeout));
    scan_ports(prober, ports, ScanOptions::default()).await
}

/// Execute a complete scan and wrap the open ports in a report.
pub async fn run_scan(config: ScanConfig) -> ScanReport {
    let started_at = Utc::now();
    let start_time = Instant::now();

    let progress = config.show_progress.then(|| {
        let pb = ProgressBar::new(config.ports.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        ) {
            pb.set_style(style.progress_chars("=>-"));
        }
        pb
    });

    let options = ScanOptions {
        concurrency: config.concurrency,
        rate_limiter: RateLimiter::per_second(config.rate_limit),
        progress: progress.clone(),
    };

    let prober = Arc::new(TcpProbe::new(config.host.clone(), config.timeout));
    let results = scan_ports(prober, config.ports, options).await;

    if let Some(pb) = progress {
        pb.finish_with_message("Scan complete");
    }

    ScanReport {
        resolved: config.host.parse().ok(),
        host: config.host,
        start_port: config.ports.start(),
        end_port: config.ports.end(),
        started_at,
        ports_scanned: config.ports.len(),
        open_ports: results.len(),
        duration_ms: start_time.elapsed().as_millis() as u64,
        results,
    }
}

/// Probe every port in `ports` through `prober`, bounded by `options`.
///
/// Per-port failures are absorbed; the result holds each open port exactly
/// once and nothing else.
pub async fn scan_ports<P>(prober: Arc<P>, ports: PortRange, options: ScanOptions) -> Vec<ScanResult>
where
    P: PortProbe + 'static,
{
    let gate = Arc::new(ConcurrencyGate::new(options.concurrency));
    let (tx, mut rx) = mpsc::channel(ports.len());

    debug!(
        host = prober.host(),
        ports = %ports,
        ceiling = gate.ceiling(),
        "starting scan"
    );

    let handles: Vec<_> = ports
        .iter()
        .map(|port| {
            let prober = Arc::clone(&prober);
            let gate = Arc::clone(&gate);
            let limiter = options.rate_limiter.clone();
            let progress = options.progress.clone();
            let tx = tx.clone();

            tokio::spawn(async move {
                let result = scan_port(prober.as_ref(), &gate, limiter.as_ref(), port).await;

                if let Some(ref pb) = progress {
                    pb.inc(1);
                    if result.is_open {
                        pb.set_message(format!("Found open port: {}", port));
                    }
                }

                // Capacity equals the port count, so this never waits.
                let _ = tx.send(result).await;
            })
        })
        .collect();
    drop(tx);

    for joined in join_all(handles).await {
        if let Err(e) = joined {
            warn!(error = %e, "probe task failed");
        }
    }

    let mut open = Vec::new();
    while let Some(result) = rx.recv().await {
        if result.is_open {
            open.push(result);
        }
    }
    open
}

/// Probe one port, then grab and classify its banner if it is open.
///
/// The probe and the banner grab each take their own gate slot, so no task
/// sits on a slot between phases.
async fn scan_port<P>(
    prober: &P,
    gate: &ConcurrencyGate,
    limiter: Option<&RateLimiter>,
    port: Port,
) -> ScanResult
where
    P: PortProbe + ?Sized,
{
    if let Some(limiter) = limiter {
        limiter.wait().await;
    }

    let open = {
        let Some(_slot) = gate.enter().await else {
            return ScanResult::closed(port);
        };
        prober.probe(port).await
    };

    if !open {
        return ScanResult::closed(port);
    }

    let banner = {
        let Some(_slot) = gate.enter().await else {
            return ScanResult::open(port);
        };
        prober.grab_banner(port).await
    };

    match banner {
        Ok(line) => ScanResult::with_banner(port, line),
        Err(e) => {
            debug!(port = port.as_u16(), error = %e, "no banner");
            ScanResult::open(port)
        }
    }
}
