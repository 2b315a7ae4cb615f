//! Probe trait abstraction and per-port results.
//!
//! The coordinator only talks to a `PortProbe`, so tests can swap the real
//! TCP implementation for an in-memory one.

use crate::error::BannerResult;
use crate::services::{classify, Identification};
use crate::types::Port;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Status of a scanned port.
///
/// Refused, filtered and unresolvable are deliberately not told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    Open,
    Closed,
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}

/// Result of scanning a single port.
///
/// Built exactly once by the task that probed the port. For a closed port
/// every descriptive field is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    /// The port number that was scanned.
    pub port: Port,
    /// Whether a TCP connection was accepted within the timeout.
    pub is_open: bool,
    /// Classifier's best guess, or "Unknown".
    pub service: String,
    /// Raw first line the service sent, possibly empty.
    pub banner: String,
    /// Extracted version detail, or "Unknown".
    pub version: String,
}

impl ScanResult {
    /// A port nothing answered on.
    pub fn closed(port: Port) -> Self {
        Self {
            port,
            is_open: false,
            service: String::new(),
            banner: String::new(),
            version: String::new(),
        }
    }

    /// An open port whose banner could not be read.
    pub fn open(port: Port) -> Self {
        let Identification { service, version } = Identification::unknown();
        Self {
            port,
            is_open: true,
            service,
            banner: String::new(),
            version,
        }
    }

    /// An open port with the banner it sent.
    ///
    /// An empty banner carries no evidence, so it is treated like a missing
    /// one and the classifier is skipped.
    pub fn with_banner(port: Port, banner: String) -> Self {
        if banner.is_empty() {
            return Self::open(port);
        }

        let Identification { service, version } = classify(port.as_u16(), &banner);
        Self {
            port,
            is_open: true,
            service,
            banner,
            version,
        }
    }

    pub fn status(&self) -> PortStatus {
        if self.is_open {
            PortStatus::Open
        } else {
            PortStatus::Closed
        }
    }
}

/// One probe target: a host plus a per-connection timeout.
///
/// `probe` decides liveness with a single connect. `grab_banner` opens its
/// own connection; the probe's socket is already gone by then.
#[async_trait]
pub trait PortProbe: Send + Sync {
    /// Host (name or address) being probed.
    fn host(&self) -> &str;

    /// Is anything accepting connections on `port`?
    async fn probe(&self, port: Port) -> bool;

    /// Read the first line the service on `port` sends.
    async fn grab_banner(&self, port: Port) -> BannerResult<String>;
}
