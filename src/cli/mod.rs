//! Command-line interface for bannerscan.
//!
//! Flag definitions live here; the scan command and the interactive
//! re-scan prompt live in submodules.

mod rescan;
mod scan;

pub use rescan::RescanPrompt;

use crate::output::OutputFormat;
use crate::types::{Port, PortError, PortRange};
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use std::path::PathBuf;

/// Usage line shown next to argument errors.
pub const USAGE: &str = "bannerscan --host <HOST> [--start <PORT>] [--end <PORT>] [--timeout <MS>]";

/// Probe a TCP port range and identify services from their banners.
#[derive(Parser, Debug)]
#[command(name = "bannerscan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Concurrent TCP port scanner with banner grabbing", long_about = None)]
pub struct Cli {
    /// Target host name or IP address
    #[arg(long, value_name = "HOST", value_parser = parse_host)]
    pub host: String,

    /// First port of the range
    #[arg(long, value_name = "PORT", default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub start: u16,

    /// Last port of the range (inclusive)
    #[arg(long, value_name = "PORT", default_value_t = 65000, value_parser = clap::value_parser!(u16).range(1..))]
    pub end: u16,

    /// Per-connection timeout in milliseconds [default: 800]
    #[arg(short = 't', long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Maximum simultaneous connections [default: 100]
    #[arg(short = 'c', long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub concurrency: Option<usize>,

    /// Connection attempts per second (0 = unlimited)
    #[arg(short = 'r', long = "rate", value_name = "PPS")]
    pub rate_limit: Option<u32>,

    /// Output format for results
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Path to a settings file
    #[arg(long, value_name = "PATH", env = "BANNERSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose output (progress bar and debug logs)
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,

    /// Do not offer to scan again when finished
    #[arg(long)]
    pub no_prompt: bool,
}

/// Trim a host argument and refuse one that is blank.
fn parse_host(raw: &str) -> Result<String, String> {
    match raw.trim() {
        "" => Err("host must not be blank".to_string()),
        host => Ok(host.to_string()),
    }
}

/// Host and port range for one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub host: String,
    pub ports: PortRange,
}

impl ScanRequest {
    pub fn new(host: impl Into<String>, start: u16, end: u16) -> Result<Self, PortError> {
        Ok(Self {
            host: host.into(),
            ports: PortRange::from_bounds(start, end)?,
        })
    }

    /// Build the next request from prompt answers.
    ///
    /// A blank host keeps the previous one. Ports must be numeric, in range,
    /// and ordered.
    pub fn from_answers(
        previous: &ScanRequest,
        host: &str,
        start: &str,
        end: &str,
    ) -> Result<Self, PortError> {
        let host = match host.trim() {
            "" => previous.host.clone(),
            host => host.to_string(),
        };
        let start: Port = start.parse()?;
        let end: Port = end.parse()?;

        Ok(Self {
            host,
            ports: PortRange::new(start, end)?,
        })
    }
}
