//! # bannerscan - TCP port scanner with banner grabbing
//!
//! Probes a range of TCP ports on one host, then tries to identify what is
//! running on each open port from the first line it sends back.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use bannerscan::scanner::scan;
//! use bannerscan::types::Port;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let start = Port::new(1).unwrap();
//!     let end = Port::new(1024).unwrap();
//!     let results = scan("192.168.1.1", start, end, Duration::from_millis(800)).await;
//!
//!     for result in results {
//!         println!("{} {} {}", result.port, result.service, result.version);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`scanner`] - Concurrent scan coordinator and TCP prober
//! - [`banner`] - First-line banner grabbing
//! - [`services`] - Port table and banner heuristics
//! - [`types`] - Validated ports, ranges and targets
//! - [`config`] - Settings file handling
//! - [`output`] - Plain, JSON and CSV renderers
//! - [`cli`] - Command-line front end

pub mod banner;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{BannerError, CliError, ConfigError};
pub use scanner::{scan, PortProbe, ScanReport, ScanResult};
pub use services::classify;
pub use types::{Port, PortRange};
