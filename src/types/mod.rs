//! Core type definitions using newtype patterns for type safety.
//!
//! Port numbers and ranges are validated on construction so the scanner
//! never sees a port outside 1-65535 or a reversed range.

mod port;
mod target;

pub use port::{Port, PortError, PortRange};
pub use target::{resolve_host, ScanTarget, TargetError};
