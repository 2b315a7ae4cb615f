//! JSON output formatting.

use crate::scanner::ScanReport;
use std::io;

/// Print the full report as pretty JSON.
pub fn print_json(report: &ScanReport) -> io::Result<()> {
    println!("{}", to_json(report)?);
    Ok(())
}

fn to_json(report: &ScanReport) -> io::Result<String> {
    serde_json::to_string_pretty(report).map_err(io::Error::other)
}
