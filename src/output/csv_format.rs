//! CSV output formatting.

use crate::scanner::ScanReport;
use std::io::{self, Write};

/// Print results in CSV format, one row per open port.
pub fn print_csv(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    write_csv(report, stdout.lock())
}

fn write_csv<W: Write>(report: &ScanReport, writer: W) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["port", "status", "service", "version", "banner"])?;

    for result in report.sorted_results() {
        wtr.write_record([
            result.port.to_string().as_str(),
            result.status().to_string().as_str(),
            result.service.as_str(),
            result.version.as_str(),
            result.banner.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
