//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::scanner::ScanReport;
use console::style;
use std::io::{self, Write};

/// Banner characters shown in the table before truncation.
const BANNER_PREVIEW_LEN: usize = 30;

const RULE: &str = "──────────────────────────────────────────────────────────────";

/// Print results in human-readable plain text format.
pub fn print_plain(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    write_plain(report, &mut stdout.lock())
}

fn write_plain<W: Write>(report: &ScanReport, out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{} {}",
        style("Scan completed in").bold(),
        style(format!("{:.2?}", report.duration())).cyan()
    )?;
    writeln!(
        out,
        "Found {} open ports:",
        style(report.open_ports).green().bold()
    )?;
    writeln!(out)?;

    if report.results.is_empty() {
        writeln!(out, "  {}", style("No open ports.").dim())?;
    } else {
        writeln!(
            out,
            "  {:>6}  {:<6}  {:<15}  {}",
            style("PORT").bold(),
            style("STATUS").bold(),
            style("SERVICE").bold(),
            style("BANNER").bold()
        )?;
        writeln!(out, "  {}", style(RULE).dim())?;

        for result in report.sorted_results() {
            writeln!(
                out,
                "  {:>6}  {:<6}  {:<15}  {}",
                result.port,
                style(result.status().to_string()).green().bold(),
                result.service,
                style(truncate_banner(&result.banner)).dim()
            )?;
        }

        writeln!(out, "  {}", style(RULE).dim())?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Total scan time: {:.2?} ({} ports)",
        report.duration(),
        report.ports_scanned
    )?;

    Ok(())
}

/// Shorten a banner for the table, replacing control characters.
///
/// Keeps the first 30 characters and appends `...` when anything was cut.
pub fn truncate_banner(banner: &str) -> String {
    let mut preview: String = banner
        .chars()
        .take(BANNER_PREVIEW_LEN)
        .map(|c| if c.is_control() { '.' } else { c })
        .collect();

    if banner.chars().nth(BANNER_PREVIEW_LEN).is_some() {
        preview.push_str("...");
    }
    preview
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(target: &str, start: u16, end: u16) {
    println!(
        "{} {} from port {} to {}",
        style("Scanning").cyan(),
        style(target).white().bold(),
        start,
        end
    );
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}
