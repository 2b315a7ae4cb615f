//! Scan command: settings, target resolution, scanning and printing.

use crate::cli::{Cli, RescanPrompt, ScanRequest};
use crate::config::AppSettings;
use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use crate::scanner::{run_scan, ScanConfig};
use crate::types::ScanTarget;
use std::io::IsTerminal;
use std::time::Duration;
use tracing::debug;

/// Effective options after merging flags over settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub timeout: Duration,
    pub concurrency: usize,
    pub rate_limit: u32,
    pub format: OutputFormat,
    pub verbose: bool,
    pub quiet: bool,
    pub interactive: bool,
}

impl RunOptions {
    /// Flags win over settings; settings win over built-in defaults.
    pub fn merge(cli: &Cli, settings: &AppSettings) -> Self {
        Self {
            timeout: cli
                .timeout
                .map(Duration::from_millis)
                .unwrap_or_else(|| settings.default_timeout()),
            concurrency: cli.concurrency.unwrap_or(settings.default_concurrency),
            rate_limit: cli.rate_limit.unwrap_or(settings.default_rate_limit),
            format: cli.output.unwrap_or(settings.default_output_format),
            verbose: cli.verbose,
            quiet: cli.quiet,
            interactive: settings.interactive && !cli.no_prompt,
        }
    }

    fn shows_chrome(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Plain
    }
}

impl Cli {
    /// Execute the scan, then offer follow-up scans on a terminal.
    pub async fn execute(&self) -> CliResult<()> {
        let settings = match &self.config {
            Some(path) => AppSettings::load_from(path)?,
            None => AppSettings::load()?,
        };
        let options = RunOptions::merge(self, &settings);
        debug!(?options, "effective options");

        let mut request = ScanRequest::new(self.host.clone(), self.start, self.end)?;
        scan_once(&request, &options).await?;

        if !options.interactive || !is_interactive_terminal() {
            return Ok(());
        }

        let prompt = RescanPrompt::new();
        while let Some(next) = prompt.next_request(&request)? {
            request = next;
            scan_once(&request, &options).await?;
        }

        Ok(())
    }
}

/// Resolve, scan and print one request.
async fn scan_once(request: &ScanRequest, options: &RunOptions) -> CliResult<()> {
    let (target, resolve_error) = ScanTarget::resolve(&request.host).await;
    if let Some(e) = resolve_error {
        output::print_warning(&format!("{}; every port will report closed", e));
    }

    if options.shows_chrome() {
        output::print_scan_header(
            &target.to_string(),
            request.ports.start().as_u16(),
            request.ports.end().as_u16(),
        );
    }

    let mut config = ScanConfig::new(target.connect_host(), request.ports)
        .with_timeout(options.timeout)
        .with_concurrency(options.concurrency)
        .with_rate_limit(options.rate_limit);
    if options.verbose && options.shows_chrome() {
        config = config.with_progress();
    }

    let mut report = run_scan(config).await;
    report.host = target.original.clone();
    report.resolved = target.ip;

    output::print_results(&report, options.format)?;
    Ok(())
}

fn is_interactive_terminal() -> bool {
    std::io::stdin().is_terminal() && console::user_attended()
}
