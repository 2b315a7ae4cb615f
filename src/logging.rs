//! Diagnostic logging via `tracing`.
//!
//! Log lines go to stderr so tables, JSON and CSV on stdout stay clean.
//! `RUST_LOG` takes precedence over the level picked here.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level when `RUST_LOG` is unset.
    pub level: String,
    /// Include target (module path).
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: String::from("warn"),
            with_target: false,
        }
    }
}

impl LogConfig {
    /// Level chosen from the `--verbose` / `--quiet` flags.
    pub fn for_verbosity(verbose: bool, quiet: bool) -> Self {
        let level = match (verbose, quiet) {
            (true, _) => "debug",
            (false, true) => "error",
            (false, false) => "warn",
        };
        Self {
            level: level.to_string(),
            with_target: verbose,
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(config: &LogConfig) {
    let fmt_layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(config.with_target);

    let _ = tracing_subscriber::registry()
        .with(config.filter())
        .with(fmt_layer)
        .try_init();
}
