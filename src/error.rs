//! Error types for bannerscan.
//!
//! Uses `thiserror` for ergonomic error definitions. Per-port failures never
//! leave the scanner; these types cover banner reads (absorbed by the
//! coordinator), configuration, and the command-line surface.

use crate::types::PortError;
use std::path::PathBuf;
use thiserror::Error;

/// Why a banner could not be read from an open port.
#[derive(Error, Debug)]
pub enum BannerError {
    #[error("connection failed: {0}")]
    Connect(#[source] std::io::Error),

    #[error("connection timed out")]
    ConnectTimeout,

    #[error("read deadline exceeded before a full line arrived")]
    ReadTimeout,

    #[error("peer sent no line terminator")]
    NoLineTerminator,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors while locating or loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),
}

/// Errors surfaced to the operator by the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Port(#[from] PortError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BannerResult<T> = Result<T, BannerError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type CliResult<T> = Result<T, CliError>;
