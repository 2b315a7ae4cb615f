//! Configuration management for bannerscan.
//!
//! Settings live in an optional JSON file in the XDG config directory and
//! supply defaults that command-line flags can override.

mod settings;

pub use settings::{AppSettings, Paths};
