//! Batch configuration: the `xcorr.toml` schema, loading with `XCORR_`
//! environment overrides, and checks that run before planning.

mod loader;
mod types;
mod validate;

pub use loader::{load_config, load_config_from_str};
pub use types::*;
pub use validate::validate_config;

use thiserror::Error;

/// Why a configuration could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration file at {0}")]
    FileNotFound(String),

    /// Malformed TOML, an unknown polarization or format, or a missing
    /// required key such as `batch.stacks`.
    #[error("invalid configuration: {0}")]
    ParseError(String),

    /// Parsed, but describes a batch that cannot run.
    #[error("rejected configuration: {0}")]
    ValidationError(String),
}
