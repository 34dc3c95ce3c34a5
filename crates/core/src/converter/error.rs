//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during conversion.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// Jupyter binary not found.
    #[error("jupyter not found at path: {path}")]
    JupyterNotFound { path: PathBuf },

    /// Input notebook not found.
    #[error("Input notebook not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Conversion process failed.
    #[error("Conversion failed: {reason}")]
    ConversionFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// Conversion timed out.
    #[error("Conversion timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error during conversion.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConverterError {
    /// Creates a new conversion failed error with stderr output.
    pub fn conversion_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ConversionFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Tail of the tool's stderr, when the tool ran and failed.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::ConversionFailed { stderr, .. } => stderr.as_deref(),
            _ => None,
        }
    }
}
