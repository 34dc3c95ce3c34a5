//! Error types for the executor module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while executing a notebook.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Papermill binary not found.
    #[error("papermill not found at path: {path}")]
    PapermillNotFound { path: PathBuf },

    /// The notebook run failed (non-zero exit or missing output).
    #[error("notebook execution failed: {reason}")]
    ExecutionFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// The notebook run exceeded its deadline.
    #[error("notebook execution timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Run parameters could not be encoded.
    #[error("failed to encode run parameters: {0}")]
    Parameters(#[from] serde_json::Error),

    /// I/O error while running the executor.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExecutorError {
    /// Creates a new execution failed error with stderr output.
    pub fn execution_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ExecutionFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Tail of the tool's stderr, when the tool ran and failed.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::ExecutionFailed { stderr, .. } => stderr.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExecutorError::execution_failed("papermill exited with code: Some(1)", None);
        assert_eq!(
            err.to_string(),
            "notebook execution failed: papermill exited with code: Some(1)"
        );

        let err = ExecutorError::Timeout { timeout_secs: 30 };
        assert_eq!(
            err.to_string(),
            "notebook execution timed out after 30 seconds"
        );
    }
}
