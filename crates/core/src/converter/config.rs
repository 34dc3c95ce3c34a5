//! Configuration for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::types::ReportFormat;

/// Configuration for the nbconvert-based converter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Path to the jupyter binary.
    #[serde(default = "default_jupyter_path")]
    pub jupyter_path: PathBuf,

    /// nbconvert exporter. The report lands next to the notebook with the
    /// exporter's extension.
    #[serde(default)]
    pub format: ReportFormat,

    /// Timeout for a single conversion in seconds. Unset means wait forever.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Additional nbconvert arguments.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_jupyter_path() -> PathBuf {
    PathBuf::from("jupyter")
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            jupyter_path: default_jupyter_path(),
            format: ReportFormat::default(),
            timeout_secs: None,
            extra_args: Vec::new(),
        }
    }
}

impl ConverterConfig {
    /// Creates a new config with a custom jupyter path.
    pub fn with_jupyter_path(jupyter_path: PathBuf) -> Self {
        Self {
            jupyter_path,
            ..Default::default()
        }
    }

    /// Sets the timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }
}
