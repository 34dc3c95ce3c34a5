//! Configuration for the notebook executor.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the papermill-based executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Path to the papermill binary.
    #[serde(default = "default_papermill_path")]
    pub papermill_path: PathBuf,

    /// Template notebook executed for every item.
    #[serde(default = "default_template")]
    pub template: PathBuf,

    /// Jupyter kernel the notebook runs on.
    #[serde(default = "default_kernel_name")]
    pub kernel_name: String,

    /// Timeout for a single notebook run in seconds. Unset means wait forever.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Additional papermill arguments, appended after the parameters.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_papermill_path() -> PathBuf {
    PathBuf::from("papermill")
}

fn default_template() -> PathBuf {
    PathBuf::from("OPERA_RTC_Cross_Correlation.ipynb")
}

fn default_kernel_name() -> String {
    "python3".to_string()
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            papermill_path: default_papermill_path(),
            template: default_template(),
            kernel_name: default_kernel_name(),
            timeout_secs: None,
            extra_args: Vec::new(),
        }
    }
}

impl ExecutorConfig {
    /// Sets the template notebook.
    pub fn with_template(mut self, template: PathBuf) -> Self {
        self.template = template;
        self
    }

    /// Sets the timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }
}
