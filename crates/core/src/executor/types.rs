//! Types for the executor module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::Polarization;

/// Parameters injected into the notebook's parameters cell.
///
/// Field names are the notebook's variable names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParameters {
    pub polarization: Polarization,
    pub stack_dir: String,
    pub delete_mosaics: bool,
    pub cleanup_list: String,
}

impl RunParameters {
    /// Encodes the parameters as a JSON object (also valid YAML).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A single notebook execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionJob {
    /// Template notebook.
    pub template: PathBuf,
    /// Where the executed notebook is written.
    pub output_path: PathBuf,
    /// Jupyter kernel name.
    pub kernel_name: String,
    /// Values for the notebook's parameters cell.
    pub parameters: RunParameters,
}

/// Result of a finished notebook execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Path of the executed notebook.
    pub output_path: PathBuf,
    /// Wall-clock time spent in the executor.
    pub duration_ms: u64,
}
