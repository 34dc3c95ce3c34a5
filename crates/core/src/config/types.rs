use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::converter::ConverterConfig;
use crate::executor::ExecutorConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub batch: BatchConfig,
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// What to run: the stacks, the channels, and the values forwarded to the notebook.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Directories holding OPERA RTC stacks, processed in order.
    pub stacks: Vec<PathBuf>,
    /// Polarization channels processed for every stack, in order.
    #[serde(default = "default_polarizations")]
    pub polarizations: Vec<Polarization>,
    /// Forwarded to the notebook: delete mosaicked RTCs and static files when done.
    #[serde(default)]
    pub delete_mosaics: bool,
    /// Forwarded to the notebook verbatim. The notebook parses it as a list,
    /// so it must never be empty.
    #[serde(default = "default_cleanup_list")]
    pub cleanup_list: String,
    /// What to do when one item fails.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

fn default_polarizations() -> Vec<Polarization> {
    vec![Polarization::Vv, Polarization::Vh]
}

fn default_cleanup_list() -> String {
    ", ".to_string()
}

impl BatchConfig {
    /// Creates a batch config for the given stacks with every other field defaulted.
    pub fn with_stacks(stacks: Vec<PathBuf>) -> Self {
        Self {
            stacks,
            polarizations: default_polarizations(),
            delete_mosaics: false,
            cleanup_list: default_cleanup_list(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Where output directories are created.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Parent of the `cross_correlation_*` directories. Defaults to the
    /// current working directory.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

impl OutputConfig {
    /// The configured root, or the current working directory.
    pub fn resolve_root(&self) -> std::io::Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir(),
        }
    }
}

/// Radar polarization channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarization {
    Vv,
    Vh,
    Hh,
    Hv,
}

impl Polarization {
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarization::Vv => "vv",
            Polarization::Vh => "vh",
            Polarization::Hh => "hh",
            Polarization::Hv => "hv",
        }
    }
}

impl fmt::Display for Polarization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Polarization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vv" => Ok(Polarization::Vv),
            "vh" => Ok(Polarization::Vh),
            "hh" => Ok(Polarization::Hh),
            "hv" => Ok(Polarization::Hv),
            other => Err(format!("unknown polarization: {}", other)),
        }
    }
}

/// Behavior of the batch runner when an item fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failure.
    FailFast,
    /// Record the failure and keep going.
    #[default]
    Continue,
}
