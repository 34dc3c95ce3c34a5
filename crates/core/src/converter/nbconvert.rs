//! nbconvert-based converter implementation.

use async_trait::async_trait;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::Converter;
use super::types::{ConversionJob, ConversionResult};
use crate::process::{run_to_completion, RunOutcome};

/// Renders notebooks with `jupyter nbconvert`.
pub struct NbconvertConverter {
    config: ConverterConfig,
}

impl NbconvertConverter {
    /// Creates a new converter with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Creates a converter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    /// Builds jupyter arguments for a job.
    fn build_args(&self, job: &ConversionJob) -> Vec<String> {
        let mut args = vec![
            "nbconvert".to_string(),
            job.input_path.to_string_lossy().to_string(),
            "--to".to_string(),
            job.format.exporter().to_string(),
        ];
        args.extend(self.config.extra_args.iter().cloned());
        args
    }

    fn map_spawn_error(&self, e: std::io::Error) -> ConverterError {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConverterError::JupyterNotFound {
                path: self.config.jupyter_path.clone(),
            }
        } else {
            ConverterError::Io(e)
        }
    }
}

#[async_trait]
impl Converter for NbconvertConverter {
    fn name(&self) -> &str {
        "nbconvert"
    }

    async fn convert(&self, job: &ConversionJob) -> Result<ConversionResult, ConverterError> {
        let start = Instant::now();

        if !job.input_path.exists() {
            return Err(ConverterError::InputNotFound {
                path: job.input_path.clone(),
            });
        }

        // A report from an earlier run must not pass for this one.
        let output_path = job.output_path();
        match tokio::fs::remove_file(&output_path).await {
            Ok(()) => debug!(path = %output_path.display(), "Removed previous report"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(ConverterError::Io(e)),
        }

        let args = self.build_args(job);
        debug!(?args, "Running jupyter nbconvert");

        let mut command = Command::new(&self.config.jupyter_path);
        command.args(&args);

        let outcome = run_to_completion(command, "nbconvert", self.config.timeout_secs)
            .await
            .map_err(|e| self.map_spawn_error(e))?;

        match outcome {
            RunOutcome::Exited {
                status,
                stderr_tail,
            } => {
                if !status.success() {
                    return Err(ConverterError::conversion_failed(
                        format!("nbconvert exited with code: {:?}", status.code()),
                        if stderr_tail.is_empty() {
                            None
                        } else {
                            Some(stderr_tail)
                        },
                    ));
                }
            }
            RunOutcome::TimedOut => {
                return Err(ConverterError::Timeout {
                    timeout_secs: self.config.timeout_secs.unwrap_or_default(),
                });
            }
        }

        let output_meta = tokio::fs::metadata(&output_path)
            .await
            .map_err(|_| ConverterError::conversion_failed("Report file not created", None))?;

        Ok(ConversionResult {
            output_path,
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        let output = Command::new(&self.config.jupyter_path)
            .args(["nbconvert", "--version"])
            .output()
            .await
            .map_err(|e| self.map_spawn_error(e))?;

        if !output.status.success() {
            return Err(ConverterError::conversion_failed(
                "jupyter nbconvert --version failed",
                Some(String::from_utf8_lossy(&output.stderr).to_string()),
            ));
        }

        Ok(())
    }
}
