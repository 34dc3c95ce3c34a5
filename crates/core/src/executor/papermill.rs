//! Papermill-based executor implementation.

use async_trait::async_trait;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

use super::config::ExecutorConfig;
use super::error::ExecutorError;
use super::traits::NotebookExecutor;
use super::types::{ExecutionJob, ExecutionResult};
use crate::process::{run_to_completion, RunOutcome};

/// Runs notebooks through the papermill command line.
pub struct PapermillExecutor {
    config: ExecutorConfig,
}

impl PapermillExecutor {
    /// Creates a new papermill executor with the given configuration.
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// Creates an executor with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ExecutorConfig::default())
    }

    /// Builds papermill arguments for a job.
    ///
    /// Parameters travel as one JSON document through `-y`, so path contents
    /// are never interpreted by a shell or by papermill's type inference.
    fn build_args(&self, job: &ExecutionJob) -> Result<Vec<String>, ExecutorError> {
        let mut args = vec![
            job.template.to_string_lossy().to_string(),
            job.output_path.to_string_lossy().to_string(),
            "-k".to_string(),
            job.kernel_name.clone(),
            "-y".to_string(),
            job.parameters.to_json()?,
        ];
        args.extend(self.config.extra_args.iter().cloned());
        Ok(args)
    }

    fn map_spawn_error(&self, e: std::io::Error) -> ExecutorError {
        if e.kind() == std::io::ErrorKind::NotFound {
            ExecutorError::PapermillNotFound {
                path: self.config.papermill_path.clone(),
            }
        } else {
            ExecutorError::Io(e)
        }
    }
}

#[async_trait]
impl NotebookExecutor for PapermillExecutor {
    fn name(&self) -> &str {
        "papermill"
    }

    async fn execute(&self, job: &ExecutionJob) -> Result<ExecutionResult, ExecutorError> {
        let start = Instant::now();
        let args = self.build_args(job)?;
        debug!(?args, "Running papermill");

        let mut command = Command::new(&self.config.papermill_path);
        command.args(&args);

        let outcome = run_to_completion(command, "papermill", self.config.timeout_secs)
            .await
            .map_err(|e| self.map_spawn_error(e))?;

        match outcome {
            RunOutcome::Exited {
                status,
                stderr_tail,
            } => {
                if !status.success() {
                    return Err(ExecutorError::execution_failed(
                        format!("papermill exited with code: {:?}", status.code()),
                        if stderr_tail.is_empty() {
                            None
                        } else {
                            Some(stderr_tail)
                        },
                    ));
                }
            }
            RunOutcome::TimedOut => {
                return Err(ExecutorError::Timeout {
                    timeout_secs: self.config.timeout_secs.unwrap_or_default(),
                });
            }
        }

        if tokio::fs::metadata(&job.output_path).await.is_err() {
            return Err(ExecutorError::execution_failed(
                "executed notebook was not created",
                None,
            ));
        }

        Ok(ExecutionResult {
            output_path: job.output_path.clone(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), ExecutorError> {
        let output = Command::new(&self.config.papermill_path)
            .arg("--version")
            .output()
            .await
            .map_err(|e| self.map_spawn_error(e))?;

        if !output.status.success() {
            return Err(ExecutorError::execution_failed(
                "papermill --version failed",
                Some(String::from_utf8_lossy(&output.stderr).to_string()),
            ));
        }

        Ok(())
    }
}
