//! Mock notebook executor for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{CallLog, RecordedCall};
use crate::executor::{ExecutionJob, ExecutionResult, ExecutorError, NotebookExecutor};

/// Mock implementation of the NotebookExecutor trait.
///
/// Provides controllable behavior for testing:
/// - Track execution jobs for assertions
/// - Fail on chosen output paths, or on the next call
/// - Write a placeholder notebook so downstream steps find a file
#[derive(Debug)]
pub struct MockExecutor {
    log: CallLog,
    jobs: Arc<RwLock<Vec<ExecutionJob>>>,
    fail_paths: Arc<RwLock<HashSet<PathBuf>>>,
    next_error: Arc<RwLock<Option<ExecutorError>>>,
    write_output: bool,
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExecutor {
    /// Create a new mock executor with its own call log.
    pub fn new() -> Self {
        Self::with_log(CallLog::default())
    }

    /// Create a mock executor recording into a shared call log.
    pub fn with_log(log: CallLog) -> Self {
        Self {
            log,
            jobs: Arc::new(RwLock::new(Vec::new())),
            fail_paths: Arc::new(RwLock::new(HashSet::new())),
            next_error: Arc::new(RwLock::new(None)),
            write_output: true,
        }
    }

    /// Do not write placeholder notebooks.
    pub fn without_files(mut self) -> Self {
        self.write_output = false;
        self
    }

    /// Get all recorded jobs.
    pub async fn recorded_jobs(&self) -> Vec<ExecutionJob> {
        self.jobs.read().await.clone()
    }

    /// Get the number of executions performed.
    pub async fn execution_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Fail every execution writing to `output_path`.
    pub async fn fail_on(&self, output_path: impl AsRef<Path>) {
        self.fail_paths
            .write()
            .await
            .insert(output_path.as_ref().to_path_buf());
    }

    /// Configure the next execution to fail with the given error.
    pub async fn set_next_error(&self, error: ExecutorError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl NotebookExecutor for MockExecutor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn execute(&self, job: &ExecutionJob) -> Result<ExecutionResult, ExecutorError> {
        self.jobs.write().await.push(job.clone());
        self.log.record(RecordedCall::Execute(job.clone())).await;

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        if self.fail_paths.read().await.contains(&job.output_path) {
            return Err(ExecutorError::execution_failed(
                "mock execution failure",
                Some("PapermillExecutionError: mock cell failure".to_string()),
            ));
        }

        if self.write_output {
            tokio::fs::write(&job.output_path, b"{\"cells\": []}").await?;
        }

        Ok(ExecutionResult {
            output_path: job.output_path.clone(),
            duration_ms: 0,
        })
    }

    async fn validate(&self) -> Result<(), ExecutorError> {
        Ok(())
    }
}
