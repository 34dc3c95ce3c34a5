//! Trait definitions for the executor module.

use async_trait::async_trait;

use super::error::ExecutorError;
use super::types::{ExecutionJob, ExecutionResult};

/// Something that can run a parameterized notebook to completion.
#[async_trait]
pub trait NotebookExecutor: Send + Sync {
    /// Returns the name of this executor implementation.
    fn name(&self) -> &str;

    /// Executes the job's template with its parameters, writing the executed
    /// notebook to the job's output path. Returns once the run has finished.
    async fn execute(&self, job: &ExecutionJob) -> Result<ExecutionResult, ExecutorError>;

    /// Validates that the executor is properly configured and ready.
    async fn validate(&self) -> Result<(), ExecutorError>;
}
