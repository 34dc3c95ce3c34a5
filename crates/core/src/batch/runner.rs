//! Sequential batch runner.

use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use super::types::{BatchError, BatchPlan, BatchReport, FailureStage, ItemOutcome, WorkItem};
use crate::config::{Config, FailurePolicy};
use crate::converter::{ConversionJob, Converter, ReportFormat};
use crate::executor::{ExecutionJob, NotebookExecutor};

/// Drives every work item of a plan through the executor and the converter.
pub struct BatchRunner {
    executor: Arc<dyn NotebookExecutor>,
    converter: Arc<dyn Converter>,
    template: PathBuf,
    kernel_name: String,
    format: ReportFormat,
    failure_policy: FailurePolicy,
    config_fingerprint: String,
}

impl BatchRunner {
    /// Creates a runner for the given configuration and tools.
    pub fn new(
        config: &Config,
        executor: Arc<dyn NotebookExecutor>,
        converter: Arc<dyn Converter>,
    ) -> Self {
        Self {
            executor,
            converter,
            template: config.executor.template.clone(),
            kernel_name: config.executor.kernel_name.clone(),
            format: config.converter.format,
            failure_policy: config.batch.failure_policy,
            config_fingerprint: fingerprint(config),
        }
    }

    /// Runs the plan to completion.
    ///
    /// Items run one at a time, and each waits for both tools to finish. With
    /// [`FailurePolicy::FailFast`] the first failure returns
    /// [`BatchError::Aborted`] holding the partial report. With
    /// [`FailurePolicy::Continue`] failures are recorded in the report and
    /// the remaining items still run.
    pub async fn run(&self, plan: &BatchPlan) -> Result<BatchReport, BatchError> {
        let mut report = BatchReport::new(self.config_fingerprint.clone(), plan.len());
        let fail_fast = self.failure_policy == FailurePolicy::FailFast;

        info!(
            run_id = %report.run_id,
            items = plan.len(),
            stacks = plan.stacks.len(),
            executor = self.executor.name(),
            converter = self.converter.name(),
            "Starting batch"
        );

        for stack in &plan.stacks {
            if let Err(e) = tokio::fs::create_dir_all(&stack.output_dir).await {
                error!(
                    stack = %stack.stack.display(),
                    output_dir = %stack.output_dir.display(),
                    "Failed to create output directory: {}",
                    e
                );
                for item in &stack.items {
                    report.outcomes.push(ItemOutcome::failed(
                        item,
                        FailureStage::OutputDir,
                        format!("failed to create {}: {}", stack.output_dir.display(), e),
                        None,
                        0,
                    ));
                    if fail_fast {
                        return Err(Self::abort(report));
                    }
                }
                continue;
            }

            for item in &stack.items {
                let outcome = self.run_item(item).await;
                let failed = outcome.is_failure();
                report.outcomes.push(outcome);
                if failed && fail_fast {
                    return Err(Self::abort(report));
                }
            }
        }

        report.finish();
        info!(
            run_id = %report.run_id,
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Batch finished"
        );
        Ok(report)
    }

    /// Executes one item, then converts its notebook if execution succeeded.
    async fn run_item(&self, item: &WorkItem) -> ItemOutcome {
        let start = Instant::now();
        info!(
            stack = %item.stack_name,
            polarization = %item.polarization,
            notebook = %item.notebook_path.display(),
            "Executing notebook"
        );

        let job = ExecutionJob {
            template: self.template.clone(),
            output_path: item.notebook_path.clone(),
            kernel_name: self.kernel_name.clone(),
            parameters: item.parameters.clone(),
        };

        if let Err(e) = self.executor.execute(&job).await {
            error!(
                stack = %item.stack_name,
                polarization = %item.polarization,
                "Notebook execution failed: {}",
                e
            );
            if let Some(stderr) = e.stderr() {
                warn!("{} stderr:\n{}", self.executor.name(), stderr);
            }
            return ItemOutcome::failed(
                item,
                FailureStage::Execute,
                e.to_string(),
                e.stderr().map(str::to_string),
                elapsed_ms(start),
            );
        }

        let conversion = ConversionJob::new(item.notebook_path.clone(), self.format);
        match self.converter.convert(&conversion).await {
            Ok(result) => {
                info!(
                    stack = %item.stack_name,
                    polarization = %item.polarization,
                    report = %result.output_path.display(),
                    elapsed_ms = elapsed_ms(start),
                    "Item completed"
                );
                ItemOutcome::completed(item, result.output_path, elapsed_ms(start))
            }
            Err(e) => {
                error!(
                    stack = %item.stack_name,
                    polarization = %item.polarization,
                    "Report conversion failed: {}",
                    e
                );
                if let Some(stderr) = e.stderr() {
                    warn!("{} stderr:\n{}", self.converter.name(), stderr);
                }
                ItemOutcome::failed(
                    item,
                    FailureStage::Convert,
                    e.to_string(),
                    e.stderr().map(str::to_string),
                    elapsed_ms(start),
                )
            }
        }
    }

    fn abort(mut report: BatchReport) -> BatchError {
        report.aborted = true;
        report.finish();
        warn!(
            run_id = %report.run_id,
            attempted = report.outcomes.len(),
            planned = report.planned,
            "Batch aborted at first failure"
        );
        BatchError::Aborted {
            report: Box::new(report),
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// First 16 hex chars of the SHA-256 of the serialized configuration.
fn fingerprint(config: &Config) -> String {
    let json = serde_json::to_string(config).unwrap_or_default();
    let hash = format!("{:x}", Sha256::digest(json.as_bytes()));
    hash[..16].to_string()
}
