//! Types for the batch orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

use crate::config::Polarization;
use crate::executor::RunParameters;

/// Errors that end a batch run.
#[derive(Debug, Error)]
pub enum BatchError {
    /// A stack path has no usable directory name.
    #[error("stack {0:?} has no directory name")]
    InvalidStack(PathBuf),

    /// The run stopped at the first failure.
    #[error("batch aborted after {} of {} items", .report.outcomes.len(), .report.planned)]
    Aborted { report: Box<BatchReport> },
}

/// One (stack, polarization) unit of work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    /// Stack directory as configured.
    pub stack: PathBuf,
    /// Final component of the stack path.
    pub stack_name: String,
    pub polarization: Polarization,
    /// Directory receiving this stack's artifacts.
    pub output_dir: PathBuf,
    /// Executed notebook written by this item.
    pub notebook_path: PathBuf,
    /// Values forwarded to the notebook.
    pub parameters: RunParameters,
}

/// All work items for one stack, sharing an output directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackPlan {
    pub stack: PathBuf,
    pub output_dir: PathBuf,
    pub items: Vec<WorkItem>,
}

/// The ordered work of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPlan {
    pub stacks: Vec<StackPlan>,
}

impl BatchPlan {
    /// Work items in execution order.
    pub fn items(&self) -> impl Iterator<Item = &WorkItem> {
        self.stacks.iter().flat_map(|s| s.items.iter())
    }

    /// Total number of work items.
    pub fn len(&self) -> usize {
        self.stacks.iter().map(|s| s.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Step of an item that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Creating the stack's output directory.
    OutputDir,
    /// Running the notebook.
    Execute,
    /// Rendering the report.
    Convert,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::OutputDir => write!(f, "output_dir"),
            FailureStage::Execute => write!(f, "execute"),
            FailureStage::Convert => write!(f, "convert"),
        }
    }
}

/// How an item ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemStatus {
    Completed {
        report_path: PathBuf,
    },
    Failed {
        stage: FailureStage,
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        stderr: Option<String>,
    },
}

/// Outcome of one attempted work item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub stack: PathBuf,
    pub polarization: Polarization,
    pub notebook_path: PathBuf,
    #[serde(flatten)]
    pub status: ItemStatus,
    pub duration_ms: u64,
}

impl ItemOutcome {
    pub(crate) fn completed(item: &WorkItem, report_path: PathBuf, duration_ms: u64) -> Self {
        Self {
            stack: item.stack.clone(),
            polarization: item.polarization,
            notebook_path: item.notebook_path.clone(),
            status: ItemStatus::Completed { report_path },
            duration_ms,
        }
    }

    pub(crate) fn failed(
        item: &WorkItem,
        stage: FailureStage,
        error: String,
        stderr: Option<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            stack: item.stack.clone(),
            polarization: item.polarization,
            notebook_path: item.notebook_path.clone(),
            status: ItemStatus::Failed {
                stage,
                error,
                stderr,
            },
            duration_ms,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, ItemStatus::Failed { .. })
    }
}

/// Summary of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    /// Short hash of the batch configuration the run used.
    pub config_fingerprint: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Number of items in the plan.
    pub planned: usize,
    /// Outcomes of attempted items, in execution order.
    pub outcomes: Vec<ItemOutcome>,
    /// Whether the run stopped before attempting every item.
    pub aborted: bool,
}

impl BatchReport {
    pub(crate) fn new(config_fingerprint: String, planned: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            config_fingerprint,
            started_at: Utc::now(),
            finished_at: None,
            planned,
            outcomes: Vec::with_capacity(planned),
            aborted: false,
        }
    }

    pub(crate) fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_failure()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    /// Items never attempted because the run was aborted.
    pub fn not_attempted(&self) -> usize {
        self.planned.saturating_sub(self.outcomes.len())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    /// True when every planned item completed.
    pub fn is_success(&self) -> bool {
        !self.aborted && self.failed() == 0 && self.outcomes.len() == self.planned
    }
}
