//! Batch orchestration of notebook runs.
//!
//! A batch is every (stack, polarization) pair from the configuration, run
//! strictly in order: outer loop over stacks, inner loop over polarizations.
//! Each item executes the notebook and then renders the executed notebook
//! into a report. Nothing runs concurrently.

mod naming;
mod runner;
mod types;

pub use naming::{
    notebook_path_for, output_dir_for, plan_batch, stack_name, NOTEBOOK_SUFFIX, OUTPUT_DIR_PREFIX,
};
pub use runner::BatchRunner;
pub use types::{
    BatchError, BatchPlan, BatchReport, FailureStage, ItemOutcome, ItemStatus, StackPlan, WorkItem,
};
