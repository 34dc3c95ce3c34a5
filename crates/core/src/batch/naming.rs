//! Deterministic naming of output directories and artifacts, and batch planning.

use std::path::{Path, PathBuf};

use super::types::{BatchError, BatchPlan, StackPlan, WorkItem};
use crate::config::{BatchConfig, Polarization};
use crate::executor::RunParameters;

/// Prefix of every per-stack output directory.
pub const OUTPUT_DIR_PREFIX: &str = "cross_correlation_";

/// Suffix of every executed notebook.
pub const NOTEBOOK_SUFFIX: &str = "_OPERA_RTC_Cross_Correlation.ipynb";

/// Final component of a stack path, if it has a UTF-8 one.
pub fn stack_name(stack: &Path) -> Option<&str> {
    stack.file_name().and_then(|n| n.to_str())
}

/// `<root>/cross_correlation_<stack_name>`
pub fn output_dir_for(root: &Path, stack_name: &str) -> PathBuf {
    root.join(format!("{}{}", OUTPUT_DIR_PREFIX, stack_name))
}

/// `<output_dir>/output_<stack_name>_<pol>_OPERA_RTC_Cross_Correlation.ipynb`
pub fn notebook_path_for(output_dir: &Path, stack_name: &str, polarization: Polarization) -> PathBuf {
    output_dir.join(format!(
        "output_{}_{}{}",
        stack_name, polarization, NOTEBOOK_SUFFIX
    ))
}

/// Expands the batch configuration into ordered work items rooted at `root`.
///
/// Pure: touches neither the filesystem nor the tools.
pub fn plan_batch(batch: &BatchConfig, root: &Path) -> Result<BatchPlan, BatchError> {
    let mut stacks = Vec::with_capacity(batch.stacks.len());

    for stack in &batch.stacks {
        let name = stack_name(stack).ok_or_else(|| BatchError::InvalidStack(stack.clone()))?;
        let output_dir = output_dir_for(root, name);

        let items = batch
            .polarizations
            .iter()
            .map(|&polarization| WorkItem {
                stack: stack.clone(),
                stack_name: name.to_string(),
                polarization,
                output_dir: output_dir.clone(),
                notebook_path: notebook_path_for(&output_dir, name, polarization),
                parameters: RunParameters {
                    polarization,
                    stack_dir: stack.to_string_lossy().to_string(),
                    delete_mosaics: batch.delete_mosaics,
                    cleanup_list: batch.cleanup_list.clone(),
                },
            })
            .collect();

        stacks.push(StackPlan {
            stack: stack.clone(),
            output_dir,
            items,
        });
    }

    Ok(BatchPlan { stacks })
}
