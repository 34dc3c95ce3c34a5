use std::collections::HashSet;

use super::{types::Config, ConfigError};
use crate::batch::stack_name;

/// Validate configuration
/// Currently validates:
/// - At least one stack and one polarization
/// - No repeated polarizations
/// - Every stack has a usable directory name, and names are unique
///   (two stacks sharing a name would write to the same output files)
/// - The cleanup list is not empty
/// - Executor and converter settings are not blank
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let batch = &config.batch;

    if batch.stacks.is_empty() {
        return Err(ConfigError::ValidationError(
            "batch.stacks must list at least one stack directory".to_string(),
        ));
    }

    if batch.polarizations.is_empty() {
        return Err(ConfigError::ValidationError(
            "batch.polarizations must list at least one polarization".to_string(),
        ));
    }

    let mut seen_pols = HashSet::new();
    for pol in &batch.polarizations {
        if !seen_pols.insert(*pol) {
            return Err(ConfigError::ValidationError(format!(
                "batch.polarizations contains {} more than once",
                pol
            )));
        }
    }

    let mut seen_names = HashSet::new();
    for stack in &batch.stacks {
        let name = stack_name(stack).ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "batch.stacks entry {:?} has no directory name",
                stack
            ))
        })?;
        if !seen_names.insert(name.to_string()) {
            return Err(ConfigError::ValidationError(format!(
                "batch.stacks contains more than one stack named {:?}",
                name
            )));
        }
    }

    if batch.cleanup_list.is_empty() {
        return Err(ConfigError::ValidationError(
            "batch.cleanup_list cannot be empty (use \", \" to keep everything)".to_string(),
        ));
    }

    if config.executor.template.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "executor.template cannot be empty".to_string(),
        ));
    }

    if config.executor.kernel_name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "executor.kernel_name cannot be empty".to_string(),
        ));
    }

    Ok(())
}
