//! Notebook executor module.
//!
//! This module provides the `NotebookExecutor` trait and a papermill-backed
//! implementation that runs the parameterized cross-correlation notebook.
//!
//! # Example
//!
//! ```ignore
//! use xcorr_core::executor::{ExecutionJob, ExecutorConfig, NotebookExecutor, PapermillExecutor};
//!
//! let executor = PapermillExecutor::new(ExecutorConfig::default());
//! executor.validate().await?;
//!
//! let result = executor.execute(&job).await?;
//! println!("Executed in {} ms", result.duration_ms);
//! ```

mod config;
mod error;
mod papermill;
mod traits;
mod types;

pub use config::ExecutorConfig;
pub use error::ExecutorError;
pub use papermill::PapermillExecutor;
pub use traits::NotebookExecutor;
pub use types::{ExecutionJob, ExecutionResult, RunParameters};
