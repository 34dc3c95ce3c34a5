//! Testing utilities and mock implementations of the tool traits.
//!
//! The mocks record every call into a shared [`CallLog`] so tests can assert
//! on the interleaving of executor and converter invocations.
//!
//! # Example
//!
//! ```rust,ignore
//! use xcorr_core::testing::{CallLog, MockConverter, MockExecutor};
//!
//! let log = CallLog::default();
//! let executor = Arc::new(MockExecutor::with_log(log.clone()));
//! let converter = Arc::new(MockConverter::with_log(log.clone()));
//!
//! executor.fail_on("/out/cross_correlation_foo/output_foo_vv_OPERA_RTC_Cross_Correlation.ipynb").await;
//!
//! let runner = BatchRunner::new(&config, executor.clone(), converter.clone());
//! let report = runner.run(&plan).await?;
//! assert_eq!(log.calls().await.len(), 2 * plan.len() - 1);
//! ```

mod mock_converter;
mod mock_executor;

pub use mock_converter::MockConverter;
pub use mock_executor::MockExecutor;

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::converter::ConversionJob;
use crate::executor::ExecutionJob;

/// A call made to one of the mocks.
#[derive(Debug, Clone)]
pub enum RecordedCall {
    Execute(ExecutionJob),
    Convert(ConversionJob),
}

/// Ordered log of calls shared between mocks.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<RwLock<Vec<RecordedCall>>>,
}

impl CallLog {
    pub(crate) async fn record(&self, call: RecordedCall) {
        self.calls.write().await.push(call);
    }

    /// All calls so far, in order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    pub async fn clear(&self) {
        self.calls.write().await.clear();
    }
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::{Path, PathBuf};

    use crate::config::{BatchConfig, Config, OutputConfig};
    use crate::converter::ConverterConfig;
    use crate::executor::ExecutorConfig;

    /// A default configuration for the given stacks, writing under `root`.
    pub fn config(stacks: &[&str], root: &Path) -> Config {
        Config {
            batch: BatchConfig::with_stacks(stacks.iter().map(PathBuf::from).collect()),
            executor: ExecutorConfig::default(),
            converter: ConverterConfig::default(),
            output: OutputConfig {
                root: Some(root.to_path_buf()),
            },
        }
    }
}
