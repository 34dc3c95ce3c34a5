//! Mock converter for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{CallLog, RecordedCall};
use crate::converter::{ConversionJob, ConversionResult, Converter, ConverterError};

/// Mock implementation of the Converter trait.
///
/// Records jobs, fails on request, and writes a placeholder report next to
/// the notebook.
#[derive(Debug)]
pub struct MockConverter {
    log: CallLog,
    jobs: Arc<RwLock<Vec<ConversionJob>>>,
    fail_paths: Arc<RwLock<HashSet<PathBuf>>>,
    next_error: Arc<RwLock<Option<ConverterError>>>,
    write_output: bool,
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConverter {
    /// Create a new mock converter with its own call log.
    pub fn new() -> Self {
        Self::with_log(CallLog::default())
    }

    /// Create a mock converter recording into a shared call log.
    pub fn with_log(log: CallLog) -> Self {
        Self {
            log,
            jobs: Arc::new(RwLock::new(Vec::new())),
            fail_paths: Arc::new(RwLock::new(HashSet::new())),
            next_error: Arc::new(RwLock::new(None)),
            write_output: true,
        }
    }

    /// Do not write placeholder reports.
    pub fn without_files(mut self) -> Self {
        self.write_output = false;
        self
    }

    /// Get all recorded jobs.
    pub async fn recorded_jobs(&self) -> Vec<ConversionJob> {
        self.jobs.read().await.clone()
    }

    /// Get the number of conversions performed.
    pub async fn conversion_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Fail every conversion of the notebook at `input_path`.
    pub async fn fail_on(&self, input_path: impl AsRef<Path>) {
        self.fail_paths
            .write()
            .await
            .insert(input_path.as_ref().to_path_buf());
    }

    /// Configure the next conversion to fail with the given error.
    pub async fn set_next_error(&self, error: ConverterError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn convert(&self, job: &ConversionJob) -> Result<ConversionResult, ConverterError> {
        self.jobs.write().await.push(job.clone());
        self.log.record(RecordedCall::Convert(job.clone())).await;

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        if self.fail_paths.read().await.contains(&job.input_path) {
            return Err(ConverterError::conversion_failed(
                "mock conversion failure",
                None,
            ));
        }

        let output_path = job.output_path();
        let mut output_size_bytes = 0;
        if self.write_output {
            let body = b"%PDF-1.4 mock";
            tokio::fs::write(&output_path, body).await?;
            output_size_bytes = body.len() as u64;
        }

        Ok(ConversionResult {
            output_path,
            output_size_bytes,
            duration_ms: 0,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::ReportFormat;

    #[tokio::test]
    async fn test_writes_report_next_to_notebook() {
        let dir = tempfile::tempdir().unwrap();
        let converter = MockConverter::new();
        let job = ConversionJob::new(dir.path().join("nb.ipynb"), ReportFormat::Pdf);

        let result = converter.convert(&job).await.unwrap();
        assert_eq!(result.output_path, dir.path().join("nb.pdf"));
        assert!(result.output_path.exists());
    }

    #[tokio::test]
    async fn test_shared_log_records_order() {
        let log = CallLog::default();
        let converter = MockConverter::with_log(log.clone()).without_files();
        converter.fail_on("/out/bad.ipynb").await;

        assert!(converter
            .convert(&ConversionJob::new(PathBuf::from("/out/bad.ipynb"), ReportFormat::Pdf))
            .await
            .is_err());
        assert_eq!(log.calls().await.len(), 1);
        assert_eq!(converter.conversion_count().await, 1);
    }
}
