pub mod batch;
pub mod config;
pub mod converter;
pub mod executor;
mod process;
pub mod testing;

pub use batch::{
    notebook_path_for, output_dir_for, plan_batch, stack_name, BatchError, BatchPlan, BatchReport,
    BatchRunner, FailureStage, ItemOutcome, ItemStatus, StackPlan, WorkItem,
};
pub use config::{
    load_config, load_config_from_str, validate_config, BatchConfig, Config, ConfigError,
    FailurePolicy, OutputConfig, Polarization,
};
pub use converter::{
    report_path_for, ConversionJob, ConversionResult, Converter, ConverterConfig, ConverterError,
    NbconvertConverter, ReportFormat,
};
pub use executor::{
    ExecutionJob, ExecutionResult, ExecutorConfig, ExecutorError, NotebookExecutor,
    PapermillExecutor, RunParameters,
};
