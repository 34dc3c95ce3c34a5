use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use xcorr_core::{
    load_config, BatchConfig, Config, ConverterConfig, ExecutorConfig, FailurePolicy,
    OutputConfig, Polarization, ReportFormat,
};

#[derive(Parser)]
#[command(name = "xcorr-batch")]
#[command(about = "Batch-run the OPERA RTC cross-correlation notebook and render PDF reports")]
#[command(version)]
pub struct Cli {
    /// Configuration file.
    #[arg(long, global = true, env = "XCORR_CONFIG", default_value = "xcorr.toml")]
    pub config: PathBuf,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, default_value_t = false)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Execute the notebook and render a report for every stack and polarization.
    Run(RunArgs),
    /// Print the planned notebooks and reports without running anything.
    Plan(PlanArgs),
    /// Validate the configuration and check that papermill and nbconvert are available.
    Check(CheckArgs),
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub overrides: Overrides,

    /// Do not check tool availability before starting.
    #[arg(long, default_value_t = false)]
    pub skip_preflight: bool,

    /// Print the batch report as JSON on stdout.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub overrides: Overrides,

    /// Print the plan as JSON on stdout.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub overrides: Overrides,
}

/// Command-line values that replace configuration file values.
#[derive(Args, Default)]
pub struct Overrides {
    /// Stack directory; repeat for several. Replaces `batch.stacks`.
    #[arg(long = "stack", value_name = "DIR")]
    pub stacks: Vec<PathBuf>,

    /// Polarization (vv, vh, hh, hv); repeat for several. Replaces `batch.polarizations`.
    #[arg(long = "polarization", value_name = "POL")]
    pub polarizations: Vec<Polarization>,

    /// Ask the notebook to delete mosaicked RTCs and static files.
    #[arg(long, default_value_t = false, conflicts_with = "keep_mosaics")]
    pub delete_mosaics: bool,

    /// Keep mosaicked RTCs even when the configuration deletes them.
    #[arg(long, default_value_t = false)]
    pub keep_mosaics: bool,

    /// Cleanup list forwarded to the notebook.
    #[arg(long, value_name = "LIST")]
    pub cleanup_list: Option<String>,

    /// Stop the batch at the first failure.
    #[arg(long, default_value_t = false)]
    pub fail_fast: bool,

    /// Parent directory for the `cross_correlation_*` output directories.
    #[arg(long, value_name = "DIR")]
    pub output_root: Option<PathBuf>,

    /// Template notebook.
    #[arg(long, value_name = "NOTEBOOK")]
    pub template: Option<PathBuf>,

    /// Jupyter kernel name.
    #[arg(long, value_name = "NAME")]
    pub kernel: Option<String>,

    /// Report format (pdf, webpdf, html, latex, markdown, rst).
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        if !self.stacks.is_empty() {
            config.batch.stacks = self.stacks.clone();
        }
        if !self.polarizations.is_empty() {
            config.batch.polarizations = self.polarizations.clone();
        }
        if self.delete_mosaics {
            config.batch.delete_mosaics = true;
        }
        if self.keep_mosaics {
            config.batch.delete_mosaics = false;
        }
        if let Some(cleanup_list) = &self.cleanup_list {
            config.batch.cleanup_list = cleanup_list.clone();
        }
        if self.fail_fast {
            config.batch.failure_policy = FailurePolicy::FailFast;
        }
        if let Some(root) = &self.output_root {
            config.output.root = Some(root.clone());
        }
        if let Some(template) = &self.template {
            config.executor.template = template.clone();
        }
        if let Some(kernel) = &self.kernel {
            config.executor.kernel_name = kernel.clone();
        }
        if let Some(format) = self.format {
            config.converter.format = format;
        }
    }
}

/// Loads the configuration file, or builds one from defaults when the file is
/// absent and stacks were given on the command line, then applies overrides.
pub fn resolve_config(path: &Path, overrides: &Overrides) -> Result<Config> {
    let mut config = if path.exists() {
        info!("Loading configuration from {:?}", path);
        load_config(path).with_context(|| format!("Failed to load config from {:?}", path))?
    } else if !overrides.stacks.is_empty() {
        info!("No configuration file at {:?}, using defaults", path);
        Config {
            batch: BatchConfig::with_stacks(Vec::new()),
            executor: ExecutorConfig::default(),
            converter: ConverterConfig::default(),
            output: OutputConfig::default(),
        }
    } else {
        bail!(
            "configuration file {:?} not found and no --stack given",
            path
        );
    };

    overrides.apply(&mut config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "xcorr-batch",
            "run",
            "--stack",
            "/data/foo",
            "--stack",
            "/data/bar",
            "--polarization",
            "vh",
            "--delete-mosaics",
            "--fail-fast",
        ])
        .unwrap();

        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.overrides.stacks.len(), 2);
        assert_eq!(args.overrides.polarizations, vec![Polarization::Vh]);
        assert!(args.overrides.delete_mosaics);
        assert!(args.overrides.fail_fast);
        assert!(!args.skip_preflight);
    }

    #[test]
    fn test_parse_rejects_conflicting_mosaic_flags() {
        let result = Cli::try_parse_from([
            "xcorr-batch",
            "run",
            "--delete-mosaics",
            "--keep-mosaics",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_has_no_json_flag() {
        assert!(Cli::try_parse_from(["xcorr-batch", "check"]).is_ok());
        assert!(Cli::try_parse_from(["xcorr-batch", "check", "--json"]).is_err());
        assert!(Cli::try_parse_from(["xcorr-batch", "plan", "--json"]).is_ok());
    }

    #[test]
    fn test_parse_format_override() {
        let cli =
            Cli::try_parse_from(["xcorr-batch", "plan", "--format", "webpdf"]).unwrap();
        let Command::Plan(args) = cli.command else {
            panic!("expected plan");
        };
        assert_eq!(args.overrides.format, Some(ReportFormat::Webpdf));

        assert!(Cli::try_parse_from(["xcorr-batch", "plan", "--format", "script"]).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_polarization() {
        let result = Cli::try_parse_from(["xcorr-batch", "plan", "--polarization", "xy"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let mut config = Config {
            batch: BatchConfig::with_stacks(vec![PathBuf::from("/data/old")]),
            executor: ExecutorConfig::default(),
            converter: ConverterConfig::default(),
            output: OutputConfig::default(),
        };
        let overrides = Overrides {
            stacks: vec![PathBuf::from("/data/new")],
            cleanup_list: Some("vv amplitude data, ".to_string()),
            output_root: Some(PathBuf::from("/scratch")),
            kernel: Some("opera".to_string()),
            ..Default::default()
        };
        overrides.apply(&mut config);

        assert_eq!(config.batch.stacks, vec![PathBuf::from("/data/new")]);
        assert_eq!(config.batch.cleanup_list, "vv amplitude data, ");
        assert_eq!(config.output.root, Some(PathBuf::from("/scratch")));
        assert_eq!(config.executor.kernel_name, "opera");
        assert_eq!(config.batch.failure_policy, FailurePolicy::Continue);
        assert!(!config.batch.delete_mosaics);
    }

    #[test]
    fn test_keep_mosaics_overrides_config_file() {
        let mut config = Config {
            batch: BatchConfig::with_stacks(vec![PathBuf::from("/data/foo")]),
            executor: ExecutorConfig::default(),
            converter: ConverterConfig::default(),
            output: OutputConfig::default(),
        };
        config.batch.delete_mosaics = true;

        let overrides = Overrides {
            keep_mosaics: true,
            ..Default::default()
        };
        overrides.apply(&mut config);
        assert!(!config.batch.delete_mosaics);
    }

    #[test]
    fn test_resolve_config_without_file_needs_stacks() {
        let missing = PathBuf::from("/nonexistent/xcorr.toml");
        assert!(resolve_config(&missing, &Overrides::default()).is_err());

        let overrides = Overrides {
            stacks: vec![PathBuf::from("/data/foo")],
            ..Default::default()
        };
        let config = resolve_config(&missing, &overrides).unwrap();
        assert_eq!(config.batch.stacks, vec![PathBuf::from("/data/foo")]);
        assert_eq!(config.batch.polarizations.len(), 2);
    }

    #[test]
    fn test_resolve_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[batch]
stacks = ["/data/foo"]
delete_mosaics = true
"#
        )
        .unwrap();

        let overrides = Overrides {
            fail_fast: true,
            ..Default::default()
        };
        let config = resolve_config(file.path(), &overrides).unwrap();
        assert!(config.batch.delete_mosaics);
        assert_eq!(config.batch.failure_policy, FailurePolicy::FailFast);
    }
}
