mod cli;
mod summary;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use xcorr_core::{
    plan_batch, validate_config, BatchError, BatchPlan, BatchRunner, Config, Converter,
    NbconvertConverter, NotebookExecutor, PapermillExecutor,
};

use cli::{resolve_config, Cli, Command, Overrides};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout carries only command output.
fn init_logging(json: bool) {
    let fmt_layer = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(fmt_layer)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    match &cli.command {
        Command::Plan(args) => {
            let (config, plan) = load(&cli, &args.overrides)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                summary::print_plan(&plan, config.converter.format);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Check(args) => {
            let (config, plan) = load(&cli, &args.overrides)?;
            let (executor, converter) = tools(&config);
            preflight(executor.as_ref(), converter.as_ref()).await?;
            info!(
                "Configuration valid: {} stacks, {} items",
                plan.stacks.len(),
                plan.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Run(args) => {
            let (config, plan) = load(&cli, &args.overrides)?;
            let (executor, converter) = tools(&config);
            if !args.skip_preflight {
                preflight(executor.as_ref(), converter.as_ref()).await?;
            }

            let runner = BatchRunner::new(&config, executor, converter);
            let result = tokio::select! {
                result = runner.run(&plan) => result,
                _ = shutdown_signal() => {
                    warn!("Interrupted, stopping the running tool");
                    return Ok(ExitCode::from(130));
                }
            };
            let (report, code) = match result {
                Ok(report) => {
                    let code = if report.is_success() {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::FAILURE
                    };
                    (report, code)
                }
                Err(BatchError::Aborted { report }) => (*report, ExitCode::FAILURE),
                Err(e) => return Err(e.into()),
            };

            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                summary::print_report(&report);
            }
            Ok(code)
        }
    }
}

/// Resolves, validates and plans the configuration.
fn load(cli: &Cli, overrides: &Overrides) -> Result<(Config, BatchPlan)> {
    let config = resolve_config(&cli.config, overrides)?;
    validate_config(&config).context("Configuration validation failed")?;

    let root = config
        .output
        .resolve_root()
        .context("Failed to determine output root")?;
    let plan = plan_batch(&config.batch, &root)?;

    info!(
        "Planned {} items across {} stacks under {:?}",
        plan.len(),
        plan.stacks.len(),
        root
    );
    Ok((config, plan))
}

fn tools(config: &Config) -> (Arc<dyn NotebookExecutor>, Arc<dyn Converter>) {
    (
        Arc::new(PapermillExecutor::new(config.executor.clone())),
        Arc::new(NbconvertConverter::new(config.converter.clone())),
    )
}

async fn preflight(executor: &dyn NotebookExecutor, converter: &dyn Converter) -> Result<()> {
    executor
        .validate()
        .await
        .with_context(|| format!("{} is not available", executor.name()))?;
    converter
        .validate()
        .await
        .with_context(|| format!("{} is not available", converter.name()))?;
    info!(
        "Preflight passed: {} and {} available",
        executor.name(),
        converter.name()
    );
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
