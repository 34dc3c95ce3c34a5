//! Human-readable output for `plan` and `run`.

use xcorr_core::{report_path_for, BatchPlan, BatchReport, ItemStatus, ReportFormat};

pub fn print_plan(plan: &BatchPlan, format: ReportFormat) {
    for stack in &plan.stacks {
        println!("{} -> {}", stack.stack.display(), stack.output_dir.display());
        for item in &stack.items {
            println!(
                "  [{}] {}",
                item.polarization,
                item.notebook_path.display()
            );
            println!(
                "       {}",
                report_path_for(&item.notebook_path, format).display()
            );
        }
    }
    println!("{} items", plan.len());
}

pub fn print_report(report: &BatchReport) {
    for outcome in &report.outcomes {
        match &outcome.status {
            ItemStatus::Completed { report_path } => {
                println!(
                    "ok     {} [{}] {}",
                    outcome.stack.display(),
                    outcome.polarization,
                    report_path.display()
                );
            }
            ItemStatus::Failed { stage, error, .. } => {
                println!(
                    "FAILED {} [{}] {}: {}",
                    outcome.stack.display(),
                    outcome.polarization,
                    stage,
                    error
                );
            }
        }
    }

    println!(
        "run {}: {} succeeded, {} failed, {} not attempted",
        report.run_id,
        report.succeeded(),
        report.failed(),
        report.not_attempted()
    );
    if report.aborted {
        println!("batch aborted at first failure");
    }
}
