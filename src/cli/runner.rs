use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use stackexec::logging::RunLogLayer;
use stackexec::{
    BatchReport, ExecutionParams, ResourceProfile, execute_with_command, project_work_dir,
    run_template_step,
};

use super::args::CliArgs;
use super::errors::AppError;

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<(), AppError> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| AppError::LogFile {
                    path: path.to_path_buf(),
                    source,
                })?;
            Some(RunLogLayer::new(Arc::new(Mutex::new(file))))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();
    Ok(())
}

fn write_report(report: &BatchReport, path: &Path) -> Result<(), AppError> {
    let report_error = |reason: String| AppError::Report {
        path: path.to_path_buf(),
        reason,
    };
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report).map_err(|e| report_error(e.to_string()))?;
    writer.flush().map_err(|e| report_error(e.to_string()))
}

/// Resolve the work dir, run the template step and build the profile.
fn prepare(args: &CliArgs) -> Result<ExecutionParams, AppError> {
    let template = std::path::absolute(&args.custom_template_file)?;
    let work_dir = project_work_dir(&args.scratch_dir, &template)?;
    info!("Project work directory: {:?}", work_dir);

    if let Some(program) = &args.template_command {
        run_template_step(program, &template, &work_dir)?;
    }

    let profile = match &args.memory_profile {
        Some(path) => ResourceProfile::stack_sentinel().with_overrides_from(path)?,
        None => ResourceProfile::stack_sentinel(),
    };

    Ok(ExecutionParams {
        work_dir,
        queue_name: args.queue.clone(),
        scheduler_program: args.scheduler.clone(),
        profile,
        start: args.start,
        stop: args.stop,
    })
}

/// Everything `run` does after logging is up.
pub fn execute(args: &CliArgs) -> Result<BatchReport, AppError> {
    let params = prepare(args)?;
    let report = execute_with_command(&params)?;

    info!(
        "Submitted {} run file(s), range {}",
        report.submitted.len(),
        report.range
    );
    if !report.reconcile.is_clean() {
        info!(
            "Reconciliation finished with {} issue(s)",
            report.reconcile.issues.len()
        );
    }

    if let Some(path) = &args.report {
        write_report(&report, path)?;
        info!("Report written to {:?}", path);
    }

    Ok(report)
}

pub fn run(args: CliArgs) -> Result<(), AppError> {
    init_logging(args.log, args.log_file.as_deref())?;
    execute(&args)?;
    Ok(())
}
