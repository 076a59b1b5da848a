//! High-level entrypoints: load the run-file catalog of a work directory, submit
//! the requested range in manifest order, then reconcile the job artifacts.
//! Prefer these over wiring the `core` and `io` pieces by hand.
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::core::params::ExecutionParams;
use crate::core::range::RunRange;
use crate::core::submit::{JobSubmitter, Scheduler, accepted_jobs};
use crate::error::Result;
use crate::io::artifacts::{ArtifactReconciler, ReconcileReport};
use crate::io::manifest::RunFileCatalog;
use crate::io::scheduler::CommandScheduler;
use crate::types::JobRequest;

/// Summary of one orchestrator invocation
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub work_dir: PathBuf,
    pub queue: String,
    pub range: RunRange,
    pub submitted: Vec<JobRequest>,
    pub reconcile: ReconcileReport,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Submit run files `params.start..=params.stop` of `<work_dir>/run_files_list`
/// through `scheduler`, one at a time, then reconcile `run_files/`.
///
/// The first rejected submission is returned as `Error::SubmissionFailed` and
/// nothing after it is submitted or reconciled. Reconciliation problems never
/// fail the call; they are listed in `BatchReport::reconcile`.
pub fn execute_run_files<S: Scheduler>(
    params: &ExecutionParams,
    scheduler: &mut S,
) -> Result<BatchReport> {
    let started_at = Utc::now();
    let work_dir = std::path::absolute(&params.work_dir)?;

    let catalog = RunFileCatalog::load_from_work_dir(&work_dir)?;
    let range = RunRange::resolve(params.start, params.stop, catalog.len())?;
    let run_files = catalog.slice(range)?;

    info!("Executing run files {}", range);

    let submitter = JobSubmitter::new(&work_dir, &params.queue_name, &params.profile);
    let submitted = accepted_jobs(submitter.submit(run_files, scheduler))?;

    let reconcile = ArtifactReconciler::for_work_dir(&work_dir).reconcile();

    info!("-----------------Done executing run files-------------------");

    Ok(BatchReport {
        work_dir,
        queue: params.queue_name.clone(),
        range,
        submitted,
        reconcile,
        started_at,
        finished_at: Utc::now(),
    })
}

/// `execute_run_files` with the external program named in `params.scheduler_program`.
pub fn execute_with_command(params: &ExecutionParams) -> Result<BatchReport> {
    let mut scheduler =
        CommandScheduler::new(&params.scheduler_program).current_dir(&params.work_dir);
    execute_run_files(params, &mut scheduler)
}
