#![doc = r#"
stackexec — submit ISCE stackSentinel run files to an HPC batch scheduler.

An interferometric stack is processed as an ordered series of generated
"run files" (`run_01_unpack_slc_topo_master`, `run_02_average_baseline`, ...),
listed in `<work_dir>/run_files_list`. Each run file becomes one batch job. This
crate loads that manifest, gives every stage a memory and walltime request,
submits the jobs one at a time in manifest order through an external submission
program (`create_batch.py` by default), and finally tidies the `.e`/`.o`
artifacts the jobs leave in `run_files/`. It powers the `stackexec` CLI and can
be embedded directly.

Ordering
--------
Manifest order is the dependency order of the pipeline. Jobs are never
reordered or submitted in parallel, and the first rejected submission aborts
the rest of the batch with `Error::SubmissionFailed`. Jobs accepted before the
failure keep running on the cluster.

Quick start
-----------
```rust,no_run
use stackexec::{execute_with_command, ExecutionParams};

fn main() -> stackexec::Result<()> {
    let mut params = ExecutionParams::new("/scratch/LombokSenAT156VV", "general");
    params.start = Some(3);
    params.stop = Some(7);

    let report = execute_with_command(&params)?;
    println!(
        "submitted={} pruned={} demoted={}",
        report.submitted.len(),
        report.reconcile.pruned.len(),
        report.reconcile.demoted.len()
    );
    Ok(())
}
```

Custom schedulers
-----------------
Anything implementing [`Scheduler`] can stand in for the submission program,
e.g. to talk to a scheduler API or to dry-run a batch:

```rust
use stackexec::{JobRequest, Scheduler, SchedulerReply};

struct DryRun(Vec<JobRequest>);

impl Scheduler for DryRun {
    fn submit(&mut self, job: &JobRequest) -> std::io::Result<SchedulerReply> {
        self.0.push(job.clone());
        Ok(SchedulerReply::accepted())
    }
}
```

Useful modules
--------------
- [`api`] — high-level entry points and `BatchReport`.
- [`core`] — stage grammar, resource profile, walltime policy, submitter.
- [`io`] — manifest catalog, command scheduler, artifact reconciliation, template helpers.
- [`logging`] — file sink `tracing` layer used by the CLI.
- [`error`] — crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod logging;
pub mod types;

// Curated public API surface
pub use crate::core::params::ExecutionParams;
pub use crate::core::profile::{DEFAULT_MEMORY_MB, ResourceProfile};
pub use crate::core::range::RunRange;
pub use crate::core::stage::{RunFileName, stage_identifier};
pub use crate::core::submit::{JobSubmitter, Scheduler, SchedulerReply, accepted_jobs};
pub use crate::core::walltime::resolve_walltime;
pub use crate::error::{Error, Result};
pub use crate::types::{JobRequest, RunFile, SubmissionOutcome};

pub use crate::io::{
    ArtifactReconciler, CommandScheduler, ReconcileIssue, ReconcileReport, RunFileCatalog,
    project_name, project_work_dir, run_template_step,
};

pub use crate::api::{BatchReport, execute_run_files, execute_with_command};
