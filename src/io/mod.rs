//! Filesystem and process adapters: the run-file `manifest` catalog, the
//! `scheduler` command adapter, `artifacts` reconciliation and the `template`
//! project helpers.
pub mod artifacts;
pub use artifacts::{ArtifactReconciler, ReconcileIssue, ReconcileReport};

pub mod manifest;
pub use manifest::RunFileCatalog;

pub mod scheduler;
pub use scheduler::CommandScheduler;

pub mod template;
pub use template::{project_name, project_work_dir, run_template_step};
