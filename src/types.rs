//! Shared types and well-known names used across stackexec.
//! Includes `RunFile`, `JobRequest`, `SubmissionOutcome` and the directory and
//! file names the scheduler and reconciler agree on.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::stage::stage_identifier;

/// Directory (relative to the work dir) holding the generated run files and their job artifacts.
pub const RUN_FILES_DIR: &str = "run_files";
/// Manifest listing the run-file generators, one per line, in dependency order.
pub const MANIFEST_FILE: &str = "run_files_list";
/// Aggregate of all non-empty error files, written into the work dir.
pub const AGGREGATE_ERROR_FILE: &str = "out_stack_sentinel_errorfiles.e";
/// Subdirectory of `run_files/` receiving demoted duplicate error files.
pub const ERROR_OVERFLOW_DIR: &str = "error_files";
/// Subdirectory of `run_files/` receiving stdout files.
pub const STDOUT_ARCHIVE_DIR: &str = "stdout_files";
/// Default external submission executable.
pub const DEFAULT_SCHEDULER: &str = "create_batch.py";

pub const ERROR_FILE_EXTENSION: &str = "e";
pub const STDOUT_FILE_EXTENSION: &str = "o";

/// One pipeline-stage script, addressed by its 1-based position in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFile {
    pub ordinal: usize,
    /// Work-dir relative path, always `run_files/<name>`
    pub path: String,
    pub stage: String,
}

impl RunFile {
    pub fn new(ordinal: usize, name: &str) -> Self {
        Self {
            ordinal,
            path: format!("{}/{}", RUN_FILES_DIR, name),
            stage: stage_identifier(name).to_string(),
        }
    }

    pub fn name(&self) -> &str {
        self.path
            .rsplit_once('/')
            .map(|(_, name)| name)
            .unwrap_or(&self.path)
    }

    pub fn resolve(&self, work_dir: &Path) -> PathBuf {
        work_dir.join(RUN_FILES_DIR).join(self.name())
    }
}

impl std::fmt::Display for RunFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// Everything the scheduler needs to queue one run file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    pub ordinal: usize,
    pub run_file: PathBuf,
    pub stage: String,
    pub memory_mb: u32,
    pub walltime: String,
    pub queue: String,
}

impl JobRequest {
    /// Arguments in the order `create_batch.py` expects them.
    pub fn scheduler_args(&self) -> Vec<OsString> {
        vec![
            self.run_file.clone().into_os_string(),
            format!("--memory={}", self.memory_mb).into(),
            format!("--walltime={}", self.walltime).into(),
            "--queuename".into(),
            self.queue.clone().into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Accepted { job: JobRequest },
    Failed { job: JobRequest, diagnostic: String },
}

impl SubmissionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_file_is_rooted_under_run_files() {
        let rf = RunFile::new(3, "run_03_overlap_geo2rdr_resample");
        assert_eq!(rf.path, "run_files/run_03_overlap_geo2rdr_resample");
        assert_eq!(rf.name(), "run_03_overlap_geo2rdr_resample");
        assert_eq!(rf.stage, "overlap_geo2rdr_resample");
        assert_eq!(
            rf.resolve(Path::new("/scratch/Lombok")),
            PathBuf::from("/scratch/Lombok/run_files/run_03_overlap_geo2rdr_resample")
        );
    }

    #[test]
    fn scheduler_args_follow_create_batch_convention() {
        let job = JobRequest {
            ordinal: 1,
            run_file: PathBuf::from("/scratch/P/run_files/run_01_merge"),
            stage: "merge".into(),
            memory_mb: 3700,
            walltime: "0:30".into(),
            queue: "debug".into(),
        };
        let args: Vec<String> = job
            .scheduler_args()
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            [
                "/scratch/P/run_files/run_01_merge",
                "--memory=3700",
                "--walltime=0:30",
                "--queuename",
                "debug"
            ]
        );
    }
}
