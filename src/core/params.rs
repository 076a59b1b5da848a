use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::profile::ResourceProfile;
use crate::types::DEFAULT_SCHEDULER;

/// Execution parameters suitable for config files and programmatic callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// `<SCRATCHDIR>/<project>`; holds `run_files_list` and `run_files/`
    pub work_dir: PathBuf,
    /// Scheduler queue; also selects the walltime policy
    pub queue_name: String,
    /// Program invoked once per run file
    pub scheduler_program: String,
    pub profile: ResourceProfile,
    /// First run file to submit (1-based); None means the first
    pub start: Option<usize>,
    /// Last run file to submit (inclusive); None means the last
    pub stop: Option<usize>,
}

impl ExecutionParams {
    pub fn new(work_dir: impl Into<PathBuf>, queue_name: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            queue_name: queue_name.into(),
            ..Self::default()
        }
    }
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            queue_name: String::from("general"),
            scheduler_program: DEFAULT_SCHEDULER.to_string(),
            profile: ResourceProfile::default(),
            start: None,
            stop: None,
        }
    }
}
