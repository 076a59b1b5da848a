//! Scheduler adapter that shells out to the batch submission executable
//! (`create_batch.py` by default). Its stdout goes straight to ours; stderr is
//! captured so a rejection can be reported with the scheduler's own words.
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::core::submit::{Scheduler, SchedulerReply};
use crate::types::{DEFAULT_SCHEDULER, JobRequest};

#[derive(Debug, Clone)]
pub struct CommandScheduler {
    program: OsString,
    leading_args: Vec<OsString>,
    current_dir: Option<PathBuf>,
}

impl CommandScheduler {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            current_dir: None,
        }
    }

    /// Arguments placed before the per-job arguments (e.g. an interpreter flag).
    pub fn with_leading_args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    fn command(&self, job: &JobRequest) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args)
            .args(job.scheduler_args())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl Default for CommandScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEDULER)
    }
}

impl Scheduler for CommandScheduler {
    fn submit(&mut self, job: &JobRequest) -> std::io::Result<SchedulerReply> {
        let mut cmd = self.command(job);
        debug!("command: {:?}", cmd);
        let output = cmd.output()?;
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !stderr.trim().is_empty() {
            warn!("scheduler stderr for #{}: {}", job.ordinal, stderr.trim_end());
        }
        Ok(SchedulerReply {
            exit_code: output.status.code(),
            stderr,
        })
    }
}
