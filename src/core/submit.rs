//! Sequential submission of run files to an external scheduler.
//!
//! Manifest order is dependency order: a run file may consume artifacts of any
//! earlier one, so jobs are issued strictly one after another and the first
//! rejected submission ends the batch. Jobs that were already accepted keep
//! running on the cluster.
use std::path::Path;

use tracing::{debug, error, info};

use crate::core::profile::ResourceProfile;
use crate::core::walltime::resolve_walltime;
use crate::error::{Error, Result};
use crate::types::{JobRequest, RunFile, SubmissionOutcome};

/// Lines of scheduler stderr kept in a failure diagnostic.
const STDERR_SNIPPET_LINES: usize = 10;

/// What the scheduler said about one submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchedulerReply {
    /// Exit code; None if the process was killed by a signal
    pub exit_code: Option<i32>,
    pub stderr: String,
}

impl SchedulerReply {
    pub fn accepted() -> Self {
        Self {
            exit_code: Some(0),
            stderr: String::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Queues one job and blocks until the submission command returns.
pub trait Scheduler {
    fn submit(&mut self, job: &JobRequest) -> std::io::Result<SchedulerReply>;
}

impl<S: Scheduler + ?Sized> Scheduler for &mut S {
    fn submit(&mut self, job: &JobRequest) -> std::io::Result<SchedulerReply> {
        (**self).submit(job)
    }
}

pub struct JobSubmitter<'a> {
    work_dir: &'a Path,
    queue: &'a str,
    profile: &'a ResourceProfile,
}

impl<'a> JobSubmitter<'a> {
    pub fn new(work_dir: &'a Path, queue: &'a str, profile: &'a ResourceProfile) -> Self {
        Self {
            work_dir,
            queue,
            profile,
        }
    }

    /// Resolve memory and walltime for one run file.
    pub fn prepare(&self, run_file: &RunFile) -> JobRequest {
        JobRequest {
            ordinal: run_file.ordinal,
            run_file: run_file.resolve(self.work_dir),
            stage: run_file.stage.clone(),
            memory_mb: self.profile.memory_for(&run_file.stage),
            walltime: resolve_walltime(self.queue, &run_file.stage).to_string(),
            queue: self.queue.to_string(),
        }
    }

    /// Submit `run_files` in order. Stops at the first failure, which is then
    /// the last outcome returned.
    pub fn submit<S: Scheduler>(
        &self,
        run_files: &[RunFile],
        scheduler: &mut S,
    ) -> Vec<SubmissionOutcome> {
        let mut outcomes = Vec::with_capacity(run_files.len());

        for run_file in run_files {
            let job = self.prepare(run_file);
            info!(
                "Submitting #{} {} (memory={} MB, walltime={}, queue={})",
                job.ordinal, run_file, job.memory_mb, job.walltime, job.queue
            );

            let diagnostic = match scheduler.submit(&job) {
                Ok(reply) if reply.success() => None,
                Ok(reply) => Some(rejection_diagnostic(&reply)),
                Err(e) => Some(format!("could not run scheduler: {}", e)),
            };

            match diagnostic {
                None => {
                    debug!("Accepted #{} {}", job.ordinal, run_file);
                    outcomes.push(SubmissionOutcome::Accepted { job });
                }
                Some(diagnostic) => {
                    error!("ERROR submitting {}: {}", run_file, diagnostic);
                    outcomes.push(SubmissionOutcome::Failed { job, diagnostic });
                    break;
                }
            }
        }

        outcomes
    }
}

/// Turn submitter outcomes into the accepted jobs, or the fatal failure.
pub fn accepted_jobs(outcomes: Vec<SubmissionOutcome>) -> Result<Vec<JobRequest>> {
    let mut jobs = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            SubmissionOutcome::Accepted { job } => jobs.push(job),
            SubmissionOutcome::Failed { job, diagnostic } => {
                return Err(Error::SubmissionFailed {
                    ordinal: job.ordinal,
                    run_file: job.run_file.display().to_string(),
                    diagnostic,
                });
            }
        }
    }
    Ok(jobs)
}

fn rejection_diagnostic(reply: &SchedulerReply) -> String {
    let status = match reply.exit_code {
        Some(code) => format!("scheduler exited with status {}", code),
        None => "scheduler terminated by signal".to_string(),
    };
    let lines: Vec<&str> = reply
        .stderr
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return status;
    }
    let tail = &lines[lines.len().saturating_sub(STDERR_SNIPPET_LINES)..];
    format!("{}: {}", status, tail.join(" | "))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::*;

    #[derive(Default)]
    struct RecordingScheduler {
        jobs: Vec<JobRequest>,
        replies: HashMap<usize, SchedulerReply>,
    }

    impl Scheduler for RecordingScheduler {
        fn submit(&mut self, job: &JobRequest) -> std::io::Result<SchedulerReply> {
            self.jobs.push(job.clone());
            Ok(self
                .replies
                .get(&job.ordinal)
                .cloned()
                .unwrap_or_else(SchedulerReply::accepted))
        }
    }

    struct Unlaunchable;

    impl Scheduler for Unlaunchable {
        fn submit(&mut self, _job: &JobRequest) -> std::io::Result<SchedulerReply> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"))
        }
    }

    fn catalog(names: &[&str]) -> Vec<RunFile> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| RunFile::new(i + 1, n))
            .collect()
    }

    #[test]
    fn debug_queue_scenario_uses_defaults() {
        let run_files = catalog(&["run_01_unpack_slc_topo_master", "run_02_merge"]);
        let profile = ResourceProfile::empty();
        let work_dir = PathBuf::from("/scratch/LombokSenAT156VV");
        let submitter = JobSubmitter::new(&work_dir, "debug", &profile);
        let mut scheduler = RecordingScheduler::default();

        let outcomes = submitter.submit(&run_files, &mut scheduler);

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(SubmissionOutcome::is_accepted));
        assert_eq!(scheduler.jobs.len(), 2);
        for job in &scheduler.jobs {
            assert_eq!(job.memory_mb, 3700);
            assert_eq!(job.walltime, "0:30");
            assert_eq!(job.queue, "debug");
        }
        assert_eq!(
            scheduler.jobs[0].run_file,
            PathBuf::from("/scratch/LombokSenAT156VV/run_files/run_01_unpack_slc_topo_master")
        );
        assert_eq!(scheduler.jobs[1].stage, "merge");
    }

    #[test]
    fn profile_and_walltime_are_per_stage() {
        let run_files = catalog(&["run_01_geo2rdr_resample", "run_02_phase_linking"]);
        let profile = ResourceProfile::stack_sentinel();
        let work_dir = PathBuf::from("/w");
        let submitter = JobSubmitter::new(&work_dir, "general", &profile);

        let first = submitter.prepare(&run_files[0]);
        assert_eq!((first.memory_mb, first.walltime.as_str()), (5000, "4:00"));
        let second = submitter.prepare(&run_files[1]);
        assert_eq!((second.memory_mb, second.walltime.as_str()), (3700, "40:00"));
    }

    #[test]
    fn failure_stops_the_batch() {
        let run_files = catalog(&["run_01_a", "run_02_b", "run_03_c", "run_04_d"]);
        let profile = ResourceProfile::empty();
        let work_dir = PathBuf::from("/w");
        let submitter = JobSubmitter::new(&work_dir, "general", &profile);
        let mut scheduler = RecordingScheduler::default();
        scheduler.replies.insert(
            2,
            SchedulerReply {
                exit_code: Some(1),
                stderr: "bsub: queue is closed\n".into(),
            },
        );

        let outcomes = submitter.submit(&run_files, &mut scheduler);

        assert_eq!(scheduler.jobs.iter().map(|j| j.ordinal).collect::<Vec<_>>(), [1, 2]);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].is_accepted());
        match &outcomes[1] {
            SubmissionOutcome::Failed { job, diagnostic } => {
                assert_eq!(job.ordinal, 2);
                assert!(diagnostic.contains("status 1"));
                assert!(diagnostic.contains("queue is closed"));
            }
            other => panic!("expected failure, got {:?}", other),
        }

        match accepted_jobs(outcomes) {
            Err(Error::SubmissionFailed { ordinal, run_file, .. }) => {
                assert_eq!(ordinal, 2);
                assert!(run_file.ends_with("run_02_b"));
            }
            other => panic!("expected SubmissionFailed, got {:?}", other),
        }
    }

    #[test]
    fn launch_error_is_a_failure() {
        let run_files = catalog(&["run_01_a", "run_02_b"]);
        let profile = ResourceProfile::empty();
        let work_dir = PathBuf::from("/w");
        let submitter = JobSubmitter::new(&work_dir, "general", &profile);

        let outcomes = submitter.submit(&run_files, &mut Unlaunchable);

        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].is_accepted());
        assert!(accepted_jobs(outcomes).is_err());
    }

    #[test]
    fn stderr_snippet_keeps_the_tail() {
        let stderr: String = (1..=25).map(|i| format!("line {}\n\n", i)).collect();
        let diag = rejection_diagnostic(&SchedulerReply {
            exit_code: Some(2),
            stderr,
        });
        assert!(diag.starts_with("scheduler exited with status 2: line 16"));
        assert!(diag.ends_with("line 25"));
        assert!(!diag.contains("line 15 "));

        let diag = rejection_diagnostic(&SchedulerReply {
            exit_code: None,
            stderr: String::new(),
        });
        assert_eq!(diag, "scheduler terminated by signal");
    }
}
