use clap::Parser;
use std::path::PathBuf;

use stackexec::types::DEFAULT_SCHEDULER;

#[derive(Parser, Debug)]
#[command(
    name = "stackexec",
    version,
    about = "Submit stackSentinel run files to the batch scheduler",
    after_help = "example:\n  stackexec LombokSenAT156VV.template\n  stackexec LombokSenAT156VV.template 3 7"
)]
pub struct CliArgs {
    /// Custom template with option settings; its file stem names the project
    pub custom_template_file: PathBuf,

    /// First run file to submit (1-based, default: first)
    pub start: Option<usize>,

    /// Last run file to submit (inclusive, default: last)
    pub stop: Option<usize>,

    /// Base directory holding one work directory per project
    #[arg(long, env = "SCRATCHDIR")]
    pub scratch_dir: PathBuf,

    /// Scheduler queue; `debug` shortens the walltime
    #[arg(long, env = "QUEUENAME")]
    pub queue: String,

    /// Submission executable invoked once per run file
    #[arg(long, default_value = DEFAULT_SCHEDULER)]
    pub scheduler: String,

    /// JSON file overriding per-stage memory, e.g. {"stages": {"merge": 4000}}
    #[arg(long)]
    pub memory_profile: Option<PathBuf>,

    /// Program that creates or resumes the project from the template before submission
    #[arg(long)]
    pub template_command: Option<String>,

    /// Write a JSON summary of the run to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    pub log: bool,

    /// Also append INFO and above to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn range_is_optional() {
        let args = CliArgs::try_parse_from([
            "stackexec",
            "LombokSenAT156VV.template",
            "--scratch-dir",
            "/scratch",
            "--queue",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.start, None);
        assert_eq!(args.stop, None);
        assert_eq!(args.scheduler, "create_batch.py");
        assert_eq!(args.queue, "debug");
    }

    #[test]
    fn parses_start_and_stop() {
        let args = CliArgs::try_parse_from([
            "stackexec",
            "LombokSenAT156VV.template",
            "3",
            "7",
            "--scratch-dir",
            "/scratch",
            "--queue",
            "general",
            "--scheduler",
            "submit_job.py",
        ])
        .unwrap();
        assert_eq!((args.start, args.stop), (Some(3), Some(7)));
        assert_eq!(args.scheduler, "submit_job.py");
    }

    #[test]
    fn rejects_non_numeric_range() {
        assert!(
            CliArgs::try_parse_from([
                "stackexec",
                "P.template",
                "first",
                "--scratch-dir",
                "/s",
                "--queue",
                "q",
            ])
            .is_err()
        );
    }
}
