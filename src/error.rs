//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Distinguishes fatal conditions (unreadable manifest, bad range, scheduler
//! rejection) from the best-effort reconciliation failures that are only logged.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run file manifest {path:?} is unreadable: {source}")]
    ManifestUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Requested run files {start} to {stop} are outside the catalog of {len} entries")]
    RangeOutOfBounds {
        start: usize,
        stop: usize,
        len: usize,
    },

    #[error("ERROR submitting run file #{ordinal} {run_file}: {diagnostic}")]
    SubmissionFailed {
        ordinal: usize,
        run_file: String,
        diagnostic: String,
    },

    #[error("Template step failed for {template:?}: {diagnostic}")]
    TemplateStepFailed {
        template: PathBuf,
        diagnostic: String,
    },

    #[error("Reconciliation I/O error on {path:?}: {source}")]
    ReconciliationIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },
}
