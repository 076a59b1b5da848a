//! Post-submission housekeeping over the scheduler's job artifacts.
//!
//! The scheduler leaves one `.e` (stderr) and one `.o` (stdout) file per job in
//! `run_files/`. Reconciliation runs four steps in order:
//!
//! 1. delete error files that are empty or whitespace-only,
//! 2. rewrite the aggregate error file from the surviving error files,
//! 3. keep the first error file per run file and move the rest to `error_files/`,
//! 4. move every stdout file to `stdout_files/`.
//!
//! The whole directory is swept, not just the jobs of the current invocation.
//! Every filesystem failure is logged, recorded in the report and skipped.
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::stage::RunFileName;
use crate::error::Error;
use crate::types::{
    AGGREGATE_ERROR_FILE, ERROR_FILE_EXTENSION, ERROR_OVERFLOW_DIR, RUN_FILES_DIR,
    STDOUT_ARCHIVE_DIR, STDOUT_FILE_EXTENSION,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileIssue {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Error files deleted for being empty
    pub pruned: Vec<String>,
    /// Error files copied into the aggregate
    pub concatenated: Vec<String>,
    /// Duplicate error files moved to the overflow directory
    pub demoted: Vec<String>,
    /// Stdout files moved to the archive directory
    pub relocated: Vec<String>,
    /// Set when an error file failed mid-copy; the aggregate holds its leading bytes
    pub aggregate_partial: bool,
    pub issues: Vec<ReconcileIssue>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    fn record(&mut self, path: &Path, source: std::io::Error) {
        let err = Error::ReconciliationIo {
            path: path.to_path_buf(),
            source,
        };
        warn!("{}", err);
        self.issues.push(ReconcileIssue {
            path: path.to_path_buf(),
            message: err.to_string(),
        });
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactReconciler {
    run_dir: PathBuf,
    aggregate: PathBuf,
    overflow_dir: PathBuf,
    stdout_dir: PathBuf,
}

impl ArtifactReconciler {
    pub fn for_work_dir(work_dir: &Path) -> Self {
        let run_dir = work_dir.join(RUN_FILES_DIR);
        Self {
            aggregate: work_dir.join(AGGREGATE_ERROR_FILE),
            overflow_dir: run_dir.join(ERROR_OVERFLOW_DIR),
            stdout_dir: run_dir.join(STDOUT_ARCHIVE_DIR),
            run_dir,
        }
    }

    pub fn aggregate_path(&self) -> &Path {
        &self.aggregate
    }

    pub fn reconcile(&self) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        if !self.run_dir.is_dir() {
            warn!("No run file directory at {:?}; nothing to reconcile", self.run_dir);
            return report;
        }

        self.prune_degenerate_errors(&mut report);
        self.concatenate_errors(&mut report);
        self.demote_duplicate_errors(&mut report);
        self.relocate_stdout(&mut report);

        info!(
            "Reconciled run files: pruned={} concatenated={} demoted={} relocated={} issues={}",
            report.pruned.len(),
            report.concatenated.len(),
            report.demoted.len(),
            report.relocated.len(),
            report.issues.len()
        );
        report
    }

    pub fn prune_degenerate_errors(&self, report: &mut ReconcileReport) {
        for path in self.artifacts(ERROR_FILE_EXTENSION, report) {
            match is_degenerate(&path) {
                Ok(false) => {}
                Ok(true) => match fs::remove_file(&path) {
                    Ok(()) => {
                        debug!("Removed empty error file {:?}", path);
                        report.pruned.push(file_name(&path));
                    }
                    Err(e) => report.record(&path, e),
                },
                Err(e) => report.record(&path, e),
            }
        }
    }

    /// Rewrite the aggregate from scratch, so repeated calls yield the same content.
    pub fn concatenate_errors(&self, report: &mut ReconcileReport) {
        let error_files = self.artifacts(ERROR_FILE_EXTENSION, report);
        let mut out = match File::create(&self.aggregate) {
            Ok(file) => BufWriter::new(file),
            Err(e) => {
                report.record(&self.aggregate, e);
                return;
            }
        };

        for path in error_files {
            let mut file = match File::open(&path) {
                Ok(file) => file,
                Err(e) => {
                    report.record(&path, e);
                    continue;
                }
            };
            match append(&mut file, &mut out) {
                Ok(_) => report.concatenated.push(file_name(&path)),
                Err(partial) => {
                    if partial.copied > 0 {
                        warn!(
                            "Aggregate {:?} holds only the first {} bytes of {:?}",
                            self.aggregate, partial.copied, path
                        );
                        report.aggregate_partial = true;
                    }
                    report.record(&path, partial.source);
                }
            }
        }

        if let Err(e) = out.flush() {
            report.record(&self.aggregate, e);
        }
    }

    /// Keep the first error file of each run file (natural filename order) in place.
    pub fn demote_duplicate_errors(&self, report: &mut ReconcileReport) {
        let mut seen = HashSet::new();
        for path in self.artifacts(ERROR_FILE_EXTENSION, report) {
            let name = file_name(&path);
            let Some(parsed) = RunFileName::parse(&name) else {
                continue;
            };
            if seen.insert(parsed.index) {
                continue;
            }
            if move_into(&path, &self.overflow_dir, report) {
                report.demoted.push(name);
            }
        }
    }

    pub fn relocate_stdout(&self, report: &mut ReconcileReport) {
        for path in self.artifacts(STDOUT_FILE_EXTENSION, report) {
            let name = file_name(&path);
            if move_into(&path, &self.stdout_dir, report) {
                report.relocated.push(name);
            }
        }
    }

    /// Regular files directly in `run_files/` with the given extension, in natural order.
    fn artifacts(&self, extension: &str, report: &mut ReconcileReport) -> Vec<PathBuf> {
        let entries = match fs::read_dir(&self.run_dir) {
            Ok(entries) => entries,
            Err(e) => {
                report.record(&self.run_dir, e);
                return Vec::new();
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    report.record(&self.run_dir, e);
                    continue;
                }
            };
            let path = entry.path();
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if is_file
                && path.extension().is_some_and(|ext| ext == extension)
                && path != self.aggregate
                && entry.file_name() != AGGREGATE_ERROR_FILE
            {
                files.push(path);
            }
        }
        files.sort_by(|a, b| natural_cmp(&file_name(a), &file_name(b)));
        files
    }
}

const CHUNK_SIZE: usize = 8 * 1024;

/// Empty, or nothing but ASCII whitespace. Stops at the first other byte.
fn is_degenerate(path: &Path) -> std::io::Result<bool> {
    if fs::metadata(path)?.len() == 0 {
        return Ok(true);
    }
    let mut file = File::open(path)?;
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = match file.read(&mut buf) {
            Ok(0) => return Ok(true),
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if !buf[..n].iter().all(|&b| b.is_ascii_whitespace() || b == b'\x0b') {
            return Ok(false);
        }
    }
}

#[derive(Debug)]
struct PartialCopy {
    copied: u64,
    source: std::io::Error,
}

/// Copy `src` into `out` chunk by chunk, reporting how much landed before a failure.
fn append<R: Read, W: Write>(src: &mut R, out: &mut W) -> Result<u64, PartialCopy> {
    let mut buf = [0u8; CHUNK_SIZE];
    let mut copied = 0u64;
    loop {
        let n = match src.read(&mut buf) {
            Ok(0) => return Ok(copied),
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(source) => return Err(PartialCopy { copied, source }),
        };
        out.write_all(&buf[..n])
            .map_err(|source| PartialCopy { copied, source })?;
        copied += n as u64;
    }
}

fn move_into(path: &Path, dir: &Path, report: &mut ReconcileReport) -> bool {
    if let Err(e) = fs::create_dir_all(dir) {
        report.record(dir, e);
        return false;
    }
    let Some(name) = path.file_name() else {
        return false;
    };
    match fs::rename(path, dir.join(name)) {
        Ok(()) => true,
        Err(e) => {
            report.record(path, e);
            false
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Filename order that compares digit runs by value (`run_2` < `run_10`).
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a.as_bytes(), b.as_bytes());
    loop {
        match (a.first(), b.first()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let (a_digits, a_rest) = a.split_at(digit_run(a));
                let (b_digits, b_rest) = b.split_at(digit_run(b));
                let a_value = trim_zeros(a_digits);
                let b_value = trim_zeros(b_digits);
                let ord = a_value
                    .len()
                    .cmp(&b_value.len())
                    .then_with(|| a_value.cmp(b_value))
                    .then_with(|| a_digits.len().cmp(&b_digits.len()));
                if ord != Ordering::Equal {
                    return ord;
                }
                a = a_rest;
                b = b_rest;
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(y);
                }
                a = &a[1..];
                b = &b[1..];
            }
        }
    }
}

fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|c| c.is_ascii_digit()).count()
}

fn trim_zeros(digits: &[u8]) -> &[u8] {
    let zeros = digits.iter().take_while(|&&c| c == b'0').count();
    &digits[zeros..]
}
