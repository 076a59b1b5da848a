//! Run-file name grammar.
//!
//! Generated run files are named `run_<digits>_<identifier>`, where the
//! identifier is itself underscore-joined (`run_07_merge_burst_igram` has stage
//! identifier `merge_burst_igram`). The stage identifier keys the resource
//! profile and the walltime policy.

/// Strictly parsed run-file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunFileName<'a> {
    pub index: u32,
    pub stage: &'a str,
}

impl<'a> RunFileName<'a> {
    /// Parse `run_<digits>_<identifier>`; `None` if the name does not fit.
    pub fn parse(name: &'a str) -> Option<Self> {
        let rest = name.strip_prefix("run_")?;
        let (digits, stage) = rest.split_once('_')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) || stage.is_empty() {
            return None;
        }
        Some(Self {
            index: digits.parse().ok()?,
            stage,
        })
    }
}

/// Stage identifier of a run-file name: everything after the second
/// underscore-delimited field. Names outside the grammar still yield that
/// tail (possibly empty), which then falls through to the default profile.
pub fn stage_identifier(name: &str) -> &str {
    match RunFileName::parse(name) {
        Some(parsed) => parsed.stage,
        None => name.splitn(3, '_').nth(2).unwrap_or(""),
    }
}
