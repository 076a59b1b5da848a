use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Inclusive, 1-based span of run files to submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRange {
    pub start: usize,
    pub stop: usize,
}

impl RunRange {
    /// Fill in missing bounds from the catalog length and validate explicit ones.
    ///
    /// With no bounds and an empty catalog the result is the empty range `1..=0`.
    pub fn resolve(start: Option<usize>, stop: Option<usize>, len: usize) -> Result<Self> {
        let explicit = start.is_some() || stop.is_some();
        let range = Self {
            start: start.unwrap_or(1),
            stop: stop.unwrap_or(len),
        };

        if !explicit && len == 0 {
            return Ok(range);
        }
        if range.start < 1 || range.start > range.stop || range.stop > len {
            return Err(Error::RangeOutOfBounds {
                start: range.start,
                stop: range.stop,
                len,
            });
        }
        Ok(range)
    }

    pub fn len(&self) -> usize {
        (self.stop + 1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Display for RunRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.stop)
    }
}
