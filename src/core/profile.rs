//! Memory requirements per pipeline stage.
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_MEMORY_MB: u32 = 3700;

/// Tuned memory (MB) for the stackSentinel stages that ship with ISCE.
const STACK_SENTINEL_MEMORY: &[(&str, u32)] = &[
    ("unpack_slc_topo_master", 3700),
    ("average_baseline", 3700),
    ("extract_burst_overlaps", 3700),
    ("overlap_geo2rdr_resample", 4000),
    ("pairs_misreg", 3700),
    ("timeseries_misreg", 3700),
    ("geo2rdr_resample", 5000),
    ("extract_stack_valid_region", 3700),
    ("merge", 3700),
    ("merge_burst_igram", 3700),
    ("grid_baseline", 3700),
    ("generate_igram", 3700),
    ("filter_coherence", 6000),
    ("merge_master_slave_slc", 3700),
    ("unwrap", 3700),
];

/// Stage identifier → memory (MB), with a single fallback for unknown stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceProfile {
    pub default_memory_mb: u32,
    pub stages: BTreeMap<String, u32>,
}

/// Partial profile as read from a JSON override file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileOverride {
    pub default_memory_mb: Option<u32>,
    #[serde(default)]
    pub stages: BTreeMap<String, u32>,
}

impl ResourceProfile {
    /// Only the fallback; every lookup yields `DEFAULT_MEMORY_MB`.
    pub fn empty() -> Self {
        Self {
            default_memory_mb: DEFAULT_MEMORY_MB,
            stages: BTreeMap::new(),
        }
    }

    pub fn stack_sentinel() -> Self {
        Self {
            default_memory_mb: DEFAULT_MEMORY_MB,
            stages: STACK_SENTINEL_MEMORY
                .iter()
                .map(|&(stage, mb)| (stage.to_string(), mb))
                .collect(),
        }
    }

    pub fn memory_for(&self, stage: &str) -> u32 {
        self.stages
            .get(stage)
            .copied()
            .unwrap_or(self.default_memory_mb)
    }

    pub fn apply(&mut self, overrides: ProfileOverride) {
        if let Some(mb) = overrides.default_memory_mb {
            self.default_memory_mb = mb;
        }
        self.stages.extend(overrides.stages);
    }

    /// Load a JSON override file and layer it over `self`.
    pub fn with_overrides_from(mut self, path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let overrides: ProfileOverride = serde_json::from_str(&text)?;
        self.apply(overrides);
        Ok(self)
    }
}

impl Default for ResourceProfile {
    fn default() -> Self {
        Self::stack_sentinel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_stage_uses_table_value() {
        let profile = ResourceProfile::stack_sentinel();
        assert_eq!(profile.memory_for("geo2rdr_resample"), 5000);
        assert_eq!(profile.memory_for("filter_coherence"), 6000);
        assert_eq!(profile.memory_for("merge"), 3700);
    }

    #[test]
    fn unknown_stage_falls_back() {
        let profile = ResourceProfile::stack_sentinel();
        assert_eq!(profile.memory_for("phase_linking"), DEFAULT_MEMORY_MB);
        assert_eq!(profile.memory_for(""), 3700);
        assert_eq!(ResourceProfile::empty().memory_for("filter_coherence"), 3700);
    }

    #[test]
    fn overrides_extend_and_replace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(
            &path,
            r#"{"default_memory_mb": 2000, "stages": {"merge": 8000, "phase_linking": 12000}}"#,
        )
        .unwrap();

        let profile = ResourceProfile::stack_sentinel()
            .with_overrides_from(&path)
            .unwrap();
        assert_eq!(profile.memory_for("merge"), 8000);
        assert_eq!(profile.memory_for("phase_linking"), 12000);
        assert_eq!(profile.memory_for("geo2rdr_resample"), 5000);
        assert_eq!(profile.memory_for("something_new"), 2000);
    }

    #[test]
    fn malformed_override_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, r#"{"stages": {"merge": "lots"}}"#).unwrap();
        assert!(ResourceProfile::empty().with_overrides_from(&path).is_err());
    }
}
