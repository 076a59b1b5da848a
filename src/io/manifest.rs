//! Run-file catalog loaded from the `run_files_list` manifest.
//!
//! Each manifest line names a run-file generator (often as an absolute path
//! into the ISCE stack directory). Only the basename is kept and re-rooted
//! under `run_files/`, and manifest order is preserved as execution order.
use std::path::Path;

use tracing::{debug, warn};

use crate::core::range::RunRange;
use crate::core::stage::RunFileName;
use crate::error::{Error, Result};
use crate::types::{MANIFEST_FILE, RunFile};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFileCatalog {
    run_files: Vec<RunFile>,
}

impl RunFileCatalog {
    pub fn load(manifest: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(manifest).map_err(|source| Error::ManifestUnreadable {
            path: manifest.to_path_buf(),
            source,
        })?;
        let catalog = Self::parse(&text);
        debug!(
            "Loaded {} run files from {:?}",
            catalog.len(),
            manifest
        );
        Ok(catalog)
    }

    /// Load `<work_dir>/run_files_list`.
    pub fn load_from_work_dir(work_dir: &Path) -> Result<Self> {
        Self::load(&work_dir.join(MANIFEST_FILE))
    }

    pub fn parse(text: &str) -> Self {
        let run_files = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(i, line)| {
                let name = line.rsplit('/').next().unwrap_or(line);
                if RunFileName::parse(name).is_none() {
                    warn!("Run file name {:?} does not match run_<index>_<stage>", name);
                }
                RunFile::new(i + 1, name)
            })
            .collect();
        Self { run_files }
    }

    pub fn len(&self) -> usize {
        self.run_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.run_files.is_empty()
    }

    pub fn run_files(&self) -> &[RunFile] {
        &self.run_files
    }

    /// Run files `start..=stop`; the range must come from `RunRange::resolve`
    /// against this catalog's length.
    pub fn slice(&self, range: RunRange) -> Result<&[RunFile]> {
        if range.is_empty() {
            return Ok(&[]);
        }
        if range.start < 1 || range.stop > self.len() {
            return Err(Error::RangeOutOfBounds {
                start: range.start,
                stop: range.stop,
                len: self.len(),
            });
        }
        Ok(&self.run_files[range.start - 1..range.stop])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = "\
/nethome/stack/run_files/run_01_unpack_slc_topo_master
/nethome/stack/run_files/run_02_average_baseline
run_03_extract_burst_overlaps

/nethome/stack/run_files/run_04_overlap_geo2rdr_resample\r
";

    #[test]
    fn ordinals_follow_manifest_order() {
        let catalog = RunFileCatalog::parse(MANIFEST);
        assert_eq!(catalog.len(), 4);
        let ordinals: Vec<usize> = catalog.run_files().iter().map(|r| r.ordinal).collect();
        assert_eq!(ordinals, [1, 2, 3, 4]);
        assert_eq!(catalog.run_files()[0].path, "run_files/run_01_unpack_slc_topo_master");
        assert_eq!(catalog.run_files()[2].path, "run_files/run_03_extract_burst_overlaps");
        assert_eq!(catalog.run_files()[3].stage, "overlap_geo2rdr_resample");
    }

    #[test]
    fn load_reads_from_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), MANIFEST).unwrap();
        let catalog = RunFileCatalog::load_from_work_dir(dir.path()).unwrap();
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn missing_manifest_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        match RunFileCatalog::load_from_work_dir(dir.path()) {
            Err(Error::ManifestUnreadable { path, .. }) => {
                assert!(path.ends_with(MANIFEST_FILE));
            }
            other => panic!("expected ManifestUnreadable, got {:?}", other),
        }
    }

    #[test]
    fn slice_is_inclusive_and_ordered() {
        let catalog = RunFileCatalog::parse(MANIFEST);
        let range = RunRange::resolve(Some(2), Some(3), catalog.len()).unwrap();
        let slice = catalog.slice(range).unwrap();
        assert_eq!(slice.len(), 2);
        assert_eq!(slice[0].ordinal, 2);
        assert_eq!(slice[1].ordinal, 3);
    }

    #[test]
    fn slice_rejects_foreign_ranges() {
        let catalog = RunFileCatalog::parse(MANIFEST);
        assert!(catalog.slice(RunRange { start: 2, stop: 9 }).is_err());
        assert!(catalog.slice(RunRange { start: 1, stop: 0 }).unwrap().is_empty());
    }
}
