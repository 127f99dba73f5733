use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::Modality;

/// Filesystem layout for persisted uploads
///
/// Three directory roots, one per classification outcome: CT images go
/// under `scans/`, RT structure sets under `sets/`, and everything else
/// into the base directory itself. Directories are created on demand;
/// a file written under a name that already exists silently overwrites
/// the previous upload.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    base: PathBuf,
    scans: PathBuf,
    sets: PathBuf,
}

impl StorageLayout {
    /// Creates a layout with `scans/` and `sets/` under a common base
    pub fn new(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        let scans = base.join("scans");
        let sets = base.join("sets");
        Self { base, scans, sets }
    }

    /// Creates a layout from three explicit roots
    pub fn with_roots(
        base: impl Into<PathBuf>,
        scans: impl Into<PathBuf>,
        sets: impl Into<PathBuf>,
    ) -> Self {
        Self {
            base: base.into(),
            scans: scans.into(),
            sets: sets.into(),
        }
    }

    /// Storage root for the given classification outcome
    pub fn dir_for(&self, modality: Modality) -> &Path {
        match modality {
            Modality::CtImage => &self.scans,
            Modality::RtStructureSet => &self.sets,
            Modality::Other => &self.base,
        }
    }

    /// Persists upload bytes under the root for its modality
    ///
    /// The filename must already be sanitized; it is used verbatim as the
    /// storage key. Returns the path written to.
    pub fn save(&self, modality: Modality, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let dir = self.dir_for(modality);
        fs::create_dir_all(dir)?;
        let path = dir.join(filename);
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Path a structure-set upload with this filename would live at
    pub fn structure_set_path(&self, filename: &str) -> PathBuf {
        self.sets.join(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dir_per_modality() {
        let layout = StorageLayout::new("/uploads");
        assert_eq!(layout.dir_for(Modality::CtImage), Path::new("/uploads/scans"));
        assert_eq!(
            layout.dir_for(Modality::RtStructureSet),
            Path::new("/uploads/sets")
        );
        assert_eq!(layout.dir_for(Modality::Other), Path::new("/uploads"));
    }

    #[test]
    fn test_save_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let layout = StorageLayout::new(temp_dir.path());

        let path = layout
            .save(Modality::CtImage, "scan.dcm", b"bytes")
            .unwrap();
        assert_eq!(path, temp_dir.path().join("scans").join("scan.dcm"));
        assert_eq!(fs::read(&path).unwrap(), b"bytes");
    }

    #[test]
    fn test_save_same_name_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let layout = StorageLayout::new(temp_dir.path());

        layout
            .save(Modality::RtStructureSet, "rtss.dcm", b"first")
            .unwrap();
        let path = layout
            .save(Modality::RtStructureSet, "rtss.dcm", b"second")
            .unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_structure_set_path() {
        let layout = StorageLayout::new("/uploads");
        assert_eq!(
            layout.structure_set_path("rtss.dcm"),
            Path::new("/uploads/sets/rtss.dcm")
        );
    }
}
