//! # Dataset identification
//!
//! A path belongs to a ScanR dataset when it carries one of the fixed
//! marker names, when its TIFF content bears the vendor software tag, or
//! when the XML descriptor sits two directory levels above it (the usual
//! `experiment/data/plane.tif` layout).

use std::path::{Path, PathBuf};

use crate::plane::{PlaneDecoder, PlaneHandle, TiffPlaneDecoder};

/// Fixed name of the XML experiment descriptor.
pub const DESCRIPTOR_FILE: &str = "experiment_descriptor.xml";

/// Fixed name of the companion key/value descriptor.
pub const EXPERIMENT_FILE: &str = "experiment_descriptor.dat";

/// Fixed name of the acquisition log.
pub const ACQUISITION_LOG: &str = "AcquisitionLog.dat";

/// Software tag written into every ScanR plane file.
pub const VENDOR_SOFTWARE: &str = "National Instruments IMAQ";

/// Extensions of companion metadata files that belong to a dataset.
pub(crate) const METADATA_EXTENSIONS: [&str; 2] = ["dat", "xml"];

/// How the files of one dataset may be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileGrouping {
    /// Files may be opened individually or as a group.
    CanGroup,
    /// All files of a dataset form one inseparable group.
    MustGroup,
    /// Files are always independent.
    CannotGroup,
}

/// Grouping contract for ScanR data: planes and descriptors never open
/// separately.
pub fn file_grouping() -> FileGrouping {
    FileGrouping::MustGroup
}

/// Whether `path` has one of the fixed dataset marker names.
pub fn matches_name(path: &Path) -> bool {
    matches!(
        path.file_name().and_then(|name| name.to_str()),
        Some(DESCRIPTOR_FILE | EXPERIMENT_FILE | ACQUISITION_LOG)
    )
}

/// Whether the file's decoded content carries the vendor software tag.
pub fn matches_content<D: PlaneDecoder>(decoder: &D, path: &Path) -> bool {
    match decoder.open(path) {
        Ok(handle) => handle.software().map(str::trim) == Some(VENDOR_SOFTWARE),
        Err(_) => false,
    }
}

/// Identification contract: a marker name always identifies; TIFF content
/// is consulted only when `open` allows touching the file.
pub fn is_this_type(path: &Path, open: bool) -> bool {
    if matches_name(path) {
        return true;
    }
    open && matches_content(&TiffPlaneDecoder, path)
}

/// Whether `path` alone is enough to locate the whole dataset.
///
/// True for the marker files themselves, and for plane files whose
/// descriptor sits two directory levels up.
pub fn is_single_file(path: &Path) -> bool {
    matches_name(path) || ancestor_descriptor(path).is_some()
}

/// Descriptor two directory levels above a plane file, if present.
pub(crate) fn ancestor_descriptor(path: &Path) -> Option<PathBuf> {
    let grandparent = path.parent()?.parent()?;
    let candidate = grandparent.join(DESCRIPTOR_FILE);
    candidate.is_file().then_some(candidate)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_marker_names_identify() {
        assert!(matches_name(Path::new("run7/experiment_descriptor.xml")));
        assert!(matches_name(Path::new("run7/experiment_descriptor.dat")));
        assert!(matches_name(Path::new("run7/AcquisitionLog.dat")));
        assert!(!matches_name(Path::new("run7/experiment.xml")));
        assert!(!matches_name(Path::new(
            "run7/data/x_W00001_P00001_T00000_Z00000_DAPI.tif"
        )));
    }

    #[test]
    fn test_grouping_is_mandatory() {
        assert_eq!(file_grouping(), FileGrouping::MustGroup);
    }

    #[test]
    fn test_name_only_identification_without_open() {
        assert!(is_this_type(Path::new("AcquisitionLog.dat"), false));
        assert!(!is_this_type(Path::new("plane.tif"), false));
    }

    #[test]
    fn test_descriptor_two_levels_up() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir(&data).unwrap();
        fs::write(dir.path().join(DESCRIPTOR_FILE), "<Cluster/>").unwrap();
        let plane = data.join("x_W00001_P00001_T00000_Z00000_DAPI.tif");
        fs::write(&plane, b"").unwrap();

        assert!(is_single_file(&plane));
        assert_eq!(
            ancestor_descriptor(&plane),
            Some(dir.path().join(DESCRIPTOR_FILE))
        );

        // sibling of the descriptor: only one level up, not two
        let sibling = dir.path().join("loose.tif");
        fs::write(&sibling, b"").unwrap();
        assert!(!is_single_file(&sibling));
    }
}
