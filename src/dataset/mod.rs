//! # Dataset assembly and access
//!
//! A ScanR acquisition on disk is a directory holding one
//! `experiment_descriptor.xml` plus a flat pile of single-plane TIFFs
//! whose filenames encode position. [`ScanrDataset::open`] turns that
//! into an addressable object in one pass:
//!
//! 1. locate the descriptor from whatever entry path the caller gave;
//! 2. parse the descriptor's declarations (wells, channels, slices,
//!    timepoints, fields);
//! 3. settle the declared counts against the files actually present;
//! 4. index every file into a frozen table of plane slots;
//! 5. when indexing contradicts the declarations, prune the dead wells
//!    and settle again over the survivors;
//! 6. probe one matched file for the shared plane shape and publish the
//!    standardized plate records to the caller's [`MetadataStore`].
//!
//! Declared metadata is treated as a claim, not a fact: ScanR descriptors
//! routinely list wells that were never acquired and timepoint counts that
//! never happened. The file table is the final authority.
//!
//! After `open` the dataset is immutable. Plane reads open, extract and
//! drop one file handle per call, so a shared reference can serve reads
//! from multiple threads.
//!
//! ## Example
//!
//! ```rust,no_run
//! use scanr::dataset::ScanrDataset;
//! use scanr::plane::Region;
//! use scanr::store::PlateStore;
//!
//! let mut store = PlateStore::new();
//! let dataset = ScanrDataset::open("run7/experiment_descriptor.xml", &mut store)?;
//!
//! println!(
//!     "{} series of {} planes each",
//!     dataset.series_count(),
//!     dataset.planes_per_series()
//! );
//!
//! // Full first plane of the first series; 16-bit samples arrive masked
//! // to their 12 significant bits.
//! let bytes = dataset.read_plane(0, 0)?;
//!
//! // Or any sub-region.
//! let region = Region { x: 64, y: 64, width: 128, height: 128 };
//! let tile = dataset.read_region(0, 0, region)?;
//! # let _ = (bytes, tile);
//! # Ok::<(), scanr::dataset::DatasetError>(())
//! ```

mod error;
mod init;
mod options;
mod read;
mod series;

#[cfg(test)]
mod tests;

pub use error::DatasetError;
pub use options::{DatasetOptions, MetadataLevel};
pub use series::{PlaneShape, SeriesDescriptor, DIMENSION_ORDER, SIGNIFICANT_BITS};

use std::path::{Path, PathBuf};

use crate::index::FileTable;
use crate::layout::{Cardinality, WellGrid};
use crate::plane::{PlaneDecoder, TiffPlaneDecoder};

/// An assembled ScanR dataset.
///
/// Generic over the [`PlaneDecoder`] so tests can substitute fakes; the
/// default decoder handles the TIFF planes real acquisitions produce.
#[derive(Debug)]
pub struct ScanrDataset<D: PlaneDecoder = TiffPlaneDecoder> {
    decoder: D,
    descriptor_path: PathBuf,
    data_dir: PathBuf,
    metadata_files: Vec<PathBuf>,
    raw_metadata: Vec<(String, String)>,
    plate_name: Option<String>,
    pixel_size_um: Option<f64>,
    channel_names: Vec<String>,
    well_numbers: Vec<u32>,
    well_grid: WellGrid,
    dimensions: Cardinality,
    shape: PlaneShape,
    table: FileTable,
    series: Vec<SeriesDescriptor>,
}

impl<D: PlaneDecoder> ScanrDataset<D> {
    /// Path of the descriptor this dataset was assembled from. In
    /// ungrouped single-plane mode, the plane file itself.
    pub fn descriptor_path(&self) -> &Path {
        &self.descriptor_path
    }

    /// Directory holding the plane files.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Companion metadata files (`.dat`, `.xml`) of the dataset.
    pub fn metadata_files(&self) -> &[PathBuf] {
        &self.metadata_files
    }

    /// Every descriptor key/value pair in document order, recognized or
    /// not.
    pub fn raw_metadata(&self) -> &[(String, String)] {
        &self.raw_metadata
    }

    /// Plate display name, when the descriptor declared one.
    pub fn plate_name(&self) -> Option<&str> {
        self.plate_name.as_deref()
    }

    /// Physical pixel size in micrometers, when declared.
    pub fn pixel_size_um(&self) -> Option<f64> {
        self.pixel_size_um
    }

    /// Surviving channel names in acquisition order.
    pub fn channel_names(&self) -> &[String] {
        &self.channel_names
    }

    /// Declared numeric identifiers of the surviving wells.
    pub fn well_numbers(&self) -> &[u32] {
        &self.well_numbers
    }

    /// Resolved plate grid.
    pub fn well_grid(&self) -> WellGrid {
        self.well_grid
    }

    /// Settled cardinality tuple.
    pub fn dimensions(&self) -> Cardinality {
        self.dimensions
    }

    /// Shared per-plane shape.
    pub fn shape(&self) -> PlaneShape {
        self.shape
    }

    /// All series, in series order.
    pub fn series(&self) -> &[SeriesDescriptor] {
        &self.series
    }

    /// Number of series (surviving wells times fields).
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Planes per series.
    pub fn planes_per_series(&self) -> usize {
        self.table.planes_per_series()
    }

    /// The frozen file table.
    pub fn file_table(&self) -> &FileTable {
        &self.table
    }

    /// Files belonging to one series: the companion metadata files, plus
    /// the matched plane files when `include_planes` is set. An
    /// out-of-range series yields only the metadata files.
    pub fn series_files(&self, series: usize, include_planes: bool) -> Vec<PathBuf> {
        let mut files = self.metadata_files.clone();
        if include_planes {
            files.extend(self.table.series_paths(series).map(Path::to_path_buf));
        }
        files
    }
}
