//! # scanr - Olympus ScanR Dataset Reader
//!
//! `scanr` reconstructs multi-dimensional high-content screening datasets
//! from the loosely structured directories that Olympus ScanR
//! acquisitions leave on disk: one `experiment_descriptor.xml` plus a
//! flat collection of single-plane TIFFs whose filenames encode plate
//! position, timepoint, Z-slice and channel.
//!
//! ScanR metadata is a claim, not a fact. Real descriptors list wells
//! that were never acquired, declare timepoint counts that never
//! happened, and name channels that were switched off. Assembly is
//! therefore schema inference rather than a plain parse: the declarations
//! are settled against the files actually present, and the resulting file
//! table is the final authority on what exists.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scanr::dataset::ScanrDataset;
//! use scanr::store::PlateStore;
//!
//! let mut store = PlateStore::new();
//! let dataset = ScanrDataset::open("run7", &mut store)?;
//!
//! for series in dataset.series() {
//!     println!("{}: {} planes", series.name, series.plane_count);
//! }
//!
//! // Planes address as (series, (z * T + t) * C + c); 16-bit samples
//! // arrive masked to their 12 significant bits.
//! let first = dataset.read_plane(0, 0)?;
//! # let _ = first;
//! # Ok::<(), scanr::dataset::DatasetError>(())
//! ```
//!
//! ## Architecture
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`descriptor`] | streaming parse of the `Name`/`Val` metadata XML |
//! | [`layout`] | plate grid and cardinality resolution |
//! | [`index`] | filename-token matching into the frozen file table |
//! | [`dataset`] | assembly pipeline, series model, plane reads |
//! | [`plane`] | decoding seam and the bundled TIFF decoder |
//! | [`store`] | standardized plate/well/image metadata sink |
//! | [`detect`] | dataset identification and grouping contract |
//!
//! ## Degradation rules
//!
//! Partial data degrades, it does not fail:
//!
//! - undeclared counts default (channels from names, slices and fields
//!   to one); the timepoint count is recomputed from the file count when
//!   the declaration is absent or impossible;
//! - wells declared but never acquired are pruned, and resolution runs
//!   again over the survivors;
//! - a label set that cannot fill its derived grid falls back to the
//!   standard plate layout for that well count;
//! - planes with no matched file read as zeros of exactly the requested
//!   size.
//!
//! Only a missing descriptor, malformed XML, or a dataset in which not a
//! single file matched any coordinate are hard errors.

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod dataset;
pub mod descriptor;
pub mod detect;
pub mod index;
pub mod layout;
pub mod plane;
pub mod store;

/// Re-export of the types most callers need.
pub mod prelude {
    pub use crate::dataset::{
        DatasetError, DatasetOptions, MetadataLevel, PlaneShape, ScanrDataset, SeriesDescriptor,
    };
    pub use crate::descriptor::{Descriptor, DescriptorError, ParseContext};
    pub use crate::detect::{file_grouping, is_single_file, is_this_type, FileGrouping};
    pub use crate::index::FileTable;
    pub use crate::layout::{Cardinality, WellGrid};
    pub use crate::plane::{
        PixelType, PlaneDecoder, PlaneError, PlaneHandle, Region, TiffPlaneDecoder,
    };
    pub use crate::store::{MetadataStore, NamingConvention, PlateStore};
}
