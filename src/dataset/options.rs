//! Dataset open options.

/// How much standardized metadata the assembler writes to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MetadataLevel {
    /// Structural records only: plate, wells, well samples, image
    /// identity and timestamps.
    Minimum,
    /// Everything, including channel names, pixel sizes and the plate
    /// naming conventions.
    #[default]
    All,
}

/// Options controlling dataset assembly.
#[derive(Debug, Clone, Copy)]
pub struct DatasetOptions {
    /// Treat the dataset as one inseparable file group. With `false` and
    /// a TIFF entry path, only that single plane is exposed and no plate
    /// metadata is written.
    pub group_files: bool,
    /// How much metadata to write to the store.
    pub metadata_level: MetadataLevel,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        DatasetOptions {
            group_files: true,
            metadata_level: MetadataLevel::All,
        }
    }
}
