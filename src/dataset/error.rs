//! Dataset error types.

use std::path::PathBuf;

use crate::descriptor::DescriptorError;
use crate::plane::PlaneError;

/// Errors raised while assembling or reading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Descriptor parse failure
    #[error("descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    /// The fixed-name descriptor is missing from the searched directory
    #[error("could not find {file} in {dir}", file = crate::detect::DESCRIPTOR_FILE, dir = .dir.display())]
    DescriptorNotFound {
        /// Directory that was searched.
        dir: PathBuf,
    },

    /// Not a single candidate file matched any coordinate
    #[error("no plane files matched in {dir}", dir = .dir.display())]
    NoFilesMatched {
        /// Directory whose listing was scanned.
        dir: PathBuf,
    },

    /// Plane decoding failure
    #[error("plane error: {0}")]
    Plane(#[from] PlaneError),

    /// An entry path this format cannot open
    #[error("not a usable dataset entry point: {0}")]
    InvalidEntry(String),
}
