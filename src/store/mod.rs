//! # Standardized metadata sink
//!
//! The assembler publishes plate/well/image records through the
//! write-only [`MetadataStore`] trait, addressed by indices. The core
//! never reads back what it wrote, so implementations are free to
//! serialize, forward, or discard calls. [`PlateStore`] is the bundled
//! in-memory implementation with a deterministic serialized form.

mod plate;


pub use plate::{
    ChannelRecord, ImageRecord, PlateRecord, PlateStore, WellRecord, WellSampleRecord,
};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Row or column naming convention for plate coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NamingConvention {
    /// Single-letter labels (A, B, ...).
    Letter,
    /// Numeric labels (1, 2, ...).
    Number,
}

/// Write-only sink for standardized plate metadata.
///
/// Calls arrive in no particular order and may repeat; the last write for
/// an index wins. Implementations may ignore calls they have no use for.
pub trait MetadataStore {
    /// Identify a plate.
    fn set_plate_id(&mut self, plate: usize, id: &str);

    /// Plate display name.
    fn set_plate_name(&mut self, plate: usize, name: &str);

    /// Row naming convention of the plate.
    fn set_plate_row_naming(&mut self, plate: usize, convention: NamingConvention);

    /// Column naming convention of the plate.
    fn set_plate_column_naming(&mut self, plate: usize, convention: NamingConvention);

    /// Identify a well.
    fn set_well_id(&mut self, plate: usize, well: usize, id: &str);

    /// 0-based plate row of a well.
    fn set_well_row(&mut self, plate: usize, well: usize, row: usize);

    /// 0-based plate column of a well.
    fn set_well_column(&mut self, plate: usize, well: usize, column: usize);

    /// Identify one well sample (a field of a well).
    fn set_well_sample_id(&mut self, plate: usize, well: usize, field: usize, id: &str);

    /// Series index backing a well sample.
    fn set_well_sample_index(&mut self, plate: usize, well: usize, field: usize, series: usize);

    /// Image reference backing a well sample.
    fn set_well_sample_image(&mut self, plate: usize, well: usize, field: usize, image_id: &str);

    /// Identify a series image.
    fn set_image_id(&mut self, series: usize, id: &str);

    /// Human-readable series name.
    fn set_image_name(&mut self, series: usize, name: &str);

    /// Acquisition timestamp of a series.
    fn set_image_acquired(&mut self, series: usize, acquired: DateTime<Utc>);

    /// Channel name within a series.
    fn set_channel_name(&mut self, series: usize, channel: usize, name: &str);

    /// Physical pixel size in micrometers for a series.
    fn set_physical_pixel_size(&mut self, series: usize, x_um: f64, y_um: f64);
}

/// Deterministic identifier in the `Kind:index[:index...]` convention.
pub fn lsid(kind: &str, indices: &[usize]) -> String {
    let mut id = String::from(kind);
    for index in indices {
        id.push(':');
        id.push_str(&index.to_string());
    }
    id
}
