//! In-memory metadata store.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{MetadataStore, NamingConvention};

/// Plate-level record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlateRecord {
    /// Plate identifier.
    pub id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Row naming convention.
    pub row_naming: Option<NamingConvention>,
    /// Column naming convention.
    pub column_naming: Option<NamingConvention>,
    /// Wells keyed by well index.
    pub wells: BTreeMap<usize, WellRecord>,
}

/// Well-level record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WellRecord {
    /// Well identifier.
    pub id: Option<String>,
    /// 0-based plate row.
    pub row: Option<usize>,
    /// 0-based plate column.
    pub column: Option<usize>,
    /// Well samples keyed by field index.
    pub samples: BTreeMap<usize, WellSampleRecord>,
}

/// One field of one well.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WellSampleRecord {
    /// Well sample identifier.
    pub id: Option<String>,
    /// Backing series index.
    pub series: Option<usize>,
    /// Backing image reference.
    pub image_ref: Option<String>,
}

/// Channel-level record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChannelRecord {
    /// Channel name.
    pub name: Option<String>,
}

/// Image (series) record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageRecord {
    /// Image identifier.
    pub id: Option<String>,
    /// Human-readable name.
    pub name: Option<String>,
    /// Acquisition timestamp.
    pub acquired: Option<DateTime<Utc>>,
    /// Channels keyed by channel index.
    pub channels: BTreeMap<usize, ChannelRecord>,
    /// Physical pixel width in micrometers.
    pub pixel_size_x_um: Option<f64>,
    /// Physical pixel height in micrometers.
    pub pixel_size_y_um: Option<f64>,
}

/// In-memory [`MetadataStore`] retaining everything the assembler writes.
///
/// Records live in sparse ordered maps so out-of-order writes need no
/// pre-sizing and the serialized form is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlateStore {
    /// Plates keyed by plate index.
    pub plates: BTreeMap<usize, PlateRecord>,
    /// Images keyed by series index.
    pub images: BTreeMap<usize, ImageRecord>,
}

impl PlateStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// One plate's record, if anything was written for it.
    pub fn plate(&self, plate: usize) -> Option<&PlateRecord> {
        self.plates.get(&plate)
    }

    /// One image's record, if anything was written for it.
    pub fn image(&self, series: usize) -> Option<&ImageRecord> {
        self.images.get(&series)
    }

    fn plate_mut(&mut self, plate: usize) -> &mut PlateRecord {
        self.plates.entry(plate).or_default()
    }

    fn well_mut(&mut self, plate: usize, well: usize) -> &mut WellRecord {
        self.plate_mut(plate).wells.entry(well).or_default()
    }

    fn sample_mut(&mut self, plate: usize, well: usize, field: usize) -> &mut WellSampleRecord {
        self.well_mut(plate, well).samples.entry(field).or_default()
    }

    fn image_mut(&mut self, series: usize) -> &mut ImageRecord {
        self.images.entry(series).or_default()
    }
}

impl MetadataStore for PlateStore {
    fn set_plate_id(&mut self, plate: usize, id: &str) {
        self.plate_mut(plate).id = Some(id.to_string());
    }

    fn set_plate_name(&mut self, plate: usize, name: &str) {
        self.plate_mut(plate).name = Some(name.to_string());
    }

    fn set_plate_row_naming(&mut self, plate: usize, convention: NamingConvention) {
        self.plate_mut(plate).row_naming = Some(convention);
    }

    fn set_plate_column_naming(&mut self, plate: usize, convention: NamingConvention) {
        self.plate_mut(plate).column_naming = Some(convention);
    }

    fn set_well_id(&mut self, plate: usize, well: usize, id: &str) {
        self.well_mut(plate, well).id = Some(id.to_string());
    }

    fn set_well_row(&mut self, plate: usize, well: usize, row: usize) {
        self.well_mut(plate, well).row = Some(row);
    }

    fn set_well_column(&mut self, plate: usize, well: usize, column: usize) {
        self.well_mut(plate, well).column = Some(column);
    }

    fn set_well_sample_id(&mut self, plate: usize, well: usize, field: usize, id: &str) {
        self.sample_mut(plate, well, field).id = Some(id.to_string());
    }

    fn set_well_sample_index(&mut self, plate: usize, well: usize, field: usize, series: usize) {
        self.sample_mut(plate, well, field).series = Some(series);
    }

    fn set_well_sample_image(&mut self, plate: usize, well: usize, field: usize, image_id: &str) {
        self.sample_mut(plate, well, field).image_ref = Some(image_id.to_string());
    }

    fn set_image_id(&mut self, series: usize, id: &str) {
        self.image_mut(series).id = Some(id.to_string());
    }

    fn set_image_name(&mut self, series: usize, name: &str) {
        self.image_mut(series).name = Some(name.to_string());
    }

    fn set_image_acquired(&mut self, series: usize, acquired: DateTime<Utc>) {
        self.image_mut(series).acquired = Some(acquired);
    }

    fn set_channel_name(&mut self, series: usize, channel: usize, name: &str) {
        self.image_mut(series)
            .channels
            .entry(channel)
            .or_default()
            .name = Some(name.to_string());
    }

    fn set_physical_pixel_size(&mut self, series: usize, x_um: f64, y_um: f64) {
        let image = self.image_mut(series);
        image.pixel_size_x_um = Some(x_um);
        image.pixel_size_y_um = Some(y_um);
    }
}
