//! Mutable parse state and its frozen result.

use log::debug;

use super::effects::{MetadataEffect, AUTOFOCUS_CHANNEL};
use super::DescriptorError;

/// One well opened by the well selection table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredWell {
    /// Declared numeric identifier, 1-based in ScanR metadata.
    pub number: u32,
    /// Textual label such as `A1`, when one followed the numeric entry.
    pub label: Option<String>,
}

/// Accumulating state for one descriptor parse.
///
/// The XML layer feeds every key/value pair through
/// [`apply_value`](ParseContext::apply_value); nothing else mutates during
/// a parse. [`finish`](ParseContext::finish) freezes the result.
///
/// Several descriptor keys arrive repeatedly (`name`, `idle`, the well
/// selection entries) and their effects are order-sensitive, so pairs must
/// be applied in document order.
#[derive(Debug, Default)]
pub struct ParseContext {
    field_rows: u32,
    field_columns: u32,
    slices: u32,
    timepoints: u32,
    channel_count: u32,
    channel_names: Vec<String>,
    plate_name: Option<String>,
    pixel_size: Option<f64>,
    wells: Vec<DeclaredWell>,
    open_well: Option<usize>,
    raw: Vec<(String, String)>,
}

impl ParseContext {
    /// Fresh, empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch one key/value pair.
    ///
    /// The pair always lands in the pass-through channel. Recognized keys
    /// additionally update structural state; non-numeric text under a
    /// recognized numeric key is fatal.
    pub fn apply_value(&mut self, key: &str, value: &str) -> Result<(), DescriptorError> {
        self.raw.push((key.to_string(), value.to_string()));
        let Some(effect) = MetadataEffect::for_key(key) else {
            return Ok(());
        };
        match effect {
            MetadataEffect::FieldColumns => self.field_columns = parse_count(key, value)?,
            MetadataEffect::FieldRows => self.field_rows = parse_count(key, value)?,
            MetadataEffect::SliceCount => self.slices = parse_count(key, value)?,
            MetadataEffect::TimepointTotal => self.timepoints = parse_count(key, value)?,
            // loop counts exclude the starting timepoint
            MetadataEffect::TimepointLoop => self.timepoints = parse_count(key, value)? + 1,
            MetadataEffect::ChannelName => self.channel_names.push(value.to_string()),
            MetadataEffect::ChannelIdle => self.apply_idle(value),
            MetadataEffect::PlateName => self.plate_name = Some(value.to_string()),
            MetadataEffect::WellSelection => self.apply_well_entry(key, value)?,
            MetadataEffect::PixelSize => {
                let size = value.parse().map_err(|_| DescriptorError::InvalidNumber {
                    key: key.to_string(),
                    value: value.to_string(),
                })?;
                self.pixel_size = Some(size);
            }
        }
        Ok(())
    }

    /// An idle flag of `"0"` confirms the channel opened by the preceding
    /// `name`, unless that name is the reserved autofocus pass; any other
    /// flag retracts the name.
    fn apply_idle(&mut self, value: &str) {
        let acquired = value == "0"
            && self
                .channel_names
                .last()
                .is_some_and(|name| name != AUTOFOCUS_CHANNEL);
        if acquired {
            self.channel_count += 1;
        } else if self.channel_names.pop().is_none() {
            debug!("idle flag with no channel name to retract; ignored");
        }
    }

    /// A digit-leading selection entry opens a well; an alphabetic entry
    /// labels the well most recently opened.
    fn apply_well_entry(&mut self, key: &str, value: &str) -> Result<(), DescriptorError> {
        if value.starts_with(|c: char| c.is_ascii_digit()) {
            let number = parse_count(key, value)?;
            self.open_well = Some(self.wells.len());
            self.wells.push(DeclaredWell {
                number,
                label: None,
            });
        } else if let Some(open) = self.open_well {
            self.wells[open].label = Some(value.to_string());
        } else {
            debug!("well label {value:?} before any well number; ignored");
        }
        Ok(())
    }

    /// Freeze the accumulated state.
    pub fn finish(self) -> Descriptor {
        Descriptor {
            field_rows: self.field_rows,
            field_columns: self.field_columns,
            slices: self.slices,
            timepoints: self.timepoints,
            channel_count: self.channel_count,
            channel_names: self.channel_names,
            plate_name: self.plate_name,
            pixel_size: self.pixel_size,
            wells: self.wells,
            raw: self.raw,
        }
    }
}

fn parse_count(key: &str, value: &str) -> Result<u32, DescriptorError> {
    value.parse().map_err(|_| DescriptorError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Frozen declared metadata for one dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Descriptor {
    /// Field grid rows per well; zero when undeclared.
    pub field_rows: u32,
    /// Field grid columns per well; zero when undeclared.
    pub field_columns: u32,
    /// Declared Z-slice count; zero when undeclared.
    pub slices: u32,
    /// Declared timepoint count; zero when undeclared.
    pub timepoints: u32,
    /// Channels confirmed by idle flags.
    pub channel_count: u32,
    /// Surviving channel names in acquisition order.
    pub channel_names: Vec<String>,
    /// Plate display name.
    pub plate_name: Option<String>,
    /// Physical pixel size in micrometers.
    pub pixel_size: Option<f64>,
    /// Declared wells in selection order.
    pub wells: Vec<DeclaredWell>,
    /// Every key/value pair in document order, recognized or not.
    pub raw: Vec<(String, String)>,
}

impl Descriptor {
    /// Number of declared wells.
    pub fn well_count(&self) -> usize {
        self.wells.len()
    }

    /// Labels of the declared wells, in selection order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.wells.iter().filter_map(|well| well.label.as_deref())
    }

    /// Declared field count, rows times columns.
    pub fn field_count(&self) -> usize {
        (self.field_rows * self.field_columns) as usize
    }
}
