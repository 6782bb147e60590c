//! Recognized descriptor keys and their structural effects.

/// Reserved channel name marking the autofocus pass. An idle flag of zero
/// after this name does not count as an acquired channel.
pub const AUTOFOCUS_CHANNEL: &str = "Autofocus";

/// Structural effect of one recognized descriptor key.
///
/// Unrecognized keys have no structural effect; every pair, recognized or
/// not, still lands in the pass-through metadata channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataEffect {
    /// `columns/well`: field grid columns within one well.
    FieldColumns,
    /// `rows/well`: field grid rows within one well.
    FieldRows,
    /// `# slices`: Z-slice count.
    SliceCount,
    /// `timeloop real`: absolute timepoint count.
    TimepointTotal,
    /// `timeloop count`: loop count, exclusive of the starting point.
    TimepointLoop,
    /// `name`: appends a candidate channel name.
    ChannelName,
    /// `idle`: confirms or retracts the most recent channel name.
    ChannelIdle,
    /// `plate name`: plate display name.
    PlateName,
    /// `well selection table + cDNA`: opens or labels a well.
    WellSelection,
    /// `conversion factor um/pixel`: physical pixel size.
    PixelSize,
}

impl MetadataEffect {
    /// Look up the effect of a descriptor key, if the key is recognized.
    pub fn for_key(key: &str) -> Option<MetadataEffect> {
        match key {
            "columns/well" => Some(MetadataEffect::FieldColumns),
            "rows/well" => Some(MetadataEffect::FieldRows),
            "# slices" => Some(MetadataEffect::SliceCount),
            "timeloop real" => Some(MetadataEffect::TimepointTotal),
            "timeloop count" => Some(MetadataEffect::TimepointLoop),
            "name" => Some(MetadataEffect::ChannelName),
            "idle" => Some(MetadataEffect::ChannelIdle),
            "plate name" => Some(MetadataEffect::PlateName),
            "well selection table + cDNA" => Some(MetadataEffect::WellSelection),
            "conversion factor um/pixel" => Some(MetadataEffect::PixelSize),
            _ => None,
        }
    }
}
