//! Cardinality resolution against on-disk evidence.

/// Declared counts feeding dimension resolution.
///
/// Zero means "not declared" for every count except `wells`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclaredCounts {
    /// Channels confirmed by the descriptor's idle flags.
    pub channels: usize,
    /// Channel names observed; the fallback channel count.
    pub channel_names: usize,
    /// Declared Z-slice count.
    pub slices: usize,
    /// Declared timepoint count.
    pub timepoints: usize,
    /// Declared well count.
    pub wells: usize,
    /// Declared field count (field rows times field columns).
    pub fields: usize,
}

/// Settled cardinality tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cardinality {
    /// Channel count.
    pub channels: usize,
    /// Z-slice count.
    pub slices: usize,
    /// Timepoint count.
    pub timepoints: usize,
    /// Well count.
    pub wells: usize,
    /// Fields per well.
    pub fields: usize,
}

impl Cardinality {
    /// Planes in one (well, field) series.
    pub fn planes_per_series(&self) -> usize {
        self.channels * self.slices * self.timepoints
    }

    /// Plane slots across the whole dataset.
    pub fn plane_count(&self) -> usize {
        self.planes_per_series() * self.wells * self.fields
    }
}

/// Settle the cardinality tuple against the files actually on disk.
///
/// Channels fall back to the observed name count, then to one; slices and
/// fields default to one; the well count stays as declared. The timepoint
/// declaration is the least reliable of the five and is recomputed from
/// `file_count` whenever it is missing or the full product would exceed
/// the files present. The recomputed value never drops below one.
pub fn resolve_dimensions(declared: &DeclaredCounts, file_count: usize) -> Cardinality {
    let mut channels = if declared.channels == 0 {
        declared.channel_names
    } else {
        declared.channels
    };
    if channels == 0 {
        channels = 1;
    }
    let slices = if declared.slices == 0 { 1 } else { declared.slices };
    let fields = if declared.fields == 0 { 1 } else { declared.fields };
    let wells = declared.wells;

    let mut timepoints = declared.timepoints;
    let per_timepoint = channels * slices * wells * fields;
    if timepoints == 0 || file_count < timepoints * per_timepoint {
        timepoints = if per_timepoint == 0 {
            1
        } else {
            (file_count / per_timepoint).max(1)
        };
    }

    Cardinality {
        channels,
        slices,
        timepoints,
        wells,
        fields,
    }
}
