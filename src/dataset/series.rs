//! Per-series shape descriptors.

use serde::Serialize;

use crate::plane::PixelType;

/// Bits ScanR sensors actually deliver inside each sample container.
pub const SIGNIFICANT_BITS: u32 = 12;

/// Dimension order of every ScanR series: channel varies fastest, then
/// time, then Z.
pub const DIMENSION_ORDER: &str = "XYCTZ";

/// Per-plane shape shared by every series of a dataset, probed once from
/// the first matched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaneShape {
    /// Plane width in pixels.
    pub width: u32,
    /// Plane height in pixels.
    pub height: u32,
    /// Sample type after the unsigned reinterpretation.
    pub pixel_type: PixelType,
    /// Whether sample bytes are little-endian.
    pub little_endian: bool,
    /// Whether planes carry RGB samples.
    pub rgb: bool,
    /// Whether RGB samples are interleaved.
    pub interleaved: bool,
    /// Whether samples index a palette.
    pub indexed: bool,
}

impl PlaneShape {
    /// Samples per pixel: three for RGB planes, one otherwise.
    pub fn samples_per_pixel(&self) -> usize {
        if self.rgb {
            3
        } else {
            1
        }
    }

    /// Bytes of one full plane.
    pub fn plane_bytes(&self) -> usize {
        self.width as usize
            * self.height as usize
            * self.samples_per_pixel()
            * self.pixel_type.sample_bytes()
    }
}

/// One independently addressable (well, field) image stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesDescriptor {
    /// Series index, well-major.
    pub series: usize,
    /// Well position within the surviving well set.
    pub well: usize,
    /// Declared well number from the selection table.
    pub well_number: u32,
    /// Field position within the well.
    pub field: usize,
    /// Channel count.
    pub channels: usize,
    /// Z-slice count.
    pub slices: usize,
    /// Timepoint count.
    pub timepoints: usize,
    /// Shared plane shape.
    pub shape: PlaneShape,
    /// Planes in this series: channels x slices x timepoints.
    pub plane_count: usize,
    /// Significant bits per sample.
    pub significant_bits: u32,
    /// Dimension order.
    pub dimension_order: &'static str,
    /// Human-readable name.
    pub name: String,
}
