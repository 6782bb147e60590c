//! # Plane decoding
//!
//! The dataset core never touches image bytes itself; it goes through the
//! narrow [`PlaneDecoder`] / [`PlaneHandle`] seam. The bundled
//! [`TiffPlaneDecoder`] handles the single-plane grayscale TIFFs that ScanR
//! acquisitions write; tests substitute lightweight fakes.
//!
//! Handles are short-lived by contract: open one file, extract one region,
//! drop the handle. The dataset layer keeps no handle cached between reads.
//!
//! ScanR sensors deliver 12 significant bits inside 16-bit containers, so
//! every 16-bit read passes through [`mask_to_12bit`] before it reaches a
//! caller.

mod tiff;


pub use self::tiff::{TiffPlaneDecoder, TiffPlaneHandle};

use std::fmt;
use std::path::Path;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use serde::Serialize;

/// Errors raised while opening or reading plane files.
#[derive(Debug, thiserror::Error)]
pub enum PlaneError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the TIFF decoder
    #[error("TIFF error: {0}")]
    Tiff(#[from] ::tiff::TiffError),

    /// Plane content the decoder cannot represent
    #[error("unsupported plane data: {0}")]
    Unsupported(String),

    /// A series or plane index outside the dataset's range
    #[error("{what} index {index} out of range (0..{count})")]
    OutOfRange {
        /// Which index was out of range.
        what: &'static str,
        /// The requested index.
        index: usize,
        /// Number of valid indices.
        count: usize,
    },

    /// A pixel region that does not fit the plane
    #[error("region {region} outside plane {width}x{height}")]
    RegionOutOfBounds {
        /// The requested region.
        region: Region,
        /// Plane width in pixels.
        width: u32,
        /// Plane height in pixels.
        height: u32,
    },
}

/// Sample storage type of a decoded plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PixelType {
    /// Signed 8-bit integer samples.
    Int8,
    /// Unsigned 8-bit integer samples.
    UInt8,
    /// Signed 16-bit integer samples.
    Int16,
    /// Unsigned 16-bit integer samples.
    UInt16,
    /// Signed 32-bit integer samples.
    Int32,
    /// Unsigned 32-bit integer samples.
    UInt32,
    /// 32-bit IEEE float samples.
    Float,
    /// 64-bit IEEE float samples.
    Double,
}

impl PixelType {
    /// Bytes occupied by one sample.
    pub fn sample_bytes(&self) -> usize {
        match self {
            PixelType::Int8 | PixelType::UInt8 => 1,
            PixelType::Int16 | PixelType::UInt16 => 2,
            PixelType::Int32 | PixelType::UInt32 | PixelType::Float => 4,
            PixelType::Double => 8,
        }
    }

    /// Whether samples are signed integers or floats.
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            PixelType::Int8
                | PixelType::Int16
                | PixelType::Int32
                | PixelType::Float
                | PixelType::Double
        )
    }

    /// The unsigned reinterpretation ScanR requires for signed 8- and
    /// 16-bit declarations. Other types are unchanged.
    pub fn as_unsigned(&self) -> PixelType {
        match self {
            PixelType::Int8 => PixelType::UInt8,
            PixelType::Int16 => PixelType::UInt16,
            other => *other,
        }
    }
}

impl fmt::Display for PixelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelType::Int8 => "int8",
            PixelType::UInt8 => "uint8",
            PixelType::Int16 => "int16",
            PixelType::UInt16 => "uint16",
            PixelType::Int32 => "int32",
            PixelType::UInt32 => "uint32",
            PixelType::Float => "float",
            PixelType::Double => "double",
        };
        f.write_str(name)
    }
}

/// Rectangular pixel region within a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Left edge, in pixels.
    pub x: u32,
    /// Top edge, in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Region {
    /// Full-plane region for the given dimensions.
    pub fn full(width: u32, height: u32) -> Self {
        Region {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Number of pixels covered.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether the region is non-empty and lies entirely within a
    /// `width` x `height` plane.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x.checked_add(self.width).is_some_and(|right| right <= width)
            && self.y.checked_add(self.height).is_some_and(|bottom| bottom <= height)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// One opened plane file.
///
/// A handle owns whatever file resources its decoder acquired; dropping the
/// handle releases them.
pub trait PlaneHandle {
    /// Plane width in pixels.
    fn width(&self) -> u32;

    /// Plane height in pixels.
    fn height(&self) -> u32;

    /// Declared sample type.
    fn pixel_type(&self) -> PixelType;

    /// Whether sample bytes are little-endian.
    fn little_endian(&self) -> bool;

    /// Whether the plane carries RGB samples.
    fn rgb(&self) -> bool;

    /// Whether RGB samples are interleaved rather than planar.
    fn interleaved(&self) -> bool;

    /// Whether samples index a palette.
    fn indexed(&self) -> bool;

    /// Software tag recorded by the acquisition system, if any.
    fn software(&self) -> Option<&str>;

    /// Extract raw sample bytes for `region`, row-major, without any
    /// bit-depth correction.
    fn read_region(&mut self, region: Region) -> Result<Vec<u8>, PlaneError>;
}

/// Opens plane files on demand.
pub trait PlaneDecoder {
    /// Handle type produced by [`open`](Self::open).
    type Handle: PlaneHandle;

    /// Open one plane file.
    fn open(&self, path: &Path) -> Result<Self::Handle, PlaneError>;
}

/// Clear the top four bits of every 16-bit sample in `buf`.
///
/// ScanR stores 12 significant bits per sample; the high nibble of the
/// 16-bit container is undefined and must never reach callers.
pub fn mask_to_12bit(buf: &mut [u8], little_endian: bool) {
    if little_endian {
        for sample in buf.chunks_exact_mut(2) {
            let value = LittleEndian::read_u16(sample) & 0x0fff;
            LittleEndian::write_u16(sample, value);
        }
    } else {
        for sample in buf.chunks_exact_mut(2) {
            let value = BigEndian::read_u16(sample) & 0x0fff;
            BigEndian::write_u16(sample, value);
        }
    }
}
