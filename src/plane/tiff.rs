//! TIFF-backed plane decoder.
//!
//! ScanR planes are single-image grayscale TIFFs written by National
//! Instruments IMAQ. Decoded samples are re-encoded as little-endian bytes
//! whatever the container's byte order, and the handle reports
//! little-endian accordingly.

use std::fs::File;
use std::io::BufReader;
use std::ops::Range;
use std::path::Path;

use ::tiff::decoder::{Decoder, DecodingResult};
use ::tiff::tags::Tag;
use ::tiff::ColorType;

use super::{PixelType, PlaneDecoder, PlaneError, PlaneHandle, Region};

/// Default [`PlaneDecoder`] for ScanR TIFF planes.
#[derive(Debug, Default, Clone, Copy)]
pub struct TiffPlaneDecoder;

/// One open TIFF plane, produced by [`TiffPlaneDecoder::open`].
///
/// The image is decoded at most once per handle and cached for the
/// handle's lifetime.
#[derive(Debug)]
pub struct TiffPlaneHandle {
    decoder: Decoder<BufReader<File>>,
    width: u32,
    height: u32,
    pixel_type: PixelType,
    samples_per_pixel: usize,
    rgb: bool,
    indexed: bool,
    software: Option<String>,
    image: Option<DecodingResult>,
}

impl PlaneDecoder for TiffPlaneDecoder {
    type Handle = TiffPlaneHandle;

    fn open(&self, path: &Path) -> Result<TiffPlaneHandle, PlaneError> {
        let file = File::open(path)?;
        let mut decoder = Decoder::new(BufReader::new(file))?;
        let (width, height) = decoder.dimensions()?;
        let color_type = decoder.colortype()?;
        // SampleFormat: 1 = unsigned, 2 = signed, 3 = IEEE float; absent
        // means unsigned.
        let sample_format = decoder.get_tag_u32(Tag::SampleFormat).unwrap_or(1);
        let software = decoder.get_tag_ascii_string(Tag::Software).ok();

        let (bits, samples_per_pixel, rgb, indexed) = match color_type {
            ColorType::Gray(bits) => (bits, 1, false, false),
            ColorType::RGB(bits) => (bits, 3, true, false),
            ColorType::Palette(bits) => (bits, 1, false, true),
            other => {
                return Err(PlaneError::Unsupported(format!("color type {other:?}")));
            }
        };
        let pixel_type = match (bits, sample_format) {
            (8, 2) => PixelType::Int8,
            (8, _) => PixelType::UInt8,
            (16, 2) => PixelType::Int16,
            (16, _) => PixelType::UInt16,
            (32, 3) => PixelType::Float,
            (32, 2) => PixelType::Int32,
            (32, _) => PixelType::UInt32,
            (64, 3) => PixelType::Double,
            (bits, format) => {
                return Err(PlaneError::Unsupported(format!(
                    "{bits}-bit samples with sample format {format}"
                )));
            }
        };

        Ok(TiffPlaneHandle {
            decoder,
            width,
            height,
            pixel_type,
            samples_per_pixel,
            rgb,
            indexed,
            software,
            image: None,
        })
    }
}

impl TiffPlaneHandle {
    fn decoded(&mut self) -> Result<&DecodingResult, PlaneError> {
        if self.image.is_none() {
            self.image = Some(self.decoder.read_image()?);
        }
        Ok(self.image.as_ref().expect("image decoded above"))
    }
}

impl PlaneHandle for TiffPlaneHandle {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    fn little_endian(&self) -> bool {
        // samples are re-encoded to little-endian on extraction
        true
    }

    fn rgb(&self) -> bool {
        self.rgb
    }

    fn interleaved(&self) -> bool {
        self.rgb
    }

    fn indexed(&self) -> bool {
        self.indexed
    }

    fn software(&self) -> Option<&str> {
        self.software.as_deref()
    }

    fn read_region(&mut self, region: Region) -> Result<Vec<u8>, PlaneError> {
        if !region.fits(self.width, self.height) {
            return Err(PlaneError::RegionOutOfBounds {
                region,
                width: self.width,
                height: self.height,
            });
        }
        let plane_width = self.width as usize;
        let samples = self.samples_per_pixel;
        let sample_bytes = self.pixel_type.sample_bytes();
        let mut out = Vec::with_capacity(region.pixel_count() * samples * sample_bytes);

        let rows = region.y..region.y + region.height;
        let row_range = |row: u32| -> Range<usize> {
            let start = (row as usize * plane_width + region.x as usize) * samples;
            start..start + region.width as usize * samples
        };

        match self.decoded()? {
            DecodingResult::U8(data) => {
                for row in rows {
                    out.extend_from_slice(&data[row_range(row)]);
                }
            }
            DecodingResult::I8(data) => {
                for row in rows {
                    for &value in &data[row_range(row)] {
                        out.push(value as u8);
                    }
                }
            }
            DecodingResult::U16(data) => {
                for row in rows {
                    for &value in &data[row_range(row)] {
                        out.extend_from_slice(&value.to_le_bytes());
                    }
                }
            }
            DecodingResult::I16(data) => {
                for row in rows {
                    for &value in &data[row_range(row)] {
                        out.extend_from_slice(&value.to_le_bytes());
                    }
                }
            }
            DecodingResult::U32(data) => {
                for row in rows {
                    for &value in &data[row_range(row)] {
                        out.extend_from_slice(&value.to_le_bytes());
                    }
                }
            }
            DecodingResult::I32(data) => {
                for row in rows {
                    for &value in &data[row_range(row)] {
                        out.extend_from_slice(&value.to_le_bytes());
                    }
                }
            }
            DecodingResult::F32(data) => {
                for row in rows {
                    for &value in &data[row_range(row)] {
                        out.extend_from_slice(&value.to_le_bytes());
                    }
                }
            }
            DecodingResult::F64(data) => {
                for row in rows {
                    for &value in &data[row_range(row)] {
                        out.extend_from_slice(&value.to_le_bytes());
                    }
                }
            }
            _ => {
                return Err(PlaneError::Unsupported(
                    "64-bit integer samples".to_string(),
                ));
            }
        }
        Ok(out)
    }
}
