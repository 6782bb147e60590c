//! Plane reads against the frozen file table.

use log::debug;

use crate::plane::{mask_to_12bit, PlaneDecoder, PlaneError, PlaneHandle, Region};

use super::ScanrDataset;

impl<D: PlaneDecoder> ScanrDataset<D> {
    /// Read one full plane of one series.
    pub fn read_plane(&self, series: usize, plane: usize) -> Result<Vec<u8>, PlaneError> {
        self.read_region(
            series,
            plane,
            Region::full(self.shape.width, self.shape.height),
        )
    }

    /// Read a pixel region of one plane.
    ///
    /// Bytes come back row-major in the dataset's byte order. A plane with
    /// no matched file reads as zeros of exactly the requested size, and
    /// every 16-bit sample is masked to its 12 significant bits before it
    /// is returned. Reads share no state, so `&self` is enough.
    pub fn read_region(
        &self,
        series: usize,
        plane: usize,
        region: Region,
    ) -> Result<Vec<u8>, PlaneError> {
        if series >= self.series.len() {
            return Err(PlaneError::OutOfRange {
                what: "series",
                index: series,
                count: self.series.len(),
            });
        }
        let planes = self.table.planes_per_series();
        if plane >= planes {
            return Err(PlaneError::OutOfRange {
                what: "plane",
                index: plane,
                count: planes,
            });
        }
        if !region.fits(self.shape.width, self.shape.height) {
            return Err(PlaneError::RegionOutOfBounds {
                region,
                width: self.shape.width,
                height: self.shape.height,
            });
        }

        let sample_bytes = self.shape.pixel_type.sample_bytes();
        let expected = region.pixel_count() * self.shape.samples_per_pixel() * sample_bytes;

        let Some(path) = self.table.get(series, plane) else {
            debug!("series {series} plane {plane} has no file; reading zeros");
            return Ok(vec![0; expected]);
        };

        // one handle per read, released before the mask pass
        let mut handle = self.decoder.open(path)?;
        let mut buf = handle.read_region(region)?;
        drop(handle);

        if sample_bytes == 2 {
            mask_to_12bit(&mut buf, self.shape.little_endian);
        }
        Ok(buf)
    }
}
