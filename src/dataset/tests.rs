use std::fs;
use std::path::Path;

use tempfile::tempdir;

use crate::layout::WellGrid;
use crate::plane::{PixelType, PlaneDecoder, PlaneError, PlaneHandle, Region};
use crate::store::PlateStore;

use super::*;

/// Decoder that fabricates planes without touching file contents.
#[derive(Debug, Clone, Copy)]
struct StubDecoder {
    width: u32,
    height: u32,
    fill: u16,
}

impl Default for StubDecoder {
    fn default() -> Self {
        StubDecoder {
            width: 16,
            height: 8,
            fill: 0xf123,
        }
    }
}

struct StubHandle {
    width: u32,
    height: u32,
    fill: u16,
}

impl PlaneDecoder for StubDecoder {
    type Handle = StubHandle;

    fn open(&self, _path: &Path) -> Result<StubHandle, PlaneError> {
        Ok(StubHandle {
            width: self.width,
            height: self.height,
            fill: self.fill,
        })
    }
}

impl PlaneHandle for StubHandle {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel_type(&self) -> PixelType {
        // declared signed, as real acquisitions do
        PixelType::Int16
    }

    fn little_endian(&self) -> bool {
        true
    }

    fn rgb(&self) -> bool {
        false
    }

    fn interleaved(&self) -> bool {
        false
    }

    fn indexed(&self) -> bool {
        false
    }

    fn software(&self) -> Option<&str> {
        Some("National Instruments IMAQ")
    }

    fn read_region(&mut self, region: Region) -> Result<Vec<u8>, PlaneError> {
        if !region.fits(self.width, self.height) {
            return Err(PlaneError::RegionOutOfBounds {
                region,
                width: self.width,
                height: self.height,
            });
        }
        let mut out = Vec::with_capacity(region.pixel_count() * 2);
        for _ in 0..region.pixel_count() {
            out.extend_from_slice(&self.fill.to_le_bytes());
        }
        Ok(out)
    }
}

const FOUR_WELLS: &str = r#"<?xml version="1.0"?>
<Cluster>
  <String><Name>plate name</Name><Val>Assay Plate 7</Val></String>
  <I32><Name>rows/well</Name><Val>1</Val></I32>
  <I32><Name>columns/well</Name><Val>1</Val></I32>
  <I32><Name># slices</Name><Val>1</Val></I32>
  <String><Name>name</Name><Val>DAPI</Val></String>
  <I32><Name>idle</Name><Val>0</Val></I32>
  <String><Name>name</Name><Val>GFP</Val></String>
  <I32><Name>idle</Name><Val>0</Val></I32>
  <DBL><Name>conversion factor um/pixel</Name><Val>0.645</Val></DBL>
  <Array>
    <Name>well selection table + cDNA</Name>
    <String><Val>1</Val></String>
    <String><Val>A1</Val></String>
    <String><Val>2</Val></String>
    <String><Val>A2</Val></String>
    <String><Val>3</Val></String>
    <String><Val>B1</Val></String>
    <String><Val>4</Val></String>
    <String><Val>B2</Val></String>
  </Array>
</Cluster>
"#;

const ONE_WELL_TWO_TIMEPOINTS: &str = r#"<?xml version="1.0"?>
<Cluster>
  <I32><Name>timeloop real</Name><Val>2</Val></I32>
  <String><Name>name</Name><Val>DAPI</Val></String>
  <I32><Name>idle</Name><Val>0</Val></I32>
  <Array>
    <Name>well selection table + cDNA</Name>
    <String><Val>1</Val></String>
    <String><Val>A1</Val></String>
  </Array>
</Cluster>
"#;

fn write_descriptor(base: &Path, xml: &str) {
    fs::write(base.join("experiment_descriptor.xml"), xml).unwrap();
}

fn data_dir(base: &Path) -> std::path::PathBuf {
    let data = base.join("data");
    if !data.is_dir() {
        fs::create_dir(&data).unwrap();
    }
    data
}

fn touch_plane(data: &Path, well: u32, field: u32, t: u32, z: u32, channel: &str) {
    let name = format!("screen_W{well:05}_P{field:05}_T{t:05}_Z{z:05}_{channel}.tif");
    fs::write(data.join(name), b"").unwrap();
}

/// Four wells, two channels, three timepoints on disk, nothing declared
/// for T.
fn full_four_well_dataset(base: &Path) {
    write_descriptor(base, FOUR_WELLS);
    let data = data_dir(base);
    for well in 1..=4 {
        for t in 0..3 {
            for channel in ["DAPI", "GFP"] {
                touch_plane(&data, well, 1, t, 0, channel);
            }
        }
    }
}

fn open_stub(base: &Path, store: &mut PlateStore) -> Result<ScanrDataset<StubDecoder>, DatasetError> {
    ScanrDataset::open_with(base, DatasetOptions::default(), StubDecoder::default(), store)
}

#[test]
fn test_assembles_declared_layout() {
    let dir = tempdir().unwrap();
    full_four_well_dataset(dir.path());

    let mut store = PlateStore::new();
    let dataset = open_stub(dir.path(), &mut store).unwrap();

    let dims = dataset.dimensions();
    assert_eq!(dims.channels, 2);
    assert_eq!(dims.slices, 1);
    assert_eq!(dims.timepoints, 3);
    assert_eq!(dims.wells, 4);
    assert_eq!(dims.fields, 1);

    assert_eq!(dataset.well_grid(), WellGrid { rows: 2, columns: 2 });
    assert_eq!(dataset.series_count(), 4);
    assert_eq!(dataset.planes_per_series(), 6);
    assert_eq!(dataset.channel_names(), ["DAPI", "GFP"]);
    assert_eq!(dataset.plate_name(), Some("Assay Plate 7"));
    assert_eq!(dataset.pixel_size_um(), Some(0.645));
    assert_eq!(dataset.file_table().matched_count(), 24);

    // signed declarations are reinterpreted as unsigned
    assert_eq!(dataset.shape().pixel_type, PixelType::UInt16);

    let first = &dataset.series()[0];
    assert_eq!(first.name, "Well 1, Field 1 (Spot 1)");
    assert_eq!(first.significant_bits, 12);
    assert_eq!(first.dimension_order, "XYCTZ");
    assert_eq!(dataset.series()[3].name, "Well 4, Field 1 (Spot 4)");
}

#[test]
fn test_store_receives_plate_records() {
    let dir = tempdir().unwrap();
    full_four_well_dataset(dir.path());

    let mut store = PlateStore::new();
    let dataset = open_stub(dir.path(), &mut store).unwrap();
    drop(dataset);

    let plate = store.plate(0).unwrap();
    assert_eq!(plate.id.as_deref(), Some("Plate:0"));
    assert_eq!(plate.name.as_deref(), Some("Assay Plate 7"));
    assert_eq!(plate.wells.len(), 4);

    // declared numbers 1..=4 over a two-column grid
    assert_eq!(plate.wells[&0].row, Some(0));
    assert_eq!(plate.wells[&0].column, Some(0));
    assert_eq!(plate.wells[&1].row, Some(0));
    assert_eq!(plate.wells[&1].column, Some(1));
    assert_eq!(plate.wells[&2].row, Some(1));
    assert_eq!(plate.wells[&2].column, Some(0));
    assert_eq!(plate.wells[&3].row, Some(1));
    assert_eq!(plate.wells[&3].column, Some(1));

    let sample = &plate.wells[&2].samples[&0];
    assert_eq!(sample.series, Some(2));
    assert_eq!(sample.image_ref.as_deref(), Some("Image:2"));

    let image = store.image(0).unwrap();
    assert_eq!(image.name.as_deref(), Some("Well 1, Field 1 (Spot 1)"));
    assert!(image.acquired.is_some());
    assert_eq!(image.channels[&0].name.as_deref(), Some("DAPI"));
    assert_eq!(image.channels[&1].name.as_deref(), Some("GFP"));
    assert_eq!(image.pixel_size_x_um, Some(0.645));
}

#[test]
fn test_minimum_metadata_level_skips_annotations() {
    let dir = tempdir().unwrap();
    full_four_well_dataset(dir.path());

    let mut store = PlateStore::new();
    let options = DatasetOptions {
        metadata_level: MetadataLevel::Minimum,
        ..DatasetOptions::default()
    };
    ScanrDataset::open_with(dir.path(), options, StubDecoder::default(), &mut store).unwrap();

    let plate = store.plate(0).unwrap();
    assert_eq!(plate.wells.len(), 4);
    assert_eq!(plate.name, None);
    assert_eq!(plate.row_naming, None);
    let image = store.image(0).unwrap();
    assert!(image.channels.is_empty());
    assert_eq!(image.pixel_size_x_um, None);
}

#[test]
fn test_prunes_wells_without_files() {
    let dir = tempdir().unwrap();
    write_descriptor(dir.path(), FOUR_WELLS);
    let data = data_dir(dir.path());
    // well 4 was declared but never acquired
    for well in 1..=3 {
        for t in 0..3 {
            for channel in ["DAPI", "GFP"] {
                touch_plane(&data, well, 1, t, 0, channel);
            }
        }
    }

    let mut store = PlateStore::new();
    let dataset = open_stub(dir.path(), &mut store).unwrap();

    let dims = dataset.dimensions();
    assert_eq!(dims.wells, 3);
    // settled again over the survivors: 18 files / (2 channels x 3 wells)
    assert_eq!(dims.timepoints, 3);
    assert_eq!(dataset.series_count(), 3);
    assert_eq!(dataset.well_numbers(), [1, 2, 3]);
    assert_eq!(dataset.file_table().matched_count(), 18);

    // three labels cannot fill the derived 2x2 grid; fallback applies
    assert_eq!(dataset.well_grid(), WellGrid { rows: 4, columns: 2 });

    let plate = store.plate(0).unwrap();
    assert_eq!(plate.wells.len(), 3);
    assert_eq!(plate.wells[&2].row, Some(1));
    assert_eq!(plate.wells[&2].column, Some(0));
}

#[test]
fn test_overdeclared_timepoints_corrected() {
    let dir = tempdir().unwrap();
    let xml = FOUR_WELLS.replace(
        "<DBL><Name>conversion factor um/pixel</Name><Val>0.645</Val></DBL>",
        "<I32><Name>timeloop real</Name><Val>10</Val></I32>",
    );
    write_descriptor(dir.path(), &xml);
    let data = data_dir(dir.path());
    for well in 1..=4 {
        for t in 0..3 {
            for channel in ["DAPI", "GFP"] {
                touch_plane(&data, well, 1, t, 0, channel);
            }
        }
    }

    let mut store = PlateStore::new();
    let dataset = open_stub(dir.path(), &mut store).unwrap();
    // ten declared timepoints would need 80 files; 24 exist
    assert_eq!(dataset.dimensions().timepoints, 3);
}

#[test]
fn test_missing_plane_reads_zeros() {
    let dir = tempdir().unwrap();
    write_descriptor(dir.path(), ONE_WELL_TWO_TIMEPOINTS);
    let data = data_dir(dir.path());
    touch_plane(&data, 1, 1, 0, 0, "DAPI");
    // keeps the file count at two without matching T00001
    touch_plane(&data, 1, 1, 9, 0, "DAPI");

    let mut store = PlateStore::new();
    let dataset = open_stub(dir.path(), &mut store).unwrap();
    assert_eq!(dataset.dimensions().timepoints, 2);
    assert!(dataset.file_table().get(0, 1).is_none());

    let filled = dataset.read_plane(0, 0).unwrap();
    assert!(filled.iter().any(|byte| *byte != 0));

    let zeros = dataset.read_plane(0, 1).unwrap();
    assert_eq!(zeros.len(), dataset.shape().plane_bytes());
    assert!(zeros.iter().all(|byte| *byte == 0));
}

#[test]
fn test_reads_mask_to_12_bits() {
    let dir = tempdir().unwrap();
    write_descriptor(dir.path(), ONE_WELL_TWO_TIMEPOINTS);
    let data = data_dir(dir.path());
    touch_plane(&data, 1, 1, 0, 0, "DAPI");
    touch_plane(&data, 1, 1, 1, 0, "DAPI");

    let mut store = PlateStore::new();
    let dataset = open_stub(dir.path(), &mut store).unwrap();

    let bytes = dataset.read_plane(0, 0).unwrap();
    for sample in bytes.chunks_exact(2) {
        assert_eq!(u16::from_le_bytes([sample[0], sample[1]]), 0x0123);
    }

    let region = Region {
        x: 2,
        y: 1,
        width: 3,
        height: 2,
    };
    let tile = dataset.read_region(0, 0, region).unwrap();
    assert_eq!(tile.len(), 3 * 2 * 2);
}

#[test]
fn test_read_bounds_are_validated() {
    let dir = tempdir().unwrap();
    write_descriptor(dir.path(), ONE_WELL_TWO_TIMEPOINTS);
    let data = data_dir(dir.path());
    touch_plane(&data, 1, 1, 0, 0, "DAPI");
    touch_plane(&data, 1, 1, 1, 0, "DAPI");

    let mut store = PlateStore::new();
    let dataset = open_stub(dir.path(), &mut store).unwrap();

    assert!(matches!(
        dataset.read_plane(5, 0),
        Err(PlaneError::OutOfRange { what: "series", .. })
    ));
    assert!(matches!(
        dataset.read_plane(0, 99),
        Err(PlaneError::OutOfRange { what: "plane", .. })
    ));
    let oversized = Region {
        x: 0,
        y: 0,
        width: 1000,
        height: 1,
    };
    assert!(matches!(
        dataset.read_region(0, 0, oversized),
        Err(PlaneError::RegionOutOfBounds { .. })
    ));
}

#[test]
fn test_missing_descriptor_is_an_error() {
    let dir = tempdir().unwrap();
    let mut store = PlateStore::new();
    let err = open_stub(dir.path(), &mut store).unwrap_err();
    assert!(matches!(err, DatasetError::DescriptorNotFound { .. }));
    assert!(err.to_string().contains("experiment_descriptor.xml"));
}

#[test]
fn test_no_matching_files_is_an_error() {
    let dir = tempdir().unwrap();
    write_descriptor(dir.path(), FOUR_WELLS);
    // data directory exists but holds nothing matchable
    let data = data_dir(dir.path());
    fs::write(data.join("notes.txt"), b"tuning run").unwrap();

    let mut store = PlateStore::new();
    let err = open_stub(dir.path(), &mut store).unwrap_err();
    assert!(matches!(err, DatasetError::NoFilesMatched { .. }));
}

#[test]
fn test_every_entry_point_resolves_descriptor() {
    let dir = tempdir().unwrap();
    full_four_well_dataset(dir.path());

    let descriptor = dir.path().join("experiment_descriptor.xml");
    let plane = dir
        .path()
        .join("data")
        .join("screen_W00001_P00001_T00000_Z00000_DAPI.tif");

    for entry in [dir.path().to_path_buf(), descriptor.clone(), plane] {
        let mut store = PlateStore::new();
        let dataset = open_stub(&entry, &mut store).unwrap();
        assert_eq!(dataset.descriptor_path(), descriptor.as_path());
        assert_eq!(dataset.series_count(), 4);
    }
}

#[test]
fn test_series_files_lists_metadata_and_planes() {
    let dir = tempdir().unwrap();
    full_four_well_dataset(dir.path());
    fs::write(dir.path().join("AcquisitionLog.dat"), b"log").unwrap();

    let mut store = PlateStore::new();
    let dataset = open_stub(dir.path(), &mut store).unwrap();

    let metadata_only = dataset.series_files(0, false);
    assert_eq!(metadata_only.len(), 2);
    assert!(metadata_only
        .iter()
        .any(|path| path.ends_with("AcquisitionLog.dat")));
    assert!(metadata_only
        .iter()
        .any(|path| path.ends_with("experiment_descriptor.xml")));

    let with_planes = dataset.series_files(0, true);
    assert_eq!(with_planes.len(), 2 + 6);

    // out of range: metadata files only
    assert_eq!(dataset.series_files(99, true).len(), 2);
}

#[test]
fn test_ungrouped_tif_opens_as_single_plane() {
    let dir = tempdir().unwrap();
    let plane = dir.path().join("loose_plane.tif");
    fs::write(&plane, b"").unwrap();

    let mut store = PlateStore::new();
    let options = DatasetOptions {
        group_files: false,
        ..DatasetOptions::default()
    };
    let dataset =
        ScanrDataset::open_with(&plane, options, StubDecoder::default(), &mut store).unwrap();

    assert_eq!(dataset.series_count(), 1);
    assert_eq!(dataset.planes_per_series(), 1);
    assert_eq!(dataset.dimensions().wells, 1);
    assert!(dataset.metadata_files().is_empty());
    assert_eq!(dataset.series()[0].name, "loose_plane.tif");
    // nothing was published for ungrouped planes
    assert!(store.plate(0).is_none());

    let bytes = dataset.read_plane(0, 0).unwrap();
    assert_eq!(bytes.len(), dataset.shape().plane_bytes());
}

#[test]
fn test_raw_metadata_passes_through() {
    let dir = tempdir().unwrap();
    full_four_well_dataset(dir.path());

    let mut store = PlateStore::new();
    let dataset = open_stub(dir.path(), &mut store).unwrap();

    let raw = dataset.raw_metadata();
    assert!(raw
        .iter()
        .any(|(key, value)| key == "plate name" && value == "Assay Plate 7"));
    assert!(raw.iter().any(|(key, _)| key == "idle"));
}

#[test]
fn test_repeated_open_is_deterministic() {
    let dir = tempdir().unwrap();
    full_four_well_dataset(dir.path());

    let mut store_a = PlateStore::new();
    let first = open_stub(dir.path(), &mut store_a).unwrap();
    let mut store_b = PlateStore::new();
    let second = open_stub(dir.path(), &mut store_b).unwrap();

    assert_eq!(first.series(), second.series());
    assert_eq!(first.file_table(), second.file_table());
    assert_eq!(store_a, store_b);
}
