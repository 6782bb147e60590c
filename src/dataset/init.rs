//! Dataset assembly pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::descriptor::{parse_descriptor_file, DeclaredWell, ParseContext};
use crate::detect;
use crate::index::{build_file_table, FileTable};
use crate::layout::{resolve_dimensions, resolve_well_grid, Cardinality, DeclaredCounts, WellGrid};
use crate::plane::{PlaneDecoder, PlaneHandle};
use crate::store::{lsid, MetadataStore, NamingConvention};

use super::options::{DatasetOptions, MetadataLevel};
use super::series::{PlaneShape, SeriesDescriptor, DIMENSION_ORDER, SIGNIFICANT_BITS};
use super::{DatasetError, ScanrDataset};

impl ScanrDataset {
    /// Open a dataset with the default TIFF decoder and options.
    ///
    /// `path` may be the descriptor file, the dataset directory, or any
    /// file inside it. The standardized plate records are written to
    /// `store` during assembly.
    pub fn open<P, S>(path: P, store: &mut S) -> Result<Self, DatasetError>
    where
        P: AsRef<Path>,
        S: MetadataStore + ?Sized,
    {
        Self::open_with(
            path,
            DatasetOptions::default(),
            crate::plane::TiffPlaneDecoder,
            store,
        )
    }
}

impl<D: PlaneDecoder> ScanrDataset<D> {
    /// Open a dataset with explicit options and decoder.
    pub fn open_with<P, S>(
        path: P,
        options: DatasetOptions,
        decoder: D,
        store: &mut S,
    ) -> Result<Self, DatasetError>
    where
        P: AsRef<Path>,
        S: MetadataStore + ?Sized,
    {
        let entry = path.as_ref();
        if !options.group_files && is_tif(entry) {
            return Self::open_single_plane(entry, decoder);
        }

        let descriptor_path = find_descriptor(entry)?;
        let base_dir = parent_dir(&descriptor_path);
        info!("assembling dataset from {}", descriptor_path.display());

        let mut ctx = ParseContext::new();
        parse_descriptor_file(&descriptor_path, &mut ctx)?;
        let descriptor = ctx.finish();

        let metadata_files = collect_metadata_files(&base_dir)?;
        let (data_dir, files) = list_plane_candidates(&base_dir)?;

        // first pass over the declared well set
        let declared = DeclaredCounts {
            channels: descriptor.channel_count as usize,
            channel_names: descriptor.channel_names.len(),
            slices: descriptor.slices as usize,
            timepoints: descriptor.timepoints as usize,
            wells: descriptor.well_count(),
            fields: descriptor.field_count(),
        };
        let mut wells: Vec<DeclaredWell> = descriptor.wells.clone();
        let mut grid = resolve_well_grid(descriptor.labels(), wells.len());
        let mut dimensions = resolve_dimensions(&declared, files.len());
        debug!("declared shape {dimensions:?}, grid {grid:?}");

        let numbers: Vec<u32> = wells.iter().map(|well| well.number).collect();
        let (mut table, outcome) = build_file_table(
            &data_dir,
            &files,
            &dimensions,
            &numbers,
            &descriptor.channel_names,
        );

        // second pass when the files contradict the declarations: prune
        // the wells and fields nothing matched, then settle and index
        // again over the survivors
        if outcome.surviving_wells() < dimensions.wells
            || outcome.real_fields() < dimensions.fields
        {
            warn!(
                "descriptor declares {} wells x {} fields but files cover {} x {}; pruning",
                dimensions.wells,
                dimensions.fields,
                outcome.surviving_wells(),
                outcome.real_fields()
            );
            wells = wells
                .into_iter()
                .zip(&outcome.matched_wells)
                .filter(|(_, matched)| **matched)
                .map(|(well, _)| well)
                .collect();
            grid = resolve_well_grid(
                wells.iter().filter_map(|well| well.label.as_deref()),
                wells.len(),
            );
            let pruned = DeclaredCounts {
                wells: wells.len(),
                fields: outcome.real_fields(),
                ..declared
            };
            dimensions = resolve_dimensions(&pruned, files.len());
            let numbers: Vec<u32> = wells.iter().map(|well| well.number).collect();
            let (rebuilt, _) = build_file_table(
                &data_dir,
                &files,
                &dimensions,
                &numbers,
                &descriptor.channel_names,
            );
            table = rebuilt;
        }

        let Some(first) = table.first_matched() else {
            return Err(DatasetError::NoFilesMatched { dir: data_dir });
        };
        let shape = probe_shape(&decoder, first)?;
        let acquired = file_timestamp(&descriptor_path);

        let well_numbers: Vec<u32> = wells.iter().map(|well| well.number).collect();
        let series = build_series(&dimensions, &well_numbers, shape);
        info!(
            "assembled {} series: {} wells x {} fields, C{} Z{} T{}, {}x{} {}",
            series.len(),
            dimensions.wells,
            dimensions.fields,
            dimensions.channels,
            dimensions.slices,
            dimensions.timepoints,
            shape.width,
            shape.height,
            shape.pixel_type
        );

        let dataset = ScanrDataset {
            decoder,
            descriptor_path,
            data_dir,
            metadata_files,
            raw_metadata: descriptor.raw,
            plate_name: descriptor.plate_name,
            pixel_size_um: descriptor.pixel_size,
            channel_names: descriptor.channel_names,
            well_numbers,
            well_grid: grid,
            dimensions,
            shape,
            table,
            series,
        };
        dataset.populate_store(store, &options, acquired);
        Ok(dataset)
    }

    /// Ungrouped mode: expose one TIFF as a dataset of one series and one
    /// plane, without touching the descriptor or the store.
    fn open_single_plane(entry: &Path, decoder: D) -> Result<Self, DatasetError> {
        info!("ungrouped open of {}", entry.display());
        let shape = probe_shape(&decoder, entry)?;
        let name = entry
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("plane")
            .to_string();
        let dimensions = Cardinality {
            channels: 1,
            slices: 1,
            timepoints: 1,
            wells: 1,
            fields: 1,
        };
        let series = vec![SeriesDescriptor {
            series: 0,
            well: 0,
            well_number: 1,
            field: 0,
            channels: 1,
            slices: 1,
            timepoints: 1,
            shape,
            plane_count: 1,
            significant_bits: SIGNIFICANT_BITS,
            dimension_order: DIMENSION_ORDER,
            name,
        }];
        Ok(ScanrDataset {
            decoder,
            descriptor_path: entry.to_path_buf(),
            data_dir: parent_dir(entry),
            metadata_files: Vec::new(),
            raw_metadata: Vec::new(),
            plate_name: None,
            pixel_size_um: None,
            channel_names: Vec::new(),
            well_numbers: vec![1],
            well_grid: WellGrid { rows: 1, columns: 1 },
            dimensions,
            shape,
            table: FileTable::single(entry.to_path_buf()),
            series,
        })
    }

    /// Publish the standardized plate records.
    ///
    /// Structural records always go out; names, channel labels and pixel
    /// sizes only at [`MetadataLevel::All`].
    fn populate_store<S>(
        &self,
        store: &mut S,
        options: &DatasetOptions,
        acquired: Option<DateTime<Utc>>,
    ) where
        S: MetadataStore + ?Sized,
    {
        store.set_plate_id(0, &lsid("Plate", &[0]));
        let columns = self.well_grid.columns.max(1);

        for descriptor in &self.series {
            let series = descriptor.series;
            let well = descriptor.well;
            let field = descriptor.field;
            // plate position comes from the declared number, not the
            // surviving position
            let well_index = descriptor.well_number.saturating_sub(1) as usize;

            store.set_well_id(0, well, &lsid("Well", &[0, well]));
            store.set_well_row(0, well, well_index / columns);
            store.set_well_column(0, well, well_index % columns);

            store.set_well_sample_id(0, well, field, &lsid("WellSample", &[0, well, field]));
            store.set_well_sample_index(0, well, field, series);
            let image_id = lsid("Image", &[series]);
            store.set_well_sample_image(0, well, field, &image_id);

            store.set_image_id(series, &image_id);
            store.set_image_name(series, &descriptor.name);
            if let Some(acquired) = acquired {
                store.set_image_acquired(series, acquired);
            }
        }

        if options.metadata_level == MetadataLevel::Minimum {
            return;
        }

        for descriptor in &self.series {
            for channel in 0..descriptor.channels {
                if let Some(name) = self.channel_names.get(channel) {
                    store.set_channel_name(descriptor.series, channel, name);
                }
            }
            if let Some(size) = self.pixel_size_um {
                store.set_physical_pixel_size(descriptor.series, size, size);
            }
        }

        let (row_naming, column_naming) = if self.well_grid.rows > 26 {
            (NamingConvention::Number, NamingConvention::Letter)
        } else {
            (NamingConvention::Letter, NamingConvention::Number)
        };
        store.set_plate_row_naming(0, row_naming);
        store.set_plate_column_naming(0, column_naming);
        if let Some(name) = &self.plate_name {
            store.set_plate_name(0, name);
        }
    }
}

/// Resolve the descriptor path from any accepted entry point: the
/// descriptor itself, the dataset directory, a companion file beside the
/// descriptor, or a plane file two levels below it.
fn find_descriptor(entry: &Path) -> Result<PathBuf, DatasetError> {
    if entry.file_name().and_then(|name| name.to_str()) == Some(detect::DESCRIPTOR_FILE)
        && entry.is_file()
    {
        return Ok(entry.to_path_buf());
    }
    if entry.is_dir() {
        let candidate = entry.join(detect::DESCRIPTOR_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
        return Err(DatasetError::DescriptorNotFound {
            dir: entry.to_path_buf(),
        });
    }
    let Some(mut dir) = entry.parent() else {
        return Err(DatasetError::InvalidEntry(entry.display().to_string()));
    };
    // plane files live in the data subdirectory, one level below the
    // descriptor
    if is_tif(entry) {
        dir = dir.parent().unwrap_or(dir);
    }
    let candidate = dir.join(detect::DESCRIPTOR_FILE);
    if candidate.is_file() {
        return Ok(candidate);
    }
    Err(DatasetError::DescriptorNotFound {
        dir: dir.to_path_buf(),
    })
}

fn is_tif(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tif"))
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Companion `.dat` and `.xml` files beside the descriptor, sorted for
/// deterministic listings.
fn collect_metadata_files(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matched = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                detect::METADATA_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });
        if matched {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Candidate plane files: the conventional `data` subdirectory when it is
/// present and non-empty, otherwise the dataset directory itself.
fn list_plane_candidates(base: &Path) -> Result<(PathBuf, Vec<String>), DatasetError> {
    let data_dir = base.join("data");
    if data_dir.is_dir() {
        let files = list_file_names(&data_dir)?;
        if !files.is_empty() {
            return Ok((data_dir, files));
        }
    }
    let files = list_file_names(base)?;
    Ok((base.to_path_buf(), files))
}

/// File names in `dir`, sorted so first-match resolution is
/// deterministic.
fn list_file_names(dir: &Path) -> Result<Vec<String>, DatasetError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Shared plane shape, probed from one matched file. The handle is
/// dropped before assembly continues.
fn probe_shape<D: PlaneDecoder>(decoder: &D, path: &Path) -> Result<PlaneShape, DatasetError> {
    let handle = decoder.open(path)?;
    Ok(PlaneShape {
        width: handle.width(),
        height: handle.height(),
        // ScanR declares signed integer samples that are in fact unsigned
        pixel_type: handle.pixel_type().as_unsigned(),
        little_endian: handle.little_endian(),
        rgb: handle.rgb(),
        interleaved: handle.interleaved(),
        indexed: handle.indexed(),
    })
}

/// Descriptor modification time, the closest thing ScanR leaves to an
/// acquisition timestamp.
fn file_timestamp(path: &Path) -> Option<DateTime<Utc>> {
    let modified = fs::metadata(path).and_then(|meta| meta.modified()).ok()?;
    Some(DateTime::<Utc>::from(modified))
}

fn build_series(
    dims: &Cardinality,
    well_numbers: &[u32],
    shape: PlaneShape,
) -> Vec<SeriesDescriptor> {
    let fields = dims.fields.max(1);
    let mut series = Vec::with_capacity(dims.wells * dims.fields);
    for index in 0..dims.wells * dims.fields {
        let well = index / fields;
        let field = index % fields;
        let number = well_numbers
            .get(well)
            .copied()
            .unwrap_or(well as u32 + 1);
        series.push(SeriesDescriptor {
            series: index,
            well,
            well_number: number,
            field,
            channels: dims.channels,
            slices: dims.slices,
            timepoints: dims.timepoints,
            shape,
            plane_count: dims.planes_per_series(),
            significant_bits: SIGNIFICANT_BITS,
            dimension_order: DIMENSION_ORDER,
            name: format!("Well {}, Field {} (Spot {})", number, field + 1, index + 1),
        });
    }
    series
}
