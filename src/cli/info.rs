//! `scanr info`: assemble a dataset and summarize it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use scanr::dataset::{ScanrDataset, SeriesDescriptor};
use scanr::store::PlateStore;

#[derive(Serialize)]
struct Report<'a> {
    store: &'a PlateStore,
    series: &'a [SeriesDescriptor],
}

pub fn run(path: PathBuf, json: bool, max_series: usize) -> Result<()> {
    let mut store = PlateStore::new();
    let dataset = ScanrDataset::open(&path, &mut store)
        .with_context(|| format!("failed to open {}", path.display()))?;

    if json {
        let report = Report {
            store: &store,
            series: dataset.series(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("ScanR Dataset");
    println!("=============");
    println!("Descriptor:      {}", dataset.descriptor_path().display());
    println!("Data directory:  {}", dataset.data_dir().display());
    if let Some(name) = dataset.plate_name() {
        println!("Plate:           {name}");
    }

    let dims = dataset.dimensions();
    let grid = dataset.well_grid();
    println!();
    println!(
        "Wells:           {} ({} rows x {} columns)",
        dims.wells, grid.rows, grid.columns
    );
    println!("Fields per well: {}", dims.fields);
    println!(
        "Channels:        {} {:?}",
        dims.channels,
        dataset.channel_names()
    );
    println!("Z slices:        {}", dims.slices);
    println!("Timepoints:      {}", dims.timepoints);

    let shape = dataset.shape();
    println!();
    println!(
        "Plane:           {}x{} {} ({}-endian), 12 significant bits",
        shape.width,
        shape.height,
        shape.pixel_type,
        if shape.little_endian { "little" } else { "big" }
    );
    if let Some(size) = dataset.pixel_size_um() {
        println!("Pixel size:      {size} um");
    }
    println!(
        "Files:           {} matched / {} slots",
        dataset.file_table().matched_count(),
        dataset.file_table().len()
    );

    println!();
    println!("Series ({} total):", dataset.series_count());
    for series in dataset.series().iter().take(max_series) {
        println!(
            "  {:4}  {}  [{} planes]",
            series.series, series.name, series.plane_count
        );
    }
    if dataset.series_count() > max_series {
        println!("  ... {} more", dataset.series_count() - max_series);
    }
    Ok(())
}
