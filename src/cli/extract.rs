//! `scanr extract`: dump one plane or region as raw samples.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use scanr::dataset::ScanrDataset;
use scanr::plane::Region;
use scanr::store::PlateStore;

pub fn run(
    path: PathBuf,
    series: usize,
    plane: usize,
    region: Option<String>,
    output: PathBuf,
) -> Result<()> {
    let mut store = PlateStore::new();
    let dataset = ScanrDataset::open(&path, &mut store)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let shape = dataset.shape();
    let region = match region {
        Some(spec) => parse_region(&spec)?,
        None => Region::full(shape.width, shape.height),
    };

    let bytes = dataset
        .read_region(series, plane, region)
        .with_context(|| format!("failed to read series {series} plane {plane}"))?;
    fs::write(&output, &bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "wrote {} bytes ({} {} samples, {}) to {}",
        bytes.len(),
        region.pixel_count(),
        shape.pixel_type,
        if shape.little_endian {
            "little-endian"
        } else {
            "big-endian"
        },
        output.display()
    );
    Ok(())
}

/// Parse `X,Y,WIDTH,HEIGHT` into a [`Region`].
fn parse_region(spec: &str) -> Result<Region> {
    let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        bail!("region must be X,Y,WIDTH,HEIGHT (got {spec:?})");
    }
    let mut values = [0u32; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .with_context(|| format!("invalid region component {part:?}"))?;
    }
    Ok(Region {
        x: values[0],
        y: values[1],
        width: values[2],
        height: values[3],
    })
}
