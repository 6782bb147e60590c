//! # Plane file indexing
//!
//! Matches the flat directory listing of an acquisition to logical
//! coordinates. ScanR filenames embed fixed-width positional tokens
//! (`W00007`, `P00001`, `T00000`, `Z00002`) plus the channel name, so a
//! coordinate matches a file when the file's name contains all five
//! substrings. The first listed match wins; token collisions are
//! tolerated, not detected.
//!
//! The result is a [`FileTable`]: one slot per coordinate, empty where no
//! file matched. Indexing never fails by itself; the match evidence in
//! [`IndexOutcome`] lets the assembler decide whether the declarations
//! were wrong.


use std::path::{Path, PathBuf};

use log::debug;

use crate::layout::Cardinality;

/// Fixed-width positional token: axis code plus five-digit zero-padded
/// index. Indices above 99999 widen rather than truncate.
pub fn axis_block(axis: char, index: u32) -> String {
    format!("{axis}{index:05}")
}

/// Flat table of matched plane files.
///
/// One slot per (well, field, Z, time, channel) coordinate with well
/// outermost and channel innermost; within one series the plane index is
/// `(z * timepoints + t) * channels + c`. Frozen once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTable {
    slots: Vec<Option<PathBuf>>,
    planes_per_series: usize,
}

impl FileTable {
    /// Table holding exactly one matched plane.
    pub fn single(path: PathBuf) -> Self {
        FileTable {
            slots: vec![Some(path)],
            planes_per_series: 1,
        }
    }

    /// Total slot count.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the table has no slots at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Planes per series.
    pub fn planes_per_series(&self) -> usize {
        self.planes_per_series
    }

    /// Path in the given series/plane slot, if a file matched it.
    pub fn get(&self, series: usize, plane: usize) -> Option<&Path> {
        let index = series.checked_mul(self.planes_per_series)?.checked_add(plane)?;
        self.slots.get(index)?.as_deref()
    }

    /// Matched paths of one series, in plane order.
    pub fn series_paths(&self, series: usize) -> impl Iterator<Item = &Path> {
        self.slots
            .iter()
            .skip(series.saturating_mul(self.planes_per_series))
            .take(self.planes_per_series)
            .filter_map(|slot| slot.as_deref())
    }

    /// First matched path in table order.
    pub fn first_matched(&self) -> Option<&Path> {
        self.slots.iter().find_map(|slot| slot.as_deref())
    }

    /// Number of filled slots.
    pub fn matched_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Match evidence produced alongside a [`FileTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOutcome {
    /// Per well position: whether any coordinate there matched a file.
    pub matched_wells: Vec<bool>,
    /// Per field position: whether any well matched a file there.
    pub matched_fields: Vec<bool>,
}

impl IndexOutcome {
    /// Wells with at least one matched file.
    pub fn surviving_wells(&self) -> usize {
        self.matched_wells.iter().filter(|m| **m).count()
    }

    /// Field positions where at least one well matched a file.
    pub fn real_fields(&self) -> usize {
        self.matched_fields.iter().filter(|m| **m).count()
    }
}

/// Build the file table for one settled cardinality tuple.
///
/// `files` is the candidate name listing, already sorted so first-match
/// resolution is deterministic. `well_numbers` carries the declared
/// numeric identifier for each well position; the `W` token is built from
/// that number, not from the position. Field tokens are 1-based, Z and T
/// tokens 0-based.
pub fn build_file_table(
    dir: &Path,
    files: &[String],
    dims: &Cardinality,
    well_numbers: &[u32],
    channel_names: &[String],
) -> (FileTable, IndexOutcome) {
    let mut slots: Vec<Option<PathBuf>> = vec![None; dims.plane_count()];
    let mut matched_wells = vec![false; dims.wells];
    let mut matched_fields = vec![false; dims.fields];
    let mut next = 0;

    for well in 0..dims.wells {
        let Some(&number) = well_numbers.get(well) else {
            break;
        };
        let well_block = axis_block('W', number);
        for field in 0..dims.fields {
            let field_block = axis_block('P', field as u32 + 1);
            for z in 0..dims.slices {
                let z_block = axis_block('Z', z as u32);
                for t in 0..dims.timepoints {
                    let t_block = axis_block('T', t as u32);
                    for channel in 0..dims.channels {
                        let slot = next;
                        next += 1;
                        let Some(channel_name) = channel_names.get(channel) else {
                            continue;
                        };
                        let matched = files.iter().find(|name| {
                            name.contains(&well_block)
                                && name.contains(&field_block)
                                && name.contains(&z_block)
                                && name.contains(&t_block)
                                && name.contains(channel_name.as_str())
                        });
                        if let Some(name) = matched {
                            slots[slot] = Some(dir.join(name));
                            matched_wells[well] = true;
                            matched_fields[field] = true;
                        }
                    }
                }
            }
        }
    }

    debug!(
        "indexed {}/{} plane slots from {} candidate files",
        slots.iter().filter(|slot| slot.is_some()).count(),
        slots.len(),
        files.len()
    );
    (
        FileTable {
            slots,
            planes_per_series: dims.planes_per_series(),
        },
        IndexOutcome {
            matched_wells,
            matched_fields,
        },
    )
}
