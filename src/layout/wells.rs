//! Plate grid resolution from well labels.

/// Resolved plate grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellGrid {
    /// Row count.
    pub rows: usize,
    /// Column count.
    pub columns: usize,
}

impl WellGrid {
    /// Wells the grid can hold.
    pub fn capacity(&self) -> usize {
        self.rows * self.columns
    }
}

/// Derive the plate grid from observed well labels.
///
/// A label starting with an alphabetic character splits into that row
/// character and a column remainder; the counts of distinct rows and
/// distinct columns give the grid. Labels not starting with a letter carry
/// no grid information. When the derived grid cannot hold exactly
/// `well_count` wells it is replaced by the fixed fallback for that plate
/// size, if one exists.
pub fn resolve_well_grid<'a, I>(labels: I, well_count: usize) -> WellGrid
where
    I: IntoIterator<Item = &'a str>,
{
    let mut rows: Vec<char> = Vec::new();
    let mut columns: Vec<&str> = Vec::new();
    for label in labels {
        let mut chars = label.chars();
        let Some(first) = chars.next() else { continue };
        if !first.is_alphabetic() {
            continue;
        }
        let column = chars.as_str().trim();
        if !rows.contains(&first) {
            rows.push(first);
        }
        if !column.is_empty() && !columns.contains(&column) {
            columns.push(column);
        }
    }
    let derived = WellGrid {
        rows: rows.len(),
        columns: columns.len(),
    };
    if derived.capacity() == well_count {
        derived
    } else {
        fallback_grid(well_count).unwrap_or(derived)
    }
}

/// Fixed grid for standard plate sizes, keyed by well-count band.
///
/// Plates beyond 384 wells have no fallback.
pub fn fallback_grid(well_count: usize) -> Option<WellGrid> {
    match well_count {
        0..=8 => Some(WellGrid { rows: 4, columns: 2 }),
        9..=96 => Some(WellGrid {
            rows: 8,
            columns: 12,
        }),
        97..=384 => Some(WellGrid {
            rows: 16,
            columns: 24,
        }),
        _ => None,
    }
}
