//! # Layout resolution
//!
//! Pure functions that settle the dataset's logical shape from declared
//! and observed evidence: [`resolve_well_grid`] derives the plate grid
//! from well labels, [`resolve_dimensions`] settles the cardinality tuple
//! against the number of files on disk.
//!
//! Both run twice when indexing contradicts the declarations: once over
//! the declared well set, and again over the pruned set after matching.

mod dimensions;
mod wells;


pub use dimensions::{resolve_dimensions, Cardinality, DeclaredCounts};
pub use wells::{fallback_grid, resolve_well_grid, WellGrid};
