//! # Experiment descriptor parsing
//!
//! ScanR writes acquisition metadata as LabVIEW-flavored XML: a flat
//! stream of `Name`/`Val` element pairs with no meaningful nesting. This
//! module scans that stream once and folds it into a [`Descriptor`].
//!
//! Order matters. `name` entries open candidate channels that a later
//! `idle` flag confirms or retracts, and well selection entries alternate
//! between numeric identifiers and textual labels. [`ParseContext`] holds
//! exactly that order-sensitive state.
//!
//! ## Example
//!
//! ```rust
//! use scanr::descriptor::{parse_descriptor, ParseContext};
//!
//! let xml = r#"
//! <Cluster>
//!   <String><Name>name</Name><Val>DAPI</Val></String>
//!   <I32><Name>idle</Name><Val>0</Val></I32>
//!   <I32><Name>timeloop count</Name><Val>5</Val></I32>
//! </Cluster>"#;
//!
//! let mut ctx = ParseContext::new();
//! parse_descriptor(xml, &mut ctx)?;
//! let descriptor = ctx.finish();
//!
//! assert_eq!(descriptor.channel_names, vec!["DAPI"]);
//! assert_eq!(descriptor.timepoints, 6);
//! # Ok::<(), scanr::descriptor::DescriptorError>(())
//! ```

mod context;
mod effects;
mod error;
mod parse;

#[cfg(test)]
mod tests;

pub use context::{DeclaredWell, Descriptor, ParseContext};
pub use effects::{MetadataEffect, AUTOFOCUS_CHANNEL};
pub use error::DescriptorError;
pub use parse::{parse_descriptor, parse_descriptor_file};
