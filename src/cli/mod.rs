//! Command implementations for the `scanr` binary.

pub mod detect;
pub mod extract;
pub mod info;
