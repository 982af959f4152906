//! Output formatting helpers.

pub mod grouping;
