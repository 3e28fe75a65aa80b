//! Analysis modules.
//!
//! Region grouping and the per-region reduction live in [`aggregator`].

pub mod aggregator;

pub use aggregator::*;
