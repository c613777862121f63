//! Analysis modules.
//!
//! Year aggregation and aggregate-table sorting.

pub mod aggregator;
pub mod sorter;

pub use aggregator::*;
pub use sorter::*;
