//! Filtering primitives for sample metadata.

pub mod predicate;

pub use predicate::{filter, filter_options, Predicate, Selection, ALL};
