//! Aggregation primitives: group-by counts, completeness and headline metrics.

mod completeness;
mod counts;
mod metrics;

pub use completeness::{completeness_by_study, CompletenessTable, DEFAULT_TRACKED_FIELDS};
pub use counts::{count_by_field, count_by_study, non_missing_count, sorted_counts};
pub use metrics::SummaryMetrics;
