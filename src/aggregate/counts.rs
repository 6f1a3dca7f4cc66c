//! Group-by sample counts.

use crate::data::Dataset;
use std::collections::HashMap;

/// Number of samples per `study_id`.
///
/// Grouping is by exact string equality; the map has no defined order.
pub fn count_by_study(dataset: &Dataset) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for record in dataset.records() {
        *counts.entry(record.study_id().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Value counts of a field, skipping absent cells, largest first.
///
/// An unknown field yields an empty vector.
pub fn count_by_field(dataset: &Dataset, field: &str) -> Vec<(String, usize)> {
    let Some(values) = dataset.column(field) else {
        return Vec::new();
    };
    let mut counts: HashMap<String, usize> = HashMap::new();
    for v in values {
        if !v.is_absent() {
            *counts.entry(v.to_string()).or_insert(0) += 1;
        }
    }
    sorted_counts(&counts)
}

/// Order a count map for display: descending count, then ascending key.
pub fn sorted_counts(counts: &HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut sorted: Vec<(String, usize)> = counts
        .iter()
        .map(|(k, &n)| (k.clone(), n))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

/// Number of present (non-absent) values in a field; 0 for unknown fields.
pub fn non_missing_count(dataset: &Dataset, field: &str) -> usize {
    dataset
        .column(field)
        .map(|values| values.iter().filter(|v| !v.is_absent()).count())
        .unwrap_or(0)
}
