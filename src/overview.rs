//! Everything one dashboard interaction needs, as plain tabular results.

use crate::aggregate::{
    completeness_by_study, count_by_field, count_by_study, sorted_counts, CompletenessTable,
    SummaryMetrics,
};
use crate::config::DashboardConfig;
use crate::data::{Dataset, Value};
use crate::filter::{filter, Predicate};
use crate::labels::StudyLabels;
use serde::{Deserialize, Serialize};

/// Sample count of one study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyCount {
    pub study_id: String,
    /// Display label, when the label table has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub samples: usize,
}

/// Number of samples carrying one value of a categorical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Leading rows of the filtered table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Result of one recomputation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    /// Active predicates (the "All" ones are dropped).
    pub filters: Vec<Predicate>,
    /// Headline numbers of the filtered view.
    pub metrics: SummaryMetrics,
    /// Samples per study in the filtered view, largest first.
    pub study_counts: Vec<StudyCount>,
    /// Completeness of the tracked fields, always over the full dataset.
    pub completeness: CompletenessTable,
    /// Value counts of the disease field in the filtered view.
    pub disease_distribution: Vec<CategoryCount>,
    pub preview: Preview,
}

impl Overview {
    /// Apply `predicates` to `base` and aggregate.
    ///
    /// Metrics, counts, the disease distribution and the preview describe
    /// the filtered view. The completeness table is computed from `base`
    /// so it does not move when the filter changes.
    pub fn compute(
        base: &Dataset,
        predicates: &[Predicate],
        config: &DashboardConfig,
        labels: &StudyLabels,
    ) -> Self {
        let view = filter(base, predicates);

        let counts = study_counts(&view, labels);

        let disease_distribution = count_by_field(&view, &config.disease_field)
            .into_iter()
            .map(|(value, count)| CategoryCount { value, count })
            .collect();

        let head = view.head(config.preview_rows);
        let preview = Preview {
            columns: head.schema().column_names().to_vec(),
            rows: head.records().map(|r| r.values().to_vec()).collect(),
        };

        Self {
            filters: predicates
                .iter()
                .filter(|p| !p.selection.is_all())
                .cloned()
                .collect(),
            metrics: SummaryMetrics::compute(&view, &config.age_field, &config.bmi_field),
            study_counts: counts,
            completeness: completeness_by_study(base, &config.tracked_fields),
            disease_distribution,
            preview,
        }
    }
}

/// Samples per study in display order (largest first), with labels attached.
pub fn study_counts(dataset: &Dataset, labels: &StudyLabels) -> Vec<StudyCount> {
    sorted_counts(&count_by_study(dataset))
        .into_iter()
        .map(|(study_id, samples)| StudyCount {
            label: labels.get(&study_id).map(String::from),
            study_id,
            samples,
        })
        .collect()
}

/// Predicates for the two dashboard filters; `"All"` disables either one.
pub fn dashboard_predicates(config: &DashboardConfig, disease: &str, study: &str) -> Vec<Predicate> {
    vec![
        Predicate::from_selection(&config.disease_field, disease),
        Predicate::from_selection(&config.study_filter_field, study),
    ]
}
