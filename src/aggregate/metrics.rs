//! Headline metrics for a (possibly filtered) dataset.

use crate::aggregate::counts::non_missing_count;
use crate::data::Dataset;
use serde::{Deserialize, Serialize};

/// The four numbers shown above the charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    /// Number of samples.
    pub total_samples: usize,
    /// Number of distinct studies.
    pub n_studies: usize,
    /// Samples reporting an age.
    pub with_age: usize,
    /// Samples reporting a BMI.
    pub with_bmi: usize,
}

impl SummaryMetrics {
    /// Compute metrics, reading age and BMI from the named fields.
    pub fn compute(dataset: &Dataset, age_field: &str, bmi_field: &str) -> Self {
        Self {
            total_samples: dataset.len(),
            n_studies: dataset.study_ids().len(),
            with_age: non_missing_count(dataset, age_field),
            with_bmi: non_missing_count(dataset, bmi_field),
        }
    }
}

impl std::fmt::Display for SummaryMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Summary")?;
        writeln!(f, "  Total samples: {}", self.total_samples)?;
        writeln!(f, "  Studies:       {}", self.n_studies)?;
        writeln!(f, "  With age data: {}", self.with_age)?;
        writeln!(f, "  With BMI data: {}", self.with_bmi)?;
        Ok(())
    }
}
