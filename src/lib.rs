//! Microbiome Sample Metadata Core
//!
//! This library loads a harmonized table of microbiome study samples and
//! computes the plain tabular results a dashboard is drawn from: filtered
//! views, per-study sample counts and per-study field completeness.
//!
//! # Overview
//!
//! - **data**: The sample table (Dataset, SampleRecord, Value) and a reloadable handle
//! - **filter**: Categorical equality filtering with an "All" sentinel
//! - **aggregate**: Group-by counts, completeness tables and headline metrics
//! - **overview**: One recomputation pass bundling all of the above
//! - **labels**: External study_id -> display label table
//! - **config**: YAML dashboard configuration
//!
//! # Example
//!
//! ```no_run
//! use holobiome::prelude::*;
//!
//! let dataset = Dataset::from_tsv("harmonized_metadata.tsv").unwrap();
//!
//! let ibd = filter(&dataset, &[Predicate::equals("disease_status", "IBD")]);
//! let counts = count_by_study(&ibd);
//!
//! // Completeness always covers every study in the full table
//! let table = completeness_by_study(&dataset, &["host_age", "bmi"]);
//! println!("{:?} {:?}", counts, table.get("PRJNA1", "bmi"));
//! ```

pub mod aggregate;
pub mod config;
pub mod data;
pub mod error;
pub mod filter;
pub mod labels;
pub mod overview;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::aggregate::{
        completeness_by_study, count_by_field, count_by_study, non_missing_count, sorted_counts,
        CompletenessTable, SummaryMetrics, DEFAULT_TRACKED_FIELDS,
    };
    pub use crate::config::DashboardConfig;
    pub use crate::data::{
        Dataset, DatasetHandle, LoadOptions, SampleRecord, Schema, Value, ValueType, STUDY_ID,
    };
    pub use crate::error::{HoloError, Result};
    pub use crate::filter::{filter, filter_options, Predicate, Selection};
    pub use crate::labels::StudyLabels;
    pub use crate::overview::{
        dashboard_predicates, study_counts, CategoryCount, Overview, StudyCount,
    };
}
