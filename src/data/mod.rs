//! Data structures for sample metadata.

mod dataset;
mod handle;
mod value;

pub use dataset::{Dataset, LoadOptions, SampleRecord, Schema, STUDY_ID};
pub use handle::DatasetHandle;
pub use value::{Value, ValueType, ABSENT_TOKEN};
