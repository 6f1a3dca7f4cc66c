//! Per-study completeness of clinical fields.

use crate::data::Dataset;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Fields tracked by the completeness heatmap unless configured otherwise.
pub const DEFAULT_TRACKED_FIELDS: [&str; 5] =
    ["host_age", "host_sex", "bmi", "disease_status", "timepoint"];

/// Rectangular study x field table of completeness percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletenessTable {
    /// Studies in order of first appearance in the dataset.
    studies: Vec<String>,
    /// Fields in the order they were requested.
    fields: Vec<String>,
    /// `percent[i][j]` is the completeness of `fields[j]` within `studies[i]`.
    percent: Vec<Vec<f64>>,
}

impl CompletenessTable {
    /// Row labels.
    pub fn studies(&self) -> &[String] {
        &self.studies
    }

    /// Column labels.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Percentages for one study, aligned with `fields()`.
    pub fn row(&self, study: &str) -> Option<&[f64]> {
        let i = self.studies.iter().position(|s| s == study)?;
        Some(&self.percent[i])
    }

    /// Completeness of one field within one study.
    pub fn get(&self, study: &str, field: &str) -> Option<f64> {
        let j = self.fields.iter().position(|f| f == field)?;
        self.row(study).map(|row| row[j])
    }

    /// Nested map form: study -> field -> percentage.
    pub fn as_map(&self) -> HashMap<String, HashMap<String, f64>> {
        self.studies
            .iter()
            .zip(&self.percent)
            .map(|(study, row)| {
                let by_field = self.fields.iter().cloned().zip(row.iter().copied()).collect();
                (study.clone(), by_field)
            })
            .collect()
    }

    /// Number of studies.
    pub fn n_studies(&self) -> usize {
        self.studies.len()
    }

    /// Write as TSV with a `study_id` column followed by one column per field.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_tsv(BufWriter::new(file))
    }

    /// Write as TSV to any writer.
    pub fn write_tsv<W: Write>(&self, mut writer: W) -> Result<()> {
        write!(writer, "study_id")?;
        for field in &self.fields {
            write!(writer, "\t{}", field)?;
        }
        writeln!(writer)?;

        for (study, row) in self.studies.iter().zip(&self.percent) {
            write!(writer, "{}", study)?;
            for pct in row {
                write!(writer, "\t{:.2}", pct)?;
            }
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Completeness of each requested field within each study.
///
/// Pass the full, unfiltered dataset: the table is meant to cover every
/// study regardless of the active filter. A field absent from the schema
/// reports 0.0 for every study so the table stays rectangular.
pub fn completeness_by_study<S: AsRef<str>>(dataset: &Dataset, fields: &[S]) -> CompletenessTable {
    let studies = dataset.study_ids();
    let study_index: HashMap<&str, usize> = studies
        .iter()
        .enumerate()
        .map(|(i, s)| (s.as_str(), i))
        .collect();
    let positions: Vec<Option<usize>> = fields
        .iter()
        .map(|f| dataset.schema().position(f.as_ref()))
        .collect();

    let mut totals = vec![0usize; studies.len()];
    let mut present = vec![vec![0usize; fields.len()]; studies.len()];

    for record in dataset.records() {
        let i = study_index[record.study_id()];
        totals[i] += 1;
        for (j, pos) in positions.iter().enumerate() {
            let Some(pos) = pos else { continue };
            if record.value_at(*pos).map_or(false, |v| !v.is_absent()) {
                present[i][j] += 1;
            }
        }
    }

    // Every discovered study has at least one row, so totals are non-zero
    let percent = present
        .iter()
        .zip(&totals)
        .map(|(row, &total)| {
            row.iter()
                .map(|&n| n as f64 / total as f64 * 100.0)
                .collect()
        })
        .collect();

    CompletenessTable {
        studies,
        fields: fields.iter().map(|f| f.as_ref().to_string()).collect(),
        percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LoadOptions;
    use approx::assert_relative_eq;

    fn test_dataset() -> Dataset {
        let data = "\
study_id\thost_age\thost_sex\tbmi
S1\t30\tfemale\t22.1
S1\tNA\t\t24.0
S2\t25\tmale\tNA
S1\t41\tNA\tNA
S3\tNA\tNA\tNA
";
        Dataset::from_reader(data.as_bytes(), &LoadOptions::default()).unwrap()
    }

    #[test]
    fn test_completeness_values() {
        let table = completeness_by_study(&test_dataset(), &["host_age", "host_sex", "bmi"]);

        assert_eq!(table.studies(), &["S1", "S2", "S3"]);
        assert_eq!(table.fields(), &["host_age", "host_sex", "bmi"]);
        assert_relative_eq!(table.get("S1", "host_age").unwrap(), 200.0 / 3.0);
        assert_relative_eq!(table.get("S1", "host_sex").unwrap(), 100.0 / 3.0);
        assert_relative_eq!(table.get("S1", "bmi").unwrap(), 200.0 / 3.0);
        assert_relative_eq!(table.get("S2", "host_age").unwrap(), 100.0);
        assert_relative_eq!(table.get("S2", "bmi").unwrap(), 0.0);
        assert_relative_eq!(table.get("S3", "host_sex").unwrap(), 0.0);
    }

    #[test]
    fn test_unknown_field_is_zero() {
        let table = completeness_by_study(&test_dataset(), &["host_age", "smoking"]);

        for study in table.studies() {
            assert_eq!(table.get(study, "smoking"), Some(0.0));
        }
        assert_eq!(table.fields().len(), 2);
    }

    #[test]
    fn test_percentages_in_range() {
        let table =
            completeness_by_study(&test_dataset(), &["host_age", "host_sex", "bmi", "study_id"]);
        for study in table.studies() {
            for &pct in table.row(study).unwrap() {
                assert!((0.0..=100.0).contains(&pct));
            }
        }
        // study_id is always present
        assert_eq!(table.get("S3", "study_id"), Some(100.0));
    }

    #[test]
    fn test_empty_dataset() {
        let ds = Dataset::from_reader("study_id\thost_age\n".as_bytes(), &LoadOptions::default())
            .unwrap();
        let table = completeness_by_study(&ds, &DEFAULT_TRACKED_FIELDS);

        assert_eq!(table.n_studies(), 0);
        assert!(table.as_map().is_empty());
    }

    #[test]
    fn test_no_fields() {
        let fields: [&str; 0] = [];
        let table = completeness_by_study(&test_dataset(), &fields);
        assert_eq!(table.n_studies(), 3);
        assert_eq!(table.row("S1"), Some(&[][..]));
    }

    #[test]
    fn test_as_map() {
        let table = completeness_by_study(&test_dataset(), &["host_age"]);
        let map = table.as_map();

        assert_eq!(map.len(), 3);
        assert_relative_eq!(map["S2"]["host_age"], 100.0);
        assert_relative_eq!(map["S3"]["host_age"], 0.0);
    }

    #[test]
    fn test_write_tsv() {
        let table = completeness_by_study(&test_dataset(), &["host_age", "bmi"]);
        let mut out = Vec::new();
        table.write_tsv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "study_id\thost_age\tbmi");
        assert_eq!(lines[1], "S1\t66.67\t66.67");
        assert_eq!(lines[2], "S2\t100.00\t0.00");
        assert_eq!(lines.len(), 4);
    }
}
