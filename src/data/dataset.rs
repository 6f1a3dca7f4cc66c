//! Sample metadata table: loading, access and TSV output.

use crate::data::value::{Value, ValueType};
use crate::error::{HoloError, Result};
use log::debug;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

/// Name of the required study identifier column.
pub const STUDY_ID: &str = "study_id";

/// Options controlling how raw cells are read.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// Tokens normalised to the absent marker, in addition to empty cells.
    pub missing_tokens: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            missing_tokens: vec!["NA".to_string()],
        }
    }
}

impl LoadOptions {
    /// Empty cells, configured tokens and NaN spellings (`NaN`, `nan`, ...)
    /// all read as absent.
    fn is_missing(&self, raw: &str) -> bool {
        raw.is_empty()
            || self.missing_tokens.iter().any(|t| t == raw)
            || raw.parse::<f64>().map_or(false, |v| v.is_nan())
    }

    /// Token written for absent cells: the first missing token, or an empty
    /// cell when none is configured. Either reads back as absent.
    pub fn absent_token(&self) -> &str {
        self.missing_tokens.first().map(String::as_str).unwrap_or("")
    }
}

/// Column layout shared by a dataset and every view derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<String>,
    types: Vec<ValueType>,
    index: HashMap<String, usize>,
    study_col: usize,
}

impl Schema {
    /// Build a schema from column names and their types.
    ///
    /// Fails if `study_id` is missing or a column name is repeated.
    pub fn new(columns: Vec<String>, types: Vec<ValueType>) -> Result<Self> {
        if columns.len() != types.len() {
            return Err(HoloError::InvalidParameter(format!(
                "{} columns but {} column types",
                columns.len(),
                types.len()
            )));
        }
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(HoloError::InvalidParameter(format!(
                    "Duplicate column '{}' in header",
                    name
                )));
            }
        }
        let study_col = *index
            .get(STUDY_ID)
            .ok_or_else(|| HoloError::MissingColumn(STUDY_ID.to_string()))?;

        Ok(Self {
            columns,
            types,
            index,
            study_col,
        })
    }

    /// Column names in file order.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Position of a column, if present.
    pub fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    /// Check if a column exists.
    pub fn has_column(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    /// Get the type of a column.
    pub fn column_type(&self, column: &str) -> Option<ValueType> {
        self.position(column).map(|i| self.types[i])
    }
}

/// One row of the metadata table.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    study_id: String,
    values: Vec<Value>,
}

impl SampleRecord {
    /// Study this sample belongs to.
    pub fn study_id(&self) -> &str {
        &self.study_id
    }

    /// All cells, aligned with the schema columns.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Cell at a column position.
    pub fn value_at(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }
}

/// An ordered, read-only collection of sample records sharing one schema.
///
/// Views derived by filtering share the schema and the records with the
/// dataset they came from; nothing is ever mutated in place.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Arc<Schema>,
    records: Vec<Arc<SampleRecord>>,
}

impl Dataset {
    /// Load a dataset from a TSV file, treating empty cells and `NA` as absent.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_tsv_with_options(path, &LoadOptions::default())
    }

    /// Load a dataset from a TSV file with explicit options.
    pub fn from_tsv_with_options<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let dataset = Self::from_reader(file, options)?;
        debug!(
            "Loaded {} samples x {} columns from {}",
            dataset.len(),
            dataset.schema.n_columns(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parse a dataset from any reader producing tab-separated text.
    ///
    /// Expected format:
    /// - First row: header with column names, one of which is `study_id`
    /// - Subsequent rows: one sample each, same number of fields as the header
    ///
    /// Columns are inferred as numeric if every present value parses as a
    /// number, otherwise text. `study_id` is always text.
    pub fn from_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let header = rdr.headers()?.clone();
        if header.is_empty() || (header.len() == 1 && header[0].is_empty()) {
            return Err(HoloError::EmptyData("Metadata file has no header".to_string()));
        }
        let columns: Vec<String> = header.iter().map(|s| s.to_string()).collect();

        // First pass: raw cells with the absent marker already applied
        let mut raw_rows: Vec<Vec<Option<String>>> = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let row = record
                .iter()
                .map(|cell| {
                    if options.is_missing(cell) {
                        None
                    } else {
                        Some(cell.to_string())
                    }
                })
                .collect();
            raw_rows.push(row);
        }

        let types: Vec<ValueType> = columns
            .iter()
            .enumerate()
            .map(|(col_idx, name)| {
                if name == STUDY_ID {
                    return ValueType::Text;
                }
                let all_numeric = raw_rows.iter().all(|row| match &row[col_idx] {
                    Some(raw) => raw.parse::<f64>().is_ok(),
                    None => true,
                });
                if all_numeric {
                    ValueType::Numeric
                } else {
                    ValueType::Text
                }
            })
            .collect();

        let schema = Schema::new(columns, types)?;
        let study_col = schema.study_col;

        let mut records = Vec::with_capacity(raw_rows.len());
        for (row_idx, row) in raw_rows.into_iter().enumerate() {
            let study_id = row[study_col]
                .clone()
                .ok_or(HoloError::MissingStudyId { row: row_idx + 1 })?;
            let values = row
                .into_iter()
                .zip(&schema.types)
                .map(|(cell, &value_type)| match cell {
                    Some(raw) => Value::parse(&raw, value_type),
                    None => Value::Absent,
                })
                .collect();
            records.push(Arc::new(SampleRecord { study_id, values }));
        }

        Ok(Self {
            schema: Arc::new(schema),
            records,
        })
    }

    /// Build a dataset from a schema and rows of cells.
    ///
    /// Each row must match the schema width and carry a present `study_id`.
    pub fn from_rows(schema: Schema, rows: Vec<Vec<Value>>) -> Result<Self> {
        let study_col = schema.study_col;
        let mut records = Vec::with_capacity(rows.len());
        for (row_idx, values) in rows.into_iter().enumerate() {
            if values.len() != schema.n_columns() {
                return Err(HoloError::InvalidParameter(format!(
                    "Row {} has {} values, expected {}",
                    row_idx + 1,
                    values.len(),
                    schema.n_columns()
                )));
            }
            let study_id = match &values[study_col] {
                v if v.is_absent() => return Err(HoloError::MissingStudyId { row: row_idx + 1 }),
                v => v.to_string(),
            };
            records.push(Arc::new(SampleRecord { study_id, values }));
        }
        Ok(Self {
            schema: Arc::new(schema),
            records,
        })
    }

    /// Derive a view keeping only records that satisfy `keep`, in order.
    pub(crate) fn retain<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&SampleRecord) -> bool,
    {
        Self {
            schema: Arc::clone(&self.schema),
            records: self
                .records
                .iter()
                .filter(|r| {
                    let record: &SampleRecord = r;
                    keep(record)
                })
                .cloned()
                .collect(),
        }
    }

    /// Column layout.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the dataset holds no samples.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records in order.
    pub fn records(&self) -> impl Iterator<Item = &SampleRecord> {
        self.records.iter().map(|r| r.as_ref())
    }

    /// Get a value by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let pos = self.schema.position(column)?;
        self.records.get(row).and_then(|r| r.value_at(pos))
    }

    /// All values of a column, or `None` if the column is not in the schema.
    pub fn column(&self, column: &str) -> Option<Vec<&Value>> {
        let pos = self.schema.position(column)?;
        Some(self.records.iter().map(|r| &r.values[pos]).collect())
    }

    /// Distinct study identifiers in order of first appearance.
    pub fn study_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.study_id.as_str()))
            .map(|r| r.study_id.clone())
            .collect()
    }

    /// First `n` records as a new view.
    pub fn head(&self, n: usize) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            records: self.records.iter().take(n).cloned().collect(),
        }
    }

    /// Write the dataset as TSV. Absent cells are written as `NA`.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_tsv_with_options(path, &LoadOptions::default())
    }

    /// Write the dataset as TSV so that loading it back with the same
    /// options yields the same absent cells.
    pub fn to_tsv_with_options<P: AsRef<Path>>(&self, path: P, options: &LoadOptions) -> Result<()> {
        let file = File::create(path)?;
        self.write_tsv_with_options(file, options)
    }

    /// Write the dataset as TSV to any writer, absent cells as `NA`.
    pub fn write_tsv<W: Write>(&self, writer: W) -> Result<()> {
        self.write_tsv_with_options(writer, &LoadOptions::default())
    }

    /// Write the dataset as TSV to any writer, absent cells as
    /// `options.absent_token()`.
    pub fn write_tsv_with_options<W: Write>(&self, writer: W, options: &LoadOptions) -> Result<()> {
        let absent = options.absent_token();
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(writer);
        wtr.write_record(self.schema.column_names())?;
        for record in &self.records {
            wtr.write_record(record.values.iter().map(|v| {
                if v.is_absent() {
                    absent.to_string()
                } else {
                    v.to_string()
                }
            }))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_tsv() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "sample_id\tstudy_id\tdisease_status\thost_age\tbmi").unwrap();
        writeln!(file, "A1\tS1\tIBD\t30\t22.5").unwrap();
        writeln!(file, "A2\tS1\tHealthy\tNA\t").unwrap();
        writeln!(file, "A3\tS2\t\t25\t31.0").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_dataset() {
        let file = create_test_tsv();
        let ds = Dataset::from_tsv(file.path()).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.schema().column_names(),
            &["sample_id", "study_id", "disease_status", "host_age", "bmi"]
        );
        let studies: Vec<&str> = ds.records().map(|r| r.study_id()).collect();
        assert_eq!(studies, vec!["S1", "S1", "S2"]);
    }

    #[test]
    fn test_missing_values_normalised() {
        let file = create_test_tsv();
        let ds = Dataset::from_tsv(file.path()).unwrap();

        assert!(ds.get(1, "host_age").unwrap().is_absent());
        assert!(ds.get(1, "bmi").unwrap().is_absent());
        assert!(ds.get(2, "disease_status").unwrap().is_absent());
        assert_eq!(ds.get(0, "host_age").unwrap().as_number(), Some(30.0));
    }

    #[test]
    fn test_column_type_inference() {
        let file = create_test_tsv();
        let ds = Dataset::from_tsv(file.path()).unwrap();

        assert_eq!(ds.schema().column_type("disease_status"), Some(ValueType::Text));
        assert_eq!(ds.schema().column_type("host_age"), Some(ValueType::Numeric));
        assert_eq!(ds.schema().column_type("smoking"), None);
    }

    #[test]
    fn test_numeric_study_ids_stay_text() {
        let data = "study_id\thost_age\n1\t30\n2\t40\n";
        let ds = Dataset::from_reader(data.as_bytes(), &LoadOptions::default()).unwrap();

        assert_eq!(ds.schema().column_type(STUDY_ID), Some(ValueType::Text));
        assert_eq!(ds.study_ids(), vec!["1", "2"]);
    }

    #[test]
    fn test_custom_missing_tokens() {
        let data = "study_id\thost_sex\nS1\tunknown\nS1\tfemale\n";
        let options = LoadOptions {
            missing_tokens: vec!["NA".to_string(), "unknown".to_string()],
        };
        let ds = Dataset::from_reader(data.as_bytes(), &options).unwrap();

        assert!(ds.get(0, "host_sex").unwrap().is_absent());
        assert_eq!(ds.get(1, "host_sex").unwrap().as_text(), Some("female"));
    }

    #[test]
    fn test_cells_trimmed() {
        let data = "study_id\thost_age\thost_sex\n S1 \t NA \t  \nS1\t 42\t male \n";
        let ds = Dataset::from_reader(data.as_bytes(), &LoadOptions::default()).unwrap();

        assert_eq!(ds.study_ids(), vec!["S1"]);
        assert!(ds.get(0, "host_age").unwrap().is_absent());
        assert!(ds.get(0, "host_sex").unwrap().is_absent());
        assert_eq!(ds.get(1, "host_age").unwrap().as_number(), Some(42.0));
        assert_eq!(ds.get(1, "host_sex").unwrap().as_text(), Some("male"));
    }

    #[test]
    fn test_missing_token_case_sensitive() {
        let data = "study_id\tsmoking\nS1\tna\nS1\tNa\nS1\tNA\n";
        let ds = Dataset::from_reader(data.as_bytes(), &LoadOptions::default()).unwrap();

        assert_eq!(ds.get(0, "smoking").unwrap().as_text(), Some("na"));
        assert_eq!(ds.get(1, "smoking").unwrap().as_text(), Some("Na"));
        assert!(ds.get(2, "smoking").unwrap().is_absent());
    }

    #[test]
    fn test_nan_cells_are_absent() {
        let data = "study_id\thost_age\tdisease_status\nS1\t30\tIBD\nS1\tNaN\tnan\n";
        let ds = Dataset::from_reader(data.as_bytes(), &LoadOptions::default()).unwrap();

        assert_eq!(ds.schema().column_type("host_age"), Some(ValueType::Numeric));
        assert_eq!(ds.get(1, "host_age"), Some(&Value::Absent));
        assert_eq!(ds.get(1, "disease_status"), Some(&Value::Absent));
        assert_eq!(ds.column("host_age").unwrap().iter().filter(|v| !v.is_absent()).count(), 1);
    }

    #[test]
    fn test_infinite_numbers_are_absent() {
        let data = "study_id\tbmi\nS1\t22.5\nS1\tinf\n";
        let ds = Dataset::from_reader(data.as_bytes(), &LoadOptions::default()).unwrap();

        assert_eq!(ds.schema().column_type("bmi"), Some(ValueType::Numeric));
        assert!(ds.get(1, "bmi").unwrap().is_absent());
    }

    #[test]
    fn test_missing_file_fails() {
        let result = Dataset::from_tsv("/nonexistent/harmonized_metadata.tsv");
        assert!(matches!(result, Err(HoloError::Io(_))));
    }

    #[test]
    fn test_missing_study_column_fails() {
        let data = "sample_id\thost_age\nA1\t30\n";
        let result = Dataset::from_reader(data.as_bytes(), &LoadOptions::default());
        assert!(matches!(result, Err(HoloError::MissingColumn(c)) if c == "study_id"));
    }

    #[test]
    fn test_ragged_row_fails() {
        let data = "study_id\thost_age\nS1\t30\nS2\t25\textra\n";
        let result = Dataset::from_reader(data.as_bytes(), &LoadOptions::default());
        assert!(matches!(result, Err(HoloError::Csv(_))));
    }

    #[test]
    fn test_absent_study_id_fails() {
        let data = "study_id\thost_age\nS1\t30\nNA\t25\n";
        let result = Dataset::from_reader(data.as_bytes(), &LoadOptions::default());
        assert!(matches!(result, Err(HoloError::MissingStudyId { row: 2 })));
    }

    #[test]
    fn test_empty_input_fails() {
        let result = Dataset::from_reader("".as_bytes(), &LoadOptions::default());
        assert!(matches!(result, Err(HoloError::EmptyData(_))));
    }

    #[test]
    fn test_header_only_is_empty_dataset() {
        let data = "study_id\thost_age\n";
        let ds = Dataset::from_reader(data.as_bytes(), &LoadOptions::default()).unwrap();
        assert!(ds.is_empty());
        assert!(ds.study_ids().is_empty());
    }

    #[test]
    fn test_study_ids_first_appearance() {
        let data = "study_id\nS2\nS1\nS2\nS3\n";
        let ds = Dataset::from_reader(data.as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(ds.study_ids(), vec!["S2", "S1", "S3"]);
    }

    #[test]
    fn test_head() {
        let file = create_test_tsv();
        let ds = Dataset::from_tsv(file.path()).unwrap();

        assert_eq!(ds.head(2).len(), 2);
        assert_eq!(ds.head(100).len(), 3);
    }

    #[test]
    fn test_write_tsv() {
        let file = create_test_tsv();
        let ds = Dataset::from_tsv(file.path()).unwrap();

        let mut out = Vec::new();
        ds.write_tsv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "sample_id\tstudy_id\tdisease_status\thost_age\tbmi");
        assert_eq!(lines[2], "A2\tS1\tHealthy\tNA\tNA");
        assert_eq!(lines[3], "A3\tS2\tNA\t25\t31");
    }

    #[test]
    fn test_write_tsv_uses_configured_absent_token() {
        let options = LoadOptions {
            missing_tokens: vec!["unknown".to_string()],
        };
        let data = "study_id\thost_sex\nS1\tunknown\nS1\tfemale\n";
        let ds = Dataset::from_reader(data.as_bytes(), &options).unwrap();

        let mut out = Vec::new();
        ds.write_tsv_with_options(&mut out, &options).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().nth(1), Some("S1\tunknown"));

        let reloaded = Dataset::from_reader(text.as_bytes(), &options).unwrap();
        assert!(reloaded.get(0, "host_sex").unwrap().is_absent());
        assert_eq!(reloaded.get(1, "host_sex").unwrap().as_text(), Some("female"));
    }

    #[test]
    fn test_write_tsv_without_tokens_writes_empty_cells() {
        let options = LoadOptions {
            missing_tokens: Vec::new(),
        };
        let data = "study_id\thost_age\nS1\t\nS2\t30\n";
        let ds = Dataset::from_reader(data.as_bytes(), &options).unwrap();

        let mut out = Vec::new();
        ds.write_tsv_with_options(&mut out, &options).unwrap();
        let text = String::from_utf8(out).unwrap();
        let reloaded = Dataset::from_reader(text.as_bytes(), &options).unwrap();
        assert!(reloaded.get(0, "host_age").unwrap().is_absent());
        assert_eq!(reloaded.get(1, "host_age").unwrap().as_number(), Some(30.0));
    }

    #[test]
    fn test_from_rows() {
        let schema = Schema::new(
            vec!["study_id".to_string(), "host_age".to_string()],
            vec![ValueType::Text, ValueType::Numeric],
        )
        .unwrap();
        let ds = Dataset::from_rows(
            schema,
            vec![
                vec![Value::Text("S1".into()), Value::Number(30.0)],
                vec![Value::Text("S2".into()), Value::Absent],
            ],
        )
        .unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.study_ids(), vec!["S1", "S2"]);
    }

    #[test]
    fn test_duplicate_header_fails() {
        let data = "study_id\tbmi\tbmi\nS1\t20\t21\n";
        let result = Dataset::from_reader(data.as_bytes(), &LoadOptions::default());
        assert!(matches!(result, Err(HoloError::InvalidParameter(_))));
    }
}
