//! Display labels for studies.
//!
//! A lookup table supplied from outside (for example the disease each study
//! investigated). It only affects how studies are shown, never how they are
//! counted.

use crate::error::{HoloError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// study_id -> human-readable label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyLabels {
    labels: HashMap<String, String>,
}

impl StudyLabels {
    /// Empty table; every study is shown by its identifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a two-column TSV with a header (`study_id`, `label`).
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse from any reader producing a two-column TSV with a header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let header = rdr.headers()?;
        if header.len() != 2 {
            return Err(HoloError::InvalidParameter(format!(
                "Study label table must have 2 columns, found {}",
                header.len()
            )));
        }

        let mut labels = HashMap::new();
        for record in rdr.records() {
            let record = record?;
            labels.insert(record[0].to_string(), record[1].to_string());
        }
        Ok(Self { labels })
    }

    /// Add or replace a label.
    pub fn insert(&mut self, study_id: &str, label: &str) {
        self.labels.insert(study_id.to_string(), label.to_string());
    }

    /// Label for a study, if one is defined.
    pub fn get(&self, study_id: &str) -> Option<&str> {
        self.labels.get(study_id).map(String::as_str)
    }

    /// Label for a study, falling back to the identifier itself.
    pub fn label_for<'a>(&'a self, study_id: &'a str) -> &'a str {
        self.get(study_id).unwrap_or(study_id)
    }

    /// Number of labelled studies.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when no labels are defined.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl FromIterator<(String, String)> for StudyLabels {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reader() {
        let data = "study_id\tlabel\nPRJNA1\tIBD\nPRJNA2\tColorectal cancer\n";
        let labels = StudyLabels::from_reader(data.as_bytes()).unwrap();

        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get("PRJNA2"), Some("Colorectal cancer"));
    }

    #[test]
    fn test_label_fallback() {
        let mut labels = StudyLabels::new();
        labels.insert("PRJNA1", "IBD");

        assert_eq!(labels.label_for("PRJNA1"), "IBD");
        assert_eq!(labels.label_for("PRJNA9"), "PRJNA9");
    }

    #[test]
    fn test_wrong_width_rejected() {
        let data = "study_id\tlabel\tnotes\nPRJNA1\tIBD\tx\n";
        let result = StudyLabels::from_reader(data.as_bytes());
        assert!(matches!(result, Err(HoloError::InvalidParameter(_))));
    }

    #[test]
    fn test_from_iter() {
        let labels: StudyLabels = vec![("S1".to_string(), "T2D".to_string())]
            .into_iter()
            .collect();
        assert_eq!(labels.label_for("S1"), "T2D");
    }
}
