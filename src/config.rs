//! Dashboard configuration.
//!
//! A YAML document naming the data file, how missing values are encoded and
//! which fields feed the metrics and the completeness table.

use crate::aggregate::DEFAULT_TRACKED_FIELDS;
use crate::data::{LoadOptions, STUDY_ID};
use crate::error::{HoloError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_data() -> PathBuf {
    PathBuf::from("harmonized_metadata.tsv")
}

fn default_missing_tokens() -> Vec<String> {
    LoadOptions::default().missing_tokens
}

fn default_tracked_fields() -> Vec<String> {
    DEFAULT_TRACKED_FIELDS.iter().map(|s| s.to_string()).collect()
}

fn default_age_field() -> String {
    "host_age".to_string()
}

fn default_bmi_field() -> String {
    "bmi".to_string()
}

fn default_disease_field() -> String {
    "disease_status".to_string()
}

fn default_study_filter_field() -> String {
    STUDY_ID.to_string()
}

fn default_preview_rows() -> usize {
    100
}

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Path to the metadata TSV.
    #[serde(default = "default_data")]
    pub data: PathBuf,

    /// Optional study_id -> label TSV for display.
    #[serde(default)]
    pub study_labels: Option<PathBuf>,

    /// Cell values treated as missing, besides empty cells.
    #[serde(default = "default_missing_tokens")]
    pub missing_tokens: Vec<String>,

    /// Fields shown in the completeness table, in column order.
    #[serde(default = "default_tracked_fields")]
    pub tracked_fields: Vec<String>,

    #[serde(default = "default_age_field")]
    pub age_field: String,

    #[serde(default = "default_bmi_field")]
    pub bmi_field: String,

    /// Field behind the disease filter and distribution.
    #[serde(default = "default_disease_field")]
    pub disease_field: String,

    /// Field behind the study filter.
    #[serde(default = "default_study_filter_field")]
    pub study_filter_field: String,

    /// Rows included in the raw data preview.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data: default_data(),
            study_labels: None,
            missing_tokens: default_missing_tokens(),
            tracked_fields: default_tracked_fields(),
            age_field: default_age_field(),
            bmi_field: default_bmi_field(),
            disease_field: default_disease_field(),
            study_filter_field: default_study_filter_field(),
            preview_rows: default_preview_rows(),
        }
    }
}

impl DashboardConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(HoloError::from)
    }

    /// Loader options derived from this configuration.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            missing_tokens: self.missing_tokens.clone(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.missing_tokens.iter().any(|t| t.trim().is_empty()) {
            return Err(HoloError::InvalidParameter(
                "missing_tokens must not contain blank entries".to_string(),
            ));
        }
        Ok(())
    }
}
