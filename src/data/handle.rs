//! Explicit, injectable handle to a loaded dataset.

use crate::data::dataset::{Dataset, LoadOptions};
use crate::error::Result;
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Owns the source location of a dataset and a cached copy of it.
///
/// The file is read on first use. Callers hand out `Arc<Dataset>` clones, so
/// a reload never disturbs a computation already holding the old copy.
#[derive(Debug, Clone)]
pub struct DatasetHandle {
    source: PathBuf,
    options: LoadOptions,
    cached: Option<Arc<Dataset>>,
}

impl DatasetHandle {
    /// Create a handle without touching the file.
    pub fn new<P: AsRef<Path>>(source: P, options: LoadOptions) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            options,
            cached: None,
        }
    }

    /// Path the dataset is loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Whether a loaded copy is currently held.
    pub fn is_loaded(&self) -> bool {
        self.cached.is_some()
    }

    /// Get the dataset, loading it if nothing is cached.
    pub fn dataset(&mut self) -> Result<Arc<Dataset>> {
        match &self.cached {
            Some(ds) => Ok(Arc::clone(ds)),
            None => self.reload(),
        }
    }

    /// Re-read the source file now.
    ///
    /// On failure the handle is left empty.
    pub fn reload(&mut self) -> Result<Arc<Dataset>> {
        self.cached = None;
        let ds = Arc::new(Dataset::from_tsv_with_options(&self.source, &self.options)?);
        info!(
            "Loaded {} samples from {} studies ({})",
            ds.len(),
            ds.study_ids().len(),
            self.source.display()
        );
        self.cached = Some(Arc::clone(&ds));
        Ok(ds)
    }

    /// Drop the cached copy; the next `dataset()` call reloads.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
