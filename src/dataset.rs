//! Upload and filter flows over one explicitly chosen dataset file.

use crate::filter::{self, FilterOutcome, FilterSpec};
use crate::ingest::{self, IngestError, IngestObserver, IngestOptions, IngestStats, SortedDistinct};
use crate::schema::{self, ValidateError};
use crate::user_agent::UaClassifier;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const UPLOAD_OK_MESSAGE: &str = "File uploaded successfully";

/// Path of the dataset a caller wants to work on. Selecting it (e.g. the
/// latest upload) is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetHandle {
    path: PathBuf,
}

impl DatasetHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Invalid file format: {0}")]
    Schema(#[from] schema::SchemaError),
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl From<ValidateError> for DatasetError {
    fn from(e: ValidateError) -> Self {
        match e {
            ValidateError::Schema(s) => DatasetError::Schema(s),
            ValidateError::Read(i) => DatasetError::Ingest(i),
        }
    }
}

/// What a caller needs to populate filter controls after an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    #[serde(flatten)]
    pub values: SortedDistinct,
    pub headers: Vec<String>,
    pub stats: IngestStats,
    pub message: String,
}

pub fn upload(
    handle: &DatasetHandle,
    classifier: &dyn UaClassifier,
    options: &IngestOptions,
    observer: &mut dyn IngestObserver,
) -> Result<UploadSummary, DatasetError> {
    schema::validate_file(handle.path(), options)?;
    let ingestion = ingest::ingest_file(handle.path(), classifier, options, observer)?;
    Ok(UploadSummary {
        values: ingestion.distinct.sorted(),
        headers: ingestion.headers,
        stats: ingestion.stats,
        message: UPLOAD_OK_MESSAGE.to_string(),
    })
}

/// Re-reads the dataset from scratch and applies `spec`.
pub fn filter(
    handle: &DatasetHandle,
    spec: &FilterSpec,
    classifier: &dyn UaClassifier,
    options: &IngestOptions,
    observer: &mut dyn IngestObserver,
) -> Result<FilterOutcome, DatasetError> {
    tracing::debug!(path = %handle.path().display(), constraints = spec.constraints().count(), "filtering dataset");
    let ingestion = ingest::ingest_file(handle.path(), classifier, options, observer)?;
    Ok(filter::apply(ingestion.records, spec))
}
