use crate::ingest::{self, IngestError, IngestOptions};
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

/// Columns every uploaded file must carry (after normalization).
pub const MANDATORY_COLUMNS: [&str; 4] = ["user_agent", "domain", "page_url", "referral_url"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Missing mandatory columns: {}", join_columns(.0))]
    MissingColumns(Vec<String>),
}

fn join_columns(cols: &[String]) -> String {
    cols.iter().join(", ")
}

impl SchemaError {
    pub fn missing(&self) -> &[String] {
        match self {
            SchemaError::MissingColumns(cols) => cols,
        }
    }
}

#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// The header could not be read at all; distinct from a schema mismatch.
    #[error(transparent)]
    Read(#[from] IngestError),
}

/// `" Page URL "` -> `"page_url"`.
pub fn normalize_column(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Mandatory columns absent from `headers`, in declaration order.
/// Headers may be raw or already normalized.
pub fn missing_columns<S: AsRef<str>>(headers: &[S]) -> Vec<String> {
    let present: BTreeSet<String> = headers.iter().map(|h| normalize_column(h.as_ref())).collect();
    MANDATORY_COLUMNS
        .iter()
        .filter(|col| !present.contains(**col))
        .map(|col| col.to_string())
        .collect()
}

pub fn validate_headers<S: AsRef<str>>(headers: &[S]) -> Result<(), SchemaError> {
    let missing = missing_columns(headers);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns(missing))
    }
}

/// Reads only the header row of `path` and checks it against [`MANDATORY_COLUMNS`].
pub fn validate_file(path: &Path, options: &IngestOptions) -> Result<(), ValidateError> {
    let file = File::open(path).map_err(IngestError::from)?;
    let headers = ingest::read_headers(file, options)?;
    validate_headers(&headers)?;
    Ok(())
}
