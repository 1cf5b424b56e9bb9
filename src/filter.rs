use crate::ingest::{PAGE_URL, REFERRAL_URL};
use crate::record::NormalizedRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value meaning "no constraint on this key".
pub const ALL: &str = "All";

pub const NO_RECORDS_MESSAGE: &str = "No records found";

/// Equality constraints, one expected value per key. Keys are either one of
/// `domain`, `page`, `referral`, `browser`, `os`, `device` or a raw column name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSpec(BTreeMap<String, String>);

impl FilterSpec {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries that actually restrict the result.
    pub fn constraints(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(_, v)| !v.is_empty() && v.as_str() != ALL)
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Record field a filter key reads.
pub fn field_for_key(key: &str) -> &str {
    match key {
        "page" => PAGE_URL,
        "referral" => REFERRAL_URL,
        other => other,
    }
}

fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}

pub fn record_matches(record: &NormalizedRecord, spec: &FilterSpec) -> bool {
    spec.constraints()
        .all(|(key, expected)| fold(record.get_or_empty(field_for_key(key))) == fold(expected))
}

pub fn filter_records<'a>(records: &'a [NormalizedRecord], spec: &FilterSpec) -> Vec<&'a NormalizedRecord> {
    records.iter().filter(|r| record_matches(r, spec)).collect()
}

/// Result of a filter call. An empty match set is its own state, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    Matches(Vec<NormalizedRecord>),
    NoRecords,
}

impl FilterOutcome {
    pub fn from_records(records: Vec<NormalizedRecord>) -> Self {
        if records.is_empty() {
            FilterOutcome::NoRecords
        } else {
            FilterOutcome::Matches(records)
        }
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        match self {
            FilterOutcome::Matches(records) => records,
            FilterOutcome::NoRecords => &[],
        }
    }
}

impl Serialize for FilterOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FilterOutcome::Matches(records) => records.serialize(serializer),
            FilterOutcome::NoRecords => {
                serde_json::json!({ "message": NO_RECORDS_MESSAGE }).serialize(serializer)
            }
        }
    }
}

/// Applies `spec` to `records`, keeping input order.
pub fn apply(records: Vec<NormalizedRecord>, spec: &FilterSpec) -> FilterOutcome {
    let matched: Vec<NormalizedRecord> = records.into_iter().filter(|r| record_matches(r, spec)).collect();
    FilterOutcome::from_records(matched)
}
