use crate::record::NormalizedRecord;
use crate::schema::normalize_column;
use crate::url_reduce::{domain_of, path_prefix_of};
use crate::user_agent::{classify, UaClassifier};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use thiserror::Error;

pub const USER_AGENT: &str = "user_agent";
pub const DOMAIN: &str = "domain";
pub const PAGE_URL: &str = "page_url";
pub const REFERRAL_URL: &str = "referral_url";
pub const BROWSER: &str = "browser";
pub const OS: &str = "os";
pub const DEVICE: &str = "device";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    pub delimiter: u8,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl IngestOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Distinct values seen for each filterable dimension during one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistinctValues {
    pub domains: BTreeSet<String>,
    pub pages: BTreeSet<String>,
    pub browsers: BTreeSet<String>,
    pub os: BTreeSet<String>,
    pub devices: BTreeSet<String>,
    pub referrals: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SortedDistinct {
    pub domains: Vec<String>,
    pub pages: Vec<String>,
    pub browsers: Vec<String>,
    pub os: Vec<String>,
    pub devices: Vec<String>,
    pub referrals: Vec<String>,
}

impl DistinctValues {
    pub fn sorted(&self) -> SortedDistinct {
        fn to_vec(set: &BTreeSet<String>) -> Vec<String> {
            set.iter().cloned().collect()
        }
        SortedDistinct {
            domains: to_vec(&self.domains),
            pages: to_vec(&self.pages),
            browsers: to_vec(&self.browsers),
            os: to_vec(&self.os),
            devices: to_vec(&self.devices),
            referrals: to_vec(&self.referrals),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_skipped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ingestion {
    pub headers: Vec<String>,
    pub records: Vec<NormalizedRecord>,
    pub distinct: DistinctValues,
    pub stats: IngestStats,
}

/// Receives diagnostics while a file is ingested.
pub trait IngestObserver {
    fn on_headers(&mut self, _headers: &[String]) {}
    /// `line` is 1-based and counts the header line.
    fn on_row_skipped(&mut self, _line: u64, _expected: usize, _found: usize) {}
    fn on_complete(&mut self, _stats: &IngestStats) {}
}

#[derive(Debug, Default)]
pub struct NoopObserver;

impl IngestObserver for NoopObserver {}

/// Emits ingestion diagnostics as `tracing` events.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IngestObserver for TracingObserver {
    fn on_headers(&mut self, headers: &[String]) {
        tracing::debug!(?headers, count = headers.len(), "headers read");
    }

    fn on_row_skipped(&mut self, line: u64, expected: usize, found: usize) {
        tracing::debug!(line, expected, found, "row skipped: field count mismatch");
    }

    fn on_complete(&mut self, stats: &IngestStats) {
        tracing::info!(
            rows_read = stats.rows_read,
            rows_kept = stats.rows_kept,
            rows_skipped = stats.rows_skipped,
            "ingestion complete"
        );
    }
}

/// Windows-1252 decode: one character per byte, so this never fails. Differs
/// from ISO-8859-1 only in 0x80..=0x9F, which map to printable characters
/// (`0x80` -> `€`) rather than C1 controls.
pub fn decode_windows_1252(bytes: &[u8]) -> String {
    let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}

fn csv_reader<R: Read>(options: &IngestOptions, input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(input)
}

/// Splits off the first line; `\n`, `\r\n` and a bare `\r` all end it.
fn split_first_line(text: &str) -> (&str, &str) {
    let Some(i) = text.find(['\n', '\r']) else {
        return (text, "");
    };
    let rest = &text[i + 1..];
    let rest = if text[i..].starts_with("\r\n") { &rest[1..] } else { rest };
    (&text[..i], rest)
}

/// Tokenizes the header line into normalized column names.
/// Embedded NULs are dropped before tokenizing.
fn parse_header_line(line: &str, options: &IngestOptions) -> Result<Vec<String>, IngestError> {
    let (line, _) = split_first_line(line);
    let cleaned: String = line.chars().filter(|c| *c != '\0').collect();
    let mut rdr = csv_reader(options, cleaned.trim().as_bytes());
    let mut record = csv::StringRecord::new();
    if !rdr.read_record(&mut record)? {
        return Ok(Vec::new());
    }
    Ok(record.iter().map(normalize_column).collect())
}

/// Reads and normalizes just the header line of `input`.
pub fn read_headers<R: Read>(input: R, options: &IngestOptions) -> Result<Vec<String>, IngestError> {
    let mut buf = Vec::new();
    BufReader::new(input).read_until(b'\n', &mut buf)?;
    parse_header_line(&decode_windows_1252(&buf), options)
}

pub fn ingest_file(
    path: &Path,
    classifier: &dyn UaClassifier,
    options: &IngestOptions,
    observer: &mut dyn IngestObserver,
) -> Result<Ingestion, IngestError> {
    let file = File::open(path)?;
    ingest_reader(file, classifier, options, observer)
}

pub fn ingest_reader<R: Read>(
    mut input: R,
    classifier: &dyn UaClassifier,
    options: &IngestOptions,
    observer: &mut dyn IngestObserver,
) -> Result<Ingestion, IngestError> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    ingest_str(&decode_windows_1252(&bytes), classifier, options, observer)
}

pub fn ingest_str(
    content: &str,
    classifier: &dyn UaClassifier,
    options: &IngestOptions,
    observer: &mut dyn IngestObserver,
) -> Result<Ingestion, IngestError> {
    let (first, body) = split_first_line(content);
    let headers = parse_header_line(first, options)?;
    observer.on_headers(&headers);

    let mut out = Ingestion { headers, ..Default::default() };
    let mut rdr = csv_reader(options, body.as_bytes());
    let mut row = csv::StringRecord::new();
    while rdr.read_record(&mut row)? {
        out.stats.rows_read += 1;
        if row.len() != out.headers.len() {
            out.stats.rows_skipped += 1;
            let line = row.position().map(|p| p.line() + 1).unwrap_or(0);
            observer.on_row_skipped(line, out.headers.len(), row.len());
            continue;
        }
        let fields: Vec<&str> = row.iter().collect();
        let record = normalize_row(&out.headers, &fields, classifier, &mut out.distinct);
        out.records.push(record);
        out.stats.rows_kept += 1;
    }

    observer.on_complete(&out.stats);
    Ok(out)
}

fn non_blank(record: &NormalizedRecord, key: &str) -> Option<String> {
    record
        .get(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Builds one record and feeds the distinct-value sets.
fn normalize_row(
    headers: &[String],
    fields: &[&str],
    classifier: &dyn UaClassifier,
    distinct: &mut DistinctValues,
) -> NormalizedRecord {
    let mut record = NormalizedRecord::from_row(headers, fields);

    if let Some(ua) = record.get(USER_AGENT).map(str::to_string) {
        let info = classify(classifier, &ua);
        let device = info.device.as_str();
        distinct.browsers.insert(info.browser.clone());
        distinct.os.insert(info.os.clone());
        distinct.devices.insert(device.to_string());
        record.insert(BROWSER, info.browser);
        record.insert(OS, info.os);
        record.insert(DEVICE, device);
    }

    if let Some(domain) = non_blank(&record, DOMAIN) {
        distinct.domains.insert(domain);
    }

    if let Some(page) = non_blank(&record, PAGE_URL) {
        let reduced = path_prefix_of(&page);
        distinct.pages.insert(reduced.clone());
        record.insert(PAGE_URL, reduced);
    }

    if let Some(referral) = non_blank(&record, REFERRAL_URL) {
        let reduced = domain_of(&referral);
        distinct.referrals.insert(reduced.clone());
        record.insert(REFERRAL_URL, reduced);
    }

    record
}
