//! Fetching and parsing of the instruction dataset
//!
//! Downloads a Hugging Face dataset once via its `resolve/main` URL. The
//! dolly-15k-ja export is a single JSON array; some mirrors publish JSONL
//! instead, so parsing accepts both shapes.

use serde::Deserialize;
use thiserror::Error;

/// Default dataset identifier on the Hugging Face hub
pub const DEFAULT_DATASET: &str = "kunishou/databricks-dolly-15k-ja";

const HTTP_TIMEOUT_SECS: u64 = 120;
const USER_AGENT: &str = "finetune-data/0.1";

/// Errors from the dataset fetch stage
///
/// Any of these aborts the run before output files are written.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("dataset request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("dataset '{dataset}' returned HTTP {status}")]
    Status {
        dataset: String,
        status: reqwest::StatusCode,
    },
    #[error("dataset '{0}' contained no records")]
    Empty(String),
}

/// A single instruction record as published by the dataset
///
/// Missing fields deserialize to empty strings, matching the source schema
/// where `input` is optional. Records are read once and never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    /// Instruction text (user request)
    #[serde(default)]
    pub instruction: String,
    /// Optional context for the instruction
    #[serde(default)]
    pub input: String,
    /// Reference response
    #[serde(default)]
    pub output: String,
}

/// Resolve a dataset name to its raw-file download URL
///
/// The export file is named after the last path segment of the dataset id,
/// e.g. `kunishou/databricks-dolly-15k-ja` -> `databricks-dolly-15k-ja.json`.
pub fn dataset_url(dataset: &str) -> String {
    let file = dataset.rsplit('/').next().unwrap_or(dataset);
    format!("https://huggingface.co/datasets/{dataset}/resolve/main/{file}.json")
}

fn http_client() -> Result<reqwest::blocking::Client, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Download all records of a named public dataset
///
/// Fatal if the dataset is unreachable, the server responds with a
/// non-success status, or the body yields no records.
pub fn fetch_records(dataset: &str) -> Result<Vec<RawRecord>, FetchError> {
    let url = dataset_url(dataset);
    let response = http_client()?.get(&url).send()?;

    if !response.status().is_success() {
        return Err(FetchError::Status {
            dataset: dataset.to_string(),
            status: response.status(),
        });
    }

    let body = response.text()?;
    let records = parse_records(&body);
    if records.is_empty() {
        return Err(FetchError::Empty(dataset.to_string()));
    }
    Ok(records)
}

/// Parse a dataset body as a JSON array, falling back to line-delimited JSON
///
/// In the JSONL fallback, blank and unparseable lines are dropped rather than
/// treated as errors; record-level validation happens later in the filter
/// step.
pub fn parse_records(body: &str) -> Vec<RawRecord> {
    if let Ok(records) = serde_json::from_str::<Vec<RawRecord>>(body) {
        return records;
    }

    body.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str::<RawRecord>(line).ok())
        .collect()
}
