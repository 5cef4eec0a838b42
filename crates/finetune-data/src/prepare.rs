//! Filtering, shuffling, splitting, and persistence of formatted examples

use crate::dataset::{self, RawRecord};
use crate::template::format_chat;
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Fixed shuffle seed so repeated runs produce identical splits
pub const DEFAULT_SEED: u64 = 42;

const TRAIN_FRACTION: f64 = 0.8;
const VALID_FRACTION: f64 = 0.1;

/// A single chat-template string ready for the fine-tuning consumer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedExample {
    /// Rendered chat-template text
    pub text: String,
}

/// Configuration for a preparation run
#[derive(Debug, Clone)]
pub struct PrepareConfig {
    /// Dataset identifier on the Hugging Face hub
    pub dataset: String,
    /// Directory the three JSONL files are written to
    pub data_dir: PathBuf,
    /// Shuffle seed
    pub seed: u64,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            dataset: dataset::DEFAULT_DATASET.to_string(),
            data_dir: PathBuf::from("data"),
            seed: DEFAULT_SEED,
        }
    }
}

/// Counts reported after a successful run
#[derive(Debug, Clone)]
pub struct PrepareSummary {
    /// Records fetched from the dataset
    pub total: usize,
    /// Records that survived the filter
    pub valid: usize,
    /// Records dropped by the filter
    pub skipped: usize,
    /// Examples written to train.jsonl
    pub n_train: usize,
    /// Examples written to valid.jsonl
    pub n_valid: usize,
    /// Examples written to test.jsonl
    pub n_test: usize,
}

/// The three output partitions, in shuffled order
#[derive(Debug, Clone)]
pub struct DatasetSplits {
    pub train: Vec<FormattedExample>,
    pub valid: Vec<FormattedExample>,
    pub test: Vec<FormattedExample>,
}

/// Format raw records, dropping invalid ones
///
/// A record is invalid when `instruction` or `output` trims to empty; the
/// context field may be empty. Returns the formatted examples and the count
/// of records skipped. Skips are recoverable, never errors.
pub fn format_records(records: &[RawRecord]) -> (Vec<FormattedExample>, usize) {
    let mut examples = Vec::with_capacity(records.len());
    let mut skipped = 0;

    for record in records {
        let instruction = record.instruction.trim();
        let response = record.output.trim();
        let context = record.input.trim();

        if instruction.is_empty() || response.is_empty() {
            skipped += 1;
            continue;
        }

        examples.push(FormattedExample {
            text: format_chat(instruction, context, response),
        });
    }

    (examples, skipped)
}

/// Shuffle examples in place with a seeded RNG
///
/// Uses `StdRng::seed_from_u64` so the permutation is identical across runs
/// on the same input.
pub fn shuffle_examples(examples: &mut [FormattedExample], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    examples.shuffle(&mut rng);
}

/// Partition shuffled examples into contiguous 80/10/10 slices
///
/// `n_train = floor(0.8 * n)`, `n_valid = floor(0.1 * n)`, and the test
/// partition takes the remainder, so the three sizes always sum to `n`.
/// The floor policy matters for small `n` and is kept deliberately.
pub fn split_examples(examples: Vec<FormattedExample>) -> DatasetSplits {
    let n = examples.len();
    let n_train = (n as f64 * TRAIN_FRACTION) as usize;
    let n_valid = (n as f64 * VALID_FRACTION) as usize;

    let mut examples = examples;
    let test = examples.split_off(n_train + n_valid);
    let valid = examples.split_off(n_train);
    let train = examples;

    DatasetSplits { train, valid, test }
}

/// Write one partition as line-delimited JSON
///
/// One `{"text": "..."}` object per line, UTF-8 with non-ASCII characters
/// left unescaped.
pub fn write_jsonl(path: &Path, examples: &[FormattedExample]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    for example in examples {
        let line = serde_json::to_string(example)
            .with_context(|| format!("Failed to serialize example for {}", path.display()))?;
        writeln!(writer, "{line}").with_context(|| format!("Failed to write {}", path.display()))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

/// Write the three partitions under `data_dir`, creating it if absent
pub fn write_splits(splits: &DatasetSplits, data_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    let partitions = [
        ("train", &splits.train),
        ("valid", &splits.valid),
        ("test", &splits.test),
    ];

    for (name, examples) in partitions {
        let path = data_dir.join(format!("{name}.jsonl"));
        write_jsonl(&path, examples)?;
        println!("  {}: {} examples -> {}", name, examples.len(), path.display());
    }

    Ok(())
}

/// Run the full preparation sequence: fetch, format, shuffle, split, persist
///
/// Fetch and write failures are fatal; either all three files are written or
/// none are. Invalid records are skipped and counted, never fatal.
pub fn run(config: &PrepareConfig) -> Result<PrepareSummary> {
    println!("Downloading {} ...", config.dataset);
    let records = dataset::fetch_records(&config.dataset)
        .with_context(|| format!("Failed to fetch dataset '{}'", config.dataset))?;
    println!("  Total examples: {}", records.len());

    let (mut examples, skipped) = format_records(&records);
    let valid = examples.len();
    println!("  Valid examples: {valid} (skipped {skipped})");

    shuffle_examples(&mut examples, config.seed);
    let splits = split_examples(examples);

    let summary = PrepareSummary {
        total: records.len(),
        valid,
        skipped,
        n_train: splits.train.len(),
        n_valid: splits.valid.len(),
        n_test: splits.test.len(),
    };

    write_splits(&splits, &config.data_dir)?;

    Ok(summary)
}
