//! Unit tests for filtering, splitting, and JSONL persistence

use finetune_data::dataset::RawRecord;
use finetune_data::prepare::{
    format_records, shuffle_examples, split_examples, write_splits, DatasetSplits,
    FormattedExample,
};
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

fn record(instruction: &str, input: &str, output: &str) -> RawRecord {
    RawRecord {
        instruction: instruction.to_string(),
        input: input.to_string(),
        output: output.to_string(),
    }
}

fn examples(n: usize) -> Vec<FormattedExample> {
    (0..n)
        .map(|i| FormattedExample {
            text: format!("example {i}"),
        })
        .collect()
}

#[test]
fn test_filter_drops_empty_instruction_or_response() {
    let records = vec![
        record("", "", "x"),
        record("x", "", ""),
        record("x", "", "y"),
        record("   ", "", "y"),
        record("y", "", "  \n"),
    ];

    let (kept, skipped) = format_records(&records);
    assert_eq!(kept.len(), 1);
    assert_eq!(skipped, 4);
    assert!(kept[0].text.contains("<|im_start|>user\nx<|im_end|>\n"));
}

#[test]
fn test_filter_allows_empty_context() {
    let (kept, skipped) = format_records(&[record("Q", "", "A")]);
    assert_eq!(kept.len(), 1);
    assert_eq!(skipped, 0);
}

#[test]
fn test_format_records_trims_fields() {
    let (kept, _) = format_records(&[record("  Q  ", "  ctx  ", "  A  ")]);
    assert!(kept[0].text.contains("<|im_start|>user\nQ\n\nctx<|im_end|>\n"));
    assert!(kept[0].text.contains("<|im_start|>assistant\nA<|im_end|>\n"));
}

#[test]
fn test_split_100_examples() {
    let splits = split_examples(examples(100));
    assert_eq!(splits.train.len(), 80);
    assert_eq!(splits.valid.len(), 10);
    assert_eq!(splits.test.len(), 10);
}

#[test]
fn test_split_small_counts() {
    // Floor division can leave the remainder in the test partition
    let splits = split_examples(examples(3));
    assert_eq!(splits.train.len(), 2);
    assert_eq!(splits.valid.len(), 0);
    assert_eq!(splits.test.len(), 1);

    let splits = split_examples(examples(0));
    assert!(splits.train.is_empty());
    assert!(splits.valid.is_empty());
    assert!(splits.test.is_empty());
}

#[test]
fn test_split_is_contiguous_partition() {
    let input = examples(17);
    let splits = split_examples(input.clone());

    let rejoined: Vec<FormattedExample> = splits
        .train
        .iter()
        .chain(splits.valid.iter())
        .chain(splits.test.iter())
        .cloned()
        .collect();
    assert_eq!(rejoined, input);
}

proptest! {
    #[test]
    fn test_split_sizes_sum_to_n(n in 0usize..2000) {
        let splits = split_examples(examples(n));
        prop_assert_eq!(
            splits.train.len() + splits.valid.len() + splits.test.len(),
            n
        );
    }
}

#[test]
fn test_shuffle_is_deterministic() {
    let mut first = examples(50);
    let mut second = examples(50);

    shuffle_examples(&mut first, 42);
    shuffle_examples(&mut second, 42);
    assert_eq!(first, second);

    let mut other_seed = examples(50);
    shuffle_examples(&mut other_seed, 7);
    assert_ne!(first, other_seed);
}

#[test]
fn test_write_splits_creates_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let data_dir = temp_dir.path().join("nested").join("data");

    let splits = split_examples(examples(10));
    write_splits(&splits, &data_dir).expect("Failed to write splits");

    for name in ["train", "valid", "test"] {
        let path = data_dir.join(format!("{name}.jsonl"));
        assert!(path.exists(), "missing {name}.jsonl");
    }

    let train = fs::read_to_string(data_dir.join("train.jsonl")).expect("Failed to read train");
    assert_eq!(train.lines().count(), 8);
    for line in train.lines() {
        let parsed: FormattedExample =
            serde_json::from_str(line).expect("Line is not a JSON object with a text field");
        assert!(parsed.text.starts_with("example "));
    }
}

#[test]
fn test_jsonl_leaves_non_ascii_unescaped() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let splits = DatasetSplits {
        train: vec![FormattedExample {
            text: "<|im_start|>assistant\nこんにちは<|im_end|>\n".to_string(),
        }],
        valid: vec![],
        test: vec![],
    };
    write_splits(&splits, temp_dir.path()).expect("Failed to write splits");

    let raw = fs::read_to_string(temp_dir.path().join("train.jsonl")).expect("Failed to read");
    assert!(raw.contains("こんにちは"));
    assert!(!raw.contains("\\u"));
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let records: Vec<RawRecord> = (0..37)
        .map(|i| record(&format!("question {i}"), "", &format!("answer {i}")))
        .collect();

    let run_once = || {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let (mut formatted, _) = format_records(&records);
        shuffle_examples(&mut formatted, 42);
        let splits = split_examples(formatted);
        write_splits(&splits, temp_dir.path()).expect("Failed to write splits");

        let mut outputs = Vec::new();
        for name in ["train", "valid", "test"] {
            outputs.push(fs::read(temp_dir.path().join(format!("{name}.jsonl"))).expect("read"));
        }
        outputs
    };

    assert_eq!(run_once(), run_once());
}
