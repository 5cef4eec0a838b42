//! Data preparation binary for Qwen3 LoRA fine-tuning
//!
//! Downloads kunishou/databricks-dolly-15k-ja from the Hugging Face hub,
//! formats every record with the Qwen3 chat template, and writes shuffled
//! train/valid/test JSONL splits.
//!
//! # Usage
//!
//! ```bash
//! finetune-data \
//!   [--dataset kunishou/databricks-dolly-15k-ja] \
//!   [--data-dir ./data] \
//!   [--seed 42]
//! ```

use anyhow::Result;
use clap::Parser;
use finetune_data::dataset::DEFAULT_DATASET;
use finetune_data::prepare::{run, PrepareConfig, DEFAULT_SEED};
use std::path::PathBuf;

/// Prepare instruction data splits for fine-tuning
#[derive(Parser, Debug)]
#[command(name = "finetune-data")]
#[command(about = "Prepare Japanese instruction data for Qwen3 LoRA fine-tuning", long_about = None)]
struct Args {
    /// Dataset identifier on the Hugging Face hub
    #[arg(long, value_name = "NAME", default_value = DEFAULT_DATASET)]
    dataset: String,

    /// Directory for train.jsonl, valid.jsonl, and test.jsonl
    #[arg(long, value_name = "PATH", default_value = "data")]
    data_dir: PathBuf,

    /// Shuffle seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = PrepareConfig {
        dataset: args.dataset,
        data_dir: args.data_dir,
        seed: args.seed,
    };

    run(&config)?;
    println!("Done!");

    Ok(())
}
