//! Instruction data preparation for Qwen3 LoRA fine-tuning
//!
//! This crate downloads the kunishou/databricks-dolly-15k-ja instruction
//! dataset, renders each record with the Qwen3 chat template, and writes
//! shuffled train/valid/test JSONL splits for a downstream fine-tuning job.
//!
//! # Example
//!
//! ```no_run
//! use finetune_data::prepare::{run, PrepareConfig};
//!
//! let summary = run(&PrepareConfig::default()).expect("data preparation failed");
//! println!("wrote {} training examples", summary.n_train);
//! ```

pub mod dataset;
pub mod prepare;
pub mod template;
