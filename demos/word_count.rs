//! Word count over a small text corpus.
//!
//! Run with:
//!
//! ```text
//! cargo run --example word_count
//! ```
//!
//! The mapper strips punctuation, lowercases, and emits `(word, 1)` per
//! word; the reducer is a pairwise sum. Results land in
//! `output/word_count/results.json` (with intermediates alongside) and are
//! printed sorted.

use anyhow::Result;
use gristmill::{Job, JobConfig, Key, LineFileSource};

fn word_count_mapper(line: &str) -> Result<Vec<(Key, u64)>> {
    let mut emissions = Vec::new();
    for raw in line.split_whitespace() {
        let word: String = raw
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect::<String>()
            .to_lowercase();
        if !word.is_empty() {
            emissions.push((Key::from(word), 1));
        }
    }
    Ok(emissions)
}

fn word_count_reducer(acc: u64, next: u64) -> Result<u64> {
    Ok(acc + next)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let source = LineFileSource::open("demos/data/word_count_input.txt")?;
    let job = Job::new(source, word_count_mapper, word_count_reducer).with_config(JobConfig {
        output_dir: Some("output/word_count".into()),
        ..JobConfig::default()
    });

    let mut results = job.run()?;
    results.sort_by_key(|(key, _)| key.to_string());

    println!("Final counts (sorted):");
    for (key, count) in &results {
        println!("{key}: {count}");
    }
    Ok(())
}
