//! JSON persistence of intermediate and final job data.
//!
//! When a job is given an output directory, the driver writes three files
//! for inspection:
//!
//! - `intermediate/mapped_data.json` -- the full map output, one
//!   `{"key": …, "value": …}` object per emission;
//! - `intermediate/shuffled_data.json` -- canonical keys (in their cosmetic
//!   string form) mapped to their grouped value arrays;
//! - `results.json` -- the final results, with reconstructed output keys.
//!
//! The stringified keys in `shuffled_data.json` exist only because JSON
//! object keys must be strings; grouping is always performed on
//! [`CanonKey`](crate::key::CanonKey) equality, never on this rendering.

use crate::error::{Error, Result};
use crate::key::Key;
use crate::shuffle::Groups;
use anyhow::Context;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const MAPPED_FILE: &str = "mapped_data.json";
const SHUFFLED_FILE: &str = "shuffled_data.json";
const RESULTS_FILE: &str = "results.json";

#[derive(Serialize)]
struct KvRecord<'a, V> {
    key: &'a Key,
    value: &'a V,
}

/// Writer for a job's output directory.
pub struct ResultSink {
    output_dir: PathBuf,
    intermediate_dir: PathBuf,
}

impl ResultSink {
    /// Ensure `output_dir` and its `intermediate/` subdirectory exist.
    ///
    /// Creation is idempotent; existing directories are left untouched.
    ///
    /// # Errors
    /// Returns [`Error::Storage`] if either directory cannot be created.
    pub fn create(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        let intermediate_dir = output_dir.join("intermediate");
        create_dir_all(&intermediate_dir)
            .with_context(|| format!("mkdir -p {}", intermediate_dir.display()))
            .map_err(|source| Error::Storage {
                path: intermediate_dir.display().to_string(),
                source,
            })?;
        Ok(Self {
            output_dir,
            intermediate_dir,
        })
    }

    /// Path of the final results file.
    #[must_use]
    pub fn results_path(&self) -> PathBuf {
        self.output_dir.join(RESULTS_FILE)
    }

    /// Persist the map output.
    ///
    /// # Errors
    /// Returns [`Error::Storage`] on any write failure.
    pub fn write_mapped<V: Serialize>(&self, emissions: &[(Key, V)]) -> Result<()> {
        let rows: Vec<KvRecord<'_, V>> = emissions
            .iter()
            .map(|(key, value)| KvRecord { key, value })
            .collect();
        self.write_json(&self.intermediate_dir.join(MAPPED_FILE), &rows)
    }

    /// Persist the shuffle output, keyed by the cosmetic string form of each
    /// canonical key. Keys are sorted so the file content is deterministic.
    ///
    /// # Errors
    /// Returns [`Error::Storage`] on any write failure.
    pub fn write_shuffled<V: Serialize>(&self, groups: &Groups<V>) -> Result<()> {
        let rendered: BTreeMap<String, &Vec<V>> = groups
            .iter()
            .map(|(canon, values)| (canon.to_string(), values))
            .collect();
        self.write_json(&self.intermediate_dir.join(SHUFFLED_FILE), &rendered)
    }

    /// Persist the final results.
    ///
    /// # Errors
    /// Returns [`Error::Storage`] on any write failure.
    pub fn write_results<V: Serialize>(&self, results: &[(Key, V)]) -> Result<()> {
        let rows: Vec<KvRecord<'_, V>> = results
            .iter()
            .map(|(key, value)| KvRecord { key, value })
            .collect();
        self.write_json(&self.results_path(), &rows)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let storage_err = |source: anyhow::Error| Error::Storage {
            path: path.display().to_string(),
            source,
        };
        let f = File::create(path)
            .with_context(|| format!("create {}", path.display()))
            .map_err(storage_err)?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, value)
            .with_context(|| format!("serialize {}", path.display()))
            .map_err(storage_err)?;
        w.write_all(b"\n")
            .and_then(|()| w.flush())
            .with_context(|| format!("flush {}", path.display()))
            .map_err(storage_err)?;
        Ok(())
    }
}
