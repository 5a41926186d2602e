//! Record sources: finite, ordered, lazy sequences of raw text records.
//!
//! A source is consumed exactly once by the map stage. `Ok(None)` is the
//! normal terminal condition, not an error. Sources are not restartable;
//! callers supply a fresh source per job run.

use crate::error::{Error, Result};
use anyhow::Context;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use std::vec;

/// A capability producing a finite, ordered, lazy sequence of records.
pub trait RecordSource {
    /// Pull the next record. `Ok(None)` signals the end of the sequence.
    ///
    /// # Errors
    /// Returns [`Error::Source`] if the underlying input fails mid-read.
    fn next_record(&mut self) -> Result<Option<String>>;
}

/// In-memory source over a vector of records, mainly for tests and demos.
pub struct VecSource {
    records: vec::IntoIter<String>,
}

impl VecSource {
    /// Build a source yielding `records` in order.
    pub fn new<I, S>(records: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            records: records
                .into_iter()
                .map(Into::into)
                .collect::<Vec<_>>()
                .into_iter(),
        }
    }
}

impl RecordSource for VecSource {
    fn next_record(&mut self) -> Result<Option<String>> {
        Ok(self.records.next())
    }
}

/// Line-oriented reader over a text file.
///
/// Each line is yielded with surrounding whitespace trimmed, so a trailing
/// newline or indentation never leaks into mapper input.
#[derive(Debug)]
pub struct LineFileSource {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
}

impl LineFileSource {
    /// Open `path` for line-by-line reading.
    ///
    /// # Errors
    /// Returns [`Error::Source`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let f = File::open(&path)
            .with_context(|| format!("open {}", path.display()))
            .map_err(|source| Error::Source { source })?;
        Ok(Self {
            lines: BufReader::new(f).lines(),
            path,
        })
    }
}

impl RecordSource for LineFileSource {
    fn next_record(&mut self) -> Result<Option<String>> {
        match self.lines.next() {
            Some(Ok(line)) => Ok(Some(line.trim().to_string())),
            Some(Err(e)) => Err(Error::Source {
                source: anyhow::Error::new(e)
                    .context(format!("read {}", self.path.display())),
            }),
            None => Ok(None),
        }
    }
}
