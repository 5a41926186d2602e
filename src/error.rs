//! Error taxonomy for a job run.
//!
//! Every failure a job can surface is one of the variants below. The core
//! performs no silent suppression: mapper and reducer errors abort the run,
//! keys that cannot be canonicalized fail the shuffle fast, and storage
//! errors are reported to the caller, who decides whether they are fatal
//! (see `JobConfig::tolerate_storage_errors`).
//!
//! End-of-input is not an error; record sources signal it with `Ok(None)`.

use thiserror::Error;

/// Errors surfaced by the map/shuffle/reduce pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// The mapper returned an error for a record. The job aborts with no
    /// partial results; mappers are assumed pure and deterministic, so the
    /// driver does not retry.
    #[error("mapper failed on record {record:?}")]
    Mapper {
        /// The record being mapped when the failure occurred.
        record: String,
        source: anyhow::Error,
    },

    /// An emitted key cannot be canonicalized into a groupable form
    /// (it contains a float). Raised at shuffle time, before the key could
    /// corrupt grouping.
    #[error("key {key} cannot be used for grouping")]
    UnhashableKey {
        /// Display form of the offending key.
        key: String,
    },

    /// The reducer failed on a fold step. The whole job aborts; partial
    /// folds for other groups are not salvaged.
    #[error("reducer failed while folding values for key {key}")]
    Reducer {
        /// Display form of the canonical key whose group was being folded.
        key: String,
        source: anyhow::Error,
    },

    /// Reading from the record source failed mid-sequence.
    #[error("record source failed")]
    Source { source: anyhow::Error },

    /// Writing intermediate or final job data failed. The in-memory result
    /// is still valid when this occurs during persistence.
    #[error("storage failed for {path}")]
    Storage {
        /// Path of the file or directory involved.
        path: String,
        source: anyhow::Error,
    },
}

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;
