//! The pluggable `Mapper` and `Reducer` contracts, and the crate-wide
//! payload bound.
//!
//! Both traits have blanket impls for plain functions and closures, so a job
//! can be assembled either from named types or inline:
//!
//! ```ignore
//! use gristmill::{Job, Key, VecSource};
//! use anyhow::Result;
//!
//! fn emit_words(line: &str) -> Result<Vec<(Key, u64)>> {
//!     Ok(line.split_whitespace().map(|w| (Key::from(w), 1)).collect())
//! }
//!
//! let job = Job::new(
//!     VecSource::new(["a b a"]),
//!     emit_words,
//!     |acc: u64, next: u64| -> Result<u64> { Ok(acc + next) },
//! );
//! ```

use crate::key::Key;
use anyhow::Result;
use serde::Serialize;

/// Bound every payload flowing through a job must satisfy.
///
/// `Serialize` is required only so intermediates and results can be
/// persisted; the pipeline itself never inspects payload contents.
pub trait MRBound: 'static + Send + Sync + Clone + Serialize {}
impl<T> MRBound for T where T: 'static + Send + Sync + Clone + Serialize {}

/// A pure function from one record to zero or more (key, value) emissions.
///
/// Mappers must be deterministic for reproducible results; the driver does
/// not retry a failed record, and a returned error aborts the whole job.
pub trait Mapper<V>: Send + Sync {
    /// Produce the emissions for `record`, in emission order.
    fn map(&self, record: &str) -> Result<Vec<(Key, V)>>;
}

impl<V, F> Mapper<V> for F
where
    F: Send + Sync + Fn(&str) -> Result<Vec<(Key, V)>>,
{
    fn map(&self, record: &str) -> Result<Vec<(Key, V)>> {
        self(record)
    }
}

/// A pure pairwise combiner, applied left-to-right over a group's values.
///
/// Callers generally assume associativity, but the driver does not enforce
/// it -- the fold is strictly `reduce(reduce(v1, v2), v3)` and so on, in
/// emission order.
pub trait Reducer<V>: Send + Sync {
    /// Combine the accumulator with the next value.
    fn reduce(&self, acc: V, next: V) -> Result<V>;
}

impl<V, F> Reducer<V> for F
where
    F: Send + Sync + Fn(V, V) -> Result<V>,
{
    fn reduce(&self, acc: V, next: V) -> Result<V> {
        self(acc, next)
    }
}
