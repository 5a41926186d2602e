//! # Gristmill
//!
//! A **single-machine simulation of the MapReduce execution model**: take an
//! ordered sequence of input records, apply a mapper that emits zero or more
//! key/value pairs per record, group all emitted values by key, and fold each
//! group into one result with a pairwise reducer. One process, no cluster:
//! the point is the map → shuffle → reduce contract itself.
//!
//! ## Quick Start
//!
//! ```ignore
//! use gristmill::{Job, Key, VecSource};
//! use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let job = Job::new(
//!     VecSource::new(["the cat sat", "the dog ran"]),
//!     |line: &str| -> Result<Vec<(Key, u64)>> {
//!         Ok(line
//!             .split_whitespace()
//!             .map(|w| (Key::from(w.to_lowercase()), 1))
//!             .collect())
//!     },
//!     |acc: u64, next: u64| -> Result<u64> { Ok(acc + next) },
//! );
//!
//! let results = job.run()?; // [("the", 2), ("cat", 1), ...] in arbitrary order
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### The three phases
//!
//! A [`Job`] drives three strictly sequential phases:
//!
//! 1. **Map** -- every record from the [`RecordSource`] goes through the
//!    [`Mapper`] once; emissions are collected in order.
//! 2. **Shuffle** -- each emitted [`Key`] is normalized into a [`CanonKey`]
//!    and its value appended to that key's group. Within a group, values
//!    keep emission order.
//! 3. **Reduce** -- each non-empty group is folded left-to-right through the
//!    [`Reducer`]; the canonical key is mapped back to an output [`Key`].
//!
//! ### Keys
//!
//! Emitted keys come in three shapes -- scalar, fixed tuple, list -- and are
//! canonicalized before grouping: scalars and tuples as-is, lists frozen
//! into tuples, floats rejected (see [`key`] for the full policy, including
//! the deliberately lossy output-key reconstruction heuristic).
//!
//! ### Values
//!
//! Payloads are opaque to the pipeline. Any `V` satisfying [`MRBound`]
//! (`Clone + Send + Sync + Serialize + 'static`) works; the core only moves
//! values around and hands them to the reducer.
//!
//! ### Execution Modes
//!
//! The reference mode is strictly sequential and deterministic per phase.
//! With the default-on `parallel` feature, [`ExecMode::Parallel`] maps
//! records and folds groups on a rayon pool; both modes produce the same
//! logical results because emission order and within-group order are
//! preserved either way.
//!
//! ### Observability
//!
//! The driver reports phase boundaries through an injected [`JobObserver`];
//! the default [`TracingObserver`] emits structured `tracing` events and
//! stays silent unless a subscriber is installed.
//!
//! ### Persistence
//!
//! Give the job an output directory via [`JobConfig`] and it writes the map
//! output, the shuffle groups, and the final results as JSON for inspection
//! (see [`io`]). Persistence is optional; the in-memory result is the
//! job's real product.
//!
//! ## Error Handling
//!
//! Every failure is a typed [`Error`]: mapper/reducer failures abort the run
//! with the offending record or key attached, unhashable keys fail the
//! shuffle fast, and storage failures are fatal or tolerated per
//! [`JobConfig`]. End of input is not an error.
//!
//! ## Module Overview
//!
//! - [`key`] -- key shapes, canonicalization, reconstruction
//! - [`source`] -- record sources (in-memory, line-oriented files)
//! - [`mapreducer`] -- the `Mapper`/`Reducer` contracts
//! - [`map`], [`shuffle`], [`reduce`] -- the three phase implementations
//! - [`job`] -- driver, configuration, execution modes
//! - [`observer`] -- phase-boundary observability
//! - [`io`] -- JSON persistence of intermediates and results
//! - [`testing`] -- assertion helpers and fixtures for job tests

pub mod error;
pub mod io;
pub mod job;
pub mod key;
pub mod map;
pub mod mapreducer;
pub mod observer;
pub mod reduce;
pub mod shuffle;
pub mod source;
pub mod testing;

// General re-exports
pub use error::{Error, Result};
pub use job::{ExecMode, Job, JobConfig, JobState};
pub use key::{CanonKey, CanonScalar, Key, Scalar};
pub use mapreducer::{MRBound, Mapper, Reducer};
pub use observer::{JobObserver, NullObserver, Phase, TracingObserver};
pub use reduce::fold_values;
pub use shuffle::Groups;
pub use source::{LineFileSource, RecordSource, VecSource};
