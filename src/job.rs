//! The job driver: sequences Map → Shuffle → Reduce over one record source.
//!
//! A [`Job`] owns the source, the pluggable mapper/reducer, a [`JobConfig`],
//! and an observer. [`Job::run`] consumes the driver, so a job is single-shot
//! by construction -- sources are not restartable, and callers build a fresh
//! job (with a fresh source) per run.
//!
//! The driver walks a fixed state machine, one phase per transition:
//!
//! ```text
//! Idle → Mapped → Shuffled → Reduced → Done
//! ```
//!
//! No transition is skipped or reordered. Before the map phase, the output
//! and intermediate directories are created if persistence is configured
//! (idempotent). After each phase the corresponding data is persisted and
//! the observer is notified with the phase's item count.

use crate::error::Result;
use crate::io::ResultSink;
use crate::key::Key;
use crate::mapreducer::{MRBound, Mapper, Reducer};
use crate::observer::{JobObserver, Phase, TracingObserver};
use crate::source::RecordSource;
use crate::{map, reduce, shuffle};
use std::path::PathBuf;
use std::sync::Arc;

/// How the map and reduce phases execute.
///
/// `Sequential` is the reference behavior: fully deterministic, one record
/// or group at a time. `Parallel` fans records and groups out over a rayon
/// pool while preserving the emission sequence and within-group value order,
/// so both modes produce the same logical results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecMode {
    /// One record, one group at a time. The reference mode.
    #[default]
    Sequential,
    /// Map records and fold groups on a rayon pool.
    #[cfg(feature = "parallel")]
    Parallel {
        /// Global rayon pool size; `None` sizes the pool to the CPU count.
        threads: Option<usize>,
    },
}

/// Driver configuration.
///
/// Built with struct-update syntax:
///
/// ```ignore
/// let config = JobConfig {
///     output_dir: Some("output/word_count".into()),
///     ..JobConfig::default()
/// };
/// ```
#[derive(Clone, Debug)]
pub struct JobConfig {
    /// Where to persist results (and intermediates). `None` disables all
    /// persistence; the job result is returned in memory either way.
    pub output_dir: Option<PathBuf>,
    /// Whether to persist post-map and post-shuffle snapshots alongside the
    /// final results. Ignored when `output_dir` is `None`.
    pub write_intermediates: bool,
    /// Treat storage failures as warnings instead of failing the job. The
    /// in-memory result is valid regardless; this decides whether a failed
    /// write fails the run.
    pub tolerate_storage_errors: bool,
    /// Execution mode for the map and reduce phases.
    pub mode: ExecMode,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            write_intermediates: true,
            tolerate_storage_errors: false,
            mode: ExecMode::default(),
        }
    }
}

/// Driver progress through the phase state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobState {
    /// Nothing has run.
    Idle,
    /// Map output collected.
    Mapped,
    /// Groups built.
    Shuffled,
    /// Results folded.
    Reduced,
    /// Results returned to the caller.
    Done,
}

/// One complete Map → Shuffle → Reduce execution over one record source.
pub struct Job<V: MRBound> {
    source: Box<dyn RecordSource>,
    mapper: Box<dyn Mapper<V>>,
    reducer: Box<dyn Reducer<V>>,
    config: JobConfig,
    observer: Arc<dyn JobObserver>,
    state: JobState,
}

impl<V: MRBound> Job<V> {
    /// Assemble a job with the default configuration (sequential, no
    /// persistence) and the default [`TracingObserver`].
    pub fn new(
        source: impl RecordSource + 'static,
        mapper: impl Mapper<V> + 'static,
        reducer: impl Reducer<V> + 'static,
    ) -> Self {
        Self {
            source: Box::new(source),
            mapper: Box::new(mapper),
            reducer: Box::new(reducer),
            config: JobConfig::default(),
            observer: Arc::new(TracingObserver),
            state: JobState::Idle,
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: JobConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn JobObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Current state. Always [`JobState::Idle`] before [`Job::run`], which
    /// consumes the driver.
    #[must_use]
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Execute the job and return the final `(key, value)` results.
    ///
    /// Result order across keys is implementation-defined; within-group
    /// semantics are as documented on the phase functions.
    ///
    /// # Errors
    /// Any variant of [`Error`](crate::Error): mapper/reducer failures and
    /// unhashable keys abort the run, source failures propagate, and storage
    /// failures abort unless `tolerate_storage_errors` is set.
    pub fn run(mut self) -> Result<Vec<(Key, V)>> {
        let sink = self.open_sink()?;

        #[cfg(feature = "parallel")]
        if let ExecMode::Parallel { threads } = self.config.mode {
            let t = threads.unwrap_or_else(|| num_cpus::get().max(2));
            // ok() to ignore "already built" on repeated runs in one process
            rayon::ThreadPoolBuilder::new()
                .num_threads(t)
                .build_global()
                .ok();
        }

        self.observer.phase_started(Phase::Map);
        let emissions = match self.config.mode {
            ExecMode::Sequential => map::run_map(self.source.as_mut(), self.mapper.as_ref())?,
            #[cfg(feature = "parallel")]
            ExecMode::Parallel { .. } => {
                map::run_map_par(self.source.as_mut(), self.mapper.as_ref())?
            }
        };
        self.state = JobState::Mapped;
        if let Some(sink) = &sink
            && self.config.write_intermediates
        {
            self.persist(sink.write_mapped(&emissions))?;
        }
        self.observer.phase_completed(Phase::Map, emissions.len());

        self.observer.phase_started(Phase::Shuffle);
        let groups = shuffle::run_shuffle(emissions)?;
        self.state = JobState::Shuffled;
        if let Some(sink) = &sink
            && self.config.write_intermediates
        {
            self.persist(sink.write_shuffled(&groups))?;
        }
        self.observer.phase_completed(Phase::Shuffle, groups.len());

        self.observer.phase_started(Phase::Reduce);
        let results = match self.config.mode {
            ExecMode::Sequential => reduce::run_reduce(groups, self.reducer.as_ref())?,
            #[cfg(feature = "parallel")]
            ExecMode::Parallel { .. } => reduce::run_reduce_par(groups, self.reducer.as_ref())?,
        };
        self.state = JobState::Reduced;
        if let Some(sink) = &sink {
            self.persist(sink.write_results(&results))?;
        }
        self.observer.phase_completed(Phase::Reduce, results.len());

        self.state = JobState::Done;
        Ok(results)
    }

    /// Create the output directories up front, per the configured policy.
    fn open_sink(&self) -> Result<Option<ResultSink>> {
        let Some(dir) = &self.config.output_dir else {
            return Ok(None);
        };
        match ResultSink::create(dir) {
            Ok(sink) => Ok(Some(sink)),
            Err(err) if self.config.tolerate_storage_errors => {
                self.observer.storage_error_tolerated(&err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Apply the storage-error policy to one persistence outcome.
    fn persist(&self, outcome: Result<()>) -> Result<()> {
        match outcome {
            Err(err) if self.config.tolerate_storage_errors => {
                self.observer.storage_error_tolerated(&err);
                Ok(())
            }
            other => other,
        }
    }
}
