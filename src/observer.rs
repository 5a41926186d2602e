//! Phase-boundary observability.
//!
//! The driver reports progress through an injected [`JobObserver`] rather
//! than printing. Callbacks fire at phase boundaries only -- never on the
//! per-record hot path. The default [`TracingObserver`] emits structured
//! [`tracing`] events and is silent unless a subscriber is installed.

/// One of the three pipeline phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Map,
    Shuffle,
    Reduce,
}

impl Phase {
    /// Stable lowercase name, used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Map => "map",
            Phase::Shuffle => "shuffle",
            Phase::Reduce => "reduce",
        }
    }
}

/// Observer invoked by the driver at phase boundaries.
///
/// `items` is the phase's natural output count: emitted pairs for map,
/// distinct canonical keys for shuffle, final results for reduce.
pub trait JobObserver: Send + Sync {
    /// A phase is about to run.
    fn phase_started(&self, phase: Phase) {
        let _ = phase;
    }

    /// A phase ran to completion.
    fn phase_completed(&self, phase: Phase, items: usize) {
        let _ = (phase, items);
    }

    /// Persisting intermediate or final data failed but the job was
    /// configured to tolerate it.
    fn storage_error_tolerated(&self, error: &crate::error::Error) {
        let _ = error;
    }
}

/// Default observer: structured `tracing` events at INFO level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl JobObserver for TracingObserver {
    fn phase_started(&self, phase: Phase) {
        tracing::info!(phase = phase.name(), "phase started");
    }

    fn phase_completed(&self, phase: Phase, items: usize) {
        tracing::info!(phase = phase.name(), items, "phase completed");
    }

    fn storage_error_tolerated(&self, error: &crate::error::Error) {
        tracing::warn!(error = %error, "persistence failed; keeping in-memory results");
    }
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl JobObserver for NullObserver {}
