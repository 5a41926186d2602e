//! Testing utilities for gristmill jobs.
//!
//! Result order across keys is implementation-defined, so the assertion
//! helpers here compare result sets after sorting by the keys' display
//! form. Also included: a lookup helper for single results, a recording
//! observer for asserting phase sequencing, and a temp-dir fixture for
//! persistence tests.
//!
//! ```no_run
//! use gristmill::{Job, Key, VecSource};
//! use gristmill::testing::*;
//! use anyhow::Result;
//!
//! #[test]
//! fn counts_words() -> Result<()> {
//!     let job = Job::new(
//!         VecSource::new(["a b a"]),
//!         |line: &str| -> Result<Vec<(Key, u64)>> {
//!             Ok(line.split_whitespace().map(|w| (Key::from(w), 1)).collect())
//!         },
//!         |acc: u64, next: u64| -> Result<u64> { Ok(acc + next) },
//!     );
//!     let results = job.run()?;
//!     assert_results_equal(results, vec![(Key::from("a"), 2), (Key::from("b"), 1)]);
//!     Ok(())
//! }
//! ```

use crate::key::Key;
use crate::observer::{JobObserver, Phase};
use std::fmt::Debug;
use std::sync::Mutex;
use tempfile::TempDir;

/// Assert that two result sets are equal, ignoring cross-key order.
///
/// Both sides are sorted by the display form of their keys, then compared
/// element-by-element.
///
/// # Panics
/// Panics with a detailed message if the sets differ in length or content.
pub fn assert_results_equal<V: Debug + PartialEq>(
    mut actual: Vec<(Key, V)>,
    mut expected: Vec<(Key, V)>,
) {
    actual.sort_by_key(|(k, _)| k.to_string());
    expected.sort_by_key(|(k, _)| k.to_string());

    assert_eq!(
        actual.len(),
        expected.len(),
        "Result length mismatch:\n  Expected length: {}\n  Actual length: {}\n  Expected: {expected:?}\n  Actual: {actual:?}",
        expected.len(),
        actual.len()
    );

    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(
            a, e,
            "Result mismatch at sorted index {i}:\n  Expected: {e:?}\n  Actual: {a:?}\n  Full expected: {expected:?}\n  Full actual: {actual:?}"
        );
    }
}

/// Find the value for `key` in a result set, if present.
///
/// Linear scan on purpose: [`Key`] is deliberately not hashable (only
/// canonical keys are), and result sets in tests are small.
pub fn find_result<'a, V>(results: &'a [(Key, V)], key: &Key) -> Option<&'a V> {
    results.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

/// One recorded observer event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObservedEvent {
    Started(Phase),
    Completed(Phase, usize),
}

/// Observer that records every phase event, for asserting driver sequencing.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    /// Fresh recorder with no events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events observed so far, in order.
    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().expect("observer lock poisoned").clone()
    }
}

impl JobObserver for RecordingObserver {
    fn phase_started(&self, phase: Phase) {
        self.events
            .lock()
            .expect("observer lock poisoned")
            .push(ObservedEvent::Started(phase));
    }

    fn phase_completed(&self, phase: Phase, items: usize) {
        self.events
            .lock()
            .expect("observer lock poisoned")
            .push(ObservedEvent::Completed(phase, items));
    }
}

/// Create a temporary directory for persistence tests.
///
/// The directory (and everything written under it) is removed when the
/// returned guard drops.
#[must_use]
pub fn temp_output_dir() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}
