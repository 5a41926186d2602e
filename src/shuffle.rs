//! Shuffle stage: canonicalize emitted keys and group values.
//!
//! Grouping is an explicit insert-or-append over a hash-keyed map: the first
//! occurrence of a canonical key creates its group, later occurrences append.
//! Within a group, value order equals emission order. Order *across* groups
//! is implementation-defined and not part of the contract.

use crate::error::Result;
use crate::key::{CanonKey, Key};
use std::collections::HashMap;

/// Shuffle output: every value from the map output, grouped under its
/// canonical key, in emission order within each group.
pub type Groups<V> = HashMap<CanonKey, Vec<V>>;

/// Run the shuffle phase over the full map output.
///
/// # Errors
/// Fails fast with [`crate::Error::UnhashableKey`] on the first key the
/// canonicalization policy rejects; no partial grouping is returned.
pub fn run_shuffle<V>(emissions: Vec<(Key, V)>) -> Result<Groups<V>> {
    let mut groups: Groups<V> = HashMap::new();
    for (key, value) in emissions {
        let canon = key.normalize()?;
        groups.entry(canon).or_default().push(value);
    }
    Ok(groups)
}
