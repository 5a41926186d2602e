//! Reduce stage: fold each group's values and reconstruct output keys.
//!
//! Each non-empty group is folded left-to-right through the reducer; a
//! single-element group yields its element without invoking the reducer at
//! all. Empty groups are never produced by shuffle but are tolerated and
//! skipped. Result order across keys is implementation-defined.

use crate::error::{Error, Result};
use crate::key::Key;
use crate::mapreducer::Reducer;
use crate::shuffle::Groups;

/// Left-fold `values` pairwise through `reducer`.
///
/// Returns `Ok(None)` for an empty input -- the explicit non-empty check that
/// keeps empty groups out of the results. For `[v1, v2, .., vn]` the result
/// is `reducer(..reducer(v1, v2).., vn)`, strictly left-associated; for a
/// single value the reducer is never called.
///
/// # Errors
/// Propagates the first reducer error.
pub fn fold_values<V>(reducer: &dyn Reducer<V>, values: Vec<V>) -> anyhow::Result<Option<V>> {
    let mut iter = values.into_iter();
    let Some(first) = iter.next() else {
        return Ok(None);
    };
    let mut acc = first;
    for value in iter {
        acc = reducer.reduce(acc, value)?;
    }
    Ok(Some(acc))
}

/// Run the reduce phase sequentially over the shuffle output.
///
/// # Errors
/// Wraps reducer failures as [`Error::Reducer`] with the canonical key of
/// the group being folded; the whole job aborts rather than salvaging
/// partial folds for other groups.
pub fn run_reduce<V>(groups: Groups<V>, reducer: &dyn Reducer<V>) -> Result<Vec<(Key, V)>> {
    let mut results = Vec::with_capacity(groups.len());
    for (canon, values) in groups {
        let folded = fold_values(reducer, values).map_err(|source| Error::Reducer {
            key: canon.to_string(),
            source,
        })?;
        let Some(folded) = folded else {
            continue;
        };
        results.push((canon.reconstruct(), folded));
    }
    Ok(results)
}

/// Run the reduce phase with groups folded in parallel.
///
/// Groups share no data, so each fold runs independently on the rayon pool;
/// within a group the fold stays strictly sequential. Result order remains
/// implementation-defined, as in [`run_reduce`].
///
/// # Errors
/// Same contract as [`run_reduce`].
#[cfg(feature = "parallel")]
pub fn run_reduce_par<V: Send>(
    groups: Groups<V>,
    reducer: &dyn Reducer<V>,
) -> Result<Vec<(Key, V)>> {
    use rayon::prelude::*;

    let folded: Vec<Option<(Key, V)>> = groups
        .into_iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(canon, values)| {
            let folded = fold_values(reducer, values).map_err(|source| Error::Reducer {
                key: canon.to_string(),
                source,
            })?;
            Ok(folded.map(|v| (canon.reconstruct(), v)))
        })
        .collect::<Result<_>>()?;

    Ok(folded.into_iter().flatten().collect())
}
