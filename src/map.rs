//! Map stage: drive the record source through the mapper.
//!
//! All emissions are collected into one ordered sequence: per record, in the
//! order the mapper yields them; across records, in source order. A mapper
//! error for any record aborts the stage with no per-record isolation.

use crate::error::{Error, Result};
use crate::key::Key;
use crate::mapreducer::Mapper;
use crate::source::RecordSource;

/// Run the map phase sequentially, pulling records lazily from `source`.
///
/// # Errors
/// Propagates [`Error::Source`] from the record source and wraps mapper
/// failures as [`Error::Mapper`] with the offending record attached.
pub fn run_map<V>(
    source: &mut dyn RecordSource,
    mapper: &dyn Mapper<V>,
) -> Result<Vec<(Key, V)>> {
    let mut emissions = Vec::new();
    while let Some(record) = source.next_record()? {
        let pairs = mapper.map(&record).map_err(|source| Error::Mapper {
            record: record.clone(),
            source,
        })?;
        emissions.extend(pairs);
    }
    Ok(emissions)
}

/// Run the map phase with records mapped in parallel.
///
/// The source is drained up front (reading stays sequential), records are
/// mapped on the rayon pool, and per-record emission vectors are re-joined
/// in source order -- so the output sequence is identical to [`run_map`].
///
/// # Errors
/// Same contract as [`run_map`].
#[cfg(feature = "parallel")]
pub fn run_map_par<V: Send>(
    source: &mut dyn RecordSource,
    mapper: &dyn Mapper<V>,
) -> Result<Vec<(Key, V)>> {
    use rayon::prelude::*;

    let mut records = Vec::new();
    while let Some(record) = source.next_record()? {
        records.push(record);
    }

    let per_record: Vec<Vec<(Key, V)>> = records
        .into_par_iter()
        .map(|record| {
            mapper.map(&record).map_err(|source| Error::Mapper {
                record: record.clone(),
                source,
            })
        })
        .collect::<Result<_>>()?;

    Ok(per_record.into_iter().flatten().collect())
}
