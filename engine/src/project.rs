//! Field projection: normalize a raw record for storage.

use crate::{ColumnName, Record};
use std::collections::HashSet;

/// Project a raw record into its storable form.
///
/// Every column name is lower-cased. When a whitelist is present, columns
/// whose lower-cased name is not in it are dropped; absent means all columns
/// pass through. The input is never mutated, and there are no failure modes:
/// unknown columns are simply dropped.
pub fn project(record: &Record, whitelist: Option<&HashSet<ColumnName>>) -> Record {
    record
        .iter()
        .filter_map(|(name, value)| {
            let lowered = name.to_lowercase();
            match whitelist {
                Some(allowed) if !allowed.contains(&lowered) => None,
                _ => Some((lowered, value.clone())),
            }
        })
        .collect()
}
