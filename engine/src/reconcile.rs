//! Reconciliation logic: classify local records against a remote index.
//!
//! This is the core of the engine. Given the full local record set for a
//! table and a partial remote snapshot keyed by identity, it computes the
//! minimal plan of inserts and updates that brings the remote store up to
//! date.
//!
//! # Algorithm
//!
//! 1. Iterate local records once, in input order (output order follows)
//! 2. Extract the identity key; missing or null key columns mark the record
//!    malformed and skip it
//! 3. Key absent from the remote index: NEW, project and queue for insert
//! 4. Key present: compare every mutable status column, loosely on value and
//!    case-insensitively on column name; any difference queues an update,
//!    none drops the record from the plan
//! 5. A duplicate local key aborts the table with no partial plan

use crate::{error::Result, project, Error, KeyString, Record, TableSpec, Value};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// How each local record was classified during one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileCounts {
    /// Records absent from the remote index
    pub new: usize,
    /// Records whose mutable status columns differ from remote
    pub changed: usize,
    /// Records identical to remote, dropped from the plan
    pub unchanged: usize,
    /// Records skipped for missing or null identity columns
    pub malformed: usize,
}

impl ReconcileCounts {
    /// Total local records examined.
    pub fn total(&self) -> usize {
        self.new + self.changed + self.unchanged + self.malformed
    }
}

/// Output of one reconciliation pass.
///
/// A given identity key appears in at most one of the two sequences, and at
/// most once within either.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationPlan {
    /// New records, projected through the table whitelist, in input order
    pub to_insert: Vec<Record>,
    /// Changed records: identity columns plus current local status values
    pub to_update: Vec<Record>,
    /// Classification counts for reporting
    pub counts: ReconcileCounts,
}

impl ReconciliationPlan {
    /// Check whether the plan carries no work.
    pub fn is_empty(&self) -> bool {
        self.to_insert.is_empty() && self.to_update.is_empty()
    }
}

/// Build the identity-keyed index from a partial remote fetch.
///
/// Remote rows are written only by this engine, so their identity columns
/// are expected to be present; a row without them cannot match anything and
/// is dropped from the index.
pub fn build_remote_index(rows: Vec<Record>, spec: &TableSpec) -> HashMap<KeyString, Record> {
    rows.into_iter()
        .filter_map(|row| spec.identity_key(&row).ok().map(|key| (key, row)))
        .collect()
}

/// Reconcile a local snapshot against a remote index.
///
/// Pure and deterministic: the same inputs always produce the same plan.
/// Fails only on a duplicate identity key within the local snapshot, which
/// is fatal for the table.
pub fn reconcile(
    local: &[Record],
    remote_index: &HashMap<KeyString, Record>,
    spec: &TableSpec,
) -> Result<ReconciliationPlan> {
    let mut plan = ReconciliationPlan::default();
    let mut seen: HashSet<KeyString> = HashSet::with_capacity(local.len());

    for record in local {
        let key = match spec.identity_key(record) {
            Ok(key) => key,
            Err(Error::MissingKeyColumn { .. }) => {
                plan.counts.malformed += 1;
                continue;
            }
            Err(err) => return Err(err),
        };

        if !seen.insert(key.clone()) {
            return Err(Error::DuplicateKey {
                table: spec.table.clone(),
                key,
            });
        }

        match remote_index.get(&key) {
            None => {
                plan.to_insert
                    .push(project(record, spec.whitelist.as_ref()));
                plan.counts.new += 1;
            }
            Some(remote) if status_changed(record, remote, spec) => {
                plan.to_update.push(update_entry(record, spec));
                plan.counts.changed += 1;
            }
            Some(_) => {
                plan.counts.unchanged += 1;
            }
        }
    }

    Ok(plan)
}

/// Compare every mutable status column between local and remote.
///
/// Column lookup ignores case on both sides; values compare via
/// [`Value::loose_eq`] with a missing column treated as null.
fn status_changed(local: &Record, remote: &Record, spec: &TableSpec) -> bool {
    spec.status_columns.iter().any(|column| {
        let local_value = local.get_ci(column).unwrap_or(&Value::Null);
        let remote_value = remote.get_ci(column).unwrap_or(&Value::Null);
        !local_value.loose_eq(remote_value)
    })
}

/// Build an update entry: identity columns plus the current local values of
/// all mutable status columns, lower-cased.
///
/// With remote-field preservation cleared, the entry is instead the full
/// projected local row, so the upsert overwrites remote-side fields.
fn update_entry(local: &Record, spec: &TableSpec) -> Record {
    if !spec.preserve_remote_fields {
        return project(local, spec.whitelist.as_ref());
    }

    spec.key_columns
        .iter()
        .chain(spec.status_columns.iter())
        .map(|column| {
            let value = local.get_ci(column).cloned().unwrap_or(Value::Null);
            (column.clone(), value)
        })
        .collect()
}
