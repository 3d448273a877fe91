//! The sync orchestrator.
//!
//! Runs each table job in its fixed sequence: fetch the remote partial
//! snapshot, load the local snapshot, reconcile, then submit the plan as a
//! bulk insert followed by a bulk upsert. Tables are strictly sequential
//! and independent: one table's failure is recorded in the report and the
//! run continues with the next.

use crate::error::SyncError;
use crate::remote::RemoteStore;
use crate::source::SnapshotSource;
use crate::tables::{DateFloor, TableJob};
use mirror_engine::{build_remote_index, reconcile, Record};
use serde::Serialize;

/// Outcome of one table's sync.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReport {
    pub table: String,
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub malformed: usize,
    /// Present when the table's sync was aborted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TableReport {
    fn failed(table: String, error: &SyncError) -> Self {
        Self {
            table,
            inserted: 0,
            updated: 0,
            unchanged: 0,
            malformed: 0,
            error: Some(error.to_string()),
        }
    }
}

/// Aggregated outcome of one orchestrator run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub tables: Vec<TableReport>,
}

impl SyncReport {
    /// Check whether any table failed.
    pub fn failed(&self) -> bool {
        self.tables.iter().any(|t| t.error.is_some())
    }
}

/// Runs table jobs against injected collaborators.
///
/// Holds no state between runs: all memory of prior syncs lives in the
/// remote store itself.
pub struct Orchestrator<'a> {
    remote: &'a dyn RemoteStore,
    source: &'a dyn SnapshotSource,
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator over the given collaborators.
    pub fn new(remote: &'a dyn RemoteStore, source: &'a dyn SnapshotSource) -> Self {
        Self { remote, source }
    }

    /// Run every job, in the given order, and aggregate the per-table
    /// reports. Never fails as a whole.
    pub async fn run_all(&self, jobs: &[TableJob]) -> SyncReport {
        let mut report = SyncReport::default();

        for job in jobs {
            let table = job.spec.table.clone();
            match self.run_table(job).await {
                Ok(table_report) => report.tables.push(table_report),
                Err(err) => {
                    tracing::error!(table = %table, error = %err, "table sync failed");
                    report.tables.push(TableReport::failed(table, &err));
                }
            }
        }

        report
    }

    async fn run_table(&self, job: &TableJob) -> Result<TableReport, SyncError> {
        let spec = &job.spec;
        let table = spec.table.as_str();

        let remote_rows = self
            .remote
            .select(table, &spec.remote_columns())
            .await
            .map_err(|source| SyncError::Fetch {
                table: table.to_string(),
                source,
            })?;
        let remote_index = build_remote_index(remote_rows, spec);

        let snapshot = self
            .source
            .table(table)
            .map_err(|source| SyncError::Source {
                table: table.to_string(),
                source,
            })?;
        let local = apply_date_floor(snapshot.rows, job.date_floor.as_ref());

        let plan = reconcile(&local, &remote_index, spec)?;
        if plan.counts.malformed > 0 {
            tracing::warn!(
                table,
                malformed = plan.counts.malformed,
                "skipped records with missing identity columns"
            );
        }

        if !plan.to_insert.is_empty() {
            self.remote
                .insert(table, &plan.to_insert)
                .await
                .map_err(|source| SyncError::Submission {
                    table: table.to_string(),
                    operation: "insert",
                    source,
                })?;
        }

        if !plan.to_update.is_empty() {
            self.remote
                .upsert(table, &plan.to_update, &spec.key_columns)
                .await
                .map_err(|source| SyncError::Submission {
                    table: table.to_string(),
                    operation: "upsert",
                    source,
                })?;
        }

        tracing::info!(
            table,
            inserted = plan.counts.new,
            updated = plan.counts.changed,
            unchanged = plan.counts.unchanged,
            malformed = plan.counts.malformed,
            "table synced"
        );

        Ok(TableReport {
            table: table.to_string(),
            inserted: plan.counts.new,
            updated: plan.counts.changed,
            unchanged: plan.counts.unchanged,
            malformed: plan.counts.malformed,
            error: None,
        })
    }
}

/// Drop rows older than the floor date.
///
/// Rows without a parseable date in the floor column are dropped too,
/// matching the legacy extractor's filter semantics.
fn apply_date_floor(rows: Vec<Record>, floor: Option<&DateFloor>) -> Vec<Record> {
    let Some(floor) = floor else {
        return rows;
    };

    rows.into_iter()
        .filter(|row| {
            row.get_ci(&floor.column)
                .and_then(|value| value.as_instant())
                .is_some_and(|instant| instant.date() >= floor.floor)
        })
        .collect()
}
