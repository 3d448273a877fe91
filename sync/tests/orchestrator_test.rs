//! Orchestrator tests against in-memory collaborators.
//!
//! The remote store and snapshot source are trait objects, so these tests
//! drive full runs without touching the network or the filesystem.

use async_trait::async_trait;
use chrono::NaiveDate;
use mirror_engine::{Record, TableSpec, Value};
use mirror_sync::remote::{RemoteError, RemoteStore};
use mirror_sync::runner::Orchestrator;
use mirror_sync::source::{SnapshotSource, SourceError, TableSnapshot};
use mirror_sync::tables::{default_jobs, DateFloor, TableJob};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

fn record(value: serde_json::Value) -> Record {
    serde_json::from_value(value).unwrap()
}

/// In-memory remote store keyed the way the real one is.
#[derive(Default)]
struct MockRemote {
    tables: Mutex<HashMap<String, Vec<Record>>>,
    fail_select: HashSet<String>,
    fail_insert: HashSet<String>,
}

impl MockRemote {
    fn with_rows(table: &str, rows: Vec<Record>) -> Self {
        let remote = Self::default();
        remote.tables.lock().unwrap().insert(table.to_string(), rows);
        remote
    }

    fn rows(&self, table: &str) -> Vec<Record> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    fn rejected() -> RemoteError {
        RemoteError::Rejected {
            status: 503,
            body: "unavailable".to_string(),
        }
    }
}

#[async_trait]
impl RemoteStore for MockRemote {
    async fn select(&self, table: &str, columns: &[String]) -> Result<Vec<Record>, RemoteError> {
        if self.fail_select.contains(table) {
            return Err(Self::rejected());
        }
        // Partial select: only the requested columns come back.
        let rows = self
            .rows(table)
            .into_iter()
            .map(|row| {
                row.iter()
                    .filter(|(name, _)| columns.iter().any(|c| c == name))
                    .map(|(name, value)| (name.to_string(), value.clone()))
                    .collect()
            })
            .collect();
        Ok(rows)
    }

    async fn insert(&self, table: &str, rows: &[Record]) -> Result<(), RemoteError> {
        if self.fail_insert.contains(table) {
            return Err(Self::rejected());
        }
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .extend(rows.iter().cloned());
        Ok(())
    }

    async fn upsert(
        &self,
        table: &str,
        rows: &[Record],
        conflict_columns: &[String],
    ) -> Result<(), RemoteError> {
        let key = |row: &Record| -> Vec<Value> {
            conflict_columns
                .iter()
                .map(|c| row.get_ci(c).cloned().unwrap_or(Value::Null))
                .collect()
        };

        let mut tables = self.tables.lock().unwrap();
        let stored = tables.entry(table.to_string()).or_default();
        for incoming in rows {
            match stored.iter_mut().find(|row| key(row) == key(incoming)) {
                Some(existing) => {
                    for (name, value) in incoming.iter() {
                        existing.insert(name.to_string(), value.clone());
                    }
                }
                None => stored.push(incoming.clone()),
            }
        }
        Ok(())
    }
}

/// In-memory snapshot source.
#[derive(Default)]
struct MockSource {
    tables: HashMap<String, TableSnapshot>,
}

impl MockSource {
    fn with_rows(mut self, table: &str, rows: Vec<Record>) -> Self {
        self.tables.insert(
            table.to_string(),
            TableSnapshot {
                columns: Vec::new(),
                rows,
            },
        );
        self
    }
}

impl SnapshotSource for MockSource {
    fn table(&self, name: &str) -> Result<TableSnapshot, SourceError> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::TableNotFound(name.to_string()))
    }
}

fn since() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

#[tokio::test]
async fn full_run_inserts_and_updates() {
    let remote = MockRemote::with_rows(
        "billing",
        vec![record(
            json!({"serial": 1, "nos": 1, "status": "active", "redate": null, "loan": 500}),
        )],
    );
    let source = MockSource::default()
        .with_rows(
            "billing",
            vec![
                // Existing loan, released since the last run.
                record(json!({
                    "serial": 1, "nos": 1, "date": "2023-01-10",
                    "STATUS": "released", "REDATE": "2024-05-01"
                })),
                // Brand new loan.
                record(json!({
                    "serial": 2, "nos": 1, "date": "2024-02-02",
                    "STATUS": "active", "GSTNO": "not-whitelisted"
                })),
                // Too old: filtered by the date floor.
                record(json!({
                    "serial": 9, "nos": 9, "date": "2015-03-03", "STATUS": "active"
                })),
            ],
        )
        .with_rows("customermaster", vec![record(json!({"CODE": "c1", "NAME": "kumar"}))]);

    let orchestrator = Orchestrator::new(&remote, &source);
    let report = orchestrator.run_all(&default_jobs(since())).await;

    assert!(!report.failed());
    assert_eq!(report.tables.len(), 2);

    let billing = &report.tables[0];
    assert_eq!(billing.inserted, 1);
    assert_eq!(billing.updated, 1);
    assert_eq!(billing.unchanged, 0);

    let customers = &report.tables[1];
    assert_eq!(customers.inserted, 1);

    // The update landed on the existing remote row.
    let rows = remote.rows("billing");
    assert_eq!(rows.len(), 2);
    let released = rows
        .iter()
        .find(|r| r.get_ci("serial") == Some(&Value::Int(1)))
        .unwrap();
    assert_eq!(
        released.get_ci("status"),
        Some(&Value::Text("released".into()))
    );
    // Upsert carried only identity + status columns; loan is untouched.
    assert_eq!(released.get_ci("loan"), Some(&Value::Int(500)));

    // The insert was projected: non-whitelisted column dropped.
    let inserted = rows
        .iter()
        .find(|r| r.get_ci("serial") == Some(&Value::Int(2)))
        .unwrap();
    assert!(inserted.get_ci("gstno").is_none());
}

#[tokio::test]
async fn second_run_is_empty() {
    let remote = MockRemote::default();
    let source = MockSource::default()
        .with_rows(
            "billing",
            vec![record(json!({
                "serial": 1, "nos": 1, "date": "2024-01-01", "STATUS": "active"
            }))],
        )
        .with_rows("customermaster", vec![record(json!({"CODE": "c1"}))]);

    let orchestrator = Orchestrator::new(&remote, &source);
    let jobs = default_jobs(since());

    let first = orchestrator.run_all(&jobs).await;
    assert_eq!(first.tables[0].inserted, 1);

    let second = orchestrator.run_all(&jobs).await;
    assert!(!second.failed());
    assert_eq!(second.tables[0].inserted, 0);
    assert_eq!(second.tables[0].updated, 0);
    assert_eq!(second.tables[0].unchanged, 1);
    assert_eq!(second.tables[1].inserted, 0);

    assert_eq!(remote.rows("billing").len(), 1);
}

#[tokio::test]
async fn failing_table_does_not_abort_the_run() {
    let mut remote = MockRemote::default();
    remote.fail_select.insert("billing".to_string());
    let source = MockSource::default()
        .with_rows(
            "billing",
            vec![record(json!({
                "serial": 1, "nos": 1, "date": "2024-01-01", "STATUS": "active"
            }))],
        )
        .with_rows("customermaster", vec![record(json!({"CODE": "c1"}))]);

    let orchestrator = Orchestrator::new(&remote, &source);
    let report = orchestrator.run_all(&default_jobs(since())).await;

    assert!(report.failed());

    let billing = &report.tables[0];
    assert!(billing.error.as_deref().unwrap().contains("billing"));
    assert_eq!(billing.inserted, 0);

    // customermaster still synced.
    let customers = &report.tables[1];
    assert!(customers.error.is_none());
    assert_eq!(customers.inserted, 1);
    assert_eq!(remote.rows("customermaster").len(), 1);
}

#[tokio::test]
async fn rejected_insert_is_reported_as_submission_failure() {
    let mut remote = MockRemote::default();
    remote.fail_insert.insert("customermaster".to_string());
    let source = MockSource::default()
        .with_rows("billing", vec![])
        .with_rows("customermaster", vec![record(json!({"CODE": "c1"}))]);

    let orchestrator = Orchestrator::new(&remote, &source);
    let report = orchestrator.run_all(&default_jobs(since())).await;

    assert!(report.failed());
    let customers = &report.tables[1];
    let message = customers.error.as_deref().unwrap();
    assert!(message.contains("insert submission rejected"), "{message}");
}

#[tokio::test]
async fn duplicate_local_key_fails_only_that_table() {
    let remote = MockRemote::default();
    let source = MockSource::default()
        .with_rows(
            "billing",
            vec![
                record(json!({"serial": 1, "nos": 1, "date": "2024-01-01", "STATUS": "a"})),
                record(json!({"serial": 1, "nos": 1, "date": "2024-01-02", "STATUS": "b"})),
            ],
        )
        .with_rows("customermaster", vec![record(json!({"CODE": "c1"}))]);

    let orchestrator = Orchestrator::new(&remote, &source);
    let report = orchestrator.run_all(&default_jobs(since())).await;

    assert!(report.failed());
    let billing = &report.tables[0];
    assert!(billing.error.as_deref().unwrap().contains("1-1"));
    // No partial plan was submitted.
    assert!(remote.rows("billing").is_empty());

    assert!(report.tables[1].error.is_none());
}

#[tokio::test]
async fn missing_source_table_is_isolated() {
    let remote = MockRemote::default();
    // Only customermaster exists in the dump.
    let source = MockSource::default().with_rows("customermaster", vec![record(json!({"CODE": "c1"}))]);

    let orchestrator = Orchestrator::new(&remote, &source);
    let report = orchestrator.run_all(&default_jobs(since())).await;

    assert!(report.failed());
    assert!(report.tables[0].error.is_some());
    assert!(report.tables[1].error.is_none());
}

#[tokio::test]
async fn custom_job_without_date_floor_syncs_all_rows() {
    let remote = MockRemote::default();
    let source = MockSource::default().with_rows(
        "itemdes",
        vec![
            record(json!({"serial": 1, "des": "ring"})),
            record(json!({"serial": 2, "des": "chain"})),
        ],
    );

    let jobs = vec![TableJob {
        spec: TableSpec::new("itemdes", ["serial"]),
        date_floor: None,
    }];

    let orchestrator = Orchestrator::new(&remote, &source);
    let report = orchestrator.run_all(&jobs).await;

    assert!(!report.failed());
    assert_eq!(report.tables[0].inserted, 2);
    assert_eq!(remote.rows("itemdes").len(), 2);
}

#[tokio::test]
async fn date_floor_respects_configured_column() {
    let remote = MockRemote::default();
    let source = MockSource::default().with_rows(
        "billing",
        vec![
            record(json!({"serial": 1, "nos": 1, "bought": "2024-01-01", "STATUS": "a"})),
            record(json!({"serial": 2, "nos": 1, "bought": "2010-01-01", "STATUS": "a"})),
        ],
    );

    let jobs = vec![TableJob {
        spec: TableSpec::new("billing", ["serial", "nos"]).with_status_columns(["status"]),
        date_floor: Some(DateFloor {
            column: "bought".to_string(),
            floor: since(),
        }),
    }];

    let orchestrator = Orchestrator::new(&remote, &source);
    let report = orchestrator.run_all(&jobs).await;

    assert_eq!(report.tables[0].inserted, 1);
}
