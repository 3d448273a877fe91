//! # Mirror Engine
//!
//! A deterministic reconciliation engine for mirroring a legacy desktop
//! database into a remote table store.
//!
//! This crate provides the core logic: compare a local table snapshot
//! against a partial remote snapshot keyed on a schema-defined identity, and
//! classify each local record as NEW, CHANGED, or UNCHANGED. The result is
//! the minimal plan of inserts and updates that brings the remote store up
//! to date.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine has no knowledge of files, network, or platform
//! - **Deterministic**: same snapshots always produce the same plan
//! - **Testable**: pure logic, no mocks needed
//! - **Data-driven**: one algorithm, parameterized per table by [`TableSpec`]
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! A [`Record`] is an ordered mapping of column name to scalar [`Value`].
//! Local legacy rows carry mixed-case column names; the remote store is
//! always lower-cased, so lookups ignore case and the [`project`] step
//! normalizes names before storage.
//!
//! ### Identity
//!
//! Each table declares identity columns; their joined values form the key
//! that pairs a local record with its remote counterpart. A record without
//! its identity columns is malformed and skipped, never inserted with a
//! null key.
//!
//! ### Reconciliation
//!
//! [`reconcile`] walks the local snapshot once, in input order, against an
//! index built from a partial remote fetch (identity plus mutable status
//! columns only). Rerunning against an up-to-date remote yields an empty
//! plan.
//!
//! ## Quick Start
//!
//! ```rust
//! use mirror_engine::{build_remote_index, reconcile, Record, TableSpec};
//! use serde_json::json;
//!
//! let spec = TableSpec::new("billing", ["serial", "nos"])
//!     .with_status_columns(["status", "redate"])
//!     .with_whitelist(["serial", "nos", "status", "redate", "loan"]);
//!
//! let local: Vec<Record> = vec![
//!     serde_json::from_value(json!({"serial": 1, "nos": 1, "STATUS": "active"})).unwrap(),
//! ];
//! let remote = build_remote_index(Vec::new(), &spec);
//!
//! let plan = reconcile(&local, &remote, &spec).unwrap();
//! assert_eq!(plan.to_insert.len(), 1);
//! assert!(plan.to_update.is_empty());
//! ```

pub mod error;
pub mod project;
pub mod reconcile;
pub mod record;
pub mod schema;
pub mod table;
pub mod value;

// Re-export main types at crate root
pub use error::Error;
pub use project::project;
pub use reconcile::{build_remote_index, reconcile, ReconcileCounts, ReconciliationPlan};
pub use record::Record;
pub use schema::{create_table_sql, Column, ColumnType};
pub use table::{TableSpec, KEY_SEPARATOR};
pub use value::Value;

/// Type aliases for clarity
pub type ColumnName = String;
pub type TableName = String;
pub type KeyString = String;
