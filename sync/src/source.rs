//! Local snapshot source collaborator.
//!
//! The engine never reads the legacy desktop-database file itself; a
//! [`SnapshotSource`] hands it row records and a column schema per table.
//! The concrete implementation here reads the JSON dump the extraction step
//! produces. Test doubles implement the same trait.

use mirror_engine::{Column, Record};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from reading the local snapshot.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read snapshot file '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot file '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("table '{0}' not found in snapshot")]
    TableNotFound(String),
}

/// One table's worth of local data: ordered rows plus the column schema
/// used by the schema-export utility.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSnapshot {
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Record>,
}

/// Source of local table snapshots.
pub trait SnapshotSource {
    /// Fetch one table's snapshot by name.
    fn table(&self, name: &str) -> Result<TableSnapshot, SourceError>;
}

#[derive(Debug, Deserialize)]
struct DumpFile {
    tables: HashMap<String, TableSnapshot>,
}

/// Snapshot source backed by a JSON dump file:
/// `{ "tables": { "<name>": { "columns": [..], "rows": [..] } } }`.
pub struct JsonSnapshot {
    tables: HashMap<String, TableSnapshot>,
}

impl JsonSnapshot {
    /// Read and parse a dump file.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let dump: DumpFile =
            serde_json::from_str(&raw).map_err(|source| SourceError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            tables: dump.tables,
        })
    }
}

impl SnapshotSource for JsonSnapshot {
    fn table(&self, name: &str) -> Result<TableSnapshot, SourceError> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::TableNotFound(name.to_string()))
    }
}
