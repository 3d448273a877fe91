//! Per-table sync configuration and identity-key extraction.

use crate::{error::Result, ColumnName, Error, KeyString, Record, TableName};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Separator between identity column values in a key string.
pub const KEY_SEPARATOR: &str = "-";

/// Static configuration for syncing one table.
///
/// `status_columns` must list every column whose change should trigger an
/// update; the same list forms the update payload. All column names are
/// normalized to lower case at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSpec {
    /// Table name on both sides
    pub table: TableName,
    /// Columns whose joined values identify a logical entity
    pub key_columns: Vec<ColumnName>,
    /// Mutable columns compared for change detection and sent on update
    pub status_columns: Vec<ColumnName>,
    /// Columns kept on insert; `None` passes all columns through, lower-cased
    pub whitelist: Option<HashSet<ColumnName>>,
    /// Whether remote-side fields unknown to the snapshot are left untouched
    pub preserve_remote_fields: bool,
}

impl TableSpec {
    /// Create a spec with identity columns only (insert-only table).
    pub fn new(
        table: impl Into<TableName>,
        key_columns: impl IntoIterator<Item = impl Into<ColumnName>>,
    ) -> Self {
        Self {
            table: table.into(),
            key_columns: lowercase_all(key_columns),
            status_columns: Vec::new(),
            whitelist: None,
            preserve_remote_fields: true,
        }
    }

    /// Builder-style method to set the mutable status columns.
    pub fn with_status_columns(
        mut self,
        columns: impl IntoIterator<Item = impl Into<ColumnName>>,
    ) -> Self {
        self.status_columns = lowercase_all(columns);
        self
    }

    /// Builder-style method to set the insert whitelist.
    pub fn with_whitelist(
        mut self,
        columns: impl IntoIterator<Item = impl Into<ColumnName>>,
    ) -> Self {
        self.whitelist = Some(lowercase_all(columns).into_iter().collect());
        self
    }

    /// Builder-style method to set remote-field preservation.
    ///
    /// When cleared, updates carry the full projected local row instead of
    /// identity plus status columns, overwriting remote-side fields.
    pub fn with_preserve_remote_fields(mut self, preserve: bool) -> Self {
        self.preserve_remote_fields = preserve;
        self
    }

    /// Columns needed from the remote store for a partial snapshot:
    /// identity columns plus mutable status columns.
    pub fn remote_columns(&self) -> Vec<ColumnName> {
        let mut columns = self.key_columns.clone();
        columns.extend(self.status_columns.iter().cloned());
        columns
    }

    /// Compute the identity key for a record.
    ///
    /// Joins the identity column values with [`KEY_SEPARATOR`]. A missing or
    /// null identity column is a [`Error::MissingKeyColumn`].
    pub fn identity_key(&self, record: &Record) -> Result<KeyString> {
        let mut parts = Vec::with_capacity(self.key_columns.len());
        for column in &self.key_columns {
            let part = record
                .get_ci(column)
                .and_then(|v| v.key_part())
                .ok_or_else(|| Error::MissingKeyColumn {
                    table: self.table.clone(),
                    column: column.clone(),
                })?;
            parts.push(part);
        }
        Ok(parts.join(KEY_SEPARATOR))
    }
}

fn lowercase_all(
    columns: impl IntoIterator<Item = impl Into<ColumnName>>,
) -> Vec<ColumnName> {
    columns
        .into_iter()
        .map(|c| c.into().to_lowercase())
        .collect()
}
