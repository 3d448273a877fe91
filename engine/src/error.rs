//! Error types for the Mirror engine.

use crate::{ColumnName, KeyString, TableName};
use thiserror::Error;

/// All possible errors from the Mirror engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// An identity column is missing or null on a local record.
    ///
    /// Non-fatal: the reconciler counts the record as malformed and skips it.
    #[error("table '{table}': identity column '{column}' is missing or null")]
    MissingKeyColumn {
        table: TableName,
        column: ColumnName,
    },

    /// Two local records resolved to the same identity key.
    ///
    /// Fatal for the table: no partial plan is produced.
    #[error("table '{table}': duplicate identity key '{key}' in local snapshot")]
    DuplicateKey { table: TableName, key: KeyString },
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::MissingKeyColumn {
            table: "billing".into(),
            column: "nos".into(),
        };
        assert_eq!(
            err.to_string(),
            "table 'billing': identity column 'nos' is missing or null"
        );

        let err = Error::DuplicateKey {
            table: "billing".into(),
            key: "1-1".into(),
        };
        assert_eq!(
            err.to_string(),
            "table 'billing': duplicate identity key '1-1' in local snapshot"
        );
    }
}
