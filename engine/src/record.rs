//! Row records: ordered column-name → value mappings.
//!
//! Column order is preserved from the input so reconciliation output stays
//! deterministic for logging and test fixtures. Lookup is case-insensitive
//! because the legacy snapshot carries mixed-case column names while the
//! remote store is always lower-cased.

use crate::{ColumnName, Value};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One row from either the local snapshot or the remote store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    columns: Vec<(ColumnName, Value)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check whether the record has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Set a column value, replacing any existing column with the same
    /// (exact) name while keeping its position.
    pub fn insert(&mut self, name: impl Into<ColumnName>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.columns.push((name, value)),
        }
    }

    /// Get a column value by exact name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Get a column value by case-insensitive name.
    pub fn get_ci(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Check for a column by case-insensitive name.
    pub fn contains_ci(&self, name: &str) -> bool {
        self.get_ci(name).is_some()
    }

    /// Iterate columns in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Iterate column names in input order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }
}

impl FromIterator<(ColumnName, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (ColumnName, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of column names to scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
                let mut record = Record::new();
                while let Some((name, value)) = access.next_entry::<ColumnName, Value>()? {
                    record.insert(name, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_and_lookup() {
        let mut record = Record::new();
        record.insert("SERIAL", 1i64);
        record.insert("STATUS", "active");

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("SERIAL"), Some(&Value::Int(1)));
        assert_eq!(record.get("serial"), None);
        assert_eq!(record.get_ci("serial"), Some(&Value::Int(1)));
        assert!(record.contains_ci("Status"));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut record = Record::new();
        record.insert("status", "active");
        record.insert("redate", Value::Null);
        record.insert("status", "closed");

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("status"), Some(&Value::Text("closed".into())));
        // Position kept: status is still first.
        assert_eq!(record.column_names().next(), Some("status"));
    }

    #[test]
    fn preserves_input_order() {
        let record: Record = serde_json::from_value(json!({
            "serial": 1, "nos": 2, "STATUS": "active", "loan": 500.0
        }))
        .unwrap();

        let names: Vec<_> = record.column_names().collect();
        assert_eq!(names, vec!["serial", "nos", "STATUS", "loan"]);
    }

    #[test]
    fn order_survives_a_detour_through_json_values() {
        // Dump rows arrive as serde_json::Value before they become Records;
        // the intermediate map must not reorder keys alphabetically.
        let record: Record = serde_json::from_value(json!({
            "serial": 1, "nos": 2, "date": "2024-01-01", "code": "c7", "area": "west"
        }))
        .unwrap();
        assert_eq!(
            record.column_names().collect::<Vec<_>>(),
            vec!["serial", "nos", "date", "code", "area"]
        );

        let value = serde_json::to_value(&record).unwrap();
        let back: Record = serde_json::from_value(value).unwrap();
        assert_eq!(record, back);
    }

    #[test]
    fn serialization_roundtrip() {
        let record: Record = serde_json::from_value(json!({
            "serial": 1,
            "name": "kumar",
            "date": "2020-03-01T00:00:00",
            "redate": null
        }))
        .unwrap();

        let text = serde_json::to_string(&record).unwrap();
        let parsed: Record = serde_json::from_str(&text).unwrap();
        assert_eq!(record, parsed);
    }
}
