//! Source column schema and destination type mapping.
//!
//! The legacy reader reports a column schema alongside each table's rows.
//! This module maps those source column types onto PostgreSQL types and can
//! render a `CREATE TABLE` statement, for bootstrapping the remote side.

use serde::{Deserialize, Serialize};

/// Column types reported by the legacy desktop-database reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    Text,
    LongInteger,
    Double,
    Boolean,
    DateTime,
    Currency,
    Memo,
    Byte,
    Integer,
    Guid,
    Binary,
    /// Anything the reader reports that has no dedicated mapping
    Unknown,
}

impl From<String> for ColumnType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Text" => ColumnType::Text,
            "LongInteger" => ColumnType::LongInteger,
            "Double" => ColumnType::Double,
            "Boolean" => ColumnType::Boolean,
            "DateTime" => ColumnType::DateTime,
            "Currency" => ColumnType::Currency,
            "Memo" => ColumnType::Memo,
            "Byte" => ColumnType::Byte,
            "Integer" => ColumnType::Integer,
            "Guid" => ColumnType::Guid,
            "Binary" => ColumnType::Binary,
            _ => ColumnType::Unknown,
        }
    }
}

impl From<ColumnType> for String {
    fn from(t: ColumnType) -> Self {
        let name = match t {
            ColumnType::Text => "Text",
            ColumnType::LongInteger => "LongInteger",
            ColumnType::Double => "Double",
            ColumnType::Boolean => "Boolean",
            ColumnType::DateTime => "DateTime",
            ColumnType::Currency => "Currency",
            ColumnType::Memo => "Memo",
            ColumnType::Byte => "Byte",
            ColumnType::Integer => "Integer",
            ColumnType::Guid => "Guid",
            ColumnType::Binary => "Binary",
            ColumnType::Unknown => "Unknown",
        };
        name.to_string()
    }
}

/// One column of a source table's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column name as reported by the reader
    pub name: String,
    /// Source column type
    pub column_type: ColumnType,
    /// Whether the source column allows nulls
    pub nullable: bool,
    /// Declared length for text columns
    pub length: Option<u32>,
}

impl Column {
    /// PostgreSQL type for this column.
    pub fn postgres_type(&self) -> String {
        match self.column_type {
            ColumnType::Text => format!("VARCHAR({})", self.length.unwrap_or(255)),
            ColumnType::LongInteger => "INTEGER".to_string(),
            ColumnType::Double => "DOUBLE PRECISION".to_string(),
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::DateTime => "TIMESTAMP".to_string(),
            ColumnType::Currency => "MONEY".to_string(),
            ColumnType::Memo => "TEXT".to_string(),
            ColumnType::Byte | ColumnType::Integer => "SMALLINT".to_string(),
            ColumnType::Guid => "UUID".to_string(),
            ColumnType::Binary => "BYTEA".to_string(),
            ColumnType::Unknown => "TEXT".to_string(),
        }
    }
}

/// Render a `CREATE TABLE` statement for a source table's schema.
pub fn create_table_sql(table: &str, columns: &[Column]) -> String {
    let defs: Vec<String> = columns
        .iter()
        .map(|col| {
            let nullable = if col.nullable { "" } else { " NOT NULL" };
            format!("\"{}\" {}{}", col.name, col.postgres_type(), nullable)
        })
        .collect();

    format!("CREATE TABLE \"{}\" (\n  {}\n);", table, defs.join(",\n  "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, column_type: ColumnType, nullable: bool, length: Option<u32>) -> Column {
        Column {
            name: name.to_string(),
            column_type,
            nullable,
            length,
        }
    }

    #[test]
    fn type_mapping() {
        assert_eq!(
            column("name", ColumnType::Text, true, Some(50)).postgres_type(),
            "VARCHAR(50)"
        );
        assert_eq!(
            column("name", ColumnType::Text, true, None).postgres_type(),
            "VARCHAR(255)"
        );
        assert_eq!(
            column("serial", ColumnType::LongInteger, false, None).postgres_type(),
            "INTEGER"
        );
        assert_eq!(
            column("loan", ColumnType::Currency, true, None).postgres_type(),
            "MONEY"
        );
        assert_eq!(
            column("blob", ColumnType::Unknown, true, None).postgres_type(),
            "TEXT"
        );
    }

    #[test]
    fn unknown_type_name_deserializes_to_unknown() {
        let t: ColumnType = serde_json::from_str("\"OleObject\"").unwrap();
        assert_eq!(t, ColumnType::Unknown);

        let t: ColumnType = serde_json::from_str("\"DateTime\"").unwrap();
        assert_eq!(t, ColumnType::DateTime);
    }

    #[test]
    fn create_table_statement() {
        let columns = vec![
            column("serial", ColumnType::LongInteger, false, None),
            column("des", ColumnType::Text, true, Some(80)),
        ];

        let sql = create_table_sql("itemdes", &columns);
        assert_eq!(
            sql,
            "CREATE TABLE \"itemdes\" (\n  \"serial\" INTEGER NOT NULL,\n  \"des\" VARCHAR(80)\n);"
        );
    }
}
