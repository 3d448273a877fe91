//! Scalar cell values and loose (representation-normalizing) equality.
//!
//! The local snapshot and the remote store render the same logical value in
//! different shapes: the legacy reader hands out floats where the remote has
//! integers, and dates arrive as differently formatted strings. Change
//! detection must compare values as values, not as their serialized text, so
//! equality here normalizes the representation first.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A scalar cell value in a record.
///
/// Untagged serde representation: rows from a JSON dump deserialize directly,
/// with date-like strings captured as [`Value::Timestamp`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Timestamp(NaiveDateTime),
    Text(String),
}

impl Value {
    /// Check whether this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Render this value as an identity-key segment.
    ///
    /// Returns `None` for null, which the caller treats as a missing
    /// identity column.
    pub fn key_part(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(n) => Some(n.to_string()),
            Value::Float(n) => Some(n.to_string()),
            Value::Timestamp(t) => Some(t.format("%Y-%m-%dT%H:%M:%S").to_string()),
            Value::Text(s) => Some(s.clone()),
        }
    }

    /// Interpret this value as a calendar instant, if possible.
    pub fn as_instant(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(t) => Some(*t),
            Value::Text(s) => parse_instant(s),
            _ => None,
        }
    }

    /// Value equality after normalizing the type representation.
    ///
    /// Integers and floats compare numerically, timestamps compare as
    /// calendar instants against parseable date text, and numeric text
    /// compares numerically against numbers. Everything else falls back to
    /// structural equality.
    pub fn loose_eq(&self, other: &Value) -> bool {
        use Value::*;

        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Int(a), Float(b)) | (Float(b), Int(a)) => (*a as f64) == *b,
            (Timestamp(a), Timestamp(b)) => a == b,
            (Timestamp(a), Text(s)) | (Text(s), Timestamp(a)) => {
                parse_instant(s).is_some_and(|b| *a == b)
            }
            (Text(a), Text(b)) => {
                if let (Some(x), Some(y)) = (parse_instant(a), parse_instant(b)) {
                    return x == y;
                }
                a == b
            }
            (Text(s), Int(n)) | (Int(n), Text(s)) => {
                s.trim().parse::<i64>().is_ok_and(|v| v == *n)
            }
            (Text(s), Float(n)) | (Float(n), Text(s)) => {
                s.trim().parse::<f64>().is_ok_and(|v| v == *n)
            }
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}

/// Parse date text in the formats the two systems actually emit.
///
/// Accepts RFC 3339 (normalized to UTC), ISO date-time with a `T` or space
/// separator, and bare dates (taken as midnight).
fn parse_instant(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }

    None
}
