//! Values, rows and column descriptions.
//!
//! `Value` is used in both directions: cursors return it in result rows and
//! take it as statement bindings.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single result value or statement binding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Decimal(Decimal),
    /// A DuckDB type without its own variant (HUGEINT, INTERVAL, LIST, ...),
    /// carried as DuckDB's type name and its rendered form.
    Other { type_name: String, display: String },
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Any integer variant that fits in an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int8(v) => Some(v.into()),
            Value::Int16(v) => Some(v.into()),
            Value::Int32(v) => Some(v.into()),
            Value::Int64(v) => Some(v),
            Value::UInt8(v) => Some(v.into()),
            Value::UInt16(v) => Some(v.into()),
            Value::UInt32(v) => Some(v.into()),
            Value::UInt64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Renders values the way `duckdb-run` prints result cells.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int8(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::UInt8(v) => write!(f, "{v}"),
            Value::UInt16(v) => write!(f, "{v}"),
            Value::UInt32(v) => write!(f, "{v}"),
            Value::UInt64(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
            Value::Bytes(b) => write!(f, "\\x{}", hex::encode(b)),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.f")),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.f")),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::Other { display, .. } => f.write_str(display),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// One entry of a cursor's description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// DuckDB's name for the column type
    pub type_name: String,
    /// Zero-based position in the result
    pub ordinal: usize,
}

impl ColumnInfo {
    pub fn new(name: String, type_name: String, ordinal: usize) -> Self {
        Self {
            name,
            type_name,
            ordinal,
        }
    }
}

/// One result row, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    pub fn from_values(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Int64(-123).to_string(), "-123");
        assert_eq!(Value::Text("hello".to_string()).to_string(), "hello");
        assert_eq!(Value::Bytes(vec![0xDE, 0xAD]).to_string(), "\\xdead");
        assert_eq!(
            Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()).to_string(),
            "2024-02-29"
        );
        assert_eq!(Value::Decimal("12.50".parse().unwrap()).to_string(), "12.50");
        let interval = Value::Other {
            type_name: "interval".to_string(),
            display: "1 months 0 days 0 ns".to_string(),
        };
        assert_eq!(interval.to_string(), "1 months 0 days 0 ns");
    }

    #[test]
    fn test_value_from_option() {
        assert_eq!(Value::from(Some(42)), Value::Int32(42));
        assert!(Value::from(Option::<&str>::None).is_null());
    }

    #[test]
    fn test_as_i64_widens() {
        assert_eq!(Value::Int8(-3).as_i64(), Some(-3));
        assert_eq!(Value::UInt32(7).as_i64(), Some(7));
        assert_eq!(Value::UInt64(u64::MAX).as_i64(), None);
        assert_eq!(Value::Text("1".to_string()).as_i64(), None);
    }

    #[test]
    fn test_row_access() {
        let row = Row::from_values(vec![Value::Int32(1), Value::from("a")]);
        assert_eq!(row.values.len(), 2);
        assert_eq!(row.get(1).and_then(Value::as_str), Some("a"));
        assert_eq!(row.get(2), None);
        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
        assert_eq!(cells, ["1", "a"]);
    }
}
