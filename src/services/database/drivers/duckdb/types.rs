//! DuckDB value type conversions.
//!
//! Results are converted from DuckDB's `ValueRef` into the unified `Value`;
//! statement bindings go the other way into `duckdb::types::Value`.

use chrono::{NaiveDate, Timelike};
use duckdb::Row;
use duckdb::types::{TimeUnit, Value as DuckValue, ValueRef};
use rust_decimal::Decimal;

use crate::services::database::traits::{ColumnInfo, Row as TraitRow, Value};

/// Converter between DuckDB values and unified `Value`s.
pub struct DuckDbValueConverter;

impl DuckDbValueConverter {
    /// Convert a DuckDB row to a trait Row.
    pub fn convert_row(duckdb_row: &Row<'_>, column_count: usize) -> TraitRow {
        let values: Vec<Value> = (0..column_count)
            .map(|i| Self::extract_value(duckdb_row, i))
            .collect();

        TraitRow::from_values(values)
    }

    /// Build column info from an executed DuckDB statement.
    pub fn build_column_info(stmt: &duckdb::Statement<'_>) -> Vec<ColumnInfo> {
        let count = stmt.column_count();
        (0..count)
            .map(|i| {
                let name = stmt
                    .column_name(i)
                    .map(|v| v.to_string())
                    .unwrap_or_else(|_| "?".to_string());
                let type_name = format!("{:?}", stmt.column_type(i));

                ColumnInfo::new(name, type_name, i)
            })
            .collect()
    }

    /// Convert bindings into DuckDB parameter values.
    pub fn to_params(bindings: &[Value]) -> Vec<DuckValue> {
        bindings.iter().map(Self::value_to_duckdb).collect()
    }

    fn extract_value(row: &Row<'_>, index: usize) -> Value {
        let value_ref = match row.get_ref(index) {
            Ok(v) => v,
            Err(_) => return Value::Null,
        };

        Self::value_ref_to_value(value_ref)
    }

    fn unix_epoch() -> NaiveDate {
        NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
    }

    /// Convert a unified `Value` into a DuckDB parameter.
    fn value_to_duckdb(value: &Value) -> DuckValue {
        match value {
            Value::Null => DuckValue::Null,
            Value::Bool(b) => DuckValue::Boolean(*b),
            Value::Int8(i) => DuckValue::TinyInt(*i),
            Value::Int16(i) => DuckValue::SmallInt(*i),
            Value::Int32(i) => DuckValue::Int(*i),
            Value::Int64(i) => DuckValue::BigInt(*i),
            Value::UInt8(i) => DuckValue::UTinyInt(*i),
            Value::UInt16(i) => DuckValue::USmallInt(*i),
            Value::UInt32(i) => DuckValue::UInt(*i),
            Value::UInt64(i) => DuckValue::UBigInt(*i),
            Value::Float32(f) => DuckValue::Float(*f),
            Value::Float64(f) => DuckValue::Double(*f),
            Value::Text(s) => DuckValue::Text(s.clone()),
            Value::Bytes(b) => DuckValue::Blob(b.clone()),
            Value::Date(d) => {
                DuckValue::Date32(d.signed_duration_since(Self::unix_epoch()).num_days() as i32)
            }
            Value::Time(t) => {
                let micros = t.num_seconds_from_midnight() as i64 * 1_000_000
                    + (t.nanosecond() / 1_000) as i64;
                DuckValue::Time64(TimeUnit::Microsecond, micros)
            }
            Value::DateTime(dt) => {
                DuckValue::Timestamp(TimeUnit::Microsecond, dt.and_utc().timestamp_micros())
            }
            // Bound as text; DuckDB casts it to the target DECIMAL.
            Value::Decimal(d) => DuckValue::Text(d.to_string()),
            Value::Other { display, .. } => DuckValue::Text(display.clone()),
        }
    }

    /// Convert a DuckDB ValueRef to our Value type.
    fn value_ref_to_value(value_ref: ValueRef<'_>) -> Value {
        match value_ref {
            ValueRef::Null => Value::Null,
            ValueRef::Boolean(b) => Value::Bool(b),
            ValueRef::TinyInt(i) => Value::Int8(i),
            ValueRef::SmallInt(i) => Value::Int16(i),
            ValueRef::Int(i) => Value::Int32(i),
            ValueRef::BigInt(i) => Value::Int64(i),
            ValueRef::HugeInt(i) => Value::Other {
                type_name: "hugeint".to_string(),
                display: i.to_string(),
            },
            ValueRef::UTinyInt(i) => Value::UInt8(i),
            ValueRef::USmallInt(i) => Value::UInt16(i),
            ValueRef::UInt(i) => Value::UInt32(i),
            ValueRef::UBigInt(i) => Value::UInt64(i),
            ValueRef::Float(f) => Value::Float32(f),
            ValueRef::Double(f) => Value::Float64(f),
            ValueRef::Decimal(d) => Self::decimal(d.to_string()),
            ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).to_string()),
            ValueRef::Blob(bytes) => Value::Bytes(bytes.to_vec()),
            ValueRef::Date32(days) => {
                match Self::unix_epoch().checked_add_signed(chrono::Duration::days(days as i64)) {
                    Some(d) => Value::Date(d),
                    None => Value::Other {
                        type_name: "date".to_string(),
                        display: format!("DATE({})", days),
                    },
                }
            }
            ValueRef::Time64(_, micros) => {
                let secs = (micros / 1_000_000) as u32;
                let nanos = ((micros % 1_000_000) * 1000) as u32;
                match chrono::NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos) {
                    Some(t) => Value::Time(t),
                    None => Value::Other {
                        type_name: "time".to_string(),
                        display: format!("TIME({})", micros),
                    },
                }
            }
            ValueRef::Timestamp(unit, value) => {
                let micros = match unit {
                    TimeUnit::Second => value * 1_000_000,
                    TimeUnit::Millisecond => value * 1_000,
                    TimeUnit::Microsecond => value,
                    TimeUnit::Nanosecond => value / 1_000,
                };
                match chrono::DateTime::from_timestamp_micros(micros) {
                    Some(dt) => Value::DateTime(dt.naive_utc()),
                    None => Value::Other {
                        type_name: "timestamp".to_string(),
                        display: format!("TIMESTAMP({})", value),
                    },
                }
            }
            ValueRef::Interval { months, days, nanos } => Value::Other {
                type_name: "interval".to_string(),
                display: format!("{} months {} days {} ns", months, days, nanos),
            },
            ValueRef::Enum(_, idx) => Value::Int64(idx as i64),
            ValueRef::List(_, _) => Self::nested("list"),
            ValueRef::Struct(_, _) => Self::nested("struct"),
            ValueRef::Map(_, _) => Self::nested("map"),
            ValueRef::Array(_, _) => Self::nested("array"),
            ValueRef::Union(_, _) => Self::nested("union"),
            _ => Self::nested("unknown"),
        }
    }

    fn decimal(display: String) -> Value {
        match display.parse::<Decimal>() {
            Ok(d) => Value::Decimal(d),
            Err(_) => Value::Other {
                type_name: "decimal".to_string(),
                display,
            },
        }
    }

    fn nested(type_name: &str) -> Value {
        Value::Other {
            type_name: type_name.to_string(),
            display: format!("[{}]", type_name.to_uppercase()),
        }
    }
}
