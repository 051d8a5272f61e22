//! Untyped rows: Postgres row to ordered JSON map

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};
use uuid::Uuid;

/// One result row, column name to value, in select order.
pub type Record = Map<String, Value>;

/// Decode every column of `row` into a [`Record`].
///
/// # Errors
///
/// Returns [`sqlx::Error::ColumnDecode`] for column types with no JSON
/// mapping (e.g. `BYTEA`, `INTERVAL`, arrays).
pub fn row_to_record(row: &PgRow) -> Result<Record, sqlx::Error> {
    let mut record = Map::with_capacity(row.columns().len());
    for column in row.columns() {
        let value = decode_column(row, column.ordinal(), column.type_info().name())?;
        record.insert(column.name().to_string(), value);
    }
    Ok(record)
}

fn decode_column(row: &PgRow, index: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    let value = match type_name {
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CHAR" => row
            .try_get::<Option<String>, _>(index)?
            .map(Value::String),
        "INT2" => row.try_get::<Option<i16>, _>(index)?.map(Value::from),
        "INT4" => row.try_get::<Option<i32>, _>(index)?.map(Value::from),
        "INT8" => row.try_get::<Option<i64>, _>(index)?.map(Value::from),
        "FLOAT4" => row.try_get::<Option<f32>, _>(index)?.map(Value::from),
        "FLOAT8" => row.try_get::<Option<f64>, _>(index)?.map(Value::from),
        // Strings keep full precision, as the pg wire text form does
        "NUMERIC" => row
            .try_get::<Option<Decimal>, _>(index)?
            .map(|d| Value::String(d.to_string())),
        "BOOL" => row.try_get::<Option<bool>, _>(index)?.map(Value::Bool),
        "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(index)?,
        "UUID" => row
            .try_get::<Option<Uuid>, _>(index)?
            .map(|u| Value::String(u.to_string())),
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(index)?
            .map(|t| Value::String(t.to_rfc3339())),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(index)?
            .map(|t| Value::String(t.to_string())),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(index)?
            .map(|d| Value::String(d.to_string())),
        other => return Err(unsupported_column(index, other)),
    };

    Ok(value.unwrap_or(Value::Null))
}

fn unsupported_column(index: usize, type_name: &str) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: format!("unsupported column type {type_name}").into(),
    }
}
