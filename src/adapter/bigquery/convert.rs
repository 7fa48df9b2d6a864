//! BigQuery Conversion and Error Classification
//!
//! RESTのスキーマ/セル表現とテーブルの相互変換、エラー分類

use chrono::{DateTime, Utc};
use google_cloud_bigquery::http::table::{TableFieldMode, TableFieldSchema, TableFieldType, TableSchema};
use google_cloud_bigquery::http::tabledata::list::{Cell, Tuple, Value as CellValue};

use super::client::JsonRow;
use crate::domain::entities::table::{ColumnType, Field, Table, Value};
use crate::domain::error::{Error, Result};

/// Map a BigQuery HTTP error onto the typed taxonomy
///
/// Credential problems are recognized by status code / message,
/// everything else falls into the given category.
pub fn classify_bq_error<E: std::fmt::Display>(error: E, fallback: fn(String) -> Error) -> Error {
    let message = error.to_string();
    if is_auth_error(&message) {
        Error::Auth(message)
    } else {
        fallback(message)
    }
}

/// Check if an error message indicates a credential problem
pub fn is_auth_error(message: &str) -> bool {
    let lower = message.to_lowercase();
    message.contains("401")
        || lower.contains("unauthorized")
        || lower.contains("unauthenticated")
        || lower.contains("invalid_grant")
}

/// Check if an error message indicates a missing resource
pub fn is_not_found_error(message: &str) -> bool {
    let lower = message.to_lowercase();
    message.contains("404") || lower.contains("not found") || message.contains("notFound")
}

/// REST schema -> domain fields
///
/// Legacy type names are what the jobs API returns. Exotic scalar types
/// (NUMERIC, DATE, JSON, ...) arrive as strings and stay strings;
/// nested or repeated columns have no flat representation and are rejected.
pub fn schema_to_fields(schema: &TableSchema) -> Result<Vec<Field>> {
    schema
        .fields
        .iter()
        .map(|field| Ok(Field::new(field.name.clone(), column_type_of(field)?)))
        .collect()
}

fn column_type_of(field: &TableFieldSchema) -> Result<ColumnType> {
    if matches!(field.mode, Some(TableFieldMode::Repeated)) {
        return Err(Error::decode(format!(
            "repeated column '{}' is not supported",
            field.name
        )));
    }
    match field.data_type {
        TableFieldType::Integer => Ok(ColumnType::Int64),
        TableFieldType::Float => Ok(ColumnType::Float64),
        TableFieldType::Boolean => Ok(ColumnType::Bool),
        TableFieldType::Timestamp => Ok(ColumnType::Timestamp),
        TableFieldType::Record => Err(Error::decode(format!(
            "nested record column '{}' is not supported",
            field.name
        ))),
        _ => Ok(ColumnType::String),
    }
}

/// Domain fields -> REST schema (used when creating the target table)
pub fn fields_to_schema(fields: &[Field]) -> TableSchema {
    let fields = fields
        .iter()
        .map(|field| TableFieldSchema {
            name: field.name.clone(),
            data_type: match field.column_type {
                ColumnType::Bool => TableFieldType::Boolean,
                ColumnType::Int64 => TableFieldType::Integer,
                ColumnType::Float64 => TableFieldType::Float,
                ColumnType::String => TableFieldType::String,
                ColumnType::Timestamp => TableFieldType::Timestamp,
            },
            ..Default::default()
        })
        .collect();
    TableSchema { fields }
}

/// Materialized result pages -> domain table
pub fn build_table(schema: &TableSchema, tuples: &[Tuple]) -> Result<Table> {
    let fields = schema_to_fields(schema)?;
    let types: Vec<ColumnType> = fields.iter().map(|f| f.column_type).collect();
    let mut table = Table::new(fields)?;

    for tuple in tuples {
        if tuple.f.len() != types.len() {
            return Err(Error::decode(format!(
                "result row has {} cells, schema has {} columns",
                tuple.f.len(),
                types.len()
            )));
        }
        let row = tuple
            .f
            .iter()
            .zip(&types)
            .map(|(cell, ty)| parse_cell(cell, *ty))
            .collect::<Result<Vec<Value>>>()?;
        table.push_row(row)?;
    }

    Ok(table)
}

fn parse_cell(cell: &Cell, ty: ColumnType) -> Result<Value> {
    let text = match &cell.v {
        CellValue::Null => return Ok(Value::Null),
        CellValue::String(s) => s,
        CellValue::Array(_) | CellValue::Struct(_) => {
            return Err(Error::decode("nested cell values are not supported"))
        }
    };
    let value = match ty {
        ColumnType::Int64 => Value::Int64(
            text.parse()
                .map_err(|e| Error::decode(format!("bad integer cell '{}': {}", text, e)))?,
        ),
        ColumnType::Float64 => Value::Float64(
            text.parse()
                .map_err(|e| Error::decode(format!("bad float cell '{}': {}", text, e)))?,
        ),
        ColumnType::Bool => Value::Bool(text == "true"),
        ColumnType::Timestamp => Value::Timestamp(parse_epoch_timestamp(text)?),
        ColumnType::String => Value::String(text.clone()),
    };
    Ok(value)
}

/// The jobs API encodes timestamps as epoch seconds, often in scientific
/// notation (e.g. "1.7035236E9").
fn parse_epoch_timestamp(text: &str) -> Result<DateTime<Utc>> {
    let seconds: f64 = text
        .parse()
        .map_err(|e| Error::decode(format!("bad timestamp cell '{}': {}", text, e)))?;
    let micros = (seconds * 1_000_000.0).round() as i64;
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| Error::decode(format!("timestamp {} out of range", text)))
}

/// Domain row -> insertAll JSON payload
///
/// Timestamps are sent as RFC3339 strings, which the streaming insert
/// API accepts for TIMESTAMP columns. Null cells are omitted.
pub fn row_to_json(fields: &[Field], row: &[Value]) -> JsonRow {
    let mut object = JsonRow::new();
    for (field, value) in fields.iter().zip(row) {
        let json = match value {
            Value::Null => continue,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int64(n) => serde_json::Value::from(*n),
            Value::Float64(f) => serde_json::Value::from(*f),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Timestamp(ts) => serde_json::Value::String(ts.to_rfc3339()),
        };
        object.insert(field.name.clone(), json);
    }
    object
}
