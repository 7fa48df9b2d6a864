//! Feather Codec
//!
//! Arrow IPC（featherファイル形式）とテーブルの相互変換
//!
//! The schema-preserving cache format. Timestamps are stored as
//! microseconds in UTC.

use std::io::{Read, Seek, Write};
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BooleanArray, BooleanBuilder, Float64Array, Float64Builder, Int64Array,
    Int64Builder, StringArray, StringBuilder, TimestampMicrosecondArray,
    TimestampMicrosecondBuilder,
};
use arrow::datatypes::{DataType, Field as ArrowField, Schema, TimeUnit};
use arrow::ipc::reader::FileReader;
use arrow::ipc::writer::FileWriter;
use arrow::record_batch::RecordBatch;
use chrono::DateTime;

use crate::domain::entities::table::{ColumnType, Field, Table, Value};
use crate::domain::error::{Error, Result};

fn to_arrow_type(column_type: ColumnType) -> DataType {
    match column_type {
        ColumnType::Bool => DataType::Boolean,
        ColumnType::Int64 => DataType::Int64,
        ColumnType::Float64 => DataType::Float64,
        ColumnType::String => DataType::Utf8,
        ColumnType::Timestamp => DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
    }
}

fn from_arrow_type(data_type: &DataType) -> Result<ColumnType> {
    match data_type {
        DataType::Boolean => Ok(ColumnType::Bool),
        DataType::Int64 => Ok(ColumnType::Int64),
        DataType::Float64 => Ok(ColumnType::Float64),
        DataType::Utf8 => Ok(ColumnType::String),
        DataType::Timestamp(TimeUnit::Microsecond, _) => Ok(ColumnType::Timestamp),
        other => Err(Error::decode(format!(
            "unsupported arrow type in cache file: {}",
            other
        ))),
    }
}

/// Build one arrow array from a table column.
fn build_array(table: &Table, index: usize, column_type: ColumnType) -> Result<ArrayRef> {
    let array: ArrayRef = match column_type {
        ColumnType::Bool => {
            let mut builder = BooleanBuilder::with_capacity(table.num_rows());
            for value in table.column_values(index) {
                match value {
                    Value::Null => builder.append_null(),
                    Value::Bool(b) => builder.append_value(*b),
                    other => return Err(cell_mismatch(other, "bool")),
                }
            }
            Arc::new(builder.finish())
        }
        ColumnType::Int64 => {
            let mut builder = Int64Builder::with_capacity(table.num_rows());
            for value in table.column_values(index) {
                match value {
                    Value::Null => builder.append_null(),
                    Value::Int64(n) => builder.append_value(*n),
                    other => return Err(cell_mismatch(other, "int64")),
                }
            }
            Arc::new(builder.finish())
        }
        ColumnType::Float64 => {
            let mut builder = Float64Builder::with_capacity(table.num_rows());
            for value in table.column_values(index) {
                match value {
                    Value::Null => builder.append_null(),
                    Value::Float64(f) => builder.append_value(*f),
                    other => return Err(cell_mismatch(other, "float64")),
                }
            }
            Arc::new(builder.finish())
        }
        ColumnType::String => {
            let mut builder = StringBuilder::new();
            for value in table.column_values(index) {
                match value {
                    Value::Null => builder.append_null(),
                    Value::String(s) => builder.append_value(s),
                    other => return Err(cell_mismatch(other, "string")),
                }
            }
            Arc::new(builder.finish())
        }
        ColumnType::Timestamp => {
            let mut builder =
                TimestampMicrosecondBuilder::with_capacity(table.num_rows()).with_timezone("UTC");
            for value in table.column_values(index) {
                match value {
                    Value::Null => builder.append_null(),
                    Value::Timestamp(ts) => builder.append_value(ts.timestamp_micros()),
                    other => return Err(cell_mismatch(other, "timestamp")),
                }
            }
            Arc::new(builder.finish())
        }
    };
    Ok(array)
}

fn cell_mismatch(value: &Value, expected: &str) -> Error {
    Error::decode(format!("cell {:?} in a {} column", value, expected))
}

/// Serialize a table into the Arrow IPC file format.
pub fn write<W: Write>(writer: W, table: &Table) -> Result<()> {
    let arrow_fields: Vec<ArrowField> = table
        .fields()
        .iter()
        .map(|f| ArrowField::new(&f.name, to_arrow_type(f.column_type), true))
        .collect();
    let schema = Arc::new(Schema::new(arrow_fields));

    let mut ipc_writer = FileWriter::try_new(writer, &schema)
        .map_err(|e| Error::decode(format!("failed to open ipc writer: {}", e)))?;

    if table.num_columns() > 0 {
        let arrays = table
            .fields()
            .iter()
            .enumerate()
            .map(|(i, field)| build_array(table, i, field.column_type))
            .collect::<Result<Vec<ArrayRef>>>()?;
        let batch = RecordBatch::try_new(schema, arrays)
            .map_err(|e| Error::decode(format!("failed to build record batch: {}", e)))?;
        ipc_writer
            .write(&batch)
            .map_err(|e| Error::decode(format!("failed to write record batch: {}", e)))?;
    }

    ipc_writer
        .finish()
        .map_err(|e| Error::decode(format!("failed to finish ipc file: {}", e)))?;
    Ok(())
}

/// Read a table back from the Arrow IPC file format.
pub fn read<R: Read + Seek>(reader: R) -> Result<Table> {
    let ipc_reader = FileReader::try_new(reader, None)
        .map_err(|e| Error::decode(format!("not a valid ipc file: {}", e)))?;

    let schema = ipc_reader.schema();
    let fields = schema
        .fields()
        .iter()
        .map(|f| Ok(Field::new(f.name().clone(), from_arrow_type(f.data_type())?)))
        .collect::<Result<Vec<Field>>>()?;
    let mut table = Table::new(fields)?;

    for batch in ipc_reader {
        let batch = batch.map_err(|e| Error::decode(format!("corrupt ipc batch: {}", e)))?;
        append_batch(&mut table, &batch)?;
    }

    Ok(table)
}

fn append_batch(table: &mut Table, batch: &RecordBatch) -> Result<()> {
    let columns = table.fields().to_vec();
    for row in 0..batch.num_rows() {
        let mut values = Vec::with_capacity(columns.len());
        for (col, field) in columns.iter().enumerate() {
            values.push(read_cell(batch, row, col, field.column_type)?);
        }
        table.push_row(values)?;
    }
    Ok(())
}

fn read_cell(batch: &RecordBatch, row: usize, col: usize, ty: ColumnType) -> Result<Value> {
    let array = batch.column(col);
    if array.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match ty {
        ColumnType::Bool => {
            let array = downcast::<BooleanArray>(array, "boolean")?;
            Value::Bool(array.value(row))
        }
        ColumnType::Int64 => {
            let array = downcast::<Int64Array>(array, "int64")?;
            Value::Int64(array.value(row))
        }
        ColumnType::Float64 => {
            let array = downcast::<Float64Array>(array, "float64")?;
            Value::Float64(array.value(row))
        }
        ColumnType::String => {
            let array = downcast::<StringArray>(array, "utf8")?;
            Value::String(array.value(row).to_string())
        }
        ColumnType::Timestamp => {
            let array = downcast::<TimestampMicrosecondArray>(array, "timestamp")?;
            let micros = array.value(row);
            let ts = DateTime::from_timestamp_micros(micros)
                .ok_or_else(|| Error::decode(format!("timestamp {} out of range", micros)))?;
            Value::Timestamp(ts)
        }
    };
    Ok(value)
}

fn downcast<'a, T: 'static>(array: &'a dyn Array, expected: &str) -> Result<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| Error::decode(format!("expected {} array in ipc file", expected)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Cursor;

    fn sample_table() -> Table {
        let mut table = Table::new(vec![
            Field::new("id", ColumnType::Int64),
            Field::new("name", ColumnType::String),
            Field::new("score", ColumnType::Float64),
            Field::new("active", ColumnType::Bool),
            Field::new("seen_at", ColumnType::Timestamp),
        ])
        .unwrap();
        table
            .push_row(vec![
                Value::Int64(1),
                Value::String("alice".to_string()),
                Value::Float64(0.5),
                Value::Bool(true),
                Value::Timestamp(Utc.with_ymd_and_hms(2024, 12, 25, 10, 0, 0).unwrap()),
            ])
            .unwrap();
        table
            .push_row(vec![
                Value::Int64(2),
                Value::Null,
                Value::Null,
                Value::Bool(false),
                Value::Null,
            ])
            .unwrap();
        table
    }

    #[test]
    fn test_round_trip_preserves_schema_and_values() {
        let table = sample_table();

        let mut buffer = Vec::new();
        write(&mut buffer, &table).unwrap();
        let restored = read(Cursor::new(buffer)).unwrap();

        assert_eq!(restored, table);
    }

    #[test]
    fn test_round_trip_empty_table_keeps_schema() {
        let table = Table::new(vec![Field::new("only", ColumnType::String)]).unwrap();

        let mut buffer = Vec::new();
        write(&mut buffer, &table).unwrap();
        let restored = read(Cursor::new(buffer)).unwrap();

        assert_eq!(restored.num_rows(), 0);
        assert_eq!(restored.fields()[0].name, "only");
        assert_eq!(restored.fields()[0].column_type, ColumnType::String);
    }

    #[test]
    fn test_read_garbage_is_decode_error() {
        let result = read(Cursor::new(b"definitely not arrow".to_vec()));
        assert!(matches!(result, Err(Error::Decode(_))));
    }
}
