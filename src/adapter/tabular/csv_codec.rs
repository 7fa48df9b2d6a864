//! CSV Codec
//!
//! CSVとテーブルの相互変換
//!
//! CSV is the lossy cache format: values are written as text and column
//! types are re-inferred on read (Int64 -> Float64 -> Bool -> String).

use crate::domain::entities::remote_file::ParseOptions;
use crate::domain::entities::table::{ColumnType, Field, Table, Value};
use crate::domain::error::{Error, Result};

/// Serialize a table as CSV with a header row.
pub fn write(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header: Vec<&str> = table.fields().iter().map(|f| f.name.as_str()).collect();
    writer
        .write_record(&header)
        .map_err(|e| Error::decode(format!("failed to write csv header: {}", e)))?;

    for row in table.rows() {
        let record: Vec<String> = row.iter().map(format_value).collect();
        writer
            .write_record(&record)
            .map_err(|e| Error::decode(format!("failed to write csv row: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::decode(format!("failed to flush csv writer: {}", e)))
}

/// Parse CSV bytes into a table, inferring column types.
pub fn read(bytes: &[u8], options: &ParseOptions) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_header)
        .from_reader(bytes);

    let names: Vec<String> = if options.has_header {
        reader
            .headers()
            .map_err(|e| Error::decode(format!("failed to read csv header: {}", e)))?
            .iter()
            .map(|h| h.to_string())
            .collect()
    } else {
        Vec::new()
    };

    let mut records: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| Error::decode(format!("malformed csv row: {}", e)))?;
        records.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    // ヘッダ無しの場合はカラム名を合成する
    let names = if options.has_header {
        names
    } else {
        let width = records.first().map_or(0, |r| r.len());
        (0..width).map(|i| format!("column_{}", i)).collect()
    };

    for (i, record) in records.iter().enumerate() {
        if record.len() != names.len() {
            return Err(Error::decode(format!(
                "csv row {} has {} fields, expected {}",
                i + 1,
                record.len(),
                names.len()
            )));
        }
    }

    let types: Vec<ColumnType> = (0..names.len())
        .map(|col| infer_column_type(records.iter().map(|r| r[col].as_str())))
        .collect();

    let fields = names
        .into_iter()
        .zip(&types)
        .map(|(name, ty)| Field::new(name, *ty))
        .collect();
    let mut table = Table::new(fields)?;

    for record in &records {
        let row = record
            .iter()
            .zip(&types)
            .map(|(cell, ty)| parse_cell(cell, *ty))
            .collect::<Result<Vec<Value>>>()?;
        table.push_row(row)?;
    }

    Ok(table)
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Int64(n) => n.to_string(),
        Value::Float64(f) => f.to_string(),
        Value::String(s) => s.clone(),
        Value::Timestamp(ts) => ts.to_rfc3339(),
    }
}

/// Infer the narrowest type that fits every non-empty cell of a column.
fn infer_column_type<'a>(cells: impl Iterator<Item = &'a str> + Clone) -> ColumnType {
    let non_empty = || cells.clone().filter(|cell| !cell.is_empty());

    if non_empty().count() == 0 {
        return ColumnType::String;
    }
    if non_empty().all(|cell| cell.parse::<i64>().is_ok()) {
        return ColumnType::Int64;
    }
    if non_empty().all(|cell| cell.parse::<f64>().is_ok()) {
        return ColumnType::Float64;
    }
    if non_empty().all(|cell| cell == "true" || cell == "false") {
        return ColumnType::Bool;
    }
    ColumnType::String
}

fn parse_cell(cell: &str, column_type: ColumnType) -> Result<Value> {
    if cell.is_empty() {
        return Ok(Value::Null);
    }
    let value = match column_type {
        ColumnType::Int64 => Value::Int64(
            cell.parse()
                .map_err(|e| Error::decode(format!("bad int64 cell '{}': {}", cell, e)))?,
        ),
        ColumnType::Float64 => Value::Float64(
            cell.parse()
                .map_err(|e| Error::decode(format!("bad float64 cell '{}': {}", cell, e)))?,
        ),
        ColumnType::Bool => Value::Bool(cell == "true"),
        ColumnType::String | ColumnType::Timestamp => Value::String(cell.to_string()),
    };
    Ok(value)
}
