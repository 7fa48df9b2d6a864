//! XLSX Codec
//!
//! スプレッドシートのテーブルへの変換（読み込みのみ）

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use crate::domain::entities::remote_file::ParseOptions;
use crate::domain::entities::table::{ColumnType, Field, Table, Value};
use crate::domain::error::{Error, Result};

/// Parse workbook bytes into a table.
///
/// Reads the sheet named in `options.sheet`, or the first sheet when no
/// name is given. The first row is treated as the header when
/// `options.has_header` is set; otherwise column names are synthesized.
pub fn read(bytes: &[u8], options: &ParseOptions) -> Result<Table> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| Error::decode(format!("not a valid xlsx workbook: {}", e)))?;

    let sheet_name = match &options.sheet {
        Some(name) => name.clone(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| Error::decode("workbook has no sheets"))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| Error::decode(format!("failed to read sheet '{}': {}", sheet_name, e)))?;

    let mut rows = range.rows();

    let width = range.width();
    let names: Vec<String> = if options.has_header {
        match rows.next() {
            Some(header) => header
                .iter()
                .enumerate()
                .map(|(i, cell)| match cell {
                    Data::String(s) => s.clone(),
                    Data::Empty => format!("column_{}", i),
                    other => other.to_string(),
                })
                .collect(),
            None => Vec::new(),
        }
    } else {
        (0..width).map(|i| format!("column_{}", i)).collect()
    };

    let data_rows: Vec<&[Data]> = rows.collect();

    let types: Vec<ColumnType> = (0..names.len())
        .map(|col| infer_column_type(data_rows.iter().map(|row| row.get(col))))
        .collect();

    let fields = names
        .into_iter()
        .zip(&types)
        .map(|(name, ty)| Field::new(name, *ty))
        .collect();
    let mut table = Table::new(fields)?;

    for row in &data_rows {
        let values = types
            .iter()
            .enumerate()
            .map(|(col, ty)| convert_cell(row.get(col), *ty))
            .collect::<Result<Vec<Value>>>()?;
        table.push_row(values)?;
    }

    Ok(table)
}

/// セル型の集合からカラム型を決定する
///
/// Int のみ -> Int64、Int と Float の混在 -> Float64、Bool のみ -> Bool、
/// 日時のみ -> Timestamp、それ以外の混在 -> String
fn infer_column_type<'a>(cells: impl Iterator<Item = Option<&'a Data>>) -> ColumnType {
    let mut saw_int = false;
    let mut saw_float = false;
    let mut saw_bool = false;
    let mut saw_datetime = false;
    let mut saw_other = false;
    let mut saw_any = false;

    for cell in cells.flatten() {
        match cell {
            Data::Empty | Data::Error(_) => continue,
            Data::Int(_) => saw_int = true,
            Data::Float(_) => saw_float = true,
            Data::Bool(_) => saw_bool = true,
            Data::DateTime(_) => saw_datetime = true,
            _ => saw_other = true,
        }
        saw_any = true;
    }

    if !saw_any {
        return ColumnType::String;
    }
    if saw_other {
        return ColumnType::String;
    }
    match (saw_int, saw_float, saw_bool, saw_datetime) {
        (true, false, false, false) => ColumnType::Int64,
        (_, true, false, false) => ColumnType::Float64,
        (false, false, true, false) => ColumnType::Bool,
        (false, false, false, true) => ColumnType::Timestamp,
        _ => ColumnType::String,
    }
}

fn convert_cell(cell: Option<&Data>, ty: ColumnType) -> Result<Value> {
    let cell = match cell {
        None | Some(Data::Empty) | Some(Data::Error(_)) => return Ok(Value::Null),
        Some(cell) => cell,
    };
    let value = match ty {
        ColumnType::Int64 => match cell {
            Data::Int(n) => Value::Int64(*n),
            other => return Err(cell_mismatch(other, "int64")),
        },
        ColumnType::Float64 => match cell {
            Data::Int(n) => Value::Float64(*n as f64),
            Data::Float(f) => Value::Float64(*f),
            other => return Err(cell_mismatch(other, "float64")),
        },
        ColumnType::Bool => match cell {
            Data::Bool(b) => Value::Bool(*b),
            other => return Err(cell_mismatch(other, "bool")),
        },
        ColumnType::Timestamp => match cell {
            Data::DateTime(dt) => {
                let naive = dt.as_datetime().ok_or_else(|| {
                    Error::decode(format!("cell {:?} is not a representable datetime", dt))
                })?;
                Value::Timestamp(naive.and_utc())
            }
            other => return Err(cell_mismatch(other, "timestamp")),
        },
        ColumnType::String => Value::String(match cell {
            Data::String(s) => s.clone(),
            other => other.to_string(),
        }),
    };
    Ok(value)
}

fn cell_mismatch(cell: &Data, expected: &str) -> Error {
    Error::decode(format!("cell {:?} in a {} column", cell, expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_garbage_is_decode_error() {
        let result = read(b"not a zip archive", &ParseOptions::default());
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_infer_int_column() {
        let cells = [Data::Int(1), Data::Int(2), Data::Empty];
        let ty = infer_column_type(cells.iter().map(Some));
        assert_eq!(ty, ColumnType::Int64);
    }

    #[test]
    fn test_infer_mixed_int_float_column() {
        let cells = [Data::Int(1), Data::Float(2.5)];
        let ty = infer_column_type(cells.iter().map(Some));
        assert_eq!(ty, ColumnType::Float64);
    }

    #[test]
    fn test_infer_mixed_types_fall_back_to_string() {
        let cells = [Data::Int(1), Data::String("x".to_string())];
        let ty = infer_column_type(cells.iter().map(Some));
        assert_eq!(ty, ColumnType::String);
    }

    #[test]
    fn test_infer_empty_column_is_string() {
        let cells = [Data::Empty, Data::Empty];
        let ty = infer_column_type(cells.iter().map(Some));
        assert_eq!(ty, ColumnType::String);
    }

    #[test]
    fn test_convert_int_to_float_column() {
        let value = convert_cell(Some(&Data::Int(3)), ColumnType::Float64).unwrap();
        assert_eq!(value, Value::Float64(3.0));
    }

    #[test]
    fn test_convert_missing_cell_is_null() {
        assert_eq!(convert_cell(None, ColumnType::Int64).unwrap(), Value::Null);
        assert_eq!(
            convert_cell(Some(&Data::Empty), ColumnType::String).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_convert_number_in_string_column() {
        let value = convert_cell(Some(&Data::Int(7)), ColumnType::String).unwrap();
        assert_eq!(value, Value::String("7".to_string()));
    }
}
