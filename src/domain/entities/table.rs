//! # Table Entity
//!
//! 表形式データセットのドメインエンティティ

use chrono::{DateTime, Utc};

use crate::domain::error::{Error, Result};

/// カラムの型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Bool,
    Int64,
    Float64,
    String,
    Timestamp,
}

impl ColumnType {
    /// 型名（ログ・エラーメッセージ用）
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Bool => "bool",
            ColumnType::Int64 => "int64",
            ColumnType::Float64 => "float64",
            ColumnType::String => "string",
            ColumnType::Timestamp => "timestamp",
        }
    }
}

/// カラム定義（名前と型のペア）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub column_type: ColumnType,
}

impl Field {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// セルの値
///
/// 全ての型は nullable。`Null` はどのカラム型にも適合する
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int64(i64),
    Float64(f64),
    String(String),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// 値がカラム型に適合するかどうか
    pub fn matches(&self, column_type: ColumnType) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(_) => column_type == ColumnType::Bool,
            Value::Int64(_) => column_type == ColumnType::Int64,
            Value::Float64(_) => column_type == ColumnType::Float64,
            Value::String(_) => column_type == ColumnType::String,
            Value::Timestamp(_) => column_type == ColumnType::Timestamp,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// 表形式データセット
///
/// 名前と型を持つカラムと、順序付きの行のコレクション。
/// クエリ実行またはファイルのパースによって生成され、呼び出し側での利用や
/// キャッシュ・ウェアハウスへの永続化に使われる
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    fields: Vec<Field>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// 空のテーブルを作成
    ///
    /// # Errors
    ///
    /// カラム名が重複している場合にエラーを返す
    pub fn new(fields: Vec<Field>) -> Result<Self> {
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(Error::configuration(format!(
                    "duplicate column name: {}",
                    field.name
                )));
            }
        }
        Ok(Self {
            fields,
            rows: Vec::new(),
        })
    }

    /// 行を追加する
    ///
    /// # Errors
    ///
    /// 行の長さがカラム数と一致しない場合、または値の型がカラム型に
    /// 適合しない場合にエラーを返す
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.fields.len() {
            return Err(Error::decode(format!(
                "row has {} values but table has {} columns",
                row.len(),
                self.fields.len()
            )));
        }
        for (value, field) in row.iter().zip(&self.fields) {
            if !value.matches(field.column_type) {
                return Err(Error::decode(format!(
                    "value {:?} does not match column '{}' of type {}",
                    value,
                    field.name,
                    field.column_type.name()
                )));
            }
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// カラム名からインデックスを引く
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// 1カラム分の値を縦方向に取り出す
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().map(move |row| &row[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_fields() -> Vec<Field> {
        vec![
            Field::new("id", ColumnType::Int64),
            Field::new("name", ColumnType::String),
            Field::new("score", ColumnType::Float64),
        ]
    }

    #[test]
    fn test_new_table_is_empty() {
        let table = Table::new(sample_fields()).unwrap();
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.num_columns(), 3);
        assert!(table.is_empty());
    }

    #[test]
    fn test_new_rejects_duplicate_column_names() {
        let fields = vec![
            Field::new("id", ColumnType::Int64),
            Field::new("id", ColumnType::String),
        ];
        let result = Table::new(fields);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_push_row_and_read_back() {
        let mut table = Table::new(sample_fields()).unwrap();
        table
            .push_row(vec![
                Value::Int64(1),
                Value::String("alice".to_string()),
                Value::Float64(0.5),
            ])
            .unwrap();
        table
            .push_row(vec![Value::Int64(2), Value::Null, Value::Float64(1.5)])
            .unwrap();

        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.rows()[0][1], Value::String("alice".to_string()));
        assert!(table.rows()[1][1].is_null());
    }

    #[test]
    fn test_push_row_rejects_wrong_arity() {
        let mut table = Table::new(sample_fields()).unwrap();
        let result = table.push_row(vec![Value::Int64(1)]);
        assert!(matches!(result, Err(Error::Decode(_))));
        assert_eq!(table.num_rows(), 0);
    }

    #[test]
    fn test_push_row_rejects_type_mismatch() {
        let mut table = Table::new(sample_fields()).unwrap();
        let result = table.push_row(vec![
            Value::String("not an id".to_string()),
            Value::String("alice".to_string()),
            Value::Float64(0.5),
        ]);
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_null_matches_every_column_type() {
        for ty in [
            ColumnType::Bool,
            ColumnType::Int64,
            ColumnType::Float64,
            ColumnType::String,
            ColumnType::Timestamp,
        ] {
            assert!(Value::Null.matches(ty));
        }
    }

    #[test]
    fn test_column_lookup() {
        let mut table = Table::new(vec![
            Field::new("ts", ColumnType::Timestamp),
            Field::new("ok", ColumnType::Bool),
        ])
        .unwrap();
        let ts = Utc.with_ymd_and_hms(2024, 12, 25, 10, 0, 0).unwrap();
        table
            .push_row(vec![Value::Timestamp(ts), Value::Bool(true)])
            .unwrap();

        assert_eq!(table.column_index("ok"), Some(1));
        assert_eq!(table.column_index("missing"), None);
        let values: Vec<&Value> = table.column_values(0).collect();
        assert_eq!(values, vec![&Value::Timestamp(ts)]);
    }
}
