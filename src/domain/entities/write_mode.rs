//! # WriteMode Value Object
//!
//! テーブル書き込み時の既存データの扱いを表すポリシー

/// ウェアハウスへの書き込みモード
///
/// BigQuery の write disposition に対応する:
/// - `Truncate`: 既存テーブルを上書きする
/// - `Append`: 既存テーブルに追記する
/// - `Empty`: 既存テーブルにデータがある場合は重複エラーとして失敗する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Truncate,
    Append,
    Empty,
}

impl WriteMode {
    /// BigQuery の write disposition 名
    pub fn as_disposition(&self) -> &'static str {
        match self {
            WriteMode::Truncate => "WRITE_TRUNCATE",
            WriteMode::Append => "WRITE_APPEND",
            WriteMode::Empty => "WRITE_EMPTY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_truncate() {
        assert_eq!(WriteMode::default(), WriteMode::Truncate);
    }

    #[test]
    fn test_disposition_names() {
        assert_eq!(WriteMode::Truncate.as_disposition(), "WRITE_TRUNCATE");
        assert_eq!(WriteMode::Append.as_disposition(), "WRITE_APPEND");
        assert_eq!(WriteMode::Empty.as_disposition(), "WRITE_EMPTY");
    }
}
