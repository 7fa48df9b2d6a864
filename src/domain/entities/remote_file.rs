//! # RemoteFile Entity
//!
//! ファイルストレージ上のファイル参照とパース設定

use serde::Deserialize;

use crate::domain::error::Error;

/// リモートファイル参照
///
/// ストレージのフォルダリスティングが返す (ID, 名前) のペア
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFile {
    pub id: String,
    pub name: String,
}

/// ダウンロード可能なファイル形式
///
/// 選択は拡張子のみで行い、内容のスニッフィングは行わない。
/// `Text` はカンマ区切りとしてパースされる
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFileFormat {
    Csv,
    Text,
    Xlsx,
}

impl RemoteFileFormat {
    /// ファイル名の拡張子から形式を推定する
    ///
    /// # Errors
    ///
    /// 拡張子が `csv` / `txt` / `xlsx` 以外、または拡張子が無い場合に
    /// `Error::UnsupportedFormat` を返す
    pub fn from_file_name(name: &str) -> Result<Self, Error> {
        let extension = match name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext,
            _ => return Err(Error::UnsupportedFormat(name.to_string())),
        };
        match extension {
            "csv" => Ok(RemoteFileFormat::Csv),
            "txt" => Ok(RemoteFileFormat::Text),
            "xlsx" => Ok(RemoteFileFormat::Xlsx),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

/// パースオプション
///
/// ダウンロードしたファイルをテーブルに変換する際の設定
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// 区切り文字（CSV/テキストのみ）
    pub delimiter: u8,
    /// 先頭行をヘッダとして扱うかどうか
    pub has_header: bool,
    /// 読み込むシート名（スプレッドシートのみ、None は先頭シート）
    pub sheet: Option<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            sheet: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_known_extensions() {
        assert_eq!(
            RemoteFileFormat::from_file_name("report.csv").unwrap(),
            RemoteFileFormat::Csv
        );
        assert_eq!(
            RemoteFileFormat::from_file_name("notes.txt").unwrap(),
            RemoteFileFormat::Text
        );
        assert_eq!(
            RemoteFileFormat::from_file_name("budget.xlsx").unwrap(),
            RemoteFileFormat::Xlsx
        );
    }

    #[test]
    fn test_format_uses_last_extension() {
        assert_eq!(
            RemoteFileFormat::from_file_name("archive.2024.csv").unwrap(),
            RemoteFileFormat::Csv
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let result = RemoteFileFormat::from_file_name("slides.pdf");
        match result {
            Err(Error::UnsupportedFormat(ext)) => assert_eq!(ext, "pdf"),
            other => panic!("expected unsupported format error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_extension() {
        assert!(RemoteFileFormat::from_file_name("README").is_err());
        assert!(RemoteFileFormat::from_file_name("trailing.").is_err());
    }

    #[test]
    fn test_parse_options_defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.delimiter, b',');
        assert!(options.has_header);
        assert!(options.sheet.is_none());
    }

    #[test]
    fn test_remote_file_deserialization() {
        let json = r#"{"id": "1abc", "name": "data.csv", "mimeType": "text/csv"}"#;
        let file: RemoteFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.id, "1abc");
        assert_eq!(file.name, "data.csv");
    }
}
