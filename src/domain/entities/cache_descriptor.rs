//! # CacheDescriptor Value Object
//!
//! ローカルキャッシュの保存先を表すバリューオブジェクト

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::domain::error::Error;

/// キャッシュファイルの形式
///
/// `Feather` はスキーマを保持するカラムナバイナリ（Arrow IPC）、
/// `Csv` はヘッダ行付きのテキスト（型情報は失われる）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheFormat {
    Feather,
    Csv,
}

impl FromStr for CacheFormat {
    type Err = Error;

    /// 形式タグをパースする
    ///
    /// 未対応のタグは I/O を一切行う前に `Error::Configuration` で拒否される
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feather" => Ok(CacheFormat::Feather),
            "csv" => Ok(CacheFormat::Csv),
            other => Err(Error::configuration(format!(
                "filetype {} not supported, use feather or csv",
                other
            ))),
        }
    }
}

impl fmt::Display for CacheFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheFormat::Feather => write!(f, "feather"),
            CacheFormat::Csv => write!(f, "csv"),
        }
    }
}

/// キャッシュデスクリプタ
///
/// データセットの永続化先となる (パス, 形式) のペア
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDescriptor {
    path: PathBuf,
    format: CacheFormat,
}

impl CacheDescriptor {
    pub fn new(path: impl Into<PathBuf>, format: CacheFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    /// パスと形式タグ文字列からデスクリプタを作成
    ///
    /// # Errors
    ///
    /// 形式タグが `feather` / `csv` のどちらでもない場合にエラーを返す
    pub fn from_parts(path: impl Into<PathBuf>, format: &str) -> Result<Self, Error> {
        Ok(Self::new(path, format.parse()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> CacheFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str_supported() {
        assert_eq!("feather".parse::<CacheFormat>().unwrap(), CacheFormat::Feather);
        assert_eq!("csv".parse::<CacheFormat>().unwrap(), CacheFormat::Csv);
    }

    #[test]
    fn test_format_from_str_unsupported_is_configuration_error() {
        let result = "xml".parse::<CacheFormat>();
        match result {
            Err(Error::Configuration(msg)) => {
                assert!(msg.contains("xml"));
                assert!(msg.contains("feather"));
                assert!(msg.contains("csv"));
            }
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_format_from_str_is_case_sensitive() {
        // 元の実装と同じく小文字タグのみを受け付ける
        assert!("Feather".parse::<CacheFormat>().is_err());
        assert!("CSV".parse::<CacheFormat>().is_err());
    }

    #[test]
    fn test_from_parts() {
        let descriptor = CacheDescriptor::from_parts("/tmp/data.feather", "feather").unwrap();
        assert_eq!(descriptor.path(), Path::new("/tmp/data.feather"));
        assert_eq!(descriptor.format(), CacheFormat::Feather);
    }

    #[test]
    fn test_from_parts_rejects_unknown_format() {
        assert!(CacheDescriptor::from_parts("/tmp/data.xml", "xml").is_err());
    }

    #[test]
    fn test_format_display_round_trips() {
        for format in [CacheFormat::Feather, CacheFormat::Csv] {
            assert_eq!(format.to_string().parse::<CacheFormat>().unwrap(), format);
        }
    }
}
