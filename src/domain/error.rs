//! # Error Taxonomy
//!
//! ライブラリ全体で使用する型付きエラー

use thiserror::Error;

/// tabsync のエラー型
///
/// 呼び出し側はマテリアライズされたデータセットか型付きエラーのどちらかを
/// 受け取る。部分的な結果は返さない。
#[derive(Debug, Error)]
pub enum Error {
    /// 静的な入力の誤り（未対応のキャッシュ形式など）。I/O前に検出される
    #[error("configuration error: {0}")]
    Configuration(String),

    /// 認証情報の欠落・読み取り不可・不正
    #[error("authentication error: {0}")]
    Auth(String),

    /// ウェアハウスによるクエリまたは書き込みの拒否
    #[error("query error: {0}")]
    Query(String),

    /// リスト・ダウンロード中のネットワーク/APIエラー
    #[error("remote access error: {0}")]
    Remote(String),

    /// 拡張子から形式を特定できないファイル
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// バイト列をテーブルにデコードできない
    #[error("decode error: {0}")]
    Decode(String),

    /// ファイルシステムエラー
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn auth(message: impl std::fmt::Display) -> Self {
        Self::Auth(message.to_string())
    }

    pub fn query(message: impl std::fmt::Display) -> Self {
        Self::Query(message.to_string())
    }

    pub fn remote(message: impl std::fmt::Display) -> Self {
        Self::Remote(message.to_string())
    }

    pub fn decode(message: impl std::fmt::Display) -> Self {
        Self::Decode(message.to_string())
    }
}

/// tabsync の Result 型
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_category() {
        let err = Error::configuration("filetype xml not supported");
        assert!(err.to_string().starts_with("configuration error:"));

        let err = Error::UnsupportedFormat("pdf".to_string());
        assert!(err.to_string().contains("pdf"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
