//! # Table Codec Trait
//!
//! ダウンロードしたバイト列のテーブルへのデコードを抽象化

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::remote_file::{ParseOptions, RemoteFileFormat};
use crate::domain::entities::table::Table;
use crate::domain::error::Result;

/// テーブルコーデック
///
/// 形式ごとのパーサを選択してバイト列をテーブルへ変換する
#[cfg_attr(test, automock)]
pub trait TableCodec: Send + Sync {
    /// バイト列を指定された形式としてパースする
    ///
    /// # Errors
    ///
    /// 内容が形式として不正な場合に `Error::Decode` を返す
    fn decode(&self, format: RemoteFileFormat, bytes: &[u8], options: &ParseOptions)
        -> Result<Table>;
}
