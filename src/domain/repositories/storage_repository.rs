//! # Storage Repository Trait
//!
//! ファイルストレージのリスティングとダウンロードを抽象化

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::remote_file::RemoteFile;
use crate::domain::error::Result;

/// ファイルストレージリポジトリ
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// フォルダ直下のファイルを列挙する
    ///
    /// ゴミ箱内のアイテムとフォルダは除外する。該当ファイルが無い場合や
    /// 回復可能なAPIエラーの場合は空のリストを返す（エラーにはしない）
    async fn list_folder(&self, folder_id: &str) -> Result<Vec<RemoteFile>>;

    /// ファイルIDから名前を解決する
    async fn file_name(&self, file_id: &str) -> Result<String>;

    /// ファイルの内容を完全にダウンロードして返す
    ///
    /// ダウンロードは完了までブロックし、部分的な結果は返さない
    async fn download(&self, file_id: &str) -> Result<Vec<u8>>;
}
