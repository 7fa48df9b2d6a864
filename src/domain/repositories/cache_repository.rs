//! # Cache Repository Trait
//!
//! データセットのローカルキャッシュを抽象化

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::cache_descriptor::CacheDescriptor;
use crate::domain::entities::table::Table;
use crate::domain::error::Result;

/// キャッシュリポジトリ
///
/// キャッシュデスクリプタが指すファイルの読み書きを担当するリポジトリ
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CacheRepository: Send + Sync {
    /// デスクリプタが指すファイルからデータセットを読み込む
    ///
    /// ファイルが存在しない場合は `Ok(None)` を返す。それ以外の読み取り
    /// 失敗（権限・破損など）は回復せずエラーとして伝播する
    async fn read(&self, descriptor: &CacheDescriptor) -> Result<Option<Table>>;

    /// データセットをデスクリプタが指すファイルへ書き込む
    ///
    /// 既存のファイルは上書きされる
    async fn write(&self, descriptor: &CacheDescriptor, table: &Table) -> Result<()>;
}
