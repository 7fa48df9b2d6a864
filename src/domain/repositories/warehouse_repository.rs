//! # Warehouse Repository Trait
//!
//! ウェアハウスへのクエリ実行と書き込みを抽象化

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::table::Table;
use crate::domain::entities::write_mode::WriteMode;
use crate::domain::error::Result;

/// ウェアハウスリポジトリ
///
/// クエリの実行とテーブルの永続化を担当するリポジトリ。
/// 接続はスコープ付きリソースであり、成功・失敗に関わらず
/// 呼び出しごとに解放される
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WarehouseRepository: Send + Sync {
    /// クエリを実行し、結果セット全体をメモリ上に実体化して返す
    ///
    /// # Errors
    ///
    /// クエリが不正またはリモートに拒否された場合は `Error::Query`、
    /// 認証情報に問題がある場合は `Error::Auth` を返す
    async fn query(&self, query: &str) -> Result<Table>;

    /// データセットを `dataset.table` 形式の名前のテーブルに永続化する
    ///
    /// # Arguments
    ///
    /// * `table` - 書き込むデータセット
    /// * `table_name` - `dataset.table` 形式のテーブル名
    /// * `mode` - 既存データの扱い
    async fn write_table(&self, table: &Table, table_name: &str, mode: WriteMode) -> Result<()>;
}
