//! # Write Table Use Case
//!
//! テーブル書き込みユースケース

use std::sync::Arc;

use log::info;

use crate::domain::entities::table::Table;
use crate::domain::entities::write_mode::WriteMode;
use crate::domain::error::Result;
use crate::domain::repositories::warehouse_repository::WarehouseRepository;

/// テーブル書き込みユースケース
///
/// データセットをウェアハウスの名前付きテーブルへ永続化する
pub struct WriteTableUseCase<W: WarehouseRepository> {
    warehouse_repository: Arc<W>,
}

impl<W: WarehouseRepository> WriteTableUseCase<W> {
    /// 新しいユースケースを作成
    pub fn new(warehouse_repository: Arc<W>) -> Self {
        Self {
            warehouse_repository,
        }
    }

    /// データセットを書き込む
    ///
    /// # Arguments
    ///
    /// * `table` - 書き込むデータセット
    /// * `table_name` - `dataset.table` 形式のテーブル名
    /// * `mode` - 既存データの扱い
    pub async fn execute(&self, table: &Table, table_name: &str, mode: WriteMode) -> Result<()> {
        self.warehouse_repository
            .write_table(table, table_name, mode)
            .await?;
        info!("data written to {} in warehouse", table_name);
        Ok(())
    }
}
