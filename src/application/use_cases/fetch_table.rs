//! # Fetch Table Use Case
//!
//! キャッシュ優先のデータ取得ユースケース

use std::sync::Arc;

use log::info;

use crate::domain::entities::cache_descriptor::CacheDescriptor;
use crate::domain::entities::table::Table;
use crate::domain::error::Result;
use crate::domain::repositories::cache_repository::CacheRepository;
use crate::domain::repositories::warehouse_repository::WarehouseRepository;

/// キャッシュ優先取得ユースケース
///
/// ローカルキャッシュにデータセットがあればそれを返し、無ければ
/// ウェアハウスに問い合わせて結果をキャッシュに書き込む
pub struct FetchTableUseCase<W: WarehouseRepository, C: CacheRepository> {
    warehouse_repository: Arc<W>,
    cache_repository: Arc<C>,
}

impl<W: WarehouseRepository, C: CacheRepository> FetchTableUseCase<W, C> {
    /// 新しいユースケースを作成
    pub fn new(warehouse_repository: Arc<W>, cache_repository: Arc<C>) -> Self {
        Self {
            warehouse_repository,
            cache_repository,
        }
    }

    /// データセットを取得する
    ///
    /// # Arguments
    ///
    /// * `query` - ウェアハウスに渡すクエリ文字列
    /// * `descriptor` - キャッシュの保存先（None の場合キャッシュは使わない）
    /// * `read_cache` - 既存のキャッシュファイルの読み取りを許可するか
    ///
    /// # Errors
    ///
    /// キャッシュファイルの「存在しない」以外の読み取り失敗、および
    /// ウェアハウスのエラーはそのまま伝播する
    pub async fn execute(
        &self,
        query: &str,
        descriptor: Option<&CacheDescriptor>,
        read_cache: bool,
    ) -> Result<Table> {
        let Some(descriptor) = descriptor else {
            info!("no cache descriptor given, fetching from warehouse");
            return self.warehouse_repository.query(query).await;
        };

        if !read_cache {
            info!("cache read disabled, fetching from warehouse");
            return self.warehouse_repository.query(query).await;
        }

        info!("loading data from {}", descriptor.path().display());
        match self.cache_repository.read(descriptor).await? {
            Some(table) => {
                info!(
                    "loaded {} rows from cache {}",
                    table.num_rows(),
                    descriptor.path().display()
                );
                Ok(table)
            }
            None => {
                info!(
                    "cache file {} not found, fetching data from warehouse",
                    descriptor.path().display()
                );
                let table = self.warehouse_repository.query(query).await?;
                self.cache_repository.write(descriptor, &table).await?;
                Ok(table)
            }
        }
    }
}
