//! Service Facade
//!
//! 依存性注入と公開オペレーション
//!
//! sessync流のワークフロー組み立てに相当する層。実アダプタを配線し、
//! ライブラリの4つの操作を公開する

use std::sync::Arc;

use crate::adapter::auth::CredentialProvider;
use crate::adapter::bigquery::client::RealClientFactory;
use crate::adapter::config::Config;
use crate::adapter::drive::client::DriveClient;
use crate::adapter::repositories::bigquery_warehouse_repository::BigQueryWarehouseRepository;
use crate::adapter::repositories::drive_storage_repository::DriveStorageRepository;
use crate::adapter::repositories::file_cache_repository::FileCacheRepository;
use crate::adapter::tabular::codec::FormatTableCodec;
use crate::application::use_cases::fetch_table::FetchTableUseCase;
use crate::application::use_cases::list_storage_folder::ListStorageFolderUseCase;
use crate::application::use_cases::read_storage_file::ReadStorageFileUseCase;
use crate::application::use_cases::write_table::WriteTableUseCase;
use crate::domain::entities::cache_descriptor::CacheDescriptor;
use crate::domain::entities::remote_file::{ParseOptions, RemoteFile};
use crate::domain::entities::table::Table;
use crate::domain::entities::write_mode::WriteMode;
use crate::domain::error::Result;

/// tabsyncのサービスファサード
///
/// ひとつの `CredentialProvider` をBigQueryとDriveで共有する。
/// リモート接続は操作ごとに生成・破棄される
pub struct TabsyncService {
    fetch_use_case: FetchTableUseCase<BigQueryWarehouseRepository, FileCacheRepository>,
    write_use_case: WriteTableUseCase<BigQueryWarehouseRepository>,
    list_use_case: ListStorageFolderUseCase<DriveStorageRepository>,
    read_use_case: ReadStorageFileUseCase<DriveStorageRepository, FormatTableCodec>,
}

impl TabsyncService {
    /// Create a new service instance with dependency injection
    pub fn new(config: Config) -> Self {
        let provider = Arc::new(CredentialProvider::new(config.credentials_env.clone()));

        // Warehouse side
        let factory = Arc::new(RealClientFactory::new(provider.clone()));
        let warehouse = Arc::new(BigQueryWarehouseRepository::new(factory, config));
        let cache = Arc::new(FileCacheRepository::new());

        // Storage side
        let drive = Arc::new(DriveClient::new(provider));
        let storage = Arc::new(DriveStorageRepository::new(drive));
        let codec = Arc::new(FormatTableCodec::new());

        Self {
            fetch_use_case: FetchTableUseCase::new(warehouse.clone(), cache),
            write_use_case: WriteTableUseCase::new(warehouse),
            list_use_case: ListStorageFolderUseCase::new(storage.clone()),
            read_use_case: ReadStorageFileUseCase::new(storage, codec),
        }
    }

    /// キャッシュ優先でデータセットを取得する
    ///
    /// デスクリプタが無いか `read_cache` が偽の場合は常にウェアハウスへ
    /// 問い合わせる。キャッシュファイルが無い場合はウェアハウスの結果を
    /// キャッシュへ書き込んでから返す
    pub async fn fetch_or_cache(
        &self,
        query: &str,
        descriptor: Option<&CacheDescriptor>,
        read_cache: bool,
    ) -> Result<Table> {
        self.fetch_use_case.execute(query, descriptor, read_cache).await
    }

    /// データセットをウェアハウスのテーブルへ書き込む
    pub async fn write_table(
        &self,
        table: &Table,
        table_name: &str,
        mode: WriteMode,
    ) -> Result<()> {
        self.write_use_case.execute(table, table_name, mode).await
    }

    /// ストレージフォルダ直下のファイルを列挙する
    pub async fn list_folder(&self, folder_id: &str) -> Result<Vec<RemoteFile>> {
        self.list_use_case.execute(folder_id).await
    }

    /// ストレージ上のファイルをダウンロードしてテーブルとして返す
    pub async fn read_file(&self, file_id: &str, options: &ParseOptions) -> Result<Table> {
        self.read_use_case.execute(file_id, options).await
    }
}
