//! Drive Storage Repository Implementation
//!
//! StorageRepositoryのGoogle Drive実装

use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use crate::adapter::drive::client::DriveApi;
use crate::domain::entities::remote_file::RemoteFile;
use crate::domain::error::{Error, Result};
use crate::domain::repositories::storage_repository::StorageRepository;

/// Google Driveベースのストレージリポジトリ
pub struct DriveStorageRepository {
    api: Arc<dyn DriveApi>,
}

impl DriveStorageRepository {
    /// 新しいリポジトリを作成
    pub fn new(api: Arc<dyn DriveApi>) -> Self {
        Self { api }
    }

    /// フォルダ直下の、ゴミ箱に入っていない非フォルダアイテムを選ぶクエリ
    fn folder_query(folder_id: &str) -> String {
        format!(
            "'{}' in parents and trashed = false and \
             mimeType!='application/vnd.google-apps.folder'",
            folder_id
        )
    }
}

#[async_trait]
impl StorageRepository for DriveStorageRepository {
    async fn list_folder(&self, folder_id: &str) -> Result<Vec<RemoteFile>> {
        let query = Self::folder_query(folder_id);

        let files = match self.api.list_files(&query).await {
            Ok(files) => files,
            // APIエラーは回復可能として空リストに落とす（認証エラーは除く）
            Err(Error::Remote(message)) => {
                warn!("an error occurred while listing folder {}: {}", folder_id, message);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        if files.is_empty() {
            info!("no files found in folder {}", folder_id);
            return Ok(Vec::new());
        }

        Ok(files
            .into_iter()
            .map(|f| RemoteFile {
                id: f.id,
                name: f.name,
            })
            .collect())
    }

    async fn file_name(&self, file_id: &str) -> Result<String> {
        Ok(self.api.file_metadata(file_id).await?.name)
    }

    async fn download(&self, file_id: &str) -> Result<Vec<u8>> {
        self.api.download(file_id).await
    }
}
