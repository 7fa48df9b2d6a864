//! # List Storage Folder Use Case
//!
//! ストレージフォルダ列挙ユースケース

use std::sync::Arc;

use crate::domain::entities::remote_file::RemoteFile;
use crate::domain::error::Result;
use crate::domain::repositories::storage_repository::StorageRepository;

/// フォルダ列挙ユースケース
///
/// 指定されたフォルダ直下のファイルを列挙する
pub struct ListStorageFolderUseCase<S: StorageRepository> {
    storage_repository: Arc<S>,
}

impl<S: StorageRepository> ListStorageFolderUseCase<S> {
    /// 新しいユースケースを作成
    pub fn new(storage_repository: Arc<S>) -> Self {
        Self { storage_repository }
    }

    /// フォルダ直下のファイルを列挙する
    ///
    /// 該当ファイルが無い場合は空のリストを返す
    pub async fn execute(&self, folder_id: &str) -> Result<Vec<RemoteFile>> {
        self.storage_repository.list_folder(folder_id).await
    }
}
