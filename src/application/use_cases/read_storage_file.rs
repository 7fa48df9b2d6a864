//! # Read Storage File Use Case
//!
//! ストレージファイル読み込みユースケース
//!
//! 名前解決 → パーサ選択 → ダウンロード → パース の順で進み、
//! いずれかの段階で失敗した場合は操作全体が中断される（部分的な
//! データセットは返さない）

use std::sync::Arc;

use log::info;

use crate::domain::entities::remote_file::{ParseOptions, RemoteFileFormat};
use crate::domain::entities::table::Table;
use crate::domain::error::Result;
use crate::domain::repositories::storage_repository::StorageRepository;
use crate::domain::repositories::table_codec::TableCodec;

/// ストレージファイル読み込みユースケース
///
/// リモートファイルをダウンロードしてテーブルに変換する
pub struct ReadStorageFileUseCase<S: StorageRepository, P: TableCodec> {
    storage_repository: Arc<S>,
    codec: Arc<P>,
}

impl<S: StorageRepository, P: TableCodec> ReadStorageFileUseCase<S, P> {
    /// 新しいユースケースを作成
    pub fn new(storage_repository: Arc<S>, codec: Arc<P>) -> Self {
        Self {
            storage_repository,
            codec,
        }
    }

    /// ファイルをダウンロードしてテーブルとして返す
    ///
    /// # Errors
    ///
    /// 拡張子が未対応の場合はダウンロードを試みる前に
    /// `Error::UnsupportedFormat` を返す。ダウンロード失敗は
    /// `Error::Remote`、パース失敗は `Error::Decode` として伝播する
    pub async fn execute(&self, file_id: &str, options: &ParseOptions) -> Result<Table> {
        let file_name = self.storage_repository.file_name(file_id).await?;

        // パーサの選択はダウンロードより先に行う
        let format = RemoteFileFormat::from_file_name(&file_name)?;

        let bytes = self.storage_repository.download(file_id).await?;
        info!("downloaded {} ({} bytes)", file_name, bytes.len());

        let table = self.codec.decode(format, &bytes, options)?;
        info!("parsed {} into {} rows", file_name, table.num_rows());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::table::{ColumnType, Field, Value};
    use crate::domain::error::Error;
    use crate::domain::repositories::storage_repository::MockStorageRepository;
    use crate::domain::repositories::table_codec::MockTableCodec;

    fn parsed_table() -> Table {
        let mut table = Table::new(vec![Field::new("a", ColumnType::Int64)]).unwrap();
        table.push_row(vec![Value::Int64(1)]).unwrap();
        table
    }

    #[tokio::test]
    async fn test_read_csv_file() {
        let mut storage = MockStorageRepository::new();
        storage
            .expect_file_name()
            .withf(|id| id == "file-1")
            .returning(|_| Ok("data.csv".to_string()));
        storage
            .expect_download()
            .times(1)
            .returning(|_| Ok(b"a\n1\n".to_vec()));

        let mut codec = MockTableCodec::new();
        codec
            .expect_decode()
            .withf(|format, bytes, _| {
                *format == RemoteFileFormat::Csv && bytes == b"a\n1\n"
            })
            .returning(|_, _, _| Ok(parsed_table()));

        let use_case = ReadStorageFileUseCase::new(Arc::new(storage), Arc::new(codec));
        let table = use_case
            .execute("file-1", &ParseOptions::default())
            .await
            .unwrap();

        assert_eq!(table.num_rows(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_extension_aborts_before_download() {
        let mut storage = MockStorageRepository::new();
        storage
            .expect_file_name()
            .returning(|_| Ok("slides.pdf".to_string()));
        // ダウンロードは一切呼ばれない
        storage.expect_download().times(0);

        let codec = MockTableCodec::new();
        let use_case = ReadStorageFileUseCase::new(Arc::new(storage), Arc::new(codec));

        let result = use_case.execute("file-1", &ParseOptions::default()).await;
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_download_failure_propagates_as_remote_error() {
        let mut storage = MockStorageRepository::new();
        storage
            .expect_file_name()
            .returning(|_| Ok("data.txt".to_string()));
        storage
            .expect_download()
            .returning(|_| Err(Error::remote("connection reset")));

        let codec = MockTableCodec::new();
        let use_case = ReadStorageFileUseCase::new(Arc::new(storage), Arc::new(codec));

        let result = use_case.execute("file-1", &ParseOptions::default()).await;
        assert!(matches!(result, Err(Error::Remote(_))));
    }

    #[tokio::test]
    async fn test_parse_failure_propagates_as_decode_error() {
        let mut storage = MockStorageRepository::new();
        storage
            .expect_file_name()
            .returning(|_| Ok("broken.xlsx".to_string()));
        storage
            .expect_download()
            .returning(|_| Ok(vec![0x00, 0x01]));

        let mut codec = MockTableCodec::new();
        codec
            .expect_decode()
            .returning(|_, _, _| Err(Error::decode("not a spreadsheet")));

        let use_case = ReadStorageFileUseCase::new(Arc::new(storage), Arc::new(codec));
        let result = use_case.execute("file-1", &ParseOptions::default()).await;
        assert!(matches!(result, Err(Error::Decode(_))));
    }
}
