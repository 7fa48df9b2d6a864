//! File Cache Repository Implementation
//!
//! CacheRepositoryのファイルシステム実装

use async_trait::async_trait;
use log::info;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::adapter::tabular::{csv_codec, feather};
use crate::domain::entities::cache_descriptor::{CacheDescriptor, CacheFormat};
use crate::domain::entities::remote_file::ParseOptions;
use crate::domain::entities::table::Table;
use crate::domain::error::{Error, Result};
use crate::domain::repositories::cache_repository::CacheRepository;

/// ファイルシステムベースのキャッシュリポジトリ
pub struct FileCacheRepository;

impl FileCacheRepository {
    /// 新しいリポジトリを作成
    pub fn new() -> Self {
        Self
    }

    fn expanded_path(descriptor: &CacheDescriptor) -> PathBuf {
        let raw = descriptor.path().to_string_lossy();
        PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
    }

    /// キャッシュファイルを読み込む（同期処理）
    ///
    /// ファイルが存在しない場合のみ `Ok(None)`。それ以外の失敗は伝播する
    fn read_sync(descriptor: &CacheDescriptor) -> Result<Option<Table>> {
        let path = Self::expanded_path(descriptor);

        let table = match descriptor.format() {
            CacheFormat::Feather => {
                let file = match fs::File::open(&path) {
                    Ok(file) => file,
                    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                    Err(e) => return Err(Error::Io(e)),
                };
                feather::read(file)?
            }
            CacheFormat::Csv => {
                let bytes = match fs::read(&path) {
                    Ok(bytes) => bytes,
                    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                    Err(e) => return Err(Error::Io(e)),
                };
                csv_codec::read(&bytes, &ParseOptions::default())?
            }
        };

        info!(
            "loaded {} rows from cache file {}",
            table.num_rows(),
            path.display()
        );
        Ok(Some(table))
    }

    /// キャッシュファイルへ書き込む（同期処理）
    fn write_sync(descriptor: &CacheDescriptor, table: &Table) -> Result<()> {
        let path = Self::expanded_path(descriptor);

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        match descriptor.format() {
            CacheFormat::Feather => {
                let file = fs::File::create(&path)?;
                feather::write(file, table)?;
            }
            CacheFormat::Csv => {
                let bytes = csv_codec::write(table)?;
                fs::write(&path, bytes)?;
            }
        }

        info!(
            "saved {} rows to cache file {}",
            table.num_rows(),
            path.display()
        );
        Ok(())
    }
}

#[async_trait]
impl CacheRepository for FileCacheRepository {
    async fn read(&self, descriptor: &CacheDescriptor) -> Result<Option<Table>> {
        let descriptor = descriptor.clone();
        tokio::task::spawn_blocking(move || Self::read_sync(&descriptor))
            .await
            .map_err(|e| Error::Io(std::io::Error::other(format!("blocking task failed: {}", e))))?
    }

    async fn write(&self, descriptor: &CacheDescriptor, table: &Table) -> Result<()> {
        let descriptor = descriptor.clone();
        let table = table.clone();
        tokio::task::spawn_blocking(move || Self::write_sync(&descriptor, &table))
            .await
            .map_err(|e| Error::Io(std::io::Error::other(format!("blocking task failed: {}", e))))?
    }
}

impl Default for FileCacheRepository {
    fn default() -> Self {
        Self::new()
    }
}
