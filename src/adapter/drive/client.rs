//! Google Drive REST Client
//!
//! Drive API v3 クライアント
//!
//! Remember to share the target folder with the service account
//! (…@….iam.gserviceaccount.com), otherwise every listing comes back empty.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::adapter::auth::gcp_auth::{create_drive_token_source, CredentialProvider};
use crate::domain::error::{Error, Result};

const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// File metadata returned by the Drive API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFileMeta {
    pub id: String,
    pub name: String,
}

/// One page of a files.list response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileListPage {
    next_page_token: Option<String>,
    #[serde(default)]
    files: Vec<DriveFileMeta>,
}

/// Trait for the Drive operations used by the storage repository
/// This enables mocking in tests while using the real client in production
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// List every file matching the query, following pagination
    async fn list_files(&self, query: &str) -> Result<Vec<DriveFileMeta>>;

    /// Resolve a file's metadata
    async fn file_metadata(&self, file_id: &str) -> Result<DriveFileMeta>;

    /// Download the full file content, chunk by chunk, until complete
    async fn download(&self, file_id: &str) -> Result<Vec<u8>>;
}

/// Real Drive REST client implementing DriveApi
///
/// A fresh token source is built per operation, scoped like the rest of
/// the remote connections; the underlying service account key is read
/// through the shared `CredentialProvider` cache.
pub struct DriveClient {
    http: reqwest::Client,
    provider: Arc<CredentialProvider>,
}

impl DriveClient {
    pub fn new(provider: Arc<CredentialProvider>) -> Self {
        Self {
            http: reqwest::Client::new(),
            provider,
        }
    }

    async fn token(&self) -> Result<String> {
        let token_source = create_drive_token_source(&self.provider).await?;
        token_source
            .token()
            .await
            .map_err(|e| Error::auth(format!("failed to obtain access token: {}", e)))
    }

    async fn into_api_error(response: reqwest::Response, context: &str) -> Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            Error::auth(format!("{}: {} {}", context, status, body))
        } else {
            Error::remote(format!("{}: {} {}", context, status, body))
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[async_trait]
impl DriveApi for DriveClient {
    async fn list_files(&self, query: &str) -> Result<Vec<DriveFileMeta>> {
        let token = self.token().await?;
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![
                ("q", query.to_string()),
                ("supportsAllDrives", "true".to_string()),
                ("includeItemsFromAllDrives", "true".to_string()),
                ("fields", "nextPageToken, files(id, name)".to_string()),
            ];
            if let Some(token) = &page_token {
                params.push(("pageToken", token.clone()));
            }

            let response = self
                .http
                .get(format!("{}/files", DRIVE_API_BASE))
                .header(AUTHORIZATION, &token)
                .query(&params)
                .send()
                .await
                .map_err(|e| Error::remote(format!("files.list request failed: {}", e)))?;

            if !response.status().is_success() {
                return Err(Self::into_api_error(response, "files.list").await);
            }

            let page: FileListPage = response
                .json()
                .await
                .map_err(|e| Error::remote(format!("malformed files.list response: {}", e)))?;

            files.extend(page.files);
            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        Ok(files)
    }

    async fn file_metadata(&self, file_id: &str) -> Result<DriveFileMeta> {
        let token = self.token().await?;
        let response = self
            .http
            .get(format!("{}/files/{}", DRIVE_API_BASE, file_id))
            .header(AUTHORIZATION, &token)
            .query(&[("fields", "id, name"), ("supportsAllDrives", "true")])
            .send()
            .await
            .map_err(|e| Error::remote(format!("files.get request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::into_api_error(response, "files.get").await);
        }

        response
            .json()
            .await
            .map_err(|e| Error::remote(format!("malformed files.get response: {}", e)))
    }

    async fn download(&self, file_id: &str) -> Result<Vec<u8>> {
        let token = self.token().await?;
        let mut response = self
            .http
            .get(format!("{}/files/{}", DRIVE_API_BASE, file_id))
            .header(AUTHORIZATION, &token)
            .query(&[("alt", "media"), ("supportsAllDrives", "true")])
            .send()
            .await
            .map_err(|e| Error::remote(format!("download request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::into_api_error(response, "download").await);
        }

        // 完了までチャンクを順番に読み切る
        let mut content = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::remote(format!("download interrupted: {}", e)))?
        {
            content.extend_from_slice(&chunk);
        }

        Ok(content)
    }
}
