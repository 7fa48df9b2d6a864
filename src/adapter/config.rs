//! Configuration
//!
//! 設定ファイルの読み込み

use serde::{Deserialize, Serialize};
use std::fs;

use crate::adapter::auth::gcp_auth::DEFAULT_CREDENTIALS_ENV;
use crate::domain::error::{Error, Result};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// GCPプロジェクトID（未指定の場合はキーのproject_idを使う）
    #[serde(default)]
    pub project_id: Option<String>,

    /// BigQueryロケーション（例: "US", "asia-northeast1"）
    #[serde(default)]
    pub location: Option<String>,

    /// サービスアカウントキーのパスを指す環境変数名
    #[serde(default = "default_credentials_env")]
    pub credentials_env: String,

    /// ストリーミングインサートのバッチサイズ
    #[serde(default = "default_insert_batch_size")]
    pub insert_batch_size: usize,
}

fn default_credentials_env() -> String {
    DEFAULT_CREDENTIALS_ENV.to_string()
}

fn default_insert_batch_size() -> usize {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_id: None,
            location: None,
            credentials_env: default_credentials_env(),
            insert_batch_size: default_insert_batch_size(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::configuration(format!("invalid config file {}: {}", path, e)))
    }
}
