//! Adapter Layer
//!
//! 外部システム（BigQuery, Google Drive, ファイルシステム）との統合

pub mod auth;
pub mod bigquery;
pub mod config;
pub mod drive;
pub mod repositories;
pub mod tabular;
