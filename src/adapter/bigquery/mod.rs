//! BigQuery Adapter
//!
//! BigQueryクライアントと変換ロジック

pub mod client;
pub mod convert;
