//! # Tabsync
//!
//! BigQueryとGoogle Driveから表形式データを取得・キャッシュするユーティリティ
//!
//! このプロジェクトはクリーンアーキテクチャを採用しており、以下の4層で構成されています：
//!
//! - **Domain層**: ビジネスの核心的なルールとエンティティ（外部依存なし）
//! - **Application層**: アプリケーション固有のビジネスフロー（ユースケース）
//! - **Adapter層**: 外部システムとの統合（BigQuery, Google Drive, ファイルシステム等）
//! - **Driver層**: 依存性注入とファサード
//!
//! ## 提供する操作
//!
//! - `fetch_or_cache`: ローカルキャッシュ優先のクエリ実行
//! - `write_table`: テーブルのウェアハウスへの永続化
//! - `list_folder` / `read_file`: Driveフォルダの列挙とファイルの取り込み
//! - `TransformService`: 純粋なリスト変換

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
// カバレッジ計測時に外部サービス依存コードを除外するために使用
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// Domain層（純粋なビジネスロジック）
pub mod domain;

// Application層（ユースケース）
pub mod application;

// Adapter層（Infrastructure）
pub mod adapter;

// Driver層（ファサード）
pub mod driver;
