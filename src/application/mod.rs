//! # Application Layer
//!
//! アプリケーション固有のビジネスフロー（ユースケース）を定義します。
//!
//! 各ユースケースは Domain 層の Repository trait にのみ依存し、
//! 具体的な外部システムについては何も知りません。

pub mod use_cases;
