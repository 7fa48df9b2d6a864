//! # Driver Layer
//!
//! 依存性注入（DI）を行い、全てを組み立てる層
//!
//! ## 構成要素
//!
//! - **service**: 実アダプタを配線した公開ファサード

pub mod service;

pub use service::TabsyncService;
