//! Tabular File Codecs
//!
//! テーブルとファイル形式の相互変換

pub mod codec;
pub mod csv_codec;
pub mod feather;
pub mod xlsx;
