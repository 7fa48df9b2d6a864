//! Google Drive Adapter
//!
//! Drive APIクライアント

pub mod client;
