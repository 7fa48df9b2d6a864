//! Format Dispatch
//!
//! 拡張子で選択された形式ごとのパーサへのディスパッチ

use crate::adapter::tabular::{csv_codec, xlsx};
use crate::domain::entities::remote_file::{ParseOptions, RemoteFileFormat};
use crate::domain::entities::table::Table;
use crate::domain::error::Result;
use crate::domain::repositories::table_codec::TableCodec;

/// 形式ごとのパーサを束ねた TableCodec 実装
///
/// プレーンテキストはカンマ区切りとしてパースする
pub struct FormatTableCodec;

impl FormatTableCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FormatTableCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl TableCodec for FormatTableCodec {
    fn decode(
        &self,
        format: RemoteFileFormat,
        bytes: &[u8],
        options: &ParseOptions,
    ) -> Result<Table> {
        match format {
            RemoteFileFormat::Csv | RemoteFileFormat::Text => csv_codec::read(bytes, options),
            RemoteFileFormat::Xlsx => xlsx::read(bytes, options),
        }
    }
}
