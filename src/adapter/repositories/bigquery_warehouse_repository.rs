//! BigQuery Warehouse Repository Implementation
//!
//! WarehouseRepositoryのBigQuery実装
//!
//! Clients are scoped resources: one is built from the factory right
//! before a call and dropped on every exit path, so no connection
//! outlives the operation that needed it.

use async_trait::async_trait;
use google_cloud_bigquery::http::job::get_query_results::GetQueryResultsRequest;
use google_cloud_bigquery::http::job::query::QueryRequest;
use google_cloud_bigquery::http::tabledata::insert_all::{InsertAllRequest, Row};
use google_cloud_bigquery::http::tabledata::list::Tuple;
use log::{info, warn};
use std::sync::Arc;

use crate::adapter::bigquery::client::{BigQueryApi, BigQueryClientFactory};
use crate::adapter::bigquery::convert::{build_table, fields_to_schema, row_to_json};
use crate::adapter::config::Config;
use crate::domain::entities::table::Table;
use crate::domain::entities::write_mode::WriteMode;
use crate::domain::error::{Error, Result};
use crate::domain::repositories::warehouse_repository::WarehouseRepository;

/// BigQueryウェアハウスリポジトリ
pub struct BigQueryWarehouseRepository {
    factory: Arc<dyn BigQueryClientFactory>,
    config: Config,
}

impl BigQueryWarehouseRepository {
    /// 新しいリポジトリを作成
    pub fn new(factory: Arc<dyn BigQueryClientFactory>, config: Config) -> Self {
        Self { factory, config }
    }

    async fn scoped_client(&self) -> Result<(Box<dyn BigQueryApi>, String)> {
        let (api, key_project) = self.factory.create_client().await?;
        let project_id = self
            .config
            .project_id
            .clone()
            .or(key_project)
            .ok_or_else(|| {
                Error::configuration(
                    "project id is not configured and the key file does not carry one",
                )
            })?;
        Ok((api, project_id))
    }

    /// `dataset.table` 形式のテーブル名を分解する
    fn split_table_name(table_name: &str) -> Result<(&str, &str)> {
        match table_name.split('.').collect::<Vec<_>>().as_slice() {
            [dataset, table] if !dataset.is_empty() && !table.is_empty() => Ok((dataset, table)),
            _ => Err(Error::configuration(format!(
                "table name '{}' must be of the form dataset.table",
                table_name
            ))),
        }
    }

    /// 書き込みモードに応じて書き込み先テーブルを準備する
    async fn prepare_target(
        &self,
        api: &dyn BigQueryApi,
        project_id: &str,
        dataset: &str,
        table_id: &str,
        source: &Table,
        mode: WriteMode,
    ) -> Result<()> {
        let schema = fields_to_schema(source.fields());
        match mode {
            WriteMode::Truncate => {
                api.delete_table(project_id, dataset, table_id).await?;
                api.create_table(project_id, dataset, table_id, schema).await?;
            }
            WriteMode::Append => {
                if !api.table_exists(project_id, dataset, table_id).await? {
                    api.create_table(project_id, dataset, table_id, schema).await?;
                }
            }
            WriteMode::Empty => {
                if api.table_exists(project_id, dataset, table_id).await? {
                    if api.has_rows(project_id, dataset, table_id).await? {
                        return Err(Error::query(format!(
                            "table {}.{} already contains data (duplicate)",
                            dataset, table_id
                        )));
                    }
                } else {
                    api.create_table(project_id, dataset, table_id, schema).await?;
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl WarehouseRepository for BigQueryWarehouseRepository {
    async fn query(&self, query: &str) -> Result<Table> {
        let (api, project_id) = self.scoped_client().await?;

        info!("executing query against project {}", project_id);

        let request = QueryRequest {
            query: query.to_string(),
            use_legacy_sql: false,
            location: self.config.location.clone().unwrap_or_default(),
            ..Default::default()
        };
        let response = api.query(&project_id, request).await?;

        let job_id = response.job_reference.job_id.clone();
        let location = response.job_reference.location.clone();
        let mut schema = response.schema;
        let mut tuples: Vec<Tuple> = response.rows.unwrap_or_default();
        let mut page_token = response.page_token;
        let mut complete = response.job_complete;

        // 未完了の間はポーリングし、完了後はページトークンを辿って
        // 結果セット全体をメモリ上に集める
        while !complete || page_token.is_some() {
            let request = GetQueryResultsRequest {
                page_token: page_token.take(),
                location: location.clone(),
                ..Default::default()
            };
            let page = api.query_results(&project_id, &job_id, request).await?;
            complete = page.job_complete;
            if complete {
                if schema.is_none() {
                    schema = page.schema;
                }
                tuples.extend(page.rows.unwrap_or_default());
                page_token = page.page_token;
            }
        }

        let schema = schema.ok_or_else(|| Error::query("query completed without a schema"))?;
        let table = build_table(&schema, &tuples)?;

        info!("query returned {} rows", table.num_rows());
        Ok(table)
    }

    async fn write_table(&self, table: &Table, table_name: &str, mode: WriteMode) -> Result<()> {
        let (dataset, table_id) = Self::split_table_name(table_name)?;
        let (api, project_id) = self.scoped_client().await?;

        info!(
            "writing {} rows to {} with disposition {}",
            table.num_rows(),
            table_name,
            mode.as_disposition()
        );

        self.prepare_target(api.as_ref(), &project_id, dataset, table_id, table, mode)
            .await?;

        let batch_size = self.config.insert_batch_size.max(1);
        for chunk in table.rows().chunks(batch_size) {
            let rows: Vec<Row<_>> = chunk
                .iter()
                .map(|row| Row {
                    insert_id: None,
                    json: row_to_json(table.fields(), row),
                })
                .collect();
            let request = InsertAllRequest {
                rows,
                ..Default::default()
            };

            let response = api.insert_rows(&project_id, dataset, table_id, request).await?;
            if let Some(errors) = response.insert_errors {
                if !errors.is_empty() {
                    for error in &errors {
                        warn!("row {}: {:?}", error.index, error.errors);
                    }
                    return Err(Error::query(format!(
                        "{} rows were rejected by the streaming insert",
                        errors.len()
                    )));
                }
            }
        }

        Ok(())
    }
}
