//! BigQuery Client Abstractions
//!
//! クライアントの抽象化と実装

use async_trait::async_trait;
use google_cloud_bigquery::client::Client;
use google_cloud_bigquery::http::job::get_query_results::{
    GetQueryResultsRequest, GetQueryResultsResponse,
};
use google_cloud_bigquery::http::job::query::{QueryRequest, QueryResponse};
use google_cloud_bigquery::http::table::{Table as TableMetadata, TableReference, TableSchema};
use google_cloud_bigquery::http::tabledata::insert_all::{InsertAllRequest, InsertAllResponse};
use google_cloud_bigquery::http::tabledata::list::FetchDataRequest;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use super::convert::{classify_bq_error, is_not_found_error};
use crate::adapter::auth::gcp_auth::{create_bigquery_client, CredentialProvider};
use crate::domain::error::{Error, Result};

/// JSON row payload for streaming inserts
pub type JsonRow = serde_json::Map<String, serde_json::Value>;

/// Trait for the BigQuery operations used by the warehouse repository
/// This enables mocking in tests while using the real client in production
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BigQueryApi: Send + Sync {
    /// Submit a query job
    async fn query(&self, project_id: &str, request: QueryRequest) -> Result<QueryResponse>;

    /// Poll a query job for completion and fetch further result pages
    async fn query_results(
        &self,
        project_id: &str,
        job_id: &str,
        request: GetQueryResultsRequest,
    ) -> Result<GetQueryResultsResponse>;

    /// Stream rows into a table
    async fn insert_rows(
        &self,
        project_id: &str,
        dataset: &str,
        table: &str,
        request: InsertAllRequest<JsonRow>,
    ) -> Result<InsertAllResponse>;

    async fn table_exists(&self, project_id: &str, dataset: &str, table: &str) -> Result<bool>;

    async fn create_table(
        &self,
        project_id: &str,
        dataset: &str,
        table: &str,
        schema: TableSchema,
    ) -> Result<()>;

    /// Delete a table; deleting a table that does not exist is not an error
    async fn delete_table(&self, project_id: &str, dataset: &str, table: &str) -> Result<()>;

    /// Whether the table currently holds at least one row
    async fn has_rows(&self, project_id: &str, dataset: &str, table: &str) -> Result<bool>;
}

/// Real BigQuery client wrapper implementing BigQueryApi
pub struct RealBigQueryApi {
    client: Client,
}

impl RealBigQueryApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[async_trait]
impl BigQueryApi for RealBigQueryApi {
    async fn query(&self, project_id: &str, request: QueryRequest) -> Result<QueryResponse> {
        self.client
            .job()
            .query(project_id, &request)
            .await
            .map_err(|e| classify_bq_error(e, Error::Query))
    }

    async fn query_results(
        &self,
        project_id: &str,
        job_id: &str,
        request: GetQueryResultsRequest,
    ) -> Result<GetQueryResultsResponse> {
        self.client
            .job()
            .get_query_results(project_id, job_id, &request)
            .await
            .map_err(|e| classify_bq_error(e, Error::Query))
    }

    async fn insert_rows(
        &self,
        project_id: &str,
        dataset: &str,
        table: &str,
        request: InsertAllRequest<JsonRow>,
    ) -> Result<InsertAllResponse> {
        self.client
            .tabledata()
            .insert(project_id, dataset, table, &request)
            .await
            .map_err(|e| classify_bq_error(e, Error::Query))
    }

    async fn table_exists(&self, project_id: &str, dataset: &str, table: &str) -> Result<bool> {
        match self.client.table().get(project_id, dataset, table).await {
            Ok(_) => Ok(true),
            Err(e) if is_not_found_error(&e.to_string()) => Ok(false),
            Err(e) => Err(classify_bq_error(e, Error::Query)),
        }
    }

    async fn create_table(
        &self,
        project_id: &str,
        dataset: &str,
        table: &str,
        schema: TableSchema,
    ) -> Result<()> {
        let metadata = TableMetadata {
            table_reference: TableReference {
                project_id: project_id.to_string(),
                dataset_id: dataset.to_string(),
                table_id: table.to_string(),
            },
            schema: Some(schema),
            ..Default::default()
        };
        self.client
            .table()
            .create(&metadata)
            .await
            .map(|_| ())
            .map_err(|e| classify_bq_error(e, Error::Query))
    }

    async fn delete_table(&self, project_id: &str, dataset: &str, table: &str) -> Result<()> {
        match self.client.table().delete(project_id, dataset, table).await {
            Ok(()) => Ok(()),
            Err(e) if is_not_found_error(&e.to_string()) => Ok(()),
            Err(e) => Err(classify_bq_error(e, Error::Query)),
        }
    }

    async fn has_rows(&self, project_id: &str, dataset: &str, table: &str) -> Result<bool> {
        let request = FetchDataRequest {
            max_results: Some(1),
            ..Default::default()
        };
        let response = self
            .client
            .tabledata()
            .read(project_id, dataset, table, &request)
            .await
            .map_err(|e| classify_bq_error(e, Error::Query))?;
        Ok(response.rows.map_or(false, |rows| !rows.is_empty()))
    }
}

/// Factory for creating BigQuery clients
///
/// The connection is a scoped resource: the repository creates a client
/// immediately before use and drops it when the call returns.
#[async_trait]
pub trait BigQueryClientFactory: Send + Sync {
    /// Build an authenticated client, returning the key file's project id
    async fn create_client(&self) -> Result<(Box<dyn BigQueryApi>, Option<String>)>;
}

/// Production implementation of BigQueryClientFactory
pub struct RealClientFactory {
    provider: Arc<CredentialProvider>,
}

impl RealClientFactory {
    pub fn new(provider: Arc<CredentialProvider>) -> Self {
        Self { provider }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[async_trait]
impl BigQueryClientFactory for RealClientFactory {
    async fn create_client(&self) -> Result<(Box<dyn BigQueryApi>, Option<String>)> {
        let (client, project_id) = create_bigquery_client(&self.provider).await?;
        Ok((Box::new(RealBigQueryApi::new(client)), project_id))
    }
}
