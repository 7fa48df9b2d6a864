//! Authentication
//!
//! GCP認証

pub mod gcp_auth;

pub use gcp_auth::{create_bigquery_client, create_drive_token_source, CredentialProvider};
