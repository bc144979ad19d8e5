//! Configuration management for the Document AI toolbox

use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub warehouse: WarehouseConfig,
}

/// Object storage holding Document AI output shards.
///
/// Cloud Storage is reached through its S3-compatible XML API, so the
/// credentials are an HMAC key pair rather than a service account.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WarehouseConfig {
    pub endpoint: String,
    pub access_token: Option<String>,
}

pub const DEFAULT_GCS_ENDPOINT: &str = "https://storage.googleapis.com";
pub const DEFAULT_BIGQUERY_ENDPOINT: &str = "https://bigquery.googleapis.com";

impl Default for Config {
    fn default() -> Self {
        Config {
            storage: StorageConfig {
                endpoint: DEFAULT_GCS_ENDPOINT.to_string(),
                access_key: String::new(),
                secret_key: String::new(),
                region: Some("auto".to_string()),
            },
            warehouse: WarehouseConfig {
                endpoint: DEFAULT_BIGQUERY_ENDPOINT.to_string(),
                access_token: None,
            },
        }
    }
}

impl Config {
    /// Read configuration from the environment; unset values fall back to defaults
    pub fn from_env() -> Self {
        Config {
            storage: StorageConfig {
                endpoint: env::var("GCS_ENDPOINT")
                    .unwrap_or_else(|_| DEFAULT_GCS_ENDPOINT.to_string()),
                access_key: env::var("GCS_HMAC_ACCESS_KEY").unwrap_or_default(),
                secret_key: env::var("GCS_HMAC_SECRET").unwrap_or_default(),
                region: env::var("GCS_REGION").ok().or_else(|| Some("auto".to_string())),
            },
            warehouse: WarehouseConfig {
                endpoint: env::var("BIGQUERY_ENDPOINT")
                    .unwrap_or_else(|_| DEFAULT_BIGQUERY_ENDPOINT.to_string()),
                access_token: env::var("BIGQUERY_ACCESS_TOKEN").ok(),
            },
        }
    }
}
