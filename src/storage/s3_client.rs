//! S3-compatible storage client
//!
//! Cloud Storage exposes an S3-compatible XML API, so shards are listed and
//! fetched with the AWS SDK pointed at the GCS endpoint and an HMAC key.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::{Credentials, Region},
    Client,
};
use chrono::DateTime;

use crate::config::StorageConfig;
use crate::error::StorageError;

use super::traits::ShardStore;
use super::types::{ListOptions, ObjectList, ObjectMetadata};

/// Shard store backed by an S3-compatible endpoint
#[derive(Clone)]
pub struct S3ShardStore {
    client: Client,
}

impl S3ShardStore {
    /// Create a new client from configuration
    pub fn new(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "docai-toolbox",
        );

        let region = config.region.clone().unwrap_or_else(|| "auto".to_string());

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint)
            .region(Region::new(region))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        tracing::debug!("Configured shard store at {}", config.endpoint);

        Self {
            client: Client::from_conf(s3_config),
        }
    }

    /// List one page of objects in a bucket
    pub async fn list_page(&self, bucket: &str, options: ListOptions) -> Result<ObjectList, StorageError> {
        let mut request = self.client.list_objects_v2().bucket(bucket);

        if let Some(prefix) = options.prefix {
            request = request.prefix(prefix);
        }

        if let Some(max_keys) = options.max_keys {
            request = request.max_keys(max_keys);
        }

        if let Some(token) = options.continuation_token {
            request = request.continuation_token(token);
        }

        let response = request.send().await.map_err(|e| {
            let message = e.to_string();
            if message.contains("NoSuchBucket") {
                StorageError::BucketNotFound(bucket.to_string())
            } else if message.contains("AccessDenied") || message.contains("403") {
                StorageError::AccessDenied(bucket.to_string())
            } else {
                StorageError::SdkError(format!("Failed to list objects: {}", message))
            }
        })?;

        let objects: Vec<ObjectMetadata> = response
            .contents()
            .iter()
            .map(|obj| ObjectMetadata {
                key: obj.key().unwrap_or_default().to_string(),
                size: obj.size().unwrap_or(0),
                last_modified: obj
                    .last_modified()
                    .and_then(|dt| DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())),
                etag: obj.e_tag().map(|s| s.to_string()),
            })
            .collect();

        Ok(ObjectList {
            objects,
            continuation_token: response.next_continuation_token().map(|s| s.to_string()),
            is_truncated: response.is_truncated().unwrap_or(false),
        })
    }

    /// List all objects with a given prefix (handles pagination)
    pub async fn list_all_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectMetadata>, StorageError> {
        let mut all_objects = Vec::new();
        let mut continuation_token = None;

        loop {
            let mut options = ListOptions::new().with_max_keys(1000).with_prefix(prefix);

            if let Some(token) = continuation_token.take() {
                options = options.with_continuation_token(token);
            }

            let result = self.list_page(bucket, options).await?;
            all_objects.extend(result.objects);

            if !result.is_truncated {
                break;
            }

            continuation_token = result.continuation_token;
        }

        Ok(all_objects)
    }
}

#[async_trait]
impl ShardStore for S3ShardStore {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectMetadata>, StorageError> {
        self.list_all_objects(bucket, prefix).await
    }

    async fn fetch_bytes(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.to_string().contains("404") || e.to_string().contains("NoSuchKey") {
                    StorageError::ObjectNotFound(key.to_string())
                } else {
                    StorageError::SdkError(format!("Failed to get object {}: {}", key, e))
                }
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::SdkError(format!("Failed to read object body: {}", e)))?
            .into_bytes()
            .to_vec();

        Ok(data)
    }
}
