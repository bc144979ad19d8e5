//! Storage capability

use async_trait::async_trait;

use crate::error::StorageError;

use super::types::ObjectMetadata;

/// Object storage holding Document AI output shards
#[async_trait]
pub trait ShardStore: Send + Sync {
    /// Every object in `bucket` whose key starts with `prefix`
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectMetadata>, StorageError>;

    /// Full contents of one object
    async fn fetch_bytes(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;
}
