//! In-memory shard store

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;

use crate::error::StorageError;

use super::traits::ShardStore;
use super::types::ObjectMetadata;

/// Shard store holding objects in memory, for tests and fixtures
#[derive(Debug, Default, Clone)]
pub struct InMemoryShardStore {
    buckets: HashMap<String, BTreeMap<String, Vec<u8>>>,
}

impl InMemoryShardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, bucket: &str, key: &str, data: impl Into<Vec<u8>>) -> Self {
        self.insert(bucket, key, data);
        self
    }

    pub fn insert(&mut self, bucket: &str, key: &str, data: impl Into<Vec<u8>>) {
        self.buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), data.into());
    }
}

#[async_trait]
impl ShardStore for InMemoryShardStore {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectMetadata>, StorageError> {
        let objects = self
            .buckets
            .get(bucket)
            .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?;

        Ok(objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, data)| ObjectMetadata::new(key.clone(), data.len() as i64))
            .collect())
    }

    async fn fetch_bytes(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        self.buckets
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .cloned()
            .ok_or_else(|| StorageError::ObjectNotFound(key.to_string()))
    }
}
