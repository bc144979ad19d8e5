//! Filesystem-backed shard store
//!
//! Buckets are directories under a root; keys are `/`-separated paths
//! relative to the bucket directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::StorageError;

use super::traits::ShardStore;
use super::types::ObjectMetadata;

pub struct LocalShardStore {
    root: PathBuf,
}

impl LocalShardStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn bucket_dir(&self, bucket: &str) -> Result<PathBuf, StorageError> {
        let dir = self.root.join(bucket);
        if !dir.is_dir() {
            return Err(StorageError::BucketNotFound(bucket.to_string()));
        }
        Ok(dir)
    }
}

fn walk(dir: &Path, base: &Path, out: &mut Vec<ObjectMetadata>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            walk(&path, base, out)?;
        } else if file_type.is_file() {
            let key = path
                .strip_prefix(base)
                .unwrap_or(&path)
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            out.push(ObjectMetadata::new(key, entry.metadata()?.len() as i64));
        }
    }
    Ok(())
}

#[async_trait]
impl ShardStore for LocalShardStore {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectMetadata>, StorageError> {
        let dir = self.bucket_dir(bucket)?;

        let mut objects = Vec::new();
        walk(&dir, &dir, &mut objects)?;
        objects.retain(|obj| obj.key.starts_with(prefix));
        objects.sort_by(|a, b| a.key.cmp(&b.key));

        Ok(objects)
    }

    async fn fetch_bytes(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.bucket_dir(bucket)?.join(key);
        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::ObjectNotFound(key.to_string()),
            _ => StorageError::Io(e),
        })
    }
}
