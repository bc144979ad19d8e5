//! Shard storage
//!
//! Lists and fetches Document AI output shards from object storage. Backends:
//! an S3-compatible client for Cloud Storage, a local directory tree, and an
//! in-memory store.

mod local;
mod memory;
mod s3_client;
mod traits;
mod types;

pub use local::LocalShardStore;
pub use memory::InMemoryShardStore;
pub use s3_client::S3ShardStore;
pub use traits::ShardStore;
pub use types::*;

use crate::error::{Result, ToolboxError};
use crate::shard::{parse_shards, Shard};

/// Extension of Document AI output shard files
pub const SHARD_EXTENSION: &str = ".json";

/// Whether an object key names a shard file
pub fn is_shard_file(key: &str) -> bool {
    key.ends_with(SHARD_EXTENSION)
}

/// Reject prefixes whose last path segment looks like a file name
pub fn validate_prefix(gcs_prefix: &str) -> Result<()> {
    let last_segment = gcs_prefix.rsplit('/').next().unwrap_or_default();
    if last_segment.contains('.') {
        return Err(ToolboxError::InvalidArgument(
            "gcs_prefix cannot contain file types".to_string(),
        ));
    }
    Ok(())
}

/// Fetch the bytes of every shard file under `gcs_prefix`, one at a time
pub async fn get_bytes(
    store: &dyn ShardStore,
    gcs_bucket_name: &str,
    gcs_prefix: &str,
) -> Result<Vec<Vec<u8>>> {
    let objects = store.list_objects(gcs_bucket_name, gcs_prefix).await?;
    tracing::debug!("Found {} objects under {}", objects.len(), gcs_prefix);

    let mut blobs = Vec::new();
    for object in objects {
        if !is_shard_file(&object.key) {
            tracing::debug!("Skipping non-shard object: {}", object.key);
            continue;
        }
        blobs.push(store.fetch_bytes(gcs_bucket_name, &object.key).await?);
    }

    Ok(blobs)
}

/// Validate the prefix, then fetch and parse every shard under it
pub async fn get_shards(
    store: &dyn ShardStore,
    gcs_bucket_name: &str,
    gcs_prefix: &str,
) -> Result<Vec<Shard>> {
    validate_prefix(gcs_prefix)?;
    let blobs = get_bytes(store, gcs_bucket_name, gcs_prefix).await?;
    parse_shards(&blobs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_with_file_type_rejected() {
        let err = validate_prefix("documentai/output/123456789/0.json").unwrap_err();
        assert_eq!(err.to_string(), "gcs_prefix cannot contain file types");
    }

    #[test]
    fn test_directory_prefixes_accepted() {
        assert!(validate_prefix("documentai/output/123456789/0/").is_ok());
        assert!(validate_prefix("documentai/output/123456789/0").is_ok());
        assert!(validate_prefix("v1.2/output/").is_ok());
        assert!(validate_prefix("").is_ok());
    }

    #[tokio::test]
    async fn test_get_bytes_filters_non_shard_files() {
        let store = InMemoryShardStore::new()
            .with_object("bucket", "prefix/DS_Store", "ds")
            .with_object("bucket", "prefix/test-annotations.json", "annotations")
            .with_object("bucket", "prefix/test-config.json", "config")
            .with_object("bucket", "prefix/test.pdf", "pdf");

        let blobs = get_bytes(&store, "bucket", "prefix").await.unwrap();
        assert_eq!(blobs, vec![b"annotations".to_vec(), b"config".to_vec()]);
    }

    #[tokio::test]
    async fn test_get_shards_checks_prefix_before_listing() {
        let store = InMemoryShardStore::new();
        let err = get_shards(&store, "missing-bucket", "out/0.json").await.unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[tokio::test]
    async fn test_get_shards_parses_each_blob() {
        let store = InMemoryShardStore::new()
            .with_object("bucket", "out/doc-0.json", r#"{"text": "a", "pages": [{"pageNumber": 1}]}"#);

        let shards = get_shards(&store, "bucket", "out/").await.unwrap();
        assert_eq!(shards.len(), 1);
        assert_eq!(shards[0].pages[0].page_number, 1);
    }
}
