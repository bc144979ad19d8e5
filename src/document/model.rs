//! Merged document and its constructors

use std::path::Path;

use crate::error::{Result, ToolboxError};
use crate::shard::{schema, Shard};
use crate::storage::{self, ShardStore};

use super::entity::Entity;
use super::merge;
use super::page::Page;

/// A complete Document AI result, merged from its shards.
///
/// Immutable once constructed; every query is a read-only projection.
#[derive(Debug, Clone)]
pub struct Document {
    pub(super) shards: Vec<Shard>,
    pub(super) pages: Vec<Page>,
    pub(super) entities: Vec<Entity>,
    pub(super) text: String,
}

impl Document {
    /// Merge a complete shard set supplied in any order
    pub fn from_shards(shards: Vec<Shard>) -> Result<Self> {
        merge::merge(shards)
    }

    /// Load one shard file, or every `.json` shard file in a directory
    pub fn from_document_path<P: AsRef<Path>>(document_path: P) -> Result<Self> {
        let path = document_path.as_ref();

        let shards = if path.is_dir() {
            let mut files: Vec<_> = std::fs::read_dir(path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|file| file.is_file() && storage::is_shard_file(&file.to_string_lossy()))
                .collect();
            files.sort();

            if files.is_empty() {
                return Err(ToolboxError::NotFound(format!(
                    "no document shards in {}",
                    path.display()
                )));
            }

            files
                .iter()
                .map(Shard::from_path)
                .collect::<Result<Vec<_>>>()?
        } else {
            vec![Shard::from_path(path)?]
        };

        tracing::info!(path = %path.display(), shards = shards.len(), "Loading document from path");
        Self::from_shards(shards)
    }

    /// Wrap an already-deserialized, unsharded Document AI document
    pub fn from_documentai_document(document: schema::Document) -> Result<Self> {
        Self::from_shards(vec![Shard::from_document(document)])
    }

    /// Fetch every shard under `gcs_prefix` in `gcs_bucket_name` and merge them
    pub async fn from_gcs(
        store: &dyn ShardStore,
        gcs_bucket_name: &str,
        gcs_prefix: &str,
    ) -> Result<Self> {
        let shards = storage::get_shards(store, gcs_bucket_name, gcs_prefix).await?;

        if shards.is_empty() {
            return Err(ToolboxError::NotFound(format!(
                "no document shards under gs://{}/{}",
                gcs_bucket_name, gcs_prefix
            )));
        }

        tracing::info!(
            bucket = %gcs_bucket_name,
            prefix = %gcs_prefix,
            shards = shards.len(),
            "Loading document from storage"
        );
        Self::from_shards(shards)
    }

    /// Shards sorted by shard index, with text offsets filled in
    pub fn shards(&self) -> &[Shard] {
        &self.shards
    }

    /// Pages in global page order
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Flattened entities in document order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Full document text
    pub fn text(&self) -> &str {
        &self.text
    }
}
