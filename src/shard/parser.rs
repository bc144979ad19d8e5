//! Shard parsing
//!
//! Turns raw shard bytes into [`Shard`] records. Ordering and validation of a
//! whole shard set happens at merge time.

use std::path::Path;

use crate::error::Result;

use super::schema;

/// One unit of Document AI output
#[derive(Debug, Clone)]
pub struct Shard {
    /// 0-based position of this shard in the full document
    pub shard_index: usize,
    /// Total number of shards the producer emitted
    pub shard_count: usize,
    /// Character offset of `text` within the full document text
    pub text_offset: usize,
    pub text: String,
    pub uri: String,
    pub mime_type: String,
    pub pages: Vec<schema::Page>,
    pub entities: Vec<schema::Entity>,
}

impl Shard {
    /// Parse a shard from the bytes of one JSON output file
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let document: schema::Document = serde_json::from_slice(bytes)?;
        Ok(Self::from_document(document))
    }

    /// Read and parse a shard file from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Wrap an already-deserialized document.
    ///
    /// Unsharded output carries no `shardInfo`; it becomes shard 0 of 1.
    pub fn from_document(document: schema::Document) -> Self {
        let info = document.shard_info.unwrap_or_default();

        Self {
            shard_index: info.shard_index as usize,
            shard_count: (info.shard_count as usize).max(1),
            text_offset: info.text_offset as usize,
            text: document.text,
            uri: document.uri,
            mime_type: document.mime_type,
            pages: document.pages,
            entities: document.entities,
        }
    }

    /// Length of the shard text in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Parse every blob, failing on the first malformed shard
pub fn parse_shards<B: AsRef<[u8]>>(blobs: &[B]) -> Result<Vec<Shard>> {
    blobs
        .iter()
        .enumerate()
        .map(|(position, blob)| {
            let shard = Shard::from_bytes(blob.as_ref())?;
            tracing::debug!(
                position,
                shard_index = shard.shard_index,
                shard_count = shard.shard_count,
                pages = shard.pages.len(),
                "Parsed shard"
            );
            Ok(shard)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsharded_document_is_single_shard() {
        let shard = Shard::from_bytes(br#"{"text": "hello", "pages": [{"pageNumber": 1}]}"#).unwrap();
        assert_eq!(shard.shard_index, 0);
        assert_eq!(shard.shard_count, 1);
        assert_eq!(shard.text_offset, 0);
        assert_eq!(shard.pages.len(), 1);
    }

    #[test]
    fn test_shard_info_is_read() {
        let shard = Shard::from_bytes(
            br#"{"text": "b", "shardInfo": {"shardIndex": "1", "shardCount": "2", "textOffset": "5"}}"#,
        )
        .unwrap();
        assert_eq!(shard.shard_index, 1);
        assert_eq!(shard.shard_count, 2);
        assert_eq!(shard.text_offset, 5);
    }

    #[test]
    fn test_char_len_counts_characters() {
        let shard = Shard::from_bytes("{\"text\": \"caf\u{e9}\"}".as_bytes()).unwrap();
        assert_eq!(shard.char_len(), 4);
        assert_eq!(shard.text.len(), 5);
    }

    #[test]
    fn test_parse_shards_fails_on_malformed_blob() {
        let blobs = vec![b"{}".to_vec(), b"not json".to_vec()];
        let err = parse_shards(&blobs).unwrap_err();
        assert!(matches!(err, crate::error::ToolboxError::Parse(_)));
    }
}
