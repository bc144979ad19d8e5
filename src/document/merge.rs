//! Shard ordering and merging
//!
//! Validates that a shard set is complete, orders it by shard index and
//! concatenates it into one [`Document`].

use crate::error::{Result, ShardSetError};
use crate::shard::Shard;

use super::entity;
use super::model::Document;
use super::page;

/// Merge a complete shard set, supplied in any order, into one document
pub fn merge(mut shards: Vec<Shard>) -> Result<Document> {
    validate_shard_set(&shards)?;
    shards.sort_by_key(|shard| shard.shard_index);

    let mut text = String::new();
    let mut offset = 0usize;

    for shard in &mut shards {
        // Proto3 omits a zero offset, so zero means "not declared"
        if shard.text_offset != 0 && shard.text_offset != offset {
            return Err(ShardSetError::TextOffsetMismatch {
                index: shard.shard_index,
                declared: shard.text_offset,
                expected: offset,
            }
            .into());
        }
        shard.text_offset = offset;
        offset += shard.char_len();
        text.push_str(&shard.text);
    }

    let pages = page::pages_from_shards(&shards);
    let entities = entity::flatten(&shards);

    tracing::debug!(
        shards = shards.len(),
        pages = pages.len(),
        entities = entities.len(),
        characters = offset,
        "Merged document shards"
    );

    Ok(Document {
        shards,
        pages,
        entities,
        text,
    })
}

/// Check that shard indices are exactly `{0, ..., count - 1}`
fn validate_shard_set(shards: &[Shard]) -> std::result::Result<(), ShardSetError> {
    let first = shards.first().ok_or(ShardSetError::Empty)?;
    let count = first.shard_count;

    if let Some(shard) = shards.iter().find(|shard| shard.shard_count != count) {
        return Err(ShardSetError::CountMismatch {
            index: shard.shard_index,
            declared: shard.shard_count,
            first_index: first.shard_index,
            expected: count,
        });
    }
    if count != shards.len() {
        return Err(ShardSetError::SizeMismatch {
            declared: count,
            supplied: shards.len(),
        });
    }

    // With count == len, distinct in-range indices cover the whole range
    let mut seen = vec![false; count];
    for shard in shards {
        let slot = seen
            .get_mut(shard.shard_index)
            .ok_or(ShardSetError::IndexOutOfRange {
                index: shard.shard_index,
                count,
            })?;
        if *slot {
            return Err(ShardSetError::DuplicateIndex(shard.shard_index));
        }
        *slot = true;
    }

    Ok(())
}
