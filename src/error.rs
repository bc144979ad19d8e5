//! Error types for the Document AI toolbox

use thiserror::Error;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, ToolboxError>;

/// Toolbox error type
#[derive(Error, Debug)]
pub enum ToolboxError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Inconsistent shard set: {0}")]
    InconsistentShardSet(#[from] ShardSetError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Warehouse error: {0}")]
    Warehouse(#[from] WarehouseError),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a set of shards cannot be merged
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShardSetError {
    #[error("no shards supplied")]
    Empty,

    #[error("shard {index} declares shard_count {declared} but shard {first_index} declares {expected}")]
    CountMismatch {
        index: usize,
        declared: usize,
        first_index: usize,
        expected: usize,
    },

    #[error("shard index {index} is out of range for shard_count {count}")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("shard index {0} appears more than once")]
    DuplicateIndex(usize),

    #[error("shards declare shard_count {declared} but {supplied} were supplied")]
    SizeMismatch { declared: usize, supplied: usize },

    #[error("shard {index} declares text_offset {declared} but preceding shards hold {expected} characters")]
    TextOffsetMismatch {
        index: usize,
        declared: usize,
        expected: usize,
    },
}

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("S3 SDK error: {0}")]
    SdkError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Data warehouse errors
#[derive(Error, Debug)]
pub enum WarehouseError {
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Warehouse returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ToolboxError {
    /// True when the error came from shard-set validation
    pub fn is_inconsistent_shard_set(&self) -> bool {
        matches!(self, ToolboxError::InconsistentShardSet(_))
    }

    /// True when the caller passed an invalid argument
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ToolboxError::InvalidArgument(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_message_is_verbatim() {
        let err = ToolboxError::InvalidArgument("gcs_prefix cannot contain file types".into());
        assert_eq!(err.to_string(), "gcs_prefix cannot contain file types");
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_shard_set_error_converts() {
        let err: ToolboxError = ShardSetError::SizeMismatch {
            declared: 3,
            supplied: 2,
        }
        .into();
        assert!(err.is_inconsistent_shard_set());
        assert_eq!(
            err.to_string(),
            "Inconsistent shard set: shards declare shard_count 3 but 2 were supplied"
        );
    }
}
