//! Document AI Toolbox
//!
//! Client-side helpers for Document AI output: merge sharded JSON results into
//! one immutable document, query it, and export it.
//!
//! # Modules
//!
//! - `shard`: wire schema and shard parsing
//! - `document`: merged document, page and entity views, queries, exports
//! - `storage`: listing and fetching shards from object storage
//! - `warehouse`: load jobs for entity rows
//! - `split`: splitting a PDF by predicted document type
//! - `vision`: re-projection into vision annotation responses

pub mod config;
pub mod document;
pub mod error;
pub mod shard;
pub mod split;
pub mod storage;
pub mod vision;
pub mod warehouse;

pub use document::{Document, Entity, FormField, Page};
pub use error::{Result, ToolboxError};
