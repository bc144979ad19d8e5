//! Merged document model
//!
//! A [`Document`] is built once from a complete shard set and never mutated.
//!
//! # Architecture
//!
//! ```text
//!   ShardStore / local files
//!            │ raw bytes
//!            ▼
//!   Shard::from_bytes ──► merge (validate, sort, concatenate)
//!                               │
//!              ┌────────────────┼────────────────┐
//!              ▼                ▼                ▼
//!          pages (view)   entities (flat)     text
//!              └────────────────┼────────────────┘
//!                               ▼
//!             queries: search, lookup, dict
//!             exports: warehouse, PDF split, vision
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use docai_toolbox::document::Document;
//!
//! let doc = Document::from_document_path("output/0/")?;
//! let pages = doc.search_pages(Some("contract"), None)?;
//! let totals = doc.get_entity_by_type("total_amount");
//! ```

mod entity;
mod export;
mod merge;
mod model;
mod page;
mod query;

pub use entity::{flatten, Entity, TYPE_SEPARATOR};
pub use merge::merge;
pub use model::Document;
pub use page::{FormField, Page, TextSpan};
