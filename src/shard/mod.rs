//! Document AI output shards
//!
//! Large documents are written by the processor as several JSON files, each
//! holding a slice of the text plus the pages and entities found in it.

mod parser;
pub mod schema;

pub use parser::{parse_shards, Shard};
