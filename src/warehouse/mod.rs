//! Data warehouse export
//!
//! Entity maps are exported as rows through a [`WarehouseClient`]; the
//! BigQuery client submits a load job and returns without waiting for it.

mod client;
mod types;

pub use client::{BigQueryClient, WarehouseClient};
pub use types::{LoadJob, LoadJobState, TableReference};

#[cfg(test)]
pub use client::MockWarehouse;
