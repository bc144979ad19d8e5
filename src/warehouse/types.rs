//! Warehouse types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fully qualified destination table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReference {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
}

impl TableReference {
    pub fn new(project_id: &str, dataset_id: &str, table_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            dataset_id: dataset_id.to_string(),
            table_id: table_id.to_string(),
        }
    }
}

impl std::fmt::Display for TableReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.project_id, self.dataset_id, self.table_id)
    }
}

/// Load job state as reported at submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoadJobState {
    Pending,
    Running,
    Done,
}

impl Default for LoadJobState {
    fn default() -> Self {
        Self::Pending
    }
}

/// Handle to a submitted load job; completion is not awaited
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadJob {
    pub job_id: String,
    pub table: TableReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub state: LoadJobState,
    pub submitted_at: DateTime<Utc>,
}
