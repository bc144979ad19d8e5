//! Warehouse clients
//!
//! Defines the load-job capability and a BigQuery implementation over its
//! REST upload endpoint.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::config::WarehouseConfig;
use crate::error::WarehouseError;

use super::types::{LoadJob, LoadJobState, TableReference};

/// Data warehouse that accepts row load jobs
#[async_trait]
pub trait WarehouseClient: Send + Sync {
    /// Submit `rows` for loading into `table`; returns once the job is accepted
    async fn submit_load_job(
        &self,
        table: &TableReference,
        rows: Vec<Value>,
    ) -> Result<LoadJob, WarehouseError>;
}

/// BigQuery load-job client
pub struct BigQueryClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobResponse {
    job_reference: JobReference,
    #[serde(default)]
    status: Option<JobStatus>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobReference {
    job_id: String,
    #[serde(default)]
    location: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobStatus {
    #[serde(default)]
    state: LoadJobState,
    #[serde(default)]
    error_result: Option<Value>,
}

impl BigQueryClient {
    pub fn new(endpoint: &str, access_token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    pub fn from_config(config: &WarehouseConfig) -> Result<Self, WarehouseError> {
        let token = config.access_token.as_deref().ok_or_else(|| {
            WarehouseError::MissingCredentials("BIGQUERY_ACCESS_TOKEN is not set".to_string())
        })?;
        Ok(Self::new(&config.endpoint, token))
    }

    fn upload_url(&self, project_id: &str) -> String {
        format!(
            "{}/upload/bigquery/v2/projects/{}/jobs?uploadType=multipart",
            self.endpoint,
            urlencoding::encode(project_id)
        )
    }
}

/// Job configuration: newline-delimited JSON appended to the table, with
/// new columns allowed and the schema detected from the data
fn load_job_metadata(table: &TableReference, job_id: &str) -> Value {
    json!({
        "jobReference": {
            "projectId": table.project_id,
            "jobId": job_id,
        },
        "configuration": {
            "load": {
                "destinationTable": table,
                "sourceFormat": "NEWLINE_DELIMITED_JSON",
                "writeDisposition": "WRITE_APPEND",
                "schemaUpdateOptions": ["ALLOW_FIELD_ADDITION"],
                "autodetect": true,
            }
        }
    })
}

/// `multipart/related` body: job metadata, then the rows as NDJSON
fn multipart_body(boundary: &str, metadata: &Value, rows: &[Value]) -> String {
    let ndjson: String = rows.iter().map(|row| format!("{}\n", row)).collect();

    format!(
        "--{b}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n\
         --{b}\r\nContent-Type: application/octet-stream\r\n\r\n{ndjson}\r\n--{b}--\r\n",
        b = boundary,
        metadata = metadata,
        ndjson = ndjson,
    )
}

#[async_trait]
impl WarehouseClient for BigQueryClient {
    async fn submit_load_job(
        &self,
        table: &TableReference,
        rows: Vec<Value>,
    ) -> Result<LoadJob, WarehouseError> {
        let job_id = format!("docai_toolbox_{}", Uuid::new_v4().simple());
        let boundary = format!("boundary_{}", Uuid::new_v4().simple());
        let body = multipart_body(&boundary, &load_job_metadata(table, &job_id), &rows);

        tracing::debug!(table = %table, rows = rows.len(), job_id = %job_id, "Submitting load job");

        let response = self
            .http
            .post(self.upload_url(&table.project_id))
            .bearer_auth(&self.access_token)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={}", boundary),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| WarehouseError::RequestFailed(format!("Failed to call BigQuery: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(WarehouseError::ApiError { status, body });
        }

        let job: JobResponse = response
            .json()
            .await
            .map_err(|e| WarehouseError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let status = job.status.unwrap_or(JobStatus {
            state: LoadJobState::Pending,
            error_result: None,
        });
        if let Some(error) = status.error_result {
            return Err(WarehouseError::ApiError {
                status: 200,
                body: error.to_string(),
            });
        }

        Ok(LoadJob {
            job_id: job.job_reference.job_id,
            table: table.clone(),
            location: job.job_reference.location,
            state: status.state,
            submitted_at: Utc::now(),
        })
    }
}

/// Warehouse that records submissions instead of sending them
#[cfg(test)]
#[derive(Default)]
pub struct MockWarehouse {
    pub submitted: std::sync::Mutex<Vec<(TableReference, Vec<Value>)>>,
}

#[cfg(test)]
#[async_trait]
impl WarehouseClient for MockWarehouse {
    async fn submit_load_job(
        &self,
        table: &TableReference,
        rows: Vec<Value>,
    ) -> Result<LoadJob, WarehouseError> {
        self.submitted
            .lock()
            .unwrap()
            .push((table.clone(), rows));
        Ok(LoadJob {
            job_id: "mock-job".to_string(),
            table: table.clone(),
            location: None,
            state: LoadJobState::Running,
            submitted_at: Utc::now(),
        })
    }
}
