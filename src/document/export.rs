//! Exports of a merged document: warehouse rows, PDF splits, vision responses

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Result, ToolboxError};
use crate::split::{self, LopdfCopier, PageCopier, PageRun, DEFAULT_LABEL};
use crate::vision::{self, AnnotateFileResponse};
use crate::warehouse::{LoadJob, TableReference, WarehouseClient};

use super::model::Document;

impl Document {
    /// Load `entities_to_dict()` as one row into `project_id.dataset_name.table_name`.
    ///
    /// Returns once the load job is submitted.
    pub async fn entities_to_bigquery(
        &self,
        client: &dyn WarehouseClient,
        dataset_name: &str,
        table_name: &str,
        project_id: &str,
    ) -> Result<LoadJob> {
        let row: Map<String, Value> = self
            .entities_to_dict()
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();

        let table = TableReference::new(project_id, dataset_name, table_name);
        let job = client.submit_load_job(&table, vec![Value::Object(row)]).await?;

        tracing::info!(table = %table, job_id = %job.job_id, "Submitted entity load job");
        Ok(job)
    }

    /// Predicted document type of every page.
    ///
    /// Top-level entities label the pages they reference; a later entity
    /// overrides an earlier one on the same page. Page refs count from the
    /// first page of the entity's shard.
    pub fn page_labels(&self) -> Vec<String> {
        let mut labels = vec![DEFAULT_LABEL.to_string(); self.pages.len()];
        let mut first_page = 0;

        for shard in &self.shards {
            for entity in &shard.entities {
                let label = if entity.entity_type.is_empty() {
                    DEFAULT_LABEL
                } else {
                    entity.entity_type.as_str()
                };

                let page_refs = entity.page_anchor.iter().flat_map(|anchor| anchor.page_refs.iter());
                for page_ref in page_refs {
                    let page = first_page + page_ref.page as usize;
                    match labels.get_mut(page) {
                        Some(slot) => *slot = label.to_string(),
                        None => tracing::warn!(
                            "Entity {} references page index {} beyond the document",
                            label,
                            page
                        ),
                    }
                }
            }
            first_page += shard.pages.len();
        }

        labels
    }

    /// Runs of consecutive pages sharing a predicted document type
    pub fn split_runs(&self) -> Vec<PageRun> {
        split::plan_runs(&self.page_labels())
    }

    /// Split the PDF at `pdf_path` into one file per run under `output_path`.
    ///
    /// Files are named `{stem}_pg{N}[-{M}]_{label}.pdf`; the names are returned.
    pub fn split_pdf<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        pdf_path: P,
        output_path: Q,
    ) -> Result<Vec<String>> {
        let pdf_path = pdf_path.as_ref();
        let stem = pdf_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ToolboxError::InvalidArgument(format!("{} is not a file path", pdf_path.display()))
            })?;

        let copier = LopdfCopier::open(pdf_path)?;
        self.split_pdf_with(&copier, &stem, output_path.as_ref())
    }

    /// Split using any page copier; `stem` prefixes every output file name
    pub fn split_pdf_with(
        &self,
        copier: &dyn PageCopier,
        stem: &str,
        output_path: &Path,
    ) -> Result<Vec<String>> {
        let runs = self.split_runs();
        let file_names = split::split_pages(copier, &runs, stem, output_path)?;

        tracing::info!(
            files = file_names.len(),
            output = %output_path.display(),
            "Split PDF by document type"
        );
        Ok(file_names)
    }

    /// Re-project into a vision `AnnotateFileResponse`
    pub fn convert_document_to_annotate_file_response(&self) -> AnnotateFileResponse {
        vision::annotate_file_response(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::document::Document;
    use crate::shard::schema;
    use crate::warehouse::MockWarehouse;

    fn labelled(entities: &str, pages: usize) -> Document {
        let pages: Vec<String> = (1..=pages).map(|n| format!(r#"{{"pageNumber": {}}}"#, n)).collect();
        let json = format!(r#"{{"pages": [{}], "entities": {}}}"#, pages.join(","), entities);
        let wire: schema::Document = serde_json::from_str(&json).unwrap();
        Document::from_documentai_document(wire).unwrap()
    }

    #[test]
    fn test_page_labels_from_page_refs() {
        let doc = labelled(
            r#"[
                {"type": "invoice", "pageAnchor": {"pageRefs": [{}, {"page": "1"}]}},
                {"type": "receipt", "pageAnchor": {"pageRefs": [{"page": "2"}]}},
                {"type": "", "pageAnchor": {"pageRefs": [{"page": "3"}]}},
                {"type": "other", "pageAnchor": {"pageRefs": [{"page": "9"}]}}
            ]"#,
            5,
        );
        assert_eq!(
            doc.page_labels(),
            vec!["invoice", "invoice", "receipt", "subdoc", "subdoc"]
        );
        assert_eq!(doc.split_runs().len(), 3);
    }

    #[test]
    fn test_page_labels_count_from_owning_shard() {
        let shards = [
            r#"{"shardInfo": {"shardCount": "2"},
                "pages": [{"pageNumber": 1}, {"pageNumber": 2}],
                "entities": [{"type": "invoice", "pageAnchor": {"pageRefs": [{}, {"page": "1"}]}}]}"#,
            r#"{"shardInfo": {"shardIndex": "1", "shardCount": "2"},
                "pages": [{"pageNumber": 1}, {"pageNumber": 2}],
                "entities": [{"type": "receipt", "pageAnchor": {"pageRefs": [{"page": "1"}]}}]}"#,
        ];
        let shards = crate::shard::parse_shards(&shards).unwrap();
        let doc = Document::from_shards(shards).unwrap();

        assert_eq!(doc.page_labels(), vec!["invoice", "invoice", "subdoc", "receipt"]);
        assert_eq!(doc.entities()[1].page_refs, vec![3]);
    }

    #[tokio::test]
    async fn test_entities_to_bigquery_sends_one_row() {
        let doc = labelled(
            r#"[
                {"type": "vat", "mentionText": "$140.00",
                 "properties": [{"type": "tax_amount", "mentionText": "$140.00", "normalizedValue": {"text": "140 USD"}}]}
            ]"#,
            1,
        );
        let warehouse = MockWarehouse::default();

        let job = doc
            .entities_to_bigquery(&warehouse, "test_dataset", "test_table", "test_project")
            .await
            .unwrap();

        assert_eq!(job.table.to_string(), "test_project.test_dataset.test_table");
        let submitted = warehouse.submitted.lock().unwrap();
        let (_, rows) = &submitted[0];
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["vat"], "$140.00");
        assert_eq!(rows[0]["vat_tax_amount"], "140 USD");
    }
}
