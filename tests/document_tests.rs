//! End-to-end tests over recorded Document AI output in `tests/resources`

use std::cell::RefCell;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use docai_toolbox::error::{ShardSetError, ToolboxError};
use docai_toolbox::split::PageCopier;
use docai_toolbox::storage::{InMemoryShardStore, LocalShardStore};
use docai_toolbox::Document;

fn resource(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/resources").join(name)
}

fn read(name: &str) -> Vec<u8> {
    std::fs::read(resource(name)).unwrap()
}

struct RecordingCopier {
    pages: usize,
    copies: RefCell<Vec<(RangeInclusive<usize>, PathBuf)>>,
}

impl PageCopier for RecordingCopier {
    fn page_count(&self) -> usize {
        self.pages
    }

    fn copy_pages(
        &self,
        pages: RangeInclusive<usize>,
        destination: &Path,
    ) -> docai_toolbox::Result<()> {
        self.copies.borrow_mut().push((pages, destination.to_path_buf()));
        Ok(())
    }
}

#[test]
fn test_single_file_is_one_shard() {
    let doc = Document::from_document_path(resource("invoice/invoice.json")).unwrap();

    assert_eq!(doc.shards().len(), 1);
    assert_eq!(doc.shards()[0].shard_index, 0);
    assert_eq!(doc.shards()[0].shard_count, 1);
    assert_eq!(doc.shards()[0].text_offset, 0);
    assert_eq!(doc.pages().len(), 1);
    assert!(doc.text().starts_with("Invoice 0042\n"));
}

#[test]
fn test_invoice_queries() {
    let doc = Document::from_document_path(resource("invoice")).unwrap();

    let pages = doc.search_pages(Some("contract"), None).unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].page_number, 1);

    let pages = doc.search_pages(None, Some(r"\$\d+\.\d{2}")).unwrap();
    assert_eq!(pages.len(), 1);

    assert!(doc.search_pages(Some("CONTRACT"), None).unwrap().is_empty());

    let totals = doc.get_entity_by_type("total_amount");
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].mention_text, "$1,540.00");
    assert_eq!(totals[0].normalized_text.as_deref(), Some("1540 USD"));

    let taxes = doc.get_entity_by_type("vat/tax_amount");
    assert_eq!(taxes.len(), 1);
    assert!(doc.get_entity_by_type("tax_amount").is_empty());
}

#[test]
fn test_invoice_entity_map() {
    let doc = Document::from_document_path(resource("invoice/invoice.json")).unwrap();
    let entities = doc.entities_to_dict();

    assert_eq!(entities.len(), 5);
    assert_eq!(entities["supplier_name"], "Acme Supplies");
    assert_eq!(entities["receiver_address"], "222 Main Street\nAnytown, USA");
    assert_eq!(entities["vat"], "$140.00");
    assert_eq!(entities["vat_tax_amount"], "140 USD");
    assert_eq!(entities["total_amount"], "1540 USD");
}

#[test]
fn test_entities_keep_document_order() {
    let doc = Document::from_document_path(resource("invoice/invoice.json")).unwrap();
    let types: Vec<&str> = doc.entities().iter().map(|e| e.entity_type.as_str()).collect();

    assert_eq!(
        types,
        vec!["supplier_name", "receiver_address", "vat", "vat/tax_amount", "total_amount"]
    );
}

#[test]
fn test_unordered_directory_is_merged_in_shard_order() {
    let doc = Document::from_document_path(resource("unordered")).unwrap();

    let indices: Vec<usize> = doc.shards().iter().map(|s| s.shard_index).collect();
    assert_eq!(indices, vec![0, 1, 2]);

    let offsets: Vec<usize> = doc.shards().iter().map(|s| s.text_offset).collect();
    assert_eq!(offsets, vec![0, 34, 79]);

    let numbers: Vec<usize> = doc.pages().iter().map(|p| p.page_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);

    let texts: Vec<&str> = doc.pages().iter().map(|p| p.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Invoice page one\n",
            "Invoice page two\n",
            "Receipt total $25.50\n",
            "Phone #:\n(906) 917-3486\n",
            "Terms of the contract\n",
        ]
    );
    assert_eq!(doc.pages()[3].source_page_number, 2);
    assert_eq!(doc.pages()[3].shard_index, 1);
}

#[test]
fn test_later_shards_resolve_their_own_text() {
    let doc = Document::from_document_path(resource("unordered")).unwrap();

    let hits: Vec<usize> = doc
        .search_pages(Some("contract"), None)
        .unwrap()
        .iter()
        .map(|p| p.page_number)
        .collect();
    assert_eq!(hits, vec![5]);

    let hits: Vec<usize> = doc
        .search_pages(None, Some(r"\$\d+\.\d{2}"))
        .unwrap()
        .iter()
        .map(|p| p.page_number)
        .collect();
    assert_eq!(hits, vec![3]);

    let phones = doc.get_form_field_by_name("Phone #:");
    assert_eq!(phones.len(), 1);
    assert_eq!(phones[0].field_value, "(906) 917-3486");
}

#[test]
fn test_page_labels_across_shards() {
    let doc = Document::from_document_path(resource("unordered")).unwrap();

    assert_eq!(
        doc.page_labels(),
        vec![
            "invoice_statement",
            "invoice_statement",
            "receipt_statement",
            "receipt_statement",
            "other",
        ]
    );

    let receipts = doc.get_entity_by_type("receipt_statement");
    assert_eq!(receipts[0].page_refs, vec![2, 3]);

    let output = tempfile::tempdir().unwrap();
    let copier = RecordingCopier {
        pages: 5,
        copies: RefCell::new(Vec::new()),
    };
    let names = doc.split_pdf_with(&copier, "batch", output.path()).unwrap();
    assert_eq!(
        names,
        vec![
            "batch_pg1-2_invoice_statement.pdf",
            "batch_pg3-4_receipt_statement.pdf",
            "batch_pg5_other.pdf",
        ]
    );
}

#[test]
fn test_incomplete_shard_set_is_rejected() {
    let blobs = [read("unordered/a-shard-2.json"), read("unordered/b-shard-0.json")];
    let shards = docai_toolbox::shard::parse_shards(&blobs).unwrap();

    let err = Document::from_shards(shards).unwrap_err();
    assert!(matches!(
        err,
        ToolboxError::InconsistentShardSet(ShardSetError::SizeMismatch {
            declared: 3,
            supplied: 2
        })
    ));
}

#[tokio::test]
async fn test_from_gcs_filters_and_merges() {
    let store = InMemoryShardStore::new()
        .with_object("bucket", "output/123/0/c-shard-1.json", read("unordered/c-shard-1.json"))
        .with_object("bucket", "output/123/0/a-shard-2.json", read("unordered/a-shard-2.json"))
        .with_object("bucket", "output/123/0/.DS_Store", b"\0\0".to_vec())
        .with_object("bucket", "output/123/0/b-shard-0.json", read("unordered/b-shard-0.json"))
        .with_object("bucket", "output/123/0/source.pdf", b"%PDF-1.7".to_vec())
        .with_object("bucket", "output/999/0/invoice.json", read("invoice/invoice.json"));

    let doc = Document::from_gcs(&store, "bucket", "output/123/0/").await.unwrap();

    assert_eq!(doc.shards().len(), 3);
    assert_eq!(doc.pages().len(), 5);
    assert_eq!(doc.entities_to_dict()["shard_marker"], "shard 2");
}

#[tokio::test]
async fn test_from_gcs_rejects_file_prefix_before_listing() {
    let store = InMemoryShardStore::new();
    let err = Document::from_gcs(&store, "bucket", "output/123/0/doc.json")
        .await
        .unwrap_err();

    assert!(matches!(err, ToolboxError::InvalidArgument(_)));
    assert_eq!(err.to_string(), "gcs_prefix cannot contain file types");
}

#[tokio::test]
async fn test_from_gcs_empty_prefix_is_not_found() {
    let store = InMemoryShardStore::new().with_object("bucket", "elsewhere/0.json", b"{}".to_vec());
    let err = Document::from_gcs(&store, "bucket", "output/").await.unwrap_err();

    assert!(matches!(err, ToolboxError::NotFound(_)));
}

#[tokio::test]
async fn test_from_gcs_over_local_directory() {
    let store = LocalShardStore::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests"));
    let doc = Document::from_gcs(&store, "resources", "unordered/").await.unwrap();

    let offsets: Vec<usize> = doc.shards().iter().map(|s| s.text_offset).collect();
    assert_eq!(offsets, vec![0, 34, 79]);
}

#[test]
fn test_form_field_lookup() {
    let doc = Document::from_document_path(resource("form_parser/form.json")).unwrap();

    let phones = doc.get_form_field_by_name("Phone #:");
    assert_eq!(phones.len(), 1);
    assert_eq!(phones[0].field_value, "(906) 917-3486");
    assert!(phones[0].name_confidence > 0.9);

    let names = doc.get_form_field_by_name("Name:");
    assert_eq!(names[0].field_value, "Sally Walker");

    assert!(doc.get_form_field_by_name("Phone").is_empty());
}

#[test]
fn test_split_by_predicted_type() {
    let doc = Document::from_document_path(resource("splitter")).unwrap();
    let output = tempfile::tempdir().unwrap();
    let copier = RecordingCopier {
        pages: 7,
        copies: RefCell::new(Vec::new()),
    };

    let names = doc
        .split_pdf_with(&copier, "procurement_multi_document", output.path())
        .unwrap();

    assert_eq!(
        names,
        vec![
            "procurement_multi_document_pg1_invoice_statement.pdf",
            "procurement_multi_document_pg2_receipt_statement.pdf",
            "procurement_multi_document_pg3_other.pdf",
            "procurement_multi_document_pg4_utility_statement.pdf",
            "procurement_multi_document_pg5_restaurant_statement.pdf",
            "procurement_multi_document_pg6-7_other.pdf",
        ]
    );

    let copies = copier.copies.borrow();
    assert_eq!(copies.last().unwrap().0, 6..=7);
    assert_eq!(
        copies[0].1,
        output.path().join("procurement_multi_document_pg1_invoice_statement.pdf")
    );
}

#[test]
fn test_split_rejects_short_pdf() {
    let doc = Document::from_document_path(resource("splitter")).unwrap();
    let output = tempfile::tempdir().unwrap();
    let copier = RecordingCopier {
        pages: 3,
        copies: RefCell::new(Vec::new()),
    };

    let err = doc.split_pdf_with(&copier, "short", output.path()).unwrap_err();
    assert!(matches!(err, ToolboxError::Pdf(_)));
    assert!(copier.copies.borrow().is_empty());
}

#[test]
fn test_vision_response_carries_text_and_pages() {
    let doc = Document::from_document_path(resource("invoice/invoice.json")).unwrap();
    let response = doc.convert_document_to_annotate_file_response();

    assert_eq!(response.total_pages, 1);
    assert_eq!(response.responses.len(), 1);

    let annotation = &response.responses[0].full_text_annotation;
    assert_eq!(annotation.text, doc.pages()[0].text);
    assert_eq!(annotation.pages[0].width, 1700);
    assert_eq!(annotation.pages[0].blocks.len(), 6);

    let words = &annotation.pages[0].blocks[0].paragraphs[0].words;
    assert_eq!(words.len(), 2);
    assert_eq!(words[0].symbols.len(), "Invoice".len());
}
