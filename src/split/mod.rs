//! Splitting a source PDF by predicted document type
//!
//! Consecutive pages that share a predicted label form a run; each run is
//! copied into its own PDF named after its page range and label.

mod copier;

pub use copier::{LopdfCopier, PageCopier};

use std::path::Path;

use serde::Serialize;

use crate::error::{Result, ToolboxError};

/// Label for pages no entity claims
pub const DEFAULT_LABEL: &str = "subdoc";

/// Maximal run of consecutive pages sharing a label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRun {
    /// First page, 1-based
    pub start: usize,
    /// Last page, 1-based and inclusive
    pub end: usize,
    pub label: String,
}

impl PageRun {
    /// `pgN` for a single page, `pgN-M` otherwise
    pub fn page_range(&self) -> String {
        if self.start == self.end {
            format!("pg{}", self.start)
        } else {
            format!("pg{}-{}", self.start, self.end)
        }
    }

    /// Output file name for a source PDF with stem `stem`
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}_{}_{}.pdf", stem, self.page_range(), self.label)
    }
}

/// Group per-page labels into runs; a new run starts whenever the label changes
pub fn plan_runs<S: AsRef<str>>(labels: &[S]) -> Vec<PageRun> {
    let mut runs: Vec<PageRun> = Vec::new();

    for (position, label) in labels.iter().enumerate() {
        let label = label.as_ref();
        let page = position + 1;

        match runs.last_mut() {
            Some(run) if run.label == label => run.end = page,
            _ => runs.push(PageRun {
                start: page,
                end: page,
                label: label.to_string(),
            }),
        }
    }

    runs
}

/// Copy every run out of `copier` into `output_dir`, returning the file names
pub fn split_pages(
    copier: &dyn PageCopier,
    runs: &[PageRun],
    stem: &str,
    output_dir: &Path,
) -> Result<Vec<String>> {
    let needed = runs.last().map_or(0, |run| run.end);
    if copier.page_count() < needed {
        return Err(ToolboxError::Pdf(format!(
            "source PDF has {} pages but the document has {}",
            copier.page_count(),
            needed
        )));
    }

    std::fs::create_dir_all(output_dir)?;

    let mut file_names = Vec::with_capacity(runs.len());
    for run in runs {
        let file_name = run.file_name(stem);
        copier.copy_pages(run.start..=run.end, &output_dir.join(&file_name))?;
        tracing::debug!("Wrote {}", file_name);
        file_names.push(file_name);
    }

    Ok(file_names)
}
