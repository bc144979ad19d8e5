//! PDF page copying

use std::ops::RangeInclusive;
use std::path::Path;

use crate::error::{Result, ToolboxError};

/// Source PDF whose pages can be copied into new files
pub trait PageCopier {
    /// Number of pages in the source
    fn page_count(&self) -> usize;

    /// Write `pages` (1-based, inclusive) verbatim to a new file at `destination`
    fn copy_pages(&self, pages: RangeInclusive<usize>, destination: &Path) -> Result<()>;
}

/// Page copier backed by `lopdf`
pub struct LopdfCopier {
    source: lopdf::Document,
}

impl LopdfCopier {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = lopdf::Document::load(path.as_ref()).map_err(|e| {
            ToolboxError::Pdf(format!("Failed to open {}: {}", path.as_ref().display(), e))
        })?;
        Ok(Self { source })
    }
}

impl PageCopier for LopdfCopier {
    fn page_count(&self) -> usize {
        self.source.get_pages().len()
    }

    fn copy_pages(&self, pages: RangeInclusive<usize>, destination: &Path) -> Result<()> {
        let mut output = self.source.clone();

        let unwanted: Vec<u32> = output
            .get_pages()
            .keys()
            .copied()
            .filter(|number| !pages.contains(&(*number as usize)))
            .collect();

        output.delete_pages(&unwanted);
        output.prune_objects();
        output.renumber_objects();

        output.save(destination).map_err(|e| {
            ToolboxError::Pdf(format!("Failed to write {}: {}", destination.display(), e))
        })?;

        Ok(())
    }
}
