//! Read-only queries over a merged document

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::{Result, ToolboxError};

use super::entity::Entity;
use super::model::Document;
use super::page::{FormField, Page};

const SEARCH_ARGUMENT_ERROR: &str = "Exactly one of target_string and pattern must be specified.";

impl Document {
    /// Pages with a paragraph containing `target_string` or matching `pattern`.
    ///
    /// Exactly one of the two must be given.
    pub fn search_pages(
        &self,
        target_string: Option<&str>,
        pattern: Option<&str>,
    ) -> Result<Vec<&Page>> {
        let pages: Vec<&Page> = match (target_string, pattern) {
            (Some(target), None) => self
                .pages
                .iter()
                .filter(|page| page.contains_text(target))
                .collect(),
            (None, Some(pattern)) => {
                let regex = Regex::new(pattern)?;
                self.pages
                    .iter()
                    .filter(|page| page.matches_pattern(&regex))
                    .collect()
            }
            _ => return Err(ToolboxError::InvalidArgument(SEARCH_ARGUMENT_ERROR.to_string())),
        };

        Ok(pages)
    }

    /// Entities whose qualified type equals `target_type`
    pub fn get_entity_by_type(&self, target_type: &str) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|entity| entity.entity_type == target_type)
            .collect()
    }

    /// Form fields named `target_field`, in page then field order
    pub fn get_form_field_by_name(&self, target_field: &str) -> Vec<&FormField> {
        self.pages
            .iter()
            .flat_map(|page| page.form_fields.iter())
            .filter(|field| field.field_name == target_field)
            .collect()
    }

    /// Flat map of entity key to value.
    ///
    /// Lossy: when several entities share a key the later one wins. Use
    /// [`Document::entities`] to see every occurrence.
    pub fn entities_to_dict(&self) -> BTreeMap<String, String> {
        self.entities
            .iter()
            .map(|entity| (entity.flat_key(), entity.value().to_string()))
            .collect()
    }
}
