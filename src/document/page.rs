//! Page view
//!
//! Derived, text-resolved views over the wire pages of a merged document.
//! Layout anchors are indices into the text of the shard that owns the page.

use regex::Regex;
use serde::Serialize;

use crate::shard::schema::{self, BoundingPoly, Dimension, Layout, TextAnchor};
use crate::shard::Shard;

/// Character-indexed view over one shard's text.
///
/// Text anchors address characters, not bytes, so the byte offset of every
/// character boundary is computed once per shard.
pub(crate) struct TextIndex<'a> {
    text: &'a str,
    boundaries: Vec<usize>,
}

impl<'a> TextIndex<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(byte, _)| byte).collect();
        boundaries.push(text.len());
        Self { text, boundaries }
    }

    pub(crate) fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Characters `[start, end)`, clamped to the text
    pub(crate) fn slice(&self, start: usize, end: usize) -> &'a str {
        let end = end.min(self.char_len());
        let start = start.min(end);
        &self.text[self.boundaries[start]..self.boundaries[end]]
    }

    pub(crate) fn resolve(&self, anchor: &TextAnchor) -> String {
        if anchor.text_segments.is_empty() {
            return anchor.content.clone();
        }
        anchor
            .text_segments
            .iter()
            .map(|segment| self.slice(segment.start_index as usize, segment.end_index as usize))
            .collect()
    }
}

/// Resolved text of a layout element with its position in its shard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpan {
    pub text: String,
    /// First character of the span in the owning shard's text
    pub start_index: usize,
    /// One past the last character of the span
    pub end_index: usize,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_poly: Option<BoundingPoly>,
}

impl TextSpan {
    fn from_layout(layout: &Layout, index: &TextIndex<'_>) -> Self {
        let segments = &layout.text_anchor.text_segments;
        Self {
            text: index.resolve(&layout.text_anchor),
            start_index: segments.first().map_or(0, |s| s.start_index as usize),
            end_index: segments.last().map_or(0, |s| s.end_index as usize),
            confidence: layout.confidence,
            bounding_poly: layout.bounding_poly.clone(),
        }
    }

    /// Whether `other` lies entirely inside this span
    pub fn encloses(&self, other: &TextSpan) -> bool {
        other.start_index >= self.start_index && other.end_index <= self.end_index
    }
}

/// Detected label/value pair on a page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub field_name: String,
    pub field_value: String,
    pub name_confidence: f32,
    pub value_confidence: f32,
}

impl FormField {
    fn from_wire(field: &schema::FormField, index: &TextIndex<'_>) -> Self {
        Self {
            field_name: trim_text(&index.resolve(&field.field_name.text_anchor)),
            field_value: trim_text(&index.resolve(&field.field_value.text_anchor)),
            name_confidence: field.field_name.confidence,
            value_confidence: field.field_value.confidence,
        }
    }
}

fn trim_text(text: &str) -> String {
    text.trim().replace('\n', " ")
}

/// One physical page of the merged document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// 1-based, sequential across the whole document
    pub page_number: usize,
    /// Page number as written in the shard
    pub source_page_number: usize,
    pub shard_index: usize,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<Dimension>,
    pub lines: Vec<TextSpan>,
    pub paragraphs: Vec<TextSpan>,
    pub tokens: Vec<TextSpan>,
    pub form_fields: Vec<FormField>,
}

impl Page {
    fn from_wire(
        page: &schema::Page,
        page_number: usize,
        shard_index: usize,
        index: &TextIndex<'_>,
    ) -> Self {
        let spans = |elements: &[schema::Element]| -> Vec<TextSpan> {
            elements
                .iter()
                .map(|element| TextSpan::from_layout(&element.layout, index))
                .collect()
        };

        Self {
            page_number,
            source_page_number: page.page_number as usize,
            shard_index,
            text: index.resolve(&page.layout.text_anchor),
            dimension: page.dimension.clone(),
            lines: spans(&page.lines),
            paragraphs: spans(&page.paragraphs),
            tokens: spans(&page.tokens),
            form_fields: page
                .form_fields
                .iter()
                .map(|field| FormField::from_wire(field, index))
                .collect(),
        }
    }

    /// True if any paragraph contains `target` (case-sensitive)
    pub fn contains_text(&self, target: &str) -> bool {
        self.paragraphs.iter().any(|p| p.text.contains(target))
    }

    /// True if `pattern` matches inside any paragraph
    pub fn matches_pattern(&self, pattern: &Regex) -> bool {
        self.paragraphs.iter().any(|p| pattern.is_match(&p.text))
    }

    /// Tokens that fall inside `paragraph`
    pub fn tokens_in<'a>(&'a self, paragraph: &'a TextSpan) -> impl Iterator<Item = &'a TextSpan> {
        self.tokens.iter().filter(move |token| paragraph.encloses(token))
    }
}

/// Build the global page list from shards already sorted by index.
///
/// Embedded page numbers only order pages inside their shard; the final
/// numbering is a running count across all shards.
pub(crate) fn pages_from_shards(shards: &[Shard]) -> Vec<Page> {
    let mut pages = Vec::new();

    for shard in shards {
        let index = TextIndex::new(&shard.text);
        let mut shard_pages: Vec<&schema::Page> = shard.pages.iter().collect();
        shard_pages.sort_by_key(|page| page.page_number);

        for page in shard_pages {
            let page_number = pages.len() + 1;
            pages.push(Page::from_wire(page, page_number, shard.shard_index, &index));
        }
    }

    pages
}
