//! Vision annotation interchange
//!
//! Lossy re-projection of a merged document into the `AnnotateFileResponse`
//! layout used by the image annotation API: one response per page, blocks
//! from paragraphs, words from the tokens inside them.

use serde::Serialize;

use crate::document::{Document, Page, TextSpan};
use crate::shard::schema::BoundingPoly;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateFileResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_config: Option<InputConfig>,
    pub responses: Vec<AnnotateImageResponse>,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputConfig {
    pub uri: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateImageResponse {
    pub full_text_annotation: TextAnnotation,
    pub context: ImageAnnotationContext,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnnotationContext {
    pub uri: String,
    pub page_number: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnnotation {
    pub pages: Vec<VisionPage>,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionPage {
    pub width: u32,
    pub height: u32,
    pub blocks: Vec<Block>,
    pub confidence: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingPoly>,
    pub paragraphs: Vec<Paragraph>,
    pub block_type: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingPoly>,
    pub words: Vec<Word>,
    pub confidence: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingPoly>,
    pub symbols: Vec<Symbol>,
    pub confidence: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    pub text: String,
    pub confidence: f32,
}

fn word(token: &TextSpan) -> Word {
    Word {
        bounding_box: token.bounding_poly.clone(),
        symbols: token
            .text
            .trim()
            .chars()
            .map(|c| Symbol {
                text: c.to_string(),
                confidence: token.confidence,
            })
            .collect(),
        confidence: token.confidence,
    }
}

fn block(page: &Page, paragraph: &TextSpan) -> Block {
    Block {
        bounding_box: paragraph.bounding_poly.clone(),
        paragraphs: vec![Paragraph {
            bounding_box: paragraph.bounding_poly.clone(),
            words: page.tokens_in(paragraph).map(word).collect(),
            confidence: paragraph.confidence,
        }],
        block_type: "TEXT".to_string(),
        confidence: paragraph.confidence,
    }
}

fn image_response(page: &Page, uri: &str) -> AnnotateImageResponse {
    let (width, height) = page
        .dimension
        .as_ref()
        .map_or((0, 0), |d| (d.width.round() as u32, d.height.round() as u32));

    let blocks: Vec<Block> = page.paragraphs.iter().map(|p| block(page, p)).collect();
    let confidence = if blocks.is_empty() {
        0.0
    } else {
        blocks.iter().map(|b| b.confidence).sum::<f32>() / blocks.len() as f32
    };

    AnnotateImageResponse {
        full_text_annotation: TextAnnotation {
            pages: vec![VisionPage {
                width,
                height,
                blocks,
                confidence,
            }],
            text: page.text.clone(),
        },
        context: ImageAnnotationContext {
            uri: uri.to_string(),
            page_number: page.page_number,
        },
    }
}

/// Re-project `document` into an annotate-file response
pub fn annotate_file_response(document: &Document) -> AnnotateFileResponse {
    let uri_of = |shard_index: usize| {
        document
            .shards()
            .get(shard_index)
            .map(|shard| shard.uri.as_str())
            .unwrap_or_default()
    };

    let input_config = document
        .shards()
        .first()
        .filter(|shard| !shard.uri.is_empty())
        .map(|shard| InputConfig {
            uri: shard.uri.clone(),
            mime_type: shard.mime_type.clone(),
        });

    AnnotateFileResponse {
        input_config,
        responses: document
            .pages()
            .iter()
            .map(|page| image_response(page, uri_of(page.shard_index)))
            .collect(),
        total_pages: document.pages().len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shard::schema;

    #[test]
    fn test_words_follow_paragraph_tokens() {
        let json = r#"{
            "uri": "gs://bucket/input.pdf",
            "mimeType": "application/pdf",
            "text": "Hi there\nBye\n",
            "pages": [{
                "pageNumber": 1,
                "dimension": {"width": 612, "height": 792, "unit": "points"},
                "layout": {"textAnchor": {"textSegments": [{"endIndex": "13"}]}},
                "paragraphs": [
                    {"layout": {"confidence": 0.9, "textAnchor": {"textSegments": [{"endIndex": "9"}]}}},
                    {"layout": {"confidence": 0.7, "textAnchor": {"textSegments": [{"startIndex": "9", "endIndex": "13"}]}}}
                ],
                "tokens": [
                    {"layout": {"textAnchor": {"textSegments": [{"endIndex": "3"}]}}},
                    {"layout": {"textAnchor": {"textSegments": [{"startIndex": "3", "endIndex": "9"}]}}},
                    {"layout": {"textAnchor": {"textSegments": [{"startIndex": "9", "endIndex": "13"}]}}}
                ]
            }]
        }"#;
        let wire: schema::Document = serde_json::from_str(json).unwrap();
        let document = Document::from_documentai_document(wire).unwrap();

        let response = annotate_file_response(&document);

        assert_eq!(response.total_pages, 1);
        let image = &response.responses[0];
        assert_eq!(image.context.page_number, 1);
        assert_eq!(image.context.uri, "gs://bucket/input.pdf");
        assert_eq!(image.full_text_annotation.text, "Hi there\nBye\n");

        let page = &image.full_text_annotation.pages[0];
        assert_eq!((page.width, page.height), (612, 792));
        assert_eq!(page.blocks.len(), 2);
        assert_eq!(page.blocks[0].paragraphs[0].words.len(), 2);
        let symbols: String = page.blocks[1].paragraphs[0].words[0]
            .symbols
            .iter()
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(symbols, "Bye");
        assert_ne!(response, AnnotateFileResponse::default());
    }
}
