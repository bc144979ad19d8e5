//! Wire schema of a Document AI output document
//!
//! Only the fields the toolbox consumes are modelled; unknown fields are
//! ignored. Proto3 JSON encodes int64 values as strings and omits fields that
//! hold their default value, so every field defaults and integers are read
//! from either representation.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(u64),
    Str(String),
}

/// Deserialize an unsigned integer written as a JSON number or string
fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IntOrString>::deserialize(deserializer)? {
        None => Ok(0),
        Some(IntOrString::Int(value)) => Ok(value),
        Some(IntOrString::Str(value)) if value.trim().is_empty() => Ok(0),
        Some(IntOrString::Str(value)) => value.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// One Document AI output file (a whole document or a single shard)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard_info: Option<ShardInfo>,
    pub pages: Vec<Page>,
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShardInfo {
    #[serde(deserialize_with = "lenient_u64")]
    pub shard_index: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub shard_count: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub text_offset: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page {
    #[serde(deserialize_with = "lenient_u64")]
    pub page_number: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<Dimension>,
    pub layout: Layout,
    pub blocks: Vec<Element>,
    pub paragraphs: Vec<Element>,
    pub lines: Vec<Element>,
    pub tokens: Vec<Element>,
    pub form_fields: Vec<FormField>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dimension {
    pub width: f32,
    pub height: f32,
    pub unit: String,
}

/// Any layout-bearing page element (block, paragraph, line, token)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Element {
    pub layout: Layout,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Layout {
    pub text_anchor: TextAnchor,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_poly: Option<BoundingPoly>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextAnchor {
    pub text_segments: Vec<TextSegment>,
    pub content: String,
}

/// Half-open character range into the document text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextSegment {
    #[serde(deserialize_with = "lenient_u64")]
    pub start_index: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub end_index: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoundingPoly {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vertices: Vec<Vertex>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub normalized_vertices: Vec<NormalizedVertex>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizedVertex {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormField {
    pub field_name: Layout,
    pub field_value: Layout,
}

/// Extracted entity; `properties` nest to arbitrary depth
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub mention_text: String,
    pub confidence: f32,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_anchor: Option<PageAnchor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_value: Option<NormalizedValue>,
    pub properties: Vec<Entity>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageAnchor {
    pub page_refs: Vec<PageRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageRef {
    /// 0-based index into the pages of the shard holding the entity
    #[serde(deserialize_with = "lenient_u64")]
    pub page: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NormalizedValue {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int64_as_string_and_number() {
        let info: ShardInfo =
            serde_json::from_str(r#"{"shardIndex": "2", "shardCount": 3, "textOffset": "120"}"#)
                .unwrap();
        assert_eq!(info.shard_index, 2);
        assert_eq!(info.shard_count, 3);
        assert_eq!(info.text_offset, 120);
    }

    #[test]
    fn test_omitted_fields_default_to_zero() {
        let segment: TextSegment = serde_json::from_str(r#"{"endIndex": "7"}"#).unwrap();
        assert_eq!(segment, TextSegment { start_index: 0, end_index: 7 });

        let page_ref: PageRef = serde_json::from_str("{}").unwrap();
        assert_eq!(page_ref.page, 0);
    }

    #[test]
    fn test_entity_type_field_and_unknown_fields() {
        let entity: Entity = serde_json::from_str(
            r#"{
                "type": "vat",
                "mentionText": "$140.00",
                "moneyValue": {"currencyCode": "USD"},
                "properties": [{"type": "tax_amount", "mentionText": "$140.00"}]
            }"#,
        )
        .unwrap();
        assert_eq!(entity.entity_type, "vat");
        assert_eq!(entity.properties.len(), 1);
        assert_eq!(entity.properties[0].entity_type, "tax_amount");
    }

    #[test]
    fn test_rejects_non_numeric_index() {
        let result: Result<TextSegment, _> = serde_json::from_str(r#"{"startIndex": "abc"}"#);
        assert!(result.is_err());
    }
}
