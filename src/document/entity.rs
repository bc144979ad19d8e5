//! Flattened entity view

use serde::Serialize;

use crate::shard::schema;
use crate::shard::Shard;

/// Separator between a parent entity type and a nested property type
pub const TYPE_SEPARATOR: char = '/';

/// An extracted field with its fully qualified type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Type qualified by its ancestors, e.g. `vat/tax_amount`
    #[serde(rename = "type")]
    pub entity_type: String,
    pub mention_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_text: Option<String>,
    pub confidence: f32,
    /// 0-based indices into the document's pages
    pub page_refs: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Entity {
    fn from_wire(entity: &schema::Entity, entity_type: String, first_page: usize) -> Self {
        let normalized_text = entity
            .normalized_value
            .as_ref()
            .map(|value| value.text.clone())
            .filter(|text| !text.is_empty());

        let page_refs = entity
            .page_anchor
            .as_ref()
            .map(|anchor| {
                anchor
                    .page_refs
                    .iter()
                    .map(|r| first_page + r.page as usize)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            entity_type,
            mention_text: entity.mention_text.clone(),
            normalized_text,
            confidence: entity.confidence,
            page_refs,
            id: Some(entity.id.clone()).filter(|id| !id.is_empty()),
        }
    }

    /// Flat identifier: the qualified type with `/` replaced by `_`
    pub fn flat_key(&self) -> String {
        self.entity_type.replace(TYPE_SEPARATOR, "_")
    }

    /// Normalized text when present, otherwise the mention text
    pub fn value(&self) -> &str {
        self.normalized_text.as_deref().unwrap_or(&self.mention_text)
    }
}

/// Flatten every shard's entities in document order.
///
/// Each parent precedes its properties; nothing is de-duplicated. Page refs
/// are shard-relative on the wire and are shifted past earlier shards' pages.
pub fn flatten(shards: &[Shard]) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut first_page = 0;
    for shard in shards {
        for entity in &shard.entities {
            flatten_into(entity, entity.entity_type.clone(), first_page, &mut entities);
        }
        first_page += shard.pages.len();
    }
    entities
}

fn flatten_into(
    entity: &schema::Entity,
    qualified_type: String,
    first_page: usize,
    out: &mut Vec<Entity>,
) {
    out.push(Entity::from_wire(entity, qualified_type.clone(), first_page));

    for property in &entity.properties {
        let child_type = format!("{}{}{}", qualified_type, TYPE_SEPARATOR, property.entity_type);
        flatten_into(property, child_type, first_page, out);
    }
}
