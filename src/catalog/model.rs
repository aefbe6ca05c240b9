//! Catalog records as served by the tariff API and the types derived from them

use serde::Deserialize;

/// Kind of a catalog node, from the JSON:API `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Chapter,
    Heading,
    Commodity,
    #[default]
    #[serde(other)]
    Other,
}

impl NodeKind {
    /// Headings and commodities are the only nodes worth descending into
    pub fn is_expandable(self) -> bool {
        matches!(self, NodeKind::Heading | NodeKind::Commodity)
    }
}

/// `attributes` object of a node record
///
/// Included records of unrelated types (sections, footnotes) may omit or
/// null any of these, so every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeAttributes {
    #[serde(default)]
    pub goods_nomenclature_item_id: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub declarable: Option<bool>,
}

/// One JSON:API resource object
#[derive(Debug, Clone, Deserialize)]
pub struct NodeRecord {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type", default)]
    pub kind: NodeKind,

    #[serde(default)]
    pub attributes: NodeAttributes,
}

impl NodeRecord {
    /// The goods nomenclature code, or an empty string when absent
    pub fn code(&self) -> &str {
        self.attributes
            .goods_nomenclature_item_id
            .as_deref()
            .unwrap_or("")
    }
}

/// Response of `GET /{chapters|commodities}/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct NodeDocument {
    pub data: NodeRecord,

    #[serde(default)]
    pub included: Vec<NodeRecord>,
}

/// Response of `GET /chapters`
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterList {
    pub data: Vec<NodeRecord>,
}

impl ChapterList {
    /// Extracts the ordered, duplicate-free list of 2-character chapter ids
    ///
    /// Records whose code is shorter than two characters are skipped.
    pub fn chapter_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::with_capacity(self.data.len());

        for record in &self.data {
            let Some(id) = record.code().get(..2) else {
                tracing::warn!(
                    "Skipping chapter record '{}' with malformed code '{}'",
                    record.id,
                    record.code()
                );
                continue;
            };

            if !ids.iter().any(|existing| existing == id) {
                ids.push(id.to_string());
            }
        }

        ids
    }
}

/// A parsed catalog node: the primary record plus its expandable children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogNode {
    pub code: String,
    pub kind: NodeKind,
    pub description: String,
    pub declarable: bool,

    /// Codes of included headings and commodities, in document order
    pub children: Vec<String>,
}

impl CatalogNode {
    /// Parses a single-node response body
    pub fn parse(body: &[u8]) -> serde_json::Result<Self> {
        let document: NodeDocument = serde_json::from_slice(body)?;
        Ok(Self::from(document))
    }

    /// The output entry for this node, if it is declarable and has a code
    pub fn entry(&self) -> Option<Entry> {
        if !self.declarable || self.code.is_empty() {
            return None;
        }

        Some(Entry {
            code: self.code.clone(),
            description: self.description.clone(),
        })
    }
}

impl From<NodeDocument> for CatalogNode {
    fn from(document: NodeDocument) -> Self {
        let children = document
            .included
            .iter()
            .filter(|record| record.kind.is_expandable())
            .map(NodeRecord::code)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect();

        let NodeRecord {
            kind, attributes, ..
        } = document.data;

        Self {
            code: attributes.goods_nomenclature_item_id.unwrap_or_default(),
            kind,
            description: attributes.description.unwrap_or_default(),
            declarable: attributes.declarable.unwrap_or(false),
            children,
        }
    }
}

/// One output row: a declarable code and its description
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    pub code: String,
    pub description: String,
}

impl Entry {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}
