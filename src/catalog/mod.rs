//! Catalog module: API records, parsed nodes, and the source abstraction

mod model;
mod source;

pub use model::{
    CatalogNode, ChapterList, Entry, NodeAttributes, NodeDocument, NodeKind, NodeRecord,
};
pub use source::{endpoint_for, CatalogClient, CatalogSource};
