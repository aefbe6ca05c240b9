//! Depth-first expansion of one chapter's subtree

use crate::catalog::{CatalogSource, Entry};
use std::collections::HashSet;

/// Codes already expanded within one root traversal
///
/// Never shared between roots: each chapter starts from an empty set.
#[derive(Debug, Default, Clone)]
pub struct VisitedSet {
    codes: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `code` visited; returns false if it already was
    pub fn insert(&mut self, code: &str) -> bool {
        if self.codes.contains(code) {
            return false;
        }
        self.codes.insert(code.to_string())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Result of expanding one subtree
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Declarable entries in discovery order
    pub entries: Vec<Entry>,

    /// Nodes fetched and parsed successfully
    pub nodes_expanded: usize,

    /// Nodes whose fetch or decode failed; their subtrees are missing
    pub failed_nodes: usize,
}

/// Walks a catalog source from a root code, collecting declarable entries
pub struct TreeExpander<'a, S: CatalogSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: CatalogSource + ?Sized> TreeExpander<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Expands `root` and every heading/commodity reachable from it
    ///
    /// Codes already in `visited` are skipped, so a node reachable through
    /// several parents is fetched once and a reference cycle terminates.
    /// A failed node drops only its own subtree; siblings are still visited.
    /// Children are visited depth first in document order.
    pub async fn expand(&self, root: &str, visited: &mut VisitedSet) -> Expansion {
        let mut expansion = Expansion::default();
        let mut pending = vec![root.to_string()];

        while let Some(code) = pending.pop() {
            if !visited.insert(&code) {
                continue;
            }

            let node = match self.source.fetch_node(&code).await {
                Ok(node) => node,
                Err(e) => {
                    tracing::warn!("Skipping subtree of {}: {}", code, e);
                    expansion.failed_nodes += 1;
                    continue;
                }
            };
            expansion.nodes_expanded += 1;

            if let Some(entry) = node.entry() {
                tracing::trace!("Declarable {} under {}", entry.code, root);
                expansion.entries.push(entry);
            }

            // Reversed so the first child is popped first
            pending.extend(node.children.into_iter().rev());
        }

        expansion
    }
}
