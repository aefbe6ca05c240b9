//! In-memory catalog for traversal tests

use crate::catalog::{CatalogNode, CatalogSource, NodeKind};
use crate::{FetchError, HarvestError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// Catalog backed by a map, recording how often each code is fetched
#[derive(Default)]
pub struct MemoryCatalog {
    chapters: Vec<String>,
    nodes: HashMap<String, CatalogNode>,
    failing: HashSet<String>,
    fetches: Mutex<HashMap<String, usize>>,
    latency: Duration,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node under `code`; chapter-kind nodes are also listed as chapters
    pub fn node(
        mut self,
        code: &str,
        kind: NodeKind,
        description: &str,
        declarable: bool,
        children: &[&str],
    ) -> Self {
        if kind == NodeKind::Chapter {
            self.chapters.push(code.to_string());
        }
        self.nodes.insert(
            code.to_string(),
            CatalogNode {
                code: code.to_string(),
                kind,
                description: description.to_string(),
                declarable,
                children: children.iter().map(|c| c.to_string()).collect(),
            },
        );
        self
    }

    /// Makes every fetch of `code` fail with a 500-style error
    pub fn failing(mut self, code: &str) -> Self {
        self.failing.insert(code.to_string());
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn fetch_count(&self, code: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .get(code)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl CatalogSource for MemoryCatalog {
    async fn list_chapters(&self) -> Result<Vec<String>> {
        Ok(self.chapters.clone())
    }

    async fn fetch_node(&self, code: &str) -> Result<CatalogNode> {
        *self
            .fetches
            .lock()
            .unwrap()
            .entry(code.to_string())
            .or_insert(0) += 1;

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let url = format!("memory://{}", code);
        if self.failing.contains(code) {
            return Err(HarvestError::Fetch(FetchError::Throttled { url, status: 500 }));
        }

        self.nodes
            .get(code)
            .cloned()
            .ok_or(HarvestError::Fetch(FetchError::Api { url, status: 404 }))
    }
}
