//! Catalog source trait and its HTTP implementation

use crate::catalog::model::{CatalogNode, ChapterList};
use crate::client::{RateGate, RequestClient};
use crate::config::Config;
use crate::{HarvestError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Anything that can list chapters and resolve a code to a catalog node
///
/// The tree expander and worker pool only talk to this trait, so traversal
/// logic can be exercised against in-memory catalogs.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Returns the ordered, duplicate-free list of chapter ids
    async fn list_chapters(&self) -> Result<Vec<String>>;

    /// Fetches and parses one node
    async fn fetch_node(&self, code: &str) -> Result<CatalogNode>;
}

/// Endpoint family for a code: 2-character codes are chapters
pub fn endpoint_for(code: &str) -> &'static str {
    if code.len() == 2 {
        "chapters"
    } else {
        "commodities"
    }
}

/// Tariff API client speaking the JSON:API catalog format
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: RequestClient,
    base_url: String,
}

impl CatalogClient {
    pub fn new(client: RequestClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Builds the request client from configuration around a shared gate
    pub fn from_config(config: &Config, gate: Arc<RateGate>) -> Result<Self> {
        let client = RequestClient::new(&config.api, &config.requests, gate)?;
        Ok(Self::new(client, &config.api.base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the single-node lookup for `code`
    pub fn node_url(&self, code: &str) -> String {
        format!("{}/{}/{}", self.base_url, endpoint_for(code), code)
    }

    pub fn chapters_url(&self) -> String {
        format!("{}/chapters", self.base_url)
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn list_chapters(&self) -> Result<Vec<String>> {
        let body = self.client.fetch(&self.chapters_url()).await?;
        let list: ChapterList =
            serde_json::from_slice(&body).map_err(|source| HarvestError::Decode {
                id: "chapters".to_string(),
                source,
            })?;
        Ok(list.chapter_ids())
    }

    async fn fetch_node(&self, code: &str) -> Result<CatalogNode> {
        let body = self.client.fetch(&self.node_url(code)).await?;
        CatalogNode::parse(&body).map_err(|source| HarvestError::Decode {
            id: code.to_string(),
            source,
        })
    }
}
