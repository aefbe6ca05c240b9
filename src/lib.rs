//! Taric-Harvest: a rate-limited tariff catalog enumerator
//!
//! This crate walks the commodity tree of the UK Trade Tariff API chapter by
//! chapter, collects every declarable commodity code, and produces a
//! deduplicated, sorted list suitable for CSV export.

pub mod catalog;
pub mod client;
pub mod config;
pub mod harvest;
pub mod output;

use thiserror::Error;

/// Main error type for Taric-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to decode response for {id}: {source}")]
    Decode {
        id: String,
        source: serde_json::Error,
    },

    #[error("Unable to retrieve the chapter list: {0}")]
    Bootstrap(Box<HarvestError>),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Request-layer errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),

    #[error("Network error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Retryable status {status} from {url}")]
    Throttled { url: String, status: u16 },

    #[error("Unexpected status {status} from {url}")]
    Api { url: String, status: u16 },

    #[error("Giving up on {url} after {attempts} attempts: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// Whether another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Transport { .. } | FetchError::Throttled { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Taric-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalog::{CatalogClient, CatalogNode, CatalogSource, Entry, NodeKind};
pub use client::{RateGate, RequestClient};
pub use config::Config;
pub use harvest::{HarvestReport, Harvester};
