//! Harvest module: the traversal core
//!
//! This module contains:
//! - Depth-first subtree expansion with a per-root visited set
//! - The worker pool that spreads chapters across concurrent traversals
//! - The progress observer
//! - `Harvester`, which ties bootstrap, pool and aggregation together

mod expander;
mod pool;
mod progress;
#[cfg(test)]
pub(crate) mod testing;

pub use expander::{Expansion, TreeExpander, VisitedSet};
pub use pool::{PoolOutcome, RootOutcome, WorkerPool};
pub use progress::{chapter_bar, ProgressReporter};

use crate::catalog::{CatalogClient, CatalogSource, Entry};
use crate::client::RateGate;
use crate::config::{Config, ProgressConfig};
use crate::output::aggregate;
use crate::{HarvestError, Result};
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of a complete harvest
#[derive(Debug, Clone)]
pub struct HarvestReport {
    /// Unique declarable entries sorted by code
    pub entries: Vec<Entry>,
    pub chapters_total: usize,
    pub chapters_completed: usize,
    pub nodes_expanded: usize,

    /// Nodes whose subtree is missing from the output
    pub failed_nodes: usize,

    /// Entries collected before deduplication
    pub raw_entries: usize,
    pub elapsed: Duration,
}

impl HarvestReport {
    pub fn unique_count(&self) -> usize {
        self.entries.len()
    }

    /// Whether any subtree was dropped because of a fetch or decode failure
    pub fn is_partial(&self) -> bool {
        self.failed_nodes > 0
    }
}

/// Runs a full harvest against a catalog source
pub struct Harvester<S: CatalogSource + ?Sized = CatalogClient> {
    source: Arc<S>,
    workers: usize,
    progress: ProgressConfig,
}

impl Harvester<CatalogClient> {
    /// Builds the HTTP catalog client, its rate gate, and the harvester
    ///
    /// The gate is created here once and shared by every request the run makes.
    pub fn from_config(config: &Config) -> Result<Self> {
        let gate = Arc::new(RateGate::new(config.requests.interval()));
        let source = CatalogClient::from_config(config, gate)?;
        Ok(Self::new(Arc::new(source), config.workers.count)
            .with_progress(config.progress.clone()))
    }
}

impl<S: CatalogSource + ?Sized + 'static> Harvester<S> {
    pub fn new(source: Arc<S>, workers: usize) -> Self {
        Self {
            source,
            workers,
            progress: ProgressConfig {
                enabled: false,
                ..ProgressConfig::default()
            },
        }
    }

    pub fn with_progress(mut self, progress: ProgressConfig) -> Self {
        self.progress = progress;
        self
    }

    /// Fetches the chapter list; any failure here is fatal for the run
    pub async fn list_chapters(&self) -> Result<Vec<String>> {
        self.source
            .list_chapters()
            .await
            .map_err(|e| HarvestError::Bootstrap(Box::new(e)))
    }

    /// Lists chapters, expands them all, and aggregates the entries
    ///
    /// # Returns
    ///
    /// * `Ok(HarvestReport)` - Traversal finished; per-node failures are counted, not raised
    /// * `Err(HarvestError::Bootstrap)` - The chapter list could not be obtained
    pub async fn run(&self) -> Result<HarvestReport> {
        let start = Instant::now();

        tracing::info!("Retrieving the chapter list");
        let chapters = self.list_chapters().await?;
        let chapters_total = chapters.len();
        tracing::info!("Found {} chapters", chapters_total);

        let completed = Arc::new(AtomicUsize::new(0));
        let reporter = ProgressReporter::spawn(
            chapter_bar(chapters_total, self.progress.enabled),
            chapters_total,
            Arc::clone(&completed),
            self.progress.refresh(),
        );

        let pool = WorkerPool::new(Arc::clone(&self.source), self.workers).with_counter(completed);
        let outcome = pool.run(chapters).await;
        reporter.finish().await;
        let outcome = outcome?;

        let raw_entries = outcome.entries.len();
        let entries = aggregate(outcome.entries);

        if outcome.failed_nodes > 0 {
            tracing::warn!(
                "{} nodes could not be expanded; their subtrees are missing from the output",
                outcome.failed_nodes
            );
        }

        let report = HarvestReport {
            entries,
            chapters_total,
            chapters_completed: outcome.roots_completed,
            nodes_expanded: outcome.nodes_expanded,
            failed_nodes: outcome.failed_nodes,
            raw_entries,
            elapsed: start.elapsed(),
        };

        tracing::info!(
            "Harvest completed: {} unique codes from {} nodes in {:?}",
            report.unique_count(),
            report.nodes_expanded,
            report.elapsed
        );

        Ok(report)
    }
}
