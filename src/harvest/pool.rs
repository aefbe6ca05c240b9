//! Worker pool distributing chapters across concurrent traversals
//!
//! Workers pull chapter ids from a bounded queue rather than receiving a
//! fixed slice up front: chapter subtrees differ in size by orders of
//! magnitude, and pulling keeps every worker busy until the queue drains.

use crate::catalog::{CatalogSource, Entry};
use crate::harvest::expander::{Expansion, TreeExpander, VisitedSet};
use crate::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

/// The expansion produced for one root
#[derive(Debug, Clone)]
pub struct RootOutcome {
    pub root: String,
    pub expansion: Expansion,
}

/// Everything collected from a pool run, before deduplication
#[derive(Debug, Default, Clone)]
pub struct PoolOutcome {
    /// Entries from all roots, in arrival order
    pub entries: Vec<Entry>,
    pub roots_completed: usize,
    pub nodes_expanded: usize,
    pub failed_nodes: usize,
}

impl PoolOutcome {
    fn absorb(&mut self, outcome: RootOutcome) {
        tracing::debug!(
            "Chapter {} finished: {} entries, {} nodes, {} failures",
            outcome.root,
            outcome.expansion.entries.len(),
            outcome.expansion.nodes_expanded,
            outcome.expansion.failed_nodes
        );

        self.roots_completed += 1;
        self.nodes_expanded += outcome.expansion.nodes_expanded;
        self.failed_nodes += outcome.expansion.failed_nodes;
        self.entries.extend(outcome.expansion.entries);
    }
}

/// Fixed-size pool of chapter traversal workers
pub struct WorkerPool<S: CatalogSource + ?Sized> {
    source: Arc<S>,
    workers: usize,

    /// Roots fully expanded and reported; display only
    completed: Arc<AtomicUsize>,
}

impl<S: CatalogSource + ?Sized + 'static> WorkerPool<S> {
    /// Creates a pool of `workers` traversal tasks (at least one)
    pub fn new(source: Arc<S>, workers: usize) -> Self {
        Self {
            source,
            workers: workers.max(1),
            completed: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shares an existing completion counter, e.g. one a progress reporter watches
    pub fn with_counter(mut self, completed: Arc<AtomicUsize>) -> Self {
        self.completed = completed;
        self
    }

    pub fn completed(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.completed)
    }

    /// Expands every root exactly once and collects all entries
    ///
    /// Returns only after every worker has exited and every result has been
    /// received. Per-node failures are already absorbed by the expander; an
    /// error here means a worker task panicked.
    pub async fn run(&self, roots: Vec<String>) -> Result<PoolOutcome> {
        let mut outcome = PoolOutcome::default();
        if roots.is_empty() {
            return Ok(outcome);
        }

        let worker_count = self.workers.min(roots.len());
        tracing::info!(
            "Starting {} workers for {} chapters",
            worker_count,
            roots.len()
        );

        let (job_tx, job_rx) = mpsc::channel::<String>(worker_count);
        let job_rx = Arc::new(Mutex::new(job_rx));
        let (result_tx, mut result_rx) = mpsc::channel::<RootOutcome>(worker_count);

        let mut tasks = JoinSet::new();

        tasks.spawn(async move {
            for root in roots {
                if job_tx.send(root).await.is_err() {
                    break;
                }
            }
        });

        for worker_id in 0..worker_count {
            let source = Arc::clone(&self.source);
            let jobs = Arc::clone(&job_rx);
            let results = result_tx.clone();
            let completed = Arc::clone(&self.completed);

            tasks.spawn(async move {
                loop {
                    let next = jobs.lock().await.recv().await;
                    let Some(root) = next else {
                        break;
                    };

                    tracing::debug!("Worker {} expanding chapter {}", worker_id, root);
                    let mut visited = VisitedSet::new();
                    let expansion = TreeExpander::new(&*source)
                        .expand(&root, &mut visited)
                        .await;

                    if results.send(RootOutcome { root, expansion }).await.is_err() {
                        break;
                    }
                    completed.fetch_add(1, Ordering::Relaxed);
                }
            });
        }

        // Only worker clones remain, so the receiver closes once they all exit
        drop(result_tx);

        while let Some(root_outcome) = result_rx.recv().await {
            outcome.absorb(root_outcome);
        }

        while let Some(joined) = tasks.join_next().await {
            joined?;
        }

        Ok(outcome)
    }
}
