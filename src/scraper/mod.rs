//! Scrape session: the shared context and worker pool for one run.
//!
//! A [`ScraperSession`] owns everything a run shares — the delivery client,
//! the work queue, the manifest, and the counters — and is constructed fresh
//! per run instead of living in process-global state, so tests can drive
//! independent sessions side by side.
//!
//! # Concurrency model
//!
//! A fixed pool of N workers is spawned together and joined together; each
//! worker loops dequeue → resolve → fetch → record until the queue reports
//! empty. The queue is fully populated before the pool starts, so workers
//! never block waiting for new work. Progress is pushed through a watch
//! channel; display code subscribes without being part of the core control
//! flow.

mod stats;
mod worker;

pub use stats::{ProgressSnapshot, RunStats};

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::delivery::{DeliveryClient, DeliveryError, VersionInfo};
use crate::manifest::{IndexEntry, Manifest};
use crate::queue::{WorkItem, WorkQueue};

/// State shared between the session handle and its worker tasks.
#[derive(Debug)]
struct SessionShared {
    config: ScraperConfig,
    client: DeliveryClient,
    queue: WorkQueue,
    manifest: Manifest,
    stats: RunStats,
    progress: watch::Sender<ProgressSnapshot>,
    total_enqueued: AtomicUsize,
    file_extension: RwLock<Option<String>>,
}

impl SessionShared {
    /// Pushes a fresh progress snapshot to subscribers.
    fn notify_progress(&self) {
        self.progress.send_replace(ProgressSnapshot {
            completed: self.stats.successful(),
            failed: self.stats.failed(),
            total: self.total_enqueued.load(Ordering::SeqCst),
        });
    }

    /// Returns the effective save extension.
    fn file_extension(&self) -> Option<String> {
        self.file_extension
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

/// Shared context for one scrape run.
#[derive(Debug)]
pub struct ScraperSession {
    shared: Arc<SessionShared>,
}

impl ScraperSession {
    /// Creates a session from an immutable configuration and a delivery
    /// client.
    #[must_use]
    pub fn new(config: ScraperConfig, client: DeliveryClient) -> Self {
        let (progress, _) = watch::channel(ProgressSnapshot::default());
        Self {
            shared: Arc::new(SessionShared {
                config,
                client,
                queue: WorkQueue::new(),
                manifest: Manifest::new(),
                stats: RunStats::new(),
                progress,
                total_enqueued: AtomicUsize::new(0),
                file_extension: RwLock::new(None),
            }),
        }
    }

    /// Returns the run configuration.
    #[must_use]
    pub fn config(&self) -> &ScraperConfig {
        &self.shared.config
    }

    /// Looks up version count and asset type for an asset ID.
    ///
    /// # Errors
    ///
    /// Propagates the [`DeliveryError`]; the caller treats total failure here
    /// as fatal for the run, before anything is enqueued.
    pub async fn version_info(&self, asset_id: i64) -> Result<VersionInfo, DeliveryError> {
        self.shared.client.version_info(asset_id).await
    }

    /// Sets the save extension used by workers (resolved from the asset type
    /// when the configured extension is `Auto`). Must be called before
    /// [`run`](Self::run).
    pub fn set_file_extension(&self, extension: Option<String>) {
        *self
            .shared
            .file_extension
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = extension;
    }

    /// Returns the effective save extension.
    #[must_use]
    pub fn file_extension(&self) -> Option<String> {
        self.shared.file_extension()
    }

    /// Adds one work item to the queue.
    pub fn enqueue(&self, item: WorkItem) {
        self.shared.queue.enqueue(item);
        self.shared.total_enqueued.fetch_add(1, Ordering::SeqCst);
    }

    /// Enqueues every version of an asset, 1 through `total_versions`.
    pub fn enqueue_versions(&self, asset_id: i64, total_versions: i32) {
        for version in 1..=total_versions {
            self.enqueue(WorkItem::version(asset_id, version));
        }
    }

    /// Number of items enqueued for this run.
    #[must_use]
    pub fn total_enqueued(&self) -> usize {
        self.shared.total_enqueued.load(Ordering::SeqCst)
    }

    /// Subscribes to progress snapshots pushed after every completed item.
    #[must_use]
    pub fn subscribe_progress(&self) -> watch::Receiver<ProgressSnapshot> {
        self.shared.progress.subscribe()
    }

    /// Returns the run counters.
    #[must_use]
    pub fn stats(&self) -> &RunStats {
        &self.shared.stats
    }

    /// Returns a sorted copy of the recorded index entries.
    #[must_use]
    pub fn sorted_entries(&self) -> Vec<IndexEntry> {
        self.shared.manifest.sorted_entries()
    }

    /// Number of index entries recorded so far.
    #[must_use]
    pub fn recorded(&self) -> usize {
        self.shared.manifest.len()
    }

    /// Starts the worker pool and waits for the queue to drain.
    ///
    /// Spawns the configured number of workers together and joins them all;
    /// the run is complete only when every worker has observed an empty
    /// queue. Individual item failures never propagate out of the pool.
    pub async fn run(&self) {
        let workers = self.shared.config.workers.max(1);
        info!(
            workers,
            queued = self.total_enqueued(),
            "starting worker pool"
        );

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let shared = Arc::clone(&self.shared);
            handles.push(tokio::spawn(worker::run_worker(shared, worker_id)));
        }

        for handle in handles {
            // A worker panic is logged but must not poison the rest of the run.
            if let Err(error) = handle.await {
                warn!(error = %error, "worker task panicked");
            }
        }

        debug!(
            successful = self.shared.stats.successful(),
            failed = self.shared.stats.failed(),
            "worker pool drained"
        );
    }

    /// Sorts and writes the index; returns the written paths.
    ///
    /// Must only be called after [`run`](Self::run) returns.
    ///
    /// # Errors
    ///
    /// Propagates index-file I/O errors.
    pub fn finalize_index(&self, header: &str) -> io::Result<Vec<PathBuf>> {
        self.shared.manifest.finalize(header, &self.shared.config)
    }
}
