//! Append-only scrape index and its end-of-run serialization.
//!
//! Workers hand completed [`IndexEntry`] records to the [`Manifest`] and
//! never touch them again; the backing collection is the only state shared
//! between workers besides the queue, and both sit behind a single mutex.
//! Finalization (sort + write) must only happen after every worker has
//! joined — it takes the collection by lock but assumes no concurrent
//! `record` calls, which the session's control flow guarantees.

mod entry;

pub use entry::IndexEntry;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::info;

use crate::config::{IndexType, ScraperConfig};

/// Fixed file name of the line-oriented index.
pub const INDEX_TEXT_FILE: &str = "index.txt";

/// Fixed file name of the structured index.
pub const INDEX_JSON_FILE: &str = "index.json";

/// Thread-synchronized collection of per-item outcome records.
#[derive(Debug, Default)]
pub struct Manifest {
    entries: Mutex<Vec<IndexEntry>>,
}

impl Manifest {
    /// Creates an empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an outcome record. Never rejects an entry.
    pub fn record(&self, entry: IndexEntry) {
        self.lock().push(entry);
    }

    /// Returns the number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns a sorted copy of the recorded entries.
    #[must_use]
    pub fn sorted_entries(&self) -> Vec<IndexEntry> {
        let mut entries = self.lock().clone();
        entries.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        entries
    }

    /// Sorts the index and writes the configured serializations.
    ///
    /// Returns the paths written so the caller can report them. Writes
    /// nothing (and returns no paths) when index output is disabled.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when creating the output directory or
    /// writing an index file fails.
    pub fn finalize(&self, header: &str, config: &ScraperConfig) -> io::Result<Vec<PathBuf>> {
        if !config.index_enabled() {
            return Ok(Vec::new());
        }

        let entries = self.sorted_entries();
        fs::create_dir_all(&config.output_dir)?;

        let mut paths = Vec::new();

        if matches!(config.index_type, IndexType::Text | IndexType::All) {
            let mut contents = String::new();
            contents.push_str(header);
            contents.push('\n');
            for entry in &entries {
                contents.push_str(&entry.render_line(false));
                contents.push('\n');
            }

            let path = config.output_dir.join(INDEX_TEXT_FILE);
            fs::write(&path, contents)?;
            paths.push(path);
        }

        if matches!(config.index_type, IndexType::Json | IndexType::All) {
            let contents = serde_json::to_string(&entries).map_err(io::Error::other)?;

            let path = config.output_dir.join(INDEX_JSON_FILE);
            fs::write(&path, contents)?;
            paths.push(path);
        }

        info!(
            entries = entries.len(),
            files = paths.len(),
            "index written"
        );

        Ok(paths)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<IndexEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
