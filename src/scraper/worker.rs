//! Worker loop: resolve, fetch, classify, record.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::delivery::CdnPayload;
use crate::manifest::IndexEntry;
use crate::output;
use crate::queue::WorkItem;

use super::SessionShared;

/// Drains the shared queue until empty.
///
/// Each dequeued item runs the full state machine; every failure is terminal
/// for that item only and never aborts the loop.
pub(super) async fn run_worker(shared: Arc<SessionShared>, worker_id: usize) {
    debug!(worker_id, "worker started");

    while let Some(item) = shared.queue.try_dequeue() {
        process_item(&shared, item).await;
    }

    debug!(worker_id, "queue drained");
}

/// Runs one item through Resolve → Fetch → Classify → Record.
async fn process_item(shared: &SessionShared, item: WorkItem) {
    // Resolve
    let url = match shared.client.resolve_download_url(&item).await {
        Ok(url) => url,
        Err(error) => {
            let message = format!("Failed to fetch {item}: {error}");
            record_failure(shared, item, &message);
            return;
        }
    };

    // Fetch. A 403 here means the asset resolved but the file is gone from
    // the CDN, which the error type already distinguishes from plain status
    // failures.
    let payload = match shared.client.fetch_content(&url).await {
        Ok(payload) => payload,
        Err(error) => {
            let message = format!("Failed to fetch {item} ({url}): {error}");
            record_failure(shared, item, &message);
            return;
        }
    };

    // Classify + persist
    if shared.config.files_enabled() {
        if let Err(error) = persist(shared, &item, &payload) {
            let message = format!("Failed to save {item}: {error}");
            record_failure(shared, item, &message);
            return;
        }
    }

    let entry = IndexEntry::success(
        item,
        url,
        payload.size_in_mb(),
        payload.last_modified.clone(),
    );
    info!("{}", entry.render_line(shared.config.trim_cdn_url()));
    shared.manifest.record(entry);
    shared.stats.record_success();
    shared.notify_progress();
}

/// Writes the payload to the output directory with the session extension.
fn persist(shared: &SessionShared, item: &WorkItem, payload: &CdnPayload) -> io::Result<PathBuf> {
    fs::create_dir_all(&shared.config.output_dir)?;

    let name = output::apply_extension(
        &output::build_file_name(item),
        shared.file_extension().as_deref(),
    );
    let path = shared.config.output_dir.join(name);

    let modified = payload
        .last_modified
        .as_deref()
        .and_then(|value| httpdate::parse_http_date(value).ok());

    output::save(&path, &payload.bytes, shared.config.compression, modified)
}

/// Records a failure entry and bumps the failure counter.
fn record_failure(shared: &SessionShared, item: WorkItem, message: &str) {
    let entry = IndexEntry::failure(item, message);
    warn!("{}", entry.render_line(shared.config.trim_cdn_url()));
    shared.manifest.record(entry);
    shared.stats.record_failure();
    shared.notify_progress();
}
