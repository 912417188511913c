//! Index entry type and its text rendering.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::queue::WorkItem;

/// One row of the scrape index: the outcome of a single work item.
///
/// Failure entries carry only the identity and the error message; URL, size,
/// and timestamp stay empty. Entries are immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Identity of the attempted item (asset ID + version, or hash).
    #[serde(flatten)]
    pub item: WorkItem,
    /// Resolved CDN URL, populated on success.
    pub cdn_url: Option<String>,
    /// Payload size in megabytes, rounded to 6 decimals, on success.
    pub file_size_mb: Option<f64>,
    /// Server-supplied `last-modified` value, verbatim, when present.
    pub last_modified: Option<String>,
    /// Error message; presence marks the entry as failed.
    pub error: Option<String>,
}

impl IndexEntry {
    /// Creates a success entry.
    #[must_use]
    pub fn success(
        item: WorkItem,
        cdn_url: impl Into<String>,
        file_size_mb: f64,
        last_modified: Option<String>,
    ) -> Self {
        Self {
            item,
            cdn_url: Some(cdn_url.into()),
            file_size_mb: Some(file_size_mb),
            last_modified,
            error: None,
        }
    }

    /// Creates a failure entry carrying only identity and message.
    #[must_use]
    pub fn failure(item: WorkItem, error: impl Into<String>) -> Self {
        Self {
            item,
            cdn_url: None,
            file_size_mb: None,
            last_modified: None,
            error: Some(error.into()),
        }
    }

    /// Returns true when this entry records a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Sort key for the index total order: entries with a numeric identifier
    /// precede hash-only entries; numeric entries order by (id, version)
    /// ascending; hash entries order by hash ascending.
    #[must_use]
    pub fn sort_key(&self) -> (u8, i64, i32, &str) {
        match &self.item {
            WorkItem::Version { asset_id, version } => (0, *asset_id, *version, ""),
            WorkItem::Hash { hash } => (1, 0, 0, hash.as_str()),
        }
    }

    /// Renders the pipe-delimited index line.
    ///
    /// `{id} | v{version}` (or the bare hash), then `| Error: {message}`
    /// short-circuiting everything else, otherwise URL, last-modified, and
    /// size, each omitted when absent. `trim_cdn_url` drops the query string
    /// from the URL column (console display; index files keep full URLs).
    #[must_use]
    pub fn render_line(&self, trim_cdn_url: bool) -> String {
        let mut line = match &self.item {
            WorkItem::Version { asset_id, version } => format!("{asset_id} | v{version}"),
            WorkItem::Hash { hash } => hash.clone(),
        };

        if let Some(error) = &self.error {
            line.push_str(&format!(" | Error: {error}"));
            return line;
        }

        if let Some(url) = &self.cdn_url {
            line.push_str(&format!(" | {}", display_cdn_url(url, trim_cdn_url)));
        }
        if let Some(last_modified) = &self.last_modified {
            line.push_str(&format!(" | {last_modified}"));
        }
        if let Some(size) = self.file_size_mb {
            line.push_str(&format!(" | {size}Mb"));
        }

        line
    }
}

impl fmt::Display for IndexEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_line(false))
    }
}

/// Truncates everything after `?` so long signed CDN URLs stay readable.
fn display_cdn_url(url: &str, trim: bool) -> String {
    if !trim {
        return url.to_string();
    }
    match url.find('?') {
        Some(idx) => format!("{}...", &url[..=idx]),
        None => url.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn success_entry() -> IndexEntry {
        IndexEntry::success(
            WorkItem::version(1818, 1),
            "https://c0.rbxcdn.com/abc?token=xyz",
            10.0,
            Some("Sat, 18 Mar 2006 00:00:00 GMT".to_string()),
        )
    }

    #[test]
    fn test_success_line_format() {
        let line = success_entry().render_line(false);
        assert_eq!(
            line,
            "1818 | v1 | https://c0.rbxcdn.com/abc?token=xyz | Sat, 18 Mar 2006 00:00:00 GMT | 10Mb"
        );
    }

    #[test]
    fn test_trimmed_url_drops_query() {
        let line = success_entry().render_line(true);
        assert!(
            line.contains("https://c0.rbxcdn.com/abc?..."),
            "expected trimmed URL in: {line}"
        );
        assert!(!line.contains("token=xyz"), "query leaked into: {line}");
    }

    #[test]
    fn test_error_line_short_circuits_remaining_fields() {
        let mut entry = success_entry();
        entry.error = Some("failed to download".to_string());
        let line = entry.render_line(false);
        assert_eq!(line, "1818 | v1 | Error: failed to download");
    }

    #[test]
    fn test_failure_entry_carries_no_result_fields() {
        let entry = IndexEntry::failure(WorkItem::version(1818, 2), "boom");
        assert!(entry.is_failure());
        assert!(entry.cdn_url.is_none());
        assert!(entry.file_size_mb.is_none());
        assert!(entry.last_modified.is_none());
    }

    #[test]
    fn test_hash_line_has_no_version_column() {
        let entry = IndexEntry::success(
            WorkItem::hash("cafebabe").unwrap(),
            "https://c0.rbxcdn.com/cafebabe",
            1.5,
            None,
        );
        assert_eq!(
            entry.render_line(false),
            "cafebabe | https://c0.rbxcdn.com/cafebabe | 1.5Mb"
        );
    }

    #[test]
    fn test_sort_key_orders_ids_before_hashes() {
        let id_entry = IndexEntry::failure(WorkItem::version(i64::MAX, i32::MAX), "x");
        let hash_entry = IndexEntry::failure(WorkItem::hash("aaa").unwrap(), "x");
        assert!(id_entry.sort_key() < hash_entry.sort_key());
    }

    #[test]
    fn test_serde_roundtrip_preserves_all_fields() {
        let entry = success_entry();
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: IndexEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn test_serde_roundtrip_failure_hash_entry() {
        let entry = IndexEntry::failure(WorkItem::hash("ff00aa").unwrap(), "gone");
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: IndexEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }
}
