//! File persistence for downloaded asset payloads.
//!
//! Writes are synchronous within the calling worker: payloads are already
//! buffered in memory, and the optional compression pass runs over the whole
//! buffer before a single write, matching the delivery sizes this tool deals
//! with. The server-supplied `last-modified` value is propagated onto the
//! saved file's modification time so archived files carry their original
//! timestamps.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use flate2::Compression;
use flate2::write::GzEncoder;
use tracing::debug;

use crate::config::CompressionType;
use crate::queue::WorkItem;

/// Builds the base output file name for a work item (no extension).
///
/// Versioned items render as `{id}-v{version}`, except version 0 ("latest")
/// which is just `{id}`. Hash items use the hash itself — or the final path
/// segment when the hash is a full URL — sanitized for the filesystem.
#[must_use]
pub fn build_file_name(item: &WorkItem) -> String {
    match item {
        WorkItem::Version { asset_id, version } => {
            if *version == 0 {
                asset_id.to_string()
            } else {
                format!("{asset_id}-v{version}")
            }
        }
        WorkItem::Hash { hash } => {
            let base = hash
                .rsplit('/')
                .next()
                .filter(|segment| !segment.is_empty())
                .unwrap_or(hash);
            sanitize(base)
        }
    }
}

/// Appends the configured extension, when there is one.
#[must_use]
pub fn apply_extension(file_name: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) if !ext.is_empty() => format!("{file_name}.{ext}"),
        _ => file_name.to_string(),
    }
}

/// Saves a payload, applying the configured compression and propagating the
/// last-modified timestamp.
///
/// Compression appends its conventional suffix (`.gz` / `.bz2`) to the path;
/// the final path actually written is returned.
///
/// # Errors
///
/// Returns the underlying I/O error when compression or the file write fails.
pub fn save(
    path: &Path,
    bytes: &[u8],
    compression: CompressionType,
    last_modified: Option<SystemTime>,
) -> io::Result<PathBuf> {
    let (final_path, contents) = match compression {
        CompressionType::None => (path.to_path_buf(), bytes.to_vec()),
        CompressionType::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(bytes)?;
            (with_suffix(path, ".gz"), encoder.finish()?)
        }
        CompressionType::Bzip2 => {
            let mut encoder =
                bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
            encoder.write_all(bytes)?;
            (with_suffix(path, ".bz2"), encoder.finish()?)
        }
    };

    fs::write(&final_path, contents)?;

    if let Some(modified) = last_modified {
        let file = fs::File::options().write(true).open(&final_path)?;
        file.set_modified(modified)?;
    }

    debug!(path = %final_path.display(), bytes = bytes.len(), "payload saved");

    Ok(final_path)
}

/// Appends a literal suffix to a path without touching its extension logic.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

/// Replaces filesystem-hostile characters so hash-derived names stay usable.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_file_name_for_versioned_item() {
        assert_eq!(build_file_name(&WorkItem::version(1818, 3)), "1818-v3");
    }

    #[test]
    fn test_file_name_omits_version_zero_suffix() {
        assert_eq!(build_file_name(&WorkItem::version(1818, 0)), "1818");
    }

    #[test]
    fn test_file_name_for_plain_hash() {
        let item = WorkItem::hash("cafebabe01").unwrap();
        assert_eq!(build_file_name(&item), "cafebabe01");
    }

    #[test]
    fn test_file_name_for_url_hash_uses_last_segment() {
        let item = WorkItem::hash("https://c0.rbxcdn.com/deadbeef").unwrap();
        assert_eq!(build_file_name(&item), "deadbeef");
    }

    #[test]
    fn test_file_name_sanitizes_query_characters() {
        let item = WorkItem::hash("http://roblox.com/asset?hash=ff00").unwrap();
        assert_eq!(build_file_name(&item), "asset_hash_ff00");
    }

    #[test]
    fn test_apply_extension() {
        assert_eq!(apply_extension("1818-v1", Some("rbxl")), "1818-v1.rbxl");
        assert_eq!(apply_extension("1818-v1", None), "1818-v1");
        assert_eq!(apply_extension("1818-v1", Some("")), "1818-v1");
    }

    #[test]
    fn test_save_uncompressed_writes_bytes_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("1818-v1.rbxl");

        let written = save(&path, b"place bytes", CompressionType::None, None).unwrap();
        assert_eq!(written, path);
        assert_eq!(fs::read(&written).unwrap(), b"place bytes");
    }

    #[test]
    fn test_save_gzip_appends_suffix_and_magic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("1818-v1");

        let written = save(&path, b"place bytes", CompressionType::Gzip, None).unwrap();
        assert!(written.to_string_lossy().ends_with("1818-v1.gz"));

        let contents = fs::read(&written).unwrap();
        assert_eq!(&contents[..2], &[0x1f, 0x8b], "missing gzip magic bytes");
    }

    #[test]
    fn test_save_bzip2_appends_suffix_and_magic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("1818-v1");

        let written = save(&path, b"place bytes", CompressionType::Bzip2, None).unwrap();
        assert!(written.to_string_lossy().ends_with("1818-v1.bz2"));

        let contents = fs::read(&written).unwrap();
        assert_eq!(&contents[..3], b"BZh", "missing bzip2 magic bytes");
    }

    #[test]
    fn test_save_sets_last_modified() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("1818-v1");
        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_142_640_000);

        let written = save(&path, b"bytes", CompressionType::None, Some(stamp)).unwrap();
        let modified = fs::metadata(&written).unwrap().modified().unwrap();
        assert_eq!(modified, stamp);
    }
}
