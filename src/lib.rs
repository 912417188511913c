//! Asset version archiver core library.
//!
//! This library retrieves every historical version of a remotely hosted
//! binary asset (addressed by numeric ID or content hash), resolves each
//! version to a CDN URL through the delivery endpoint's redirect protocol,
//! downloads the bytes with a fixed worker pool, and produces saved files
//! plus a sorted audit index of every attempt.
//!
//! # Architecture
//!
//! - [`config`] - immutable per-run configuration
//! - [`delivery`] - delivery-endpoint client and URL resolution protocol
//! - [`queue`] - in-memory work queue and work item types
//! - [`scraper`] - scrape session, worker pool, and run statistics
//! - [`manifest`] - outcome index with sort and serialization rules
//! - [`output`] - file persistence with optional compression

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod delivery;
pub mod manifest;
pub mod output;
pub mod queue;
pub mod scraper;
#[cfg(test)]
pub mod test_support;

// Re-export commonly used types
pub use config::{
    COOKIE_ENV_VAR, CompressionType, DEFAULT_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS, IndexType,
    OutputType, ScraperConfig, normalize_base_url,
};
pub use delivery::{AssetType, CdnPayload, DeliveryClient, DeliveryError, VersionInfo, round_mb};
pub use manifest::{INDEX_JSON_FILE, INDEX_TEXT_FILE, IndexEntry, Manifest};
pub use queue::{QueueError, WorkItem, WorkQueue};
pub use scraper::{ProgressSnapshot, RunStats, ScraperSession};
