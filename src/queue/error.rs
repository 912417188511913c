//! Error types for queue item construction.

use thiserror::Error;

/// Errors raised while building queue items.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    /// A hash-addressed item was constructed from an empty or blank string.
    #[error("content hash must not be empty")]
    EmptyHash,
}
