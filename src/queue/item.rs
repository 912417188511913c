//! Work item types for the scrape queue.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::QueueError;

/// A single unit of scrape work: one asset version, or one content hash.
///
/// The two addressing modes are mutually exclusive by construction. The same
/// type doubles as the identity column of a manifest entry, so it carries
/// serde derives for the structured index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkItem {
    /// A numeric asset ID at a specific version.
    Version {
        /// Stable numeric asset identifier.
        #[serde(rename = "id")]
        asset_id: i64,
        /// Version to retrieve (0 means latest).
        version: i32,
    },
    /// A version-less content hash. May also be a full legacy URL, which the
    /// resolver rewrites to CDN form instead of issuing a lookup request.
    Hash {
        /// Content hash or legacy asset URL.
        hash: String,
    },
}

impl WorkItem {
    /// Creates a version-addressed work item.
    #[must_use]
    pub fn version(asset_id: i64, version: i32) -> Self {
        Self::Version { asset_id, version }
    }

    /// Creates a hash-addressed work item.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::EmptyHash`] when the hash is empty or blank.
    pub fn hash(hash: impl Into<String>) -> Result<Self, QueueError> {
        let hash = hash.into();
        if hash.trim().is_empty() {
            return Err(QueueError::EmptyHash);
        }
        Ok(Self::Hash { hash })
    }

    /// Returns the numeric asset ID for version-addressed items.
    #[must_use]
    pub fn asset_id(&self) -> Option<i64> {
        match self {
            Self::Version { asset_id, .. } => Some(*asset_id),
            Self::Hash { .. } => None,
        }
    }

    /// Returns true for hash-addressed items.
    #[must_use]
    pub fn is_hash(&self) -> bool {
        matches!(self, Self::Hash { .. })
    }
}

impl fmt::Display for WorkItem {
    /// Renders the identity the way index rows and failure messages spell it:
    /// `{id} v{version}` for versioned items, the bare hash otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Version { asset_id, version } => write!(f, "{asset_id} v{version}"),
            Self::Hash { hash } => write!(f, "{hash}"),
        }
    }
}
