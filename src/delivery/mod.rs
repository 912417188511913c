//! Delivery-endpoint client and URL resolution protocol.
//!
//! The delivery service is queried in two steps: a metadata request whose
//! response headers carry either the version count + asset type (fresh ID) or
//! the redirect `Location` of the content (specific version/hash), followed by
//! a raw fetch of the resolved CDN URL. Redirect following is disabled at the
//! transport layer so the resolved address stays observable and can be logged
//! and recorded in the index.
//!
//! - [`DeliveryClient`] - shared HTTP client bound to one delivery origin
//! - [`VersionInfo`] - version count + asset type for a fresh asset ID
//! - [`CdnPayload`] - fetched bytes plus the optional `last-modified` header
//! - [`AssetType`] - numeric asset-type codes with save extensions
//! - [`DeliveryError`] - permission / protocol / status / not-found taxonomy

mod asset_type;
mod error;
mod http;
mod resolver;

pub use asset_type::AssetType;
pub use error::DeliveryError;
pub use http::DeliveryClient;
pub use resolver::{CdnPayload, VersionInfo, round_mb};
