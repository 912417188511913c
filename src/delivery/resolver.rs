//! Two-step URL resolution against the delivery endpoint.
//!
//! Step one asks the endpoint about an identifier and reads the answer out of
//! response headers (version count + asset type for a fresh ID, redirect
//! `Location` for a specific version or hash). Step two fetches the resolved
//! CDN URL for the actual bytes. A 403 means different things at each step:
//! during resolution it is tolerated (the latest version may be deleted while
//! the version history stays queryable), on the content fetch it means the
//! asset resolved but is absent from the CDN.

use reqwest::StatusCode;
use reqwest::header::{LAST_MODIFIED, LOCATION};
use tracing::debug;
use url::Url;

use crate::queue::WorkItem;

use super::asset_type::AssetType;
use super::error::DeliveryError;
use super::http::DeliveryClient;

/// Header carrying the total version count.
const VERSION_COUNT_HEADER: &str = "roblox-assetversionnumber";

/// Header carrying the numeric asset-type code.
const ASSET_TYPE_HEADER: &str = "roblox-assettypeid";

/// CDN host substituted when rewriting legacy asset URLs.
const CDN_HOST: &str = "c0.rbxcdn.com";

/// Metadata reported by the delivery endpoint for a fresh asset ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionInfo {
    /// Total number of retrievable versions.
    pub total_versions: i32,
    /// Declared asset type, used for `Auto` extension resolution.
    pub asset_type: AssetType,
}

/// Content fetched from the CDN.
#[derive(Debug, Clone)]
pub struct CdnPayload {
    /// The payload body.
    pub bytes: Vec<u8>,
    /// Server-supplied `last-modified` header, verbatim.
    pub last_modified: Option<String>,
}

impl CdnPayload {
    /// Payload size in megabytes, rounded to 6 decimal places.
    #[must_use]
    pub fn size_in_mb(&self) -> f64 {
        round_mb(self.bytes.len() as f64 / 1024.0 / 1024.0)
    }
}

/// Rounds a megabyte figure to 6 decimal places.
#[must_use]
pub fn round_mb(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

/// Returns true for statuses the resolution protocol accepts.
///
/// 200 and the verb-preserving redirects count as success; 403 only where
/// forbidden responses are tolerated.
#[must_use]
fn is_accepted_status(status: StatusCode, allow_forbidden: bool) -> bool {
    match status {
        StatusCode::OK | StatusCode::FOUND | StatusCode::TEMPORARY_REDIRECT => true,
        StatusCode::FORBIDDEN => allow_forbidden,
        _ => false,
    }
}

impl DeliveryClient {
    /// Looks up the version count and asset type for an asset ID.
    ///
    /// Issues a metadata request for version 0 ("latest") and reads both
    /// required headers. A missing or non-numeric header is a protocol
    /// failure distinct from a bad status.
    ///
    /// # Errors
    ///
    /// [`DeliveryError::Permission`] on 409, [`DeliveryError::Status`] on any
    /// other unaccepted status, [`DeliveryError::MissingHeader`] /
    /// [`DeliveryError::MalformedHeader`] when a required header is absent or
    /// unparseable.
    pub async fn version_info(&self, asset_id: i64) -> Result<VersionInfo, DeliveryError> {
        let response = self.asset_request(asset_id, 0).await?;
        let status = response.status();

        if status == StatusCode::CONFLICT {
            return Err(DeliveryError::Permission);
        }
        // 403 means the latest version is deleted but history is queryable.
        if !is_accepted_status(status, true) {
            return Err(DeliveryError::status(status.as_u16()));
        }

        let total_versions = required_numeric_header(&response, VERSION_COUNT_HEADER)?;
        let type_code = required_numeric_header(&response, ASSET_TYPE_HEADER)?;

        debug!(asset_id, total_versions, type_code, "version info resolved");

        Ok(VersionInfo {
            total_versions,
            asset_type: AssetType::from(type_code),
        })
    }

    /// Resolves a work item to the CDN URL holding its content.
    ///
    /// Hash items that are already URLs skip the endpoint round trip and are
    /// rewritten to CDN form instead.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`version_info`](Self::version_info), plus
    /// [`DeliveryError::MissingHeader`] when an otherwise-successful response
    /// lacks the `Location` header.
    pub async fn resolve_download_url(&self, item: &WorkItem) -> Result<String, DeliveryError> {
        let response = match item {
            WorkItem::Version { asset_id, version } => {
                self.asset_request(*asset_id, *version).await?
            }
            WorkItem::Hash { hash } => {
                if hash.starts_with("http://") || hash.starts_with("https://") {
                    let rewritten = rewrite_to_cdn(hash, self.base_domain());
                    debug!(original = %hash, rewritten = %rewritten, "hash is a URL; rewrote to CDN form");
                    return Ok(rewritten);
                }
                self.hash_request(hash).await?
            }
        };

        let status = response.status();
        if status == StatusCode::CONFLICT {
            return Err(DeliveryError::Permission);
        }
        if !is_accepted_status(status, true) {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::status_with_body(status.as_u16(), body));
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(DeliveryError::MissingHeader { header: "Location" })?;

        Ok(location.to_string())
    }

    /// Fetches resolved content from the CDN.
    ///
    /// # Errors
    ///
    /// [`DeliveryError::NotFoundOnCdn`] on 403 (resolved but absent),
    /// [`DeliveryError::Status`] on any other unaccepted status, transport
    /// errors otherwise.
    pub async fn fetch_content(&self, url: &str) -> Result<CdnPayload, DeliveryError> {
        let response = self.get(url).await?;
        let status = response.status();

        if status == StatusCode::FORBIDDEN {
            return Err(DeliveryError::NotFoundOnCdn);
        }
        if !is_accepted_status(status, false) {
            return Err(DeliveryError::status(status.as_u16()));
        }

        let last_modified = response
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DeliveryError::from_transport(url, e))?;

        Ok(CdnPayload {
            bytes: bytes.to_vec(),
            last_modified,
        })
    }
}

/// Reads a required integer header, distinguishing absence from malformation.
fn required_numeric_header(
    response: &reqwest::Response,
    header: &'static str,
) -> Result<i32, DeliveryError> {
    let value = response
        .headers()
        .get(header)
        .ok_or(DeliveryError::MissingHeader { header })?;

    value
        .to_str()
        .ok()
        .and_then(|text| text.trim().parse::<i32>().ok())
        .ok_or(DeliveryError::MalformedHeader { header })
}

/// Rewrites a legacy asset URL to CDN form.
///
/// Forces `https` and swaps a host under the delivery base domain for the
/// CDN host; URLs already pointing elsewhere only get the scheme upgrade.
fn rewrite_to_cdn(raw: &str, base_domain: &str) -> String {
    let https = match raw.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => raw.to_string(),
    };

    let Ok(mut url) = Url::parse(&https) else {
        return https;
    };

    let under_base = url
        .host_str()
        .is_some_and(|host| host == base_domain || host.ends_with(&format!(".{base_domain}")));
    if under_base && url.set_host(Some(CDN_HOST)).is_err() {
        return https;
    }

    url.to_string()
}
