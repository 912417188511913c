//! HTTP client construction and raw request shapes for the delivery service.
//!
//! Centralizes the networking policy all scrape requests share: the fixed
//! per-request timeout, transparent gzip decompression, the optional auth
//! cookie, and — deliberately — no automatic redirect following. The
//! delivery endpoint answers asset lookups with a redirect whose `Location`
//! header *is* the payload of the resolution step, so the redirect must stay
//! observable instead of being consumed by the transport layer.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::cookie::Jar;
use reqwest::redirect::Policy;
use tracing::debug;

use crate::config::ScraperConfig;

use super::DeliveryError;

/// Name of the auth cookie attached to delivery-endpoint requests.
const AUTH_COOKIE_NAME: &str = ".ROBLOSECURITY";

/// HTTP client bound to one delivery origin.
///
/// Built once per session and shared by all workers; reqwest's `Client` is
/// internally reference-counted, so cloning is cheap.
#[derive(Debug, Clone)]
pub struct DeliveryClient {
    client: Client,
    origin: String,
    base_domain: String,
}

impl DeliveryClient {
    /// Builds a client from the run configuration.
    ///
    /// The delivery origin is derived from the configured base domain
    /// (`https://assetdelivery.{base}`); the auth cookie, when resolved, is
    /// scoped to `.{base}` so it reaches every subdomain of the service.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::ClientBuild`] when client construction fails.
    pub fn new(config: &ScraperConfig) -> Result<Self, DeliveryError> {
        let origin = format!("https://assetdelivery.{}", config.base_url);
        Self::with_origin(
            origin,
            &config.base_url,
            config.http_timeout_secs,
            config.resolve_cookie(),
        )
    }

    /// Builds a client against an explicit delivery origin.
    ///
    /// Used directly by tests to point the session at a local mock server.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::ClientBuild`] when client construction fails.
    pub fn with_origin(
        origin: impl Into<String>,
        base_domain: &str,
        timeout_secs: u64,
        auth_cookie: Option<String>,
    ) -> Result<Self, DeliveryError> {
        let origin = origin.into();

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(Policy::none())
            .gzip(true);

        if let Some(cookie) = auth_cookie {
            let jar = Arc::new(Jar::default());
            if let Ok(scope) = format!("https://{base_domain}/").parse::<reqwest::Url>() {
                jar.add_cookie_str(
                    &format!("{AUTH_COOKIE_NAME}={cookie}; Domain=.{base_domain}; Path=/"),
                    &scope,
                );
                debug!(domain = %base_domain, "auth cookie attached");
            }
            builder = builder.cookie_provider(jar);
        }

        let client = builder
            .build()
            .map_err(|source| DeliveryError::ClientBuild { source })?;

        Ok(Self {
            client,
            origin,
            base_domain: base_domain.to_string(),
        })
    }

    /// Returns the delivery origin requests are issued against.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns the base domain used for cookie scoping and CDN rewriting.
    #[must_use]
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// Issues a metadata/redirect request for an asset version.
    ///
    /// Version 0 means "latest" and is the form used for version counting.
    ///
    /// # Errors
    ///
    /// Returns a transport-classified [`DeliveryError`] when the request
    /// cannot complete.
    pub async fn asset_request(
        &self,
        asset_id: i64,
        version: i32,
    ) -> Result<reqwest::Response, DeliveryError> {
        let url = format!(
            "{}/v1/asset/?id={asset_id}&version={version}",
            self.origin
        );
        debug!(asset_id, version, "requesting asset metadata");
        self.get(&url).await
    }

    /// Issues a metadata/redirect request for a content hash.
    ///
    /// # Errors
    ///
    /// Returns a transport-classified [`DeliveryError`] when the request
    /// cannot complete.
    pub async fn hash_request(&self, hash: &str) -> Result<reqwest::Response, DeliveryError> {
        let url = format!("{}/v1/asset/?hash={hash}", self.origin);
        debug!(hash, "requesting hash metadata");
        self.get(&url).await
    }

    /// Issues a raw GET, used for the content fetch against a resolved URL.
    ///
    /// # Errors
    ///
    /// Returns a transport-classified [`DeliveryError`] when the request
    /// cannot complete.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, DeliveryError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| DeliveryError::from_transport(url, e))
    }
}
