//! Immutable per-run scraper configuration.
//!
//! The CLI layer builds one [`ScraperConfig`] and hands it to the core; no
//! component mutates it afterwards. Keeping configuration explicit (instead
//! of a process-wide singleton) lets tests run independent sessions side by
//! side.

use std::path::PathBuf;

use clap::ValueEnum;

/// Environment variable consulted for the auth cookie when `--cookie` is not
/// supplied on the command line.
pub const COOKIE_ENV_VAR: &str = "RBX_ARCHIVER_COOKIE";

/// Default HTTP timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 180;

/// Default delivery base domain.
pub const DEFAULT_BASE_URL: &str = "roblox.com";

/// What the run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputType {
    /// Asset files only.
    Files,
    /// Index files only.
    Index,
    /// Console output only; nothing is written to disk.
    Console,
    /// Asset files and index files.
    #[default]
    Both,
}

/// Which index serializations are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum IndexType {
    /// Line-oriented `index.txt`.
    Text,
    /// Structured `index.json`.
    Json,
    /// Both forms.
    #[default]
    All,
}

/// Compression applied to saved asset files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CompressionType {
    /// Write payload bytes as-is.
    #[default]
    None,
    /// Gzip, appending `.gz` to the file name.
    Gzip,
    /// Bzip2, appending `.bz2` to the file name.
    Bzip2,
}

/// Immutable configuration for one scrape run.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// What the run produces.
    pub output_type: OutputType,
    /// Which index serializations are written.
    pub index_type: IndexType,
    /// Compression applied to saved files.
    pub compression: CompressionType,
    /// Directory receiving files and index output.
    pub output_dir: PathBuf,
    /// Output extension; `Auto` resolves from the reported asset type.
    pub extension: String,
    /// Number of scrape workers.
    pub workers: usize,
    /// Auth cookie supplied via configuration (takes precedence over the
    /// environment variable).
    pub auth_cookie: Option<String>,
    /// HTTP timeout in seconds, applied to every request.
    pub http_timeout_secs: u64,
    /// Delivery base domain, normalized (no scheme, no `www.`, no path).
    pub base_url: String,
    /// Whether CDN URLs logged to the console have their query trimmed.
    /// `None` means "trim unless console-only".
    pub trim_cdn_url_in_console: Option<bool>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            output_type: OutputType::default(),
            index_type: IndexType::default(),
            compression: CompressionType::default(),
            output_dir: PathBuf::new(),
            extension: "Auto".to_string(),
            workers: 1,
            auth_cookie: None,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            base_url: DEFAULT_BASE_URL.to_string(),
            trim_cdn_url_in_console: None,
        }
    }
}

impl ScraperConfig {
    /// Returns true when index files are written.
    #[must_use]
    pub fn index_enabled(&self) -> bool {
        matches!(self.output_type, OutputType::Index | OutputType::Both)
    }

    /// Returns true when asset files are written.
    #[must_use]
    pub fn files_enabled(&self) -> bool {
        matches!(self.output_type, OutputType::Files | OutputType::Both)
    }

    /// Returns true when nothing is written to disk.
    #[must_use]
    pub fn console_only(&self) -> bool {
        self.output_type == OutputType::Console
    }

    /// Whether console log lines trim CDN URL query strings.
    #[must_use]
    pub fn trim_cdn_url(&self) -> bool {
        self.trim_cdn_url_in_console
            .unwrap_or_else(|| !self.console_only())
    }

    /// Resolves the auth cookie: explicit configuration wins over the
    /// `RBX_ARCHIVER_COOKIE` environment variable.
    #[must_use]
    pub fn resolve_cookie(&self) -> Option<String> {
        if let Some(cookie) = &self.auth_cookie {
            if !cookie.is_empty() {
                return Some(cookie.clone());
            }
        }
        std::env::var(COOKIE_ENV_VAR)
            .ok()
            .filter(|value| !value.is_empty())
    }
}

/// Normalizes a user-supplied base URL down to a bare domain.
///
/// Strips a leading `http://`/`https://`, a leading `www.`/`web.`, and
/// anything from the first `/` on.
#[must_use]
pub fn normalize_base_url(value: &str) -> String {
    let mut value = value;
    if let Some(rest) = value.strip_prefix("http://") {
        value = rest;
    } else if let Some(rest) = value.strip_prefix("https://") {
        value = rest;
    }

    if let Some(rest) = value.strip_prefix("www.") {
        value = rest;
    } else if let Some(rest) = value.strip_prefix("web.") {
        value = rest;
    }

    match value.find('/') {
        Some(idx) => value[..idx].to_string(),
        None => value.to_string(),
    }
}
