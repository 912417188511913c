//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use rbx_archiver::{
    CompressionType, DEFAULT_HTTP_TIMEOUT_SECS, IndexType, OutputType, ScraperConfig,
    normalize_base_url,
};

/// Scrape every version of a remote asset and build an audit index.
///
/// Each version is resolved through the delivery endpoint, fetched from the
/// CDN, optionally saved to disk, and recorded in a sorted index alongside
/// any failures.
#[derive(Parser, Debug)]
#[command(name = "rbx-archiver")]
#[command(author, version, about)]
pub struct Args {
    /// Scrape every version of this asset ID
    #[arg(short = 'a', long = "asset")]
    pub asset: Option<i64>,

    /// Scrape a single content hash (repeatable); accepts legacy asset URLs
    #[arg(long = "hash", value_name = "HASH")]
    pub hashes: Vec<String>,

    /// Assets output type
    #[arg(short, long, value_enum, default_value_t = OutputType::Both)]
    pub output: OutputType,

    /// Index type
    #[arg(short, long, value_enum, default_value_t = IndexType::All)]
    pub index: IndexType,

    /// Asset compression type
    #[arg(short, long, value_enum, default_value_t = CompressionType::None)]
    pub compression: CompressionType,

    /// Assets output directory (defaults to Asset_{id})
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Assets output extension; 'Auto' derives it from the asset type
    #[arg(short, long, default_value = "Auto")]
    pub extension: String,

    /// Number of scrape workers (1-64)
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=64))]
    pub workers: u8,

    /// Auth cookie; takes precedence over the RBX_ARCHIVER_COOKIE env var
    #[arg(long)]
    pub cookie: Option<String>,

    /// HTTP timeout in seconds
    #[arg(short, long, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Delivery environment to download from
    #[arg(long, default_value = "www.roblox.com")]
    pub base_url: String,

    /// Trim CDN URL query strings in console output
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub trim_cdn_url: Option<bool>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Builds the immutable run configuration from the parsed arguments.
    ///
    /// The output directory stays empty when not supplied; the caller fills
    /// in the per-target default once the scrape target is known.
    #[must_use]
    pub fn to_config(&self) -> ScraperConfig {
        ScraperConfig {
            output_type: self.output,
            index_type: self.index,
            compression: self.compression,
            output_dir: self.directory.clone().unwrap_or_default(),
            extension: self.extension.clone(),
            workers: usize::from(self.workers),
            auth_cookie: self.cookie.clone(),
            http_timeout_secs: self.timeout,
            base_url: normalize_base_url(&self.base_url),
            trim_cdn_url_in_console: self.trim_cdn_url,
        }
    }
}
