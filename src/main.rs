//! CLI entry point for the asset archiver.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::SystemTime;

use anyhow::{Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use rbx_archiver::{
    AssetType, COOKIE_ENV_VAR, DeliveryClient, ProgressSnapshot, ScraperConfig, ScraperSession,
    WorkItem,
};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    if args.asset.is_none() && args.hashes.is_empty() {
        info!("No scrape target given. Pass --asset <ID> or --hash <HASH>.");
        info!("Example: rbx-archiver --asset 1818 --workers 4");
        return Ok(());
    }

    let config = args.to_config();

    if config.auth_cookie.is_some() {
        info!("Using auth cookie from arguments");
    } else if std::env::var(COOKIE_ENV_VAR).is_ok_and(|value| !value.is_empty()) {
        info!("Using auth cookie from environment");
    }

    let progress_enabled = io::stderr().is_terminal() && !args.quiet;

    match args.asset {
        Some(asset_id) => run_asset_scraper(asset_id, config, progress_enabled).await,
        None => run_hash_scraper(&args.hashes, config, progress_enabled).await,
    }
}

/// Scrapes every version of one asset ID.
async fn run_asset_scraper(
    asset_id: i64,
    mut config: ScraperConfig,
    progress_enabled: bool,
) -> Result<()> {
    if config.output_dir.as_os_str().is_empty() && !config.console_only() {
        config.output_dir = PathBuf::from(format!("Asset_{asset_id}"));
    }

    let client = DeliveryClient::new(&config)?;
    let session = ScraperSession::new(config, client);

    // Total inability to count versions aborts the run before anything is
    // enqueued; every later failure stays local to its item.
    let version_info = match session.version_info(asset_id).await {
        Ok(info) => info,
        Err(error) => bail!("Failed to fetch versions for asset {asset_id}: {error}"),
    };

    info!(
        asset_id,
        versions = version_info.total_versions,
        asset_type = version_info.asset_type.code(),
        "Asset version count resolved"
    );

    session.set_file_extension(resolve_extension(
        &session.config().extension,
        Some(version_info.asset_type),
    ));
    session.enqueue_versions(asset_id, version_info.total_versions);

    run_and_report(
        &session,
        &format!(
            "{asset_id} asset versions on {} ({} versions)",
            httpdate::fmt_http_date(SystemTime::now()),
            version_info.total_versions
        ),
        progress_enabled,
    )
    .await
}

/// Scrapes the explicitly supplied content hashes.
async fn run_hash_scraper(
    hashes: &[String],
    mut config: ScraperConfig,
    progress_enabled: bool,
) -> Result<()> {
    if config.output_dir.as_os_str().is_empty() && !config.console_only() {
        config.output_dir = PathBuf::from("Asset_Hashes");
    }

    let client = DeliveryClient::new(&config)?;
    let session = ScraperSession::new(config, client);

    session.set_file_extension(resolve_extension(&session.config().extension, None));
    for hash in hashes {
        session.enqueue(WorkItem::hash(hash.as_str())?);
    }

    let total = session.total_enqueued();
    run_and_report(
        &session,
        &format!(
            "asset hashes on {} ({total} hashes)",
            httpdate::fmt_http_date(SystemTime::now())
        ),
        progress_enabled,
    )
    .await
}

/// Runs the worker pool, prints statistics, and writes the index.
async fn run_and_report(
    session: &ScraperSession,
    index_header: &str,
    progress_enabled: bool,
) -> Result<()> {
    let total = session.total_enqueued();
    let progress = spawn_progress_bar(session.subscribe_progress(), total, progress_enabled);

    session.run().await;

    if let Some(handle) = progress {
        let _ = handle.await;
    }

    let stats = session.stats();
    info!(
        successful = stats.successful(),
        failed = stats.failed(),
        total = stats.total(),
        "Download statistics"
    );

    let index_paths = session.finalize_index(index_header)?;
    if !index_paths.is_empty() {
        let rendered: Vec<String> = index_paths
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        info!("Index file(s) can be found at {}", rendered.join(", "));
    }

    Ok(())
}

/// Resolves the effective save extension from the configured value.
fn resolve_extension(configured: &str, asset_type: Option<AssetType>) -> Option<String> {
    if configured.eq_ignore_ascii_case("auto") {
        return asset_type
            .and_then(AssetType::extension)
            .map(ToString::to_string);
    }
    if configured.is_empty() {
        return None;
    }
    Some(configured.to_string())
}

/// Spawns the progress bar task fed by session snapshots.
fn spawn_progress_bar(
    mut receiver: watch::Receiver<ProgressSnapshot>,
    total: usize,
    enabled: bool,
) -> Option<JoinHandle<()>> {
    if !enabled || total == 0 {
        return None;
    }

    let bar = ProgressBar::new(total as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
    {
        bar.set_style(style);
    }

    Some(tokio::spawn(async move {
        loop {
            let snapshot = *receiver.borrow_and_update();
            bar.set_position(snapshot.finished() as u64);
            if snapshot.failed > 0 {
                bar.set_message(format!("{} errors", snapshot.failed));
            }
            if snapshot.finished() >= snapshot.total && snapshot.total > 0 {
                break;
            }
            if receiver.changed().await.is_err() {
                break;
            }
        }
        bar.finish_and_clear();
    }))
}
