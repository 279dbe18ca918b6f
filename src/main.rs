use log2::*;
use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;

use snapshot::config::Config;
use snapshot::crawler::{self, CrawlerState, Site};
use snapshot::serve::{self, SnapshotRoot};

/// Indicates start time of a project, lazily initialized
pub static START_TIME: once_cell::sync::Lazy<Instant> = once_cell::sync::Lazy::new(Instant::now);

#[tokio::main]
async fn main() -> Result<()> {
    let _ = *START_TIME;
    let cfg = Config::new();
    cfg.validate()?;
    let logger = match &cfg.log_file {
        Some(path) => open(&path.to_string_lossy()),
        None => stdout(),
    };
    let _log2 = logger
        .module(true) // include module name
        .module_with_line(true) // include line number from module
        .module_filter(|module| module.starts_with("snapshot")) // include only modules having this pattern
        .compress(false) // compress output
        .level(cfg.log_level.to_string()) // level of logging (trace - error)
        .start();

    let site = Site::parse(&cfg.url)?;
    let crawler_config = Arc::new(cfg.crawler_config());
    let state = Arc::new(CrawlerState::new(site.clone()));

    info!("Snapshotting {} into {}", site.url(), cfg.output_dir.display());

    // state is cloned because it's accessed after and config is not
    match crawler::crawl(state.clone(), crawler_config).await {
        Ok(_) => {
            let stored = state.stored_pages.read().await.len();
            let failed = state.failures.read().await.len();
            info!(
                "Snapshot of {} finished in {:?}: {} pages stored, {} skipped",
                site.host(),
                START_TIME.elapsed(),
                stored,
                failed
            );
        }
        Err(e) => {
            error!("Crawling failed: {:#}", e);
            return Err(e);
        }
    }

    if cfg.serve {
        serve::serve(SnapshotRoot::new(cfg.output_dir.clone(), site.url().clone()), cfg.port).await?;
    }

    Ok(())
}
