use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use anyhow::{Context, Result};
use log2::*;
use reqwest::Client;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

use super::config::{CrawlerConfig, CrawlerConfigRef};
use super::fetch::fetch_and_store;
use super::scrape::{classify, extract_links};
use super::state::{CrawlPhase, CrawlerState, CrawlerStateRef, PageFailure, StoredPage};
use super::visited::visit_key;

pub fn build_client(config: &CrawlerConfig) -> Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_sec))
        .build()
        .context("Failed to build HTTP client")
}

/// Snapshots the site held by `crawler_state_ref`.
///
/// The root page is fetched first and a failure there aborts the crawl. Each
/// stored page is then scanned in its own task: the scan fetches and stores
/// the page's new links one after another, in document order, and queues
/// them for scanning in turn. `parallelism` caps the number of scans in
/// flight. Returns once the queue is empty and no scan is running.
pub async fn crawl(crawler_state_ref: CrawlerStateRef, crawler_cfg_ref: CrawlerConfigRef) -> Result<()> {
    let client = build_client(&crawler_cfg_ref)?;
    let state = crawler_state_ref;
    let root = state.site.url().clone();

    println!("{}", root);
    state.visited.check_and_mark(&visit_key(&root)).await;
    state.set_phase(CrawlPhase::Running).await;

    state.fetch_count.fetch_add(1, Ordering::Relaxed);
    let body = fetch_and_store(&client, &root, &crawler_cfg_ref.output_dir)
        .await
        .with_context(|| format!("Failed to snapshot root page {}", root))?;
    state.stored_pages.write().await.push(root.clone());
    state.scan_queue.write().await.push_back(StoredPage { url: root.clone(), body });
    info!("Root page {} stored", root);

    let limit = crawler_cfg_ref.parallelism.map(|n| Arc::new(Semaphore::new(n)));
    let mut in_flight: JoinSet<()> = JoinSet::new();

    loop {
        loop {
            let next = state.scan_queue.write().await.pop_front();
            let Some(page) = next else { break };

            let permit = match &limit {
                Some(semaphore) => Some(
                    Arc::clone(semaphore)
                        .acquire_owned()
                        .await
                        .context("Parallelism limit closed")?,
                ),
                None => None,
            };

            let state = Arc::clone(&state);
            let config = Arc::clone(&crawler_cfg_ref);
            let client = client.clone();
            in_flight.spawn(async move {
                let _permit = permit;
                if let Err(e) = scan_page(page, &client, &state, &config).await {
                    warn!("Failed to scan page for links: {:#}", e);
                }
            });
        }

        if in_flight.is_empty() {
            break;
        }

        state.set_phase(CrawlPhase::Draining).await;
        if let Some(Err(e)) = in_flight.join_next().await {
            error!("Page scan task failed: {}", e);
        }
        if !state.scan_queue.read().await.is_empty() {
            state.set_phase(CrawlPhase::Running).await;
        }
    }

    state.set_phase(CrawlPhase::Done).await;
    info!(
        "Crawl finished: {} pages stored, {} failed",
        state.stored_pages.read().await.len(),
        state.failures.read().await.len()
    );

    Ok(())
}

/// Follows every in-scope link of `page` that has not been seen before.
/// Stored links are queued for their own scan.
async fn scan_page(page: StoredPage, client: &Client, state: &CrawlerState, config: &CrawlerConfig) -> Result<()> {
    let links = {
        let html = String::from_utf8_lossy(&page.body);
        extract_links(&html).with_context(|| format!("Failed to read links of {}", page.url))?
    };

    let mut stored = 0;
    for link in links {
        let Some(candidate) = classify(&link, &page.url, &state.site) else {
            continue;
        };
        if !candidate.in_scope {
            debug!("Skipped foreign host link: {}", candidate.url);
            continue;
        }
        if state.visited.check_and_mark(&visit_key(&candidate.url)).await {
            debug!("Already visited: {}", candidate.url);
            continue;
        }
        if candidate.url.scheme() != state.site.url().scheme() {
            debug!("Scheme differs from root, keyed by path only: {}", candidate.url);
        }

        if store_page(candidate.url, client, state, config).await {
            stored += 1;
        }
    }

    debug!("Stored {} new pages linked from {}", stored, page.url);
    Ok(())
}

/// Fetches and stores one accepted link. Returns whether it was stored.
async fn store_page(url: Url, client: &Client, state: &CrawlerState, config: &CrawlerConfig) -> bool {
    state.fetch_count.fetch_add(1, Ordering::Relaxed);

    match fetch_and_store(client, &url, &config.output_dir).await {
        Ok(body) => {
            println!("{}", url);
            state.stored_pages.write().await.push(url.clone());
            state.scan_queue.write().await.push_back(StoredPage { url, body });
            true
        }
        Err(e) => {
            println!("{}\t{}", url, e);
            warn!("Skipping {}: {}", url, e);
            state.failures.write().await.push(PageFailure::new(url, &e));
            false
        }
    }
}
