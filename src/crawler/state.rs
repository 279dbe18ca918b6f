use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::RwLock;
use url::Url;

use super::scrape::Site;
use super::visited::VisitedSet;
use crate::error::{ErrorKind, SnapshotError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    NotStarted,
    /// Stored pages are waiting to be scanned
    Running,
    /// Queue is empty, scans are still in flight
    Draining,
    Done,
}

/// A page that was accepted but could not be snapshotted
#[derive(Debug, Clone)]
pub struct PageFailure {
    pub url: Url,
    pub kind: ErrorKind,
    pub message: String,
}

impl PageFailure {
    pub fn new(url: Url, err: &SnapshotError) -> Self {
        Self {
            url,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// A stored page whose links have not been followed yet
#[derive(Debug, Clone)]
pub struct StoredPage {
    pub url: Url,
    pub body: Vec<u8>,
}

/// Current state of the crawler
pub struct CrawlerState {
    pub site: Site,
    /// Paths that have been scheduled, root included
    pub visited: VisitedSet,
    /// Stored pages waiting for a link scan
    pub scan_queue: RwLock<VecDeque<StoredPage>>,
    /// Stored pages in the order their links were discovered
    pub stored_pages: RwLock<Vec<Url>>,
    pub failures: RwLock<Vec<PageFailure>>,
    /// Number of GET requests issued
    pub fetch_count: AtomicUsize,
    pub phase: RwLock<CrawlPhase>,
}

impl CrawlerState {
    pub fn new(site: Site) -> Self {
        Self {
            site,
            visited: VisitedSet::new(),
            scan_queue: RwLock::new(VecDeque::new()),
            stored_pages: RwLock::new(Vec::new()),
            failures: RwLock::new(Vec::new()),
            fetch_count: AtomicUsize::new(0),
            phase: RwLock::new(CrawlPhase::NotStarted),
        }
    }

    pub async fn phase(&self) -> CrawlPhase {
        *self.phase.read().await
    }

    pub(crate) async fn set_phase(&self, phase: CrawlPhase) {
        *self.phase.write().await = phase;
    }
}

pub type CrawlerStateRef = Arc<CrawlerState>;
