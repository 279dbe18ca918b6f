use std::path::PathBuf;
use std::sync::Arc;

/// Default timeout for page requests in seconds
pub const LINK_REQUEST_TIMEOUT_SEC: u64 = 10;

pub const DEFAULT_USER_AGENT: &str = concat!("snapshot/", env!("CARGO_PKG_VERSION"));

/// Configuration for the crawler
pub struct CrawlerConfig {
    /// Directory the `<hostname>/` tree is written under
    pub output_dir: PathBuf,
    /// Maximum number of page visits in flight, `None` for no limit
    pub parallelism: Option<usize>,
    pub request_timeout_sec: u64,
    pub user_agent: String,
}

impl CrawlerConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            parallelism: None,
            request_timeout_sec: LINK_REQUEST_TIMEOUT_SEC,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = Some(parallelism);
        self
    }

    pub fn with_request_timeout(mut self, timeout_sec: u64) -> Self {
        self.request_timeout_sec = timeout_sec;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

pub type CrawlerConfigRef = Arc<CrawlerConfig>;
