use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::crawler::{CrawlerConfig, DEFAULT_USER_AGENT, LINK_REQUEST_TIMEOUT_SEC};

/// Default port of the serve-back endpoint
pub const DEFAULT_SERVE_PORT: u16 = 7000;

/// Log levels as defined in log2 crate
#[derive(Debug, Serialize, Deserialize, Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// All program arguments, while CrawlerConfig describes only the crawler
#[derive(Parser, Debug, Serialize, Deserialize)]
#[command(author, version, about = "Snapshot a single website to disk", long_about = None)]
pub struct Config {
    /// Root URL of the site, e.g. https://www.whitehouse.gov
    pub url: String,
    /// Directory the `<hostname>/` snapshot tree is written under
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,
    /// Maximum number of pages fetched at once (unlimited when omitted)
    #[arg(short, long)]
    pub parallelism: Option<usize>,
    /// Timeout of a single request in seconds
    #[arg(long, default_value_t = LINK_REQUEST_TIMEOUT_SEC)]
    pub request_timeout: u64,
    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
    /// Serve the snapshot over HTTP once the crawl is done
    #[arg(short, long)]
    pub serve: bool,
    /// Port of the snapshot server
    #[arg(long, default_value_t = DEFAULT_SERVE_PORT)]
    pub port: u16,
    /// Write logs to this file instead of stdout
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}

impl Config {
    pub fn new() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.parallelism == Some(0) {
            anyhow::bail!("parallelism must be greater than 0");
        }
        if self.request_timeout == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }
        Ok(())
    }

    pub fn crawler_config(&self) -> CrawlerConfig {
        let config = CrawlerConfig::new(self.output_dir.clone())
            .with_request_timeout(self.request_timeout)
            .with_user_agent(self.user_agent.clone());
        match self.parallelism {
            Some(parallelism) => config.with_parallelism(parallelism),
            None => config,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        write!(f, "{}", s)
    }
}
