pub mod state;
pub mod config;
pub mod scrape;
pub mod visited;
pub mod encode;
pub mod fetch;
pub mod runner;


pub use state::{CrawlPhase, CrawlerState, CrawlerStateRef, PageFailure, StoredPage};
pub use config::{CrawlerConfig, CrawlerConfigRef, DEFAULT_USER_AGENT, LINK_REQUEST_TIMEOUT_SEC};
pub use scrape::{Classified, Site, classify, construct_url, extract_links};
pub use visited::{VisitedSet, visit_key};
pub use encode::{encode, encode_path};
pub use fetch::{SNIFF_LEN, fetch_and_store, is_html, sniff_content_type, store};
pub use runner::{build_client, crawl};
