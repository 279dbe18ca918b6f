use anyhow::{anyhow, Result};
use scraper::{Html, Selector};
use url::Url;

use crate::error::SnapshotError;

/// Elements whose attribute may point at another resource of the site
const LINK_SELECTOR: &str = "a[href], link[href], img[src], script[src]";

/// Root of a crawl. Its authority is the scope boundary for every link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    url: Url,
}

impl Site {
    pub fn parse(input: &str) -> Result<Self, SnapshotError> {
        let url = Url::parse(input).map_err(|source| SnapshotError::Parse {
            input: input.to_string(),
            source,
        })?;
        Self::new(url).map_err(|source| SnapshotError::Parse {
            input: input.to_string(),
            source,
        })
    }

    pub fn new(url: Url) -> Result<Self, url::ParseError> {
        if url.host_str().is_none() {
            return Err(url::ParseError::EmptyHost);
        }
        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Same host and explicit port. The scheme is not compared.
    pub fn contains(&self, url: &Url) -> bool {
        url.host_str() == self.url.host_str() && url.port() == self.url.port()
    }
}

/// A candidate link after resolution against its page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub url: Url,
    pub in_scope: bool,
}

/// Resolves `link` against the page that contained it.
///
/// Returns `None` for links that cannot be used: empty attributes,
/// fragment-only anchors and anything `Url::join` rejects. The fragment of
/// the result is stripped.
pub fn construct_url(link: &str, page_url: &Url) -> Option<Url> {
    let link = link.trim();
    if link.is_empty() || link.starts_with('#') {
        return None;
    }

    let mut url = page_url.join(link).ok()?;
    url.set_fragment(None);
    Some(url)
}

pub fn classify(link: &str, page_url: &Url, site: &Site) -> Option<Classified> {
    let url = construct_url(link, page_url)?;
    let in_scope = site.contains(&url);
    Some(Classified { url, in_scope })
}

/// Collects raw link attributes in document order.
pub fn extract_links(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(LINK_SELECTOR)
        .map_err(|e| anyhow!("Failed to parse link selector: {}", e))?;

    let links = document
        .select(&selector)
        .filter_map(|element| {
            let attr = match element.value().name() {
                "img" | "script" => "src",
                _ => "href",
            };
            element.value().attr(attr).map(str::to_string)
        })
        .collect();

    Ok(links)
}
