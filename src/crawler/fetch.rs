use log2::debug;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs::{DirBuilder, OpenOptions};
use tokio::io::AsyncWriteExt;
use url::Url;

use super::encode::encode;
use crate::error::{Result, SnapshotError};

/// Bytes inspected before deciding whether a response is a page
pub const SNIFF_LEN: usize = 512;

const HTML: &str = "text/html";
const PLAIN_TEXT: &str = "text/plain";
const OCTET_STREAM: &str = "application/octet-stream";

/// Classifies a body from its first bytes.
pub fn sniff_content_type(prefix: &[u8]) -> &'static str {
    let prefix = &prefix[..prefix.len().min(SNIFF_LEN)];
    if let Some(kind) = infer::get(prefix) {
        return kind.mime_type();
    }
    match std::str::from_utf8(prefix) {
        Ok(_) => PLAIN_TEXT,
        // cut in the middle of a character by the prefix limit
        Err(e) if e.error_len().is_none() => PLAIN_TEXT,
        Err(_) => OCTET_STREAM,
    }
}

pub fn is_html(content_type: &str) -> bool {
    content_type == HTML
}

/// Fetches `url` and writes the body under `output_dir`.
///
/// Nothing is written unless the body sniffs as HTML. On success the full
/// body is returned so the caller can scan it for links.
pub async fn fetch_and_store(client: &Client, url: &Url, output_dir: &Path) -> Result<Vec<u8>> {
    let request_error = |source| SnapshotError::Request {
        url: url.clone(),
        source,
    };

    let mut response = client.get(url.clone()).send().await.map_err(request_error)?;
    if !response.status().is_success() {
        return Err(SnapshotError::Status {
            url: url.clone(),
            status: response.status(),
        });
    }

    let mut body = Vec::new();
    while body.len() < SNIFF_LEN {
        match response.chunk().await.map_err(request_error)? {
            Some(chunk) => body.extend_from_slice(&chunk),
            None => break,
        }
    }

    let content_type = sniff_content_type(&body);
    if !is_html(content_type) {
        return Err(SnapshotError::ContentType {
            url: url.clone(),
            content_type: content_type.to_string(),
        });
    }

    while let Some(chunk) = response.chunk().await.map_err(request_error)? {
        body.extend_from_slice(&chunk);
    }

    let path = store(url, &body, output_dir).await?;
    debug!("Stored {} ({} bytes) at {}", url, body.len(), path.display());
    Ok(body)
}

/// Writes `body` to the artifact location of `url`, creating parent
/// directories as needed. Returns the written path.
pub async fn store(url: &Url, body: &[u8], output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(encode(url));
    let io_error = |source| SnapshotError::Io {
        url: url.clone(),
        path: path.clone(),
        source,
    };

    if let Some(parent) = path.parent() {
        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(0o755);
        builder.create(parent).await.map_err(io_error)?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o644);

    let mut file = options.open(&path).await.map_err(io_error)?;
    file.write_all(body).await.map_err(io_error)?;
    file.flush().await.map_err(io_error)?;

    Ok(path)
}
