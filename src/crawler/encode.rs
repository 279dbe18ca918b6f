//! Maps page URLs onto the snapshot tree.
//!
//! Every page is a file named after its last path segment with a leading
//! `_`, placed inside directories named after the preceding segments:
//!
//! ```text
//! https://example.test/            -> example.test/_
//! https://example.test/about       -> example.test/_about
//! https://example.test/about/      -> example.test/about/_
//! https://example.test/about/team  -> example.test/about/_team
//! ```
//!
//! Directory names never start with `_`, so a page can't collide with a
//! directory holding deeper pages. A directory segment that is empty, a dot
//! segment, or that starts with `_` or `-` gets a `-` prepended, which keeps
//! the mapping injective.

use std::path::PathBuf;
use url::Url;

const FILE_MARKER: char = '_';
const DIR_ESCAPE: char = '-';

/// Relative artifact location for `url`, rooted at its hostname.
pub fn encode(url: &Url) -> PathBuf {
    let mut path = PathBuf::from(url.host_str().unwrap_or_default());
    path.push(encode_path(url.path()));
    path
}

/// Encodes an escaped URL path, without the hostname.
pub fn encode_path(escaped_path: &str) -> PathBuf {
    let trimmed = escaped_path.strip_prefix('/').unwrap_or(escaped_path);
    let mut segments: Vec<&str> = trimmed.split('/').collect();
    let file = segments.pop().unwrap_or_default();

    let mut path: PathBuf = segments.into_iter().map(encode_dir_segment).collect();
    path.push(format!("{FILE_MARKER}{file}"));
    path
}

fn encode_dir_segment(segment: &str) -> String {
    let needs_escape = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.starts_with(FILE_MARKER)
        || segment.starts_with(DIR_ESCAPE);
    if needs_escape {
        format!("{DIR_ESCAPE}{segment}")
    } else {
        segment.to_string()
    }
}
