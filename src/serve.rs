//! Serves a finished snapshot back over HTTP.

use anyhow::{Context, Result};
use hyper::header::{self, HeaderValue};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use log2::*;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

use crate::crawler::encode;

const HTML_UTF8: &str = "text/html; charset=utf-8";

/// Snapshot tree on disk together with the site it was taken from
pub struct SnapshotRoot {
    pub output_dir: PathBuf,
    pub site: Url,
}

impl SnapshotRoot {
    pub fn new(output_dir: impl Into<PathBuf>, site: Url) -> Self {
        Self {
            output_dir: output_dir.into(),
            site,
        }
    }

    /// Artifact that answers a request for `request_path`.
    ///
    /// Only the path of the request is used; the host always stays the
    /// site's. Dot segments are resolved before encoding.
    pub fn artifact_for(&self, request_path: &str) -> Option<PathBuf> {
        if !request_path.starts_with('/') {
            return None;
        }
        let mut url = self.site.clone();
        url.set_path(request_path);
        url.set_query(None);
        url.set_fragment(None);
        Some(self.output_dir.join(encode(&url)))
    }
}

/// Binds `0.0.0.0:port` and serves `root` until the process stops.
pub async fn serve(root: SnapshotRoot, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let root = Arc::new(root);

    let make_svc = make_service_fn(move |_conn| {
        let root = Arc::clone(&root);
        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                let root = Arc::clone(&root);
                async move { Ok::<_, Infallible>(serve_artifact(&root, req).await) }
            }))
        }
    });

    let server = Server::try_bind(&addr)
        .with_context(|| format!("Failed to bind {}", addr))?
        .serve(make_svc);
    println!("listening at http://localhost:{}", port);
    info!("Serving snapshot on {}", addr);

    server.await.context("Snapshot server failed")?;
    Ok(())
}

pub async fn serve_artifact(root: &SnapshotRoot, req: Request<Body>) -> Response<Body> {
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return status_response(StatusCode::METHOD_NOT_ALLOWED);
    }

    let Some(path) = root.artifact_for(req.uri().path()) else {
        return status_response(StatusCode::BAD_REQUEST);
    };

    match read_artifact(&path).await {
        Some(bytes) => {
            debug!("{} {} -> {}", req.method(), req.uri().path(), path.display());
            let body = if req.method() == Method::HEAD {
                Body::empty()
            } else {
                Body::from(bytes)
            };
            let mut response = Response::new(body);
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(HTML_UTF8));
            response
        }
        None => {
            debug!("{} {} not in snapshot", req.method(), req.uri().path());
            status_response(StatusCode::NOT_FOUND)
        }
    }
}

async fn read_artifact(path: &Path) -> Option<Vec<u8>> {
    let metadata = tokio::fs::metadata(path).await.ok()?;
    if !metadata.is_file() {
        return None;
    }
    tokio::fs::read(path).await.ok()
}

fn status_response(status: StatusCode) -> Response<Body> {
    let mut response = Response::new(Body::from(status.to_string()));
    *response.status_mut() = status;
    response
}
