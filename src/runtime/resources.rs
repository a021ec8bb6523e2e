//! Content folder resources served to surfaces
//!
//! Surfaces load template resources through a custom `dotview` protocol.
//! [`ContentUris`] maps a file under the content folder to its protocol URI;
//! [`serve`] answers the protocol requests by reading files back from the
//! allowed roots.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use wry::http::{header::CONTENT_TYPE, Request, Response, StatusCode};

use dotview::template::ResourceUris;

pub const SCHEME: &str = "dotview";

/// Base URI for the custom protocol (WebView2 exposes custom schemes as http)
fn base_uri() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        "http://dotview.localhost/"
    }

    #[cfg(not(target_os = "windows"))]
    {
        "dotview://localhost/"
    }
}

/// Maps files below the content folder to protocol URIs
#[derive(Debug, Clone)]
pub struct ContentUris {
    root: PathBuf,
}

impl ContentUris {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceUris for ContentUris {
    fn resource_uri(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(relative) => {
                let segments: Vec<String> = relative
                    .components()
                    .map(|c| encode_segment(&c.as_os_str().to_string_lossy()))
                    .collect();
                format!("{}{}", base_uri(), segments.join("/"))
            }
            Err(_) => {
                tracing::warn!("{} is outside the content folder", path.display());
                format!("file://{}", path.display())
            }
        }
    }
}

fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Percent-decode a request path; malformed escapes are kept as-is
fn decode_path(path: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(path.as_bytes())).into_owned()
}

/// Resolve a request path under one of the allowed roots
///
/// Paths that try to climb out of the root are rejected.
fn resolve(roots: &[PathBuf], request_path: &str) -> Option<PathBuf> {
    let relative = PathBuf::from(decode_path(request_path.trim_start_matches('/')));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }

    roots
        .iter()
        .map(|root| root.join(&relative))
        .find(|candidate| candidate.is_file())
}

fn mime_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html",
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("json") => "application/json",
        Some("wasm") => "application/wasm",
        _ => "application/octet-stream",
    }
}

/// Answer a custom protocol request from the allowed roots
pub fn serve(roots: &[PathBuf], request: &Request<Vec<u8>>) -> Response<Cow<'static, [u8]>> {
    let path = request.uri().path();
    let (status, mime, body) = match resolve(roots, path) {
        Some(file) => match std::fs::read(&file) {
            Ok(bytes) => (StatusCode::OK, mime_type(&file), bytes),
            Err(e) => {
                tracing::warn!("Failed to read resource {}: {}", file.display(), e);
                (StatusCode::INTERNAL_SERVER_ERROR, "text/plain", Vec::new())
            }
        },
        None => {
            tracing::debug!("Resource not found: {}", path);
            (StatusCode::NOT_FOUND, "text/plain", Vec::new())
        }
    };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, mime)
        .body(Cow::Owned(body))
        .unwrap_or_else(|_| Response::new(Cow::Borrowed(&[][..])))
}
